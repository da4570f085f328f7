//! # Custom Extractors & Validation
//!
//! Provides the [`Validate`] trait for request DTOs and helpers to
//! extract + validate JSON bodies in handlers.

use axum::extract::rejection::JsonRejection;
use axum::Json;

use crate::error::AppError;

/// Request types with business rules beyond what serde checks.
pub trait Validate {
    /// Validate business rules. Returns an error message on failure.
    fn validate(&self) -> Result<(), String>;
}

/// Extract a JSON body, mapping deserialization errors to [`AppError::BadRequest`].
///
/// ```ignore
/// async fn handler(body: Result<Json<T>, JsonRejection>) -> Result<..., AppError> {
///     let req = extract_json(body)?;
/// }
/// ```
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    result
        .map(|Json(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}

/// Extract a JSON body and validate it using the [`Validate`] trait.
pub fn extract_validated_json<T: Validate>(
    result: Result<Json<T>, JsonRejection>,
) -> Result<T, AppError> {
    let value = extract_json(result)?;
    value.validate().map_err(AppError::Validation)?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Note {
        text: String,
    }

    impl Validate for Note {
        fn validate(&self) -> Result<(), String> {
            if self.text.trim().is_empty() {
                return Err("text must not be empty".to_string());
            }
            Ok(())
        }
    }

    #[test]
    fn valid_body_passes() {
        let note = extract_validated_json(Ok(Json(Note {
            text: "hello".into(),
        })))
        .unwrap();
        assert_eq!(note.text, "hello");
    }

    #[test]
    fn failing_rule_is_validation_error() {
        let err = extract_validated_json(Ok(Json(Note { text: "  ".into() }))).unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m.contains("text")));
    }
}
