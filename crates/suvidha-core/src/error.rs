//! # Error Types
//!
//! The triage engine itself cannot fail. The only fallible operations in
//! this crate parse externally supplied identifiers.

use thiserror::Error;

/// Validation errors for identifier newtypes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    /// The identifier does not carry the expected prefix.
    #[error("invalid {kind}: \"{value}\" (expected prefix \"{prefix}\")")]
    WrongPrefix {
        /// Identifier kind, e.g. "ticket id".
        kind: &'static str,
        /// Expected prefix including the dash.
        prefix: &'static str,
        /// The rejected input.
        value: String,
    },

    /// The identifier body is not the expected run of uppercase hex digits.
    #[error("invalid {kind}: \"{value}\" (expected {len} uppercase hex characters after the prefix)")]
    MalformedBody {
        /// Identifier kind, e.g. "ticket id".
        kind: &'static str,
        /// Required body length.
        len: usize,
        /// The rejected input.
        value: String,
    },
}
