//! # Entity Extraction
//!
//! Pulls a consumer id and a location reference out of free-text
//! descriptions with two case-insensitive patterns.
//!
//! - Consumer id: `KC`, `CON` or `CID`, then either a `-`/`–` and an
//!   alphanumeric body (`KC-00123`, `CON-ABC12`) or an undashed body
//!   starting with a digit (`CON45A`). Undashed bodies need the digit so
//!   the word "Consumer" does not match itself. Returned uppercased.
//! - Location: `Sector`, `Block`, `Zone` or `Ward`, whitespace, then the
//!   alphanumeric run that follows (`Sector 4`, `Block C`, and `Sector 4`
//!   out of `Sector 4_b`). Returned as written.
//!
//! Only the first match of each pattern is reported.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Structured fields found in a description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedEntities {
    /// First location reference, original casing.
    pub location: Option<String>,
    /// First consumer id, uppercased.
    pub consumer_id: Option<String>,
    /// Reserved. Never populated.
    pub phone: Option<String>,
}

impl ExtractedEntities {
    /// Whether nothing was extracted.
    pub fn is_empty(&self) -> bool {
        self.location.is_none() && self.consumer_id.is_none() && self.phone.is_none()
    }
}

fn consumer_id_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(?:KC|CON|CID)(?:[-–][0-9A-Z]+|[0-9][0-9A-Z]*)\b")
            .expect("consumer id pattern is valid")
    })
}

fn location_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(?:Sector|Block|Zone|Ward)\s+[A-Z0-9]+")
            .expect("location pattern is valid")
    })
}

/// Extract entities from a description.
pub fn extract(description: &str) -> ExtractedEntities {
    ExtractedEntities {
        location: location_pattern()
            .find(description)
            .map(|m| m.as_str().to_string()),
        consumer_id: consumer_id_pattern()
            .find(description)
            .map(|m| m.as_str().to_uppercase()),
        phone: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consumer_and_location_from_typical_report() {
        let e = extract("Consumer KC-00123 in Sector 4 reports no power");
        assert_eq!(e.consumer_id.as_deref(), Some("KC-00123"));
        assert_eq!(e.location.as_deref(), Some("Sector 4"));
        assert_eq!(e.phone, None);
    }

    #[test]
    fn nothing_to_extract() {
        let e = extract("no identifiers here");
        assert!(e.is_empty());
    }

    #[test]
    fn consumer_id_is_uppercased_and_dash_optional() {
        assert_eq!(extract("my id is con45a").consumer_id.as_deref(), Some("CON45A"));
        assert_eq!(extract("ref cid–9981 please").consumer_id.as_deref(), Some("CID–9981"));
    }

    #[test]
    fn dashed_consumer_id_may_start_with_a_letter() {
        assert_eq!(extract("ref CON-ABC12").consumer_id.as_deref(), Some("CON-ABC12"));
        assert_eq!(extract("kc–x9 about my bill").consumer_id.as_deref(), Some("KC–X9"));
    }

    #[test]
    fn consumer_words_do_not_match() {
        assert_eq!(extract("Consumer complaint about the connection").consumer_id, None);
        assert_eq!(extract("KCB bank branch").consumer_id, None);
    }

    #[test]
    fn location_keeps_original_casing() {
        assert_eq!(extract("outage across block C today").location.as_deref(), Some("block C"));
        assert_eq!(extract("WARD 12 and Zone 3").location.as_deref(), Some("WARD 12"));
    }

    #[test]
    fn location_stops_at_the_alphanumeric_run() {
        assert_eq!(extract("Sector 4_b outage").location.as_deref(), Some("Sector 4"));
        assert_eq!(extract("Ward 12, near the pump").location.as_deref(), Some("Ward 12"));
    }

    #[test]
    fn location_needs_a_token() {
        assert_eq!(extract("a sector-wide outage").location, None);
    }
}
