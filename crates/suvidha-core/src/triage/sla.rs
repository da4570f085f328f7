//! SLA estimation: a fixed map from priority to a human-readable
//! expected time-to-resolution.

use crate::domain::Priority;

/// Estimate returned for LOW priority and for any unrecognized code.
pub const DEFAULT_ESTIMATE: &str = "48 Hours";

/// Expected time-to-resolution for a priority.
pub fn estimate(priority: Priority) -> &'static str {
    match priority {
        Priority::Critical => "2 Hours",
        Priority::High => "12 Hours",
        Priority::Medium => "24 Hours",
        Priority::Low => DEFAULT_ESTIMATE,
    }
}

/// Expected time-to-resolution for a raw priority code.
pub fn estimate_code(priority_code: &str) -> &'static str {
    Priority::from_code(priority_code)
        .map(estimate)
        .unwrap_or(DEFAULT_ESTIMATE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_values() {
        assert_eq!(estimate(Priority::Critical), "2 Hours");
        assert_eq!(estimate(Priority::High), "12 Hours");
        assert_eq!(estimate(Priority::Medium), "24 Hours");
        assert_eq!(estimate(Priority::Low), "48 Hours");
    }

    #[test]
    fn unknown_code_yields_default() {
        assert_eq!(estimate_code("URGENT"), DEFAULT_ESTIMATE);
        assert_eq!(estimate_code(""), DEFAULT_ESTIMATE);
        assert_eq!(estimate_code("high"), DEFAULT_ESTIMATE);
        assert_eq!(estimate_code("HIGH"), "12 Hours");
    }
}
