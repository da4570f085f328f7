//! # Priority Classification
//!
//! Keyword-rule triage of grievance descriptions. The rules are a static,
//! ordered table ([`SEVERITY_RULES`]) evaluated in a single pass over the
//! lower-cased description; the first rule with a matching keyword wins.
//! When no rule matches, the grievance category decides.
//!
//! Matching is literal substring containment, not word matching: "gas"
//! matches inside "gasket" and "fire" inside "misfire".
//!
//! ## Escalation
//!
//! A rule may carry an [`Escalation`]. Once the rule has fired, the *whole*
//! description is re-scanned for the escalation keywords. A description
//! that only mentions "spark" is HIGH; one that mentions "spark" and,
//! anywhere else, "fire" is CRITICAL.

use crate::domain::{GrievanceCategory, Priority};

/// Raise a matched rule's priority when a stronger keyword is also present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Escalation {
    /// Stable name used in [`Basis`] and logs.
    pub name: &'static str,
    /// Any one of these anywhere in the description escalates.
    pub keywords: &'static [&'static str],
    /// Priority after escalation.
    pub priority: Priority,
}

/// One row of the severity table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordRule {
    /// Stable name used in [`Basis`] and logs.
    pub name: &'static str,
    /// Lower-case substrings, checked in order.
    pub keywords: &'static [&'static str],
    /// Priority assigned when one of `keywords` matches.
    pub priority: Priority,
    /// Optional escalation applied after a match.
    pub escalation: Option<Escalation>,
}

impl KeywordRule {
    /// First keyword of this rule contained in `text`, in table order.
    fn first_match(&self, text: &str) -> Option<&'static str> {
        self.keywords.iter().copied().find(|kw| text.contains(kw))
    }
}

/// The ordered severity table.
pub const SEVERITY_RULES: &[KeywordRule] = &[
    KeywordRule {
        name: "high-severity",
        keywords: &[
            "fire",
            "spark",
            "shock",
            "electrocution",
            "burning",
            "emergency",
            "urgent",
            "critical",
            "danger",
            "hazard",
            "explosion",
            "leak",
            "gas",
            "no water",
            "flood",
        ],
        priority: Priority::High,
        escalation: Some(Escalation {
            name: "life-safety",
            keywords: &["fire", "shock", "electrocution", "explosion"],
            priority: Priority::Critical,
        }),
    },
    KeywordRule {
        name: "medium-severity",
        keywords: &[
            "power outage",
            "no electricity",
            "bill issue",
            "overcharge",
            "meter problem",
            "connection",
            "disconnection",
            "delay",
        ],
        priority: Priority::Medium,
        escalation: None,
    },
];

/// Why a grievance received its priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Basis {
    /// A keyword rule fired.
    Keyword {
        /// Name of the rule (or of its escalation, when escalated).
        rule: &'static str,
        /// The keyword that triggered it.
        keyword: &'static str,
    },
    /// No keyword matched; the category default applied.
    CategoryDefault,
}

impl std::fmt::Display for Basis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Keyword { rule, keyword } => write!(f, "{rule}:{keyword}"),
            Self::CategoryDefault => f.write_str("category-default"),
        }
    }
}

/// A priority together with the reason it was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assessment {
    /// The assigned priority.
    pub priority: Priority,
    /// What produced it.
    pub basis: Basis,
}

/// Priority used when no keyword rule matches.
///
/// `None` stands for a category code this build does not recognize.
pub fn category_default(category: Option<GrievanceCategory>) -> Priority {
    match category {
        Some(GrievanceCategory::PowerOutage) => Priority::High,
        Some(GrievanceCategory::MeterProblem) => Priority::Medium,
        Some(GrievanceCategory::BillingIssue) => Priority::Low,
        _ => Priority::Low,
    }
}

fn assess_inner(description: &str, category: Option<GrievanceCategory>) -> Assessment {
    let text = description.to_lowercase();

    for rule in SEVERITY_RULES {
        let Some(keyword) = rule.first_match(&text) else {
            continue;
        };
        if let Some(escalation) = rule.escalation {
            if let Some(trigger) = escalation.keywords.iter().copied().find(|kw| text.contains(kw))
            {
                return Assessment {
                    priority: escalation.priority,
                    basis: Basis::Keyword {
                        rule: escalation.name,
                        keyword: trigger,
                    },
                };
            }
        }
        return Assessment {
            priority: rule.priority,
            basis: Basis::Keyword {
                rule: rule.name,
                keyword,
            },
        };
    }

    Assessment {
        priority: category_default(category),
        basis: Basis::CategoryDefault,
    }
}

/// Classify a description, reporting the basis.
pub fn assess(description: &str, category: GrievanceCategory) -> Assessment {
    assess_inner(description, Some(category))
}

/// Classify a description.
pub fn classify(description: &str, category: GrievanceCategory) -> Priority {
    assess(description, category).priority
}

/// Classify against a raw category code.
///
/// Unrecognized codes still pass through the keyword rules and then fall
/// back to [`Priority::Low`].
pub fn classify_code(description: &str, category_code: &str) -> Priority {
    assess_inner(description, GrievanceCategory::from_code(category_code)).priority
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn critical_keywords_escalate_in_any_category() {
        for category in GrievanceCategory::all() {
            assert_eq!(classify("Electrocution risk at pole", *category), Priority::Critical);
            assert_eq!(classify("EXPLOSION near pump", *category), Priority::Critical);
            assert_eq!(classify("got a shock from the meter", *category), Priority::Critical);
        }
    }

    #[test]
    fn high_keyword_without_critical_subset_is_high() {
        assert_eq!(
            classify("water leak near my house", GrievanceCategory::WaterSupply),
            Priority::High
        );
        assert_eq!(classify("sparks at the pole", GrievanceCategory::Other), Priority::High);
    }

    #[test]
    fn escalation_rescans_the_whole_text() {
        // "spark" is listed before "fire", but "fire" anywhere escalates.
        let a = assess("spark first, then fire", GrievanceCategory::Other);
        assert_eq!(a.priority, Priority::Critical);
        assert_eq!(
            a.basis,
            Basis::Keyword {
                rule: "life-safety",
                keyword: "fire"
            }
        );
    }

    #[test]
    fn substring_matching_is_literal() {
        // "gas" inside "gasket" counts; "fire" inside "misfire" escalates.
        assert_eq!(classify("broken gasket", GrievanceCategory::Other), Priority::High);
        assert_eq!(classify("generator misfire", GrievanceCategory::Other), Priority::Critical);
    }

    #[test]
    fn medium_keyword_only_is_medium() {
        let a = assess("I have a meter problem", GrievanceCategory::Other);
        assert_eq!(a.priority, Priority::Medium);
        assert_eq!(
            a.basis,
            Basis::Keyword {
                rule: "medium-severity",
                keyword: "meter problem"
            }
        );
        assert_eq!(classify("payment delay", GrievanceCategory::PowerOutage), Priority::Medium);
    }

    #[test]
    fn high_rule_beats_medium_rule() {
        assert_eq!(
            classify("urgent: disconnection notice", GrievanceCategory::BillingIssue),
            Priority::High
        );
    }

    #[test]
    fn category_defaults_apply_without_keywords() {
        let text = "please look into this";
        assert_eq!(classify(text, GrievanceCategory::PowerOutage), Priority::High);
        assert_eq!(classify(text, GrievanceCategory::MeterProblem), Priority::Medium);
        assert_eq!(classify(text, GrievanceCategory::BillingIssue), Priority::Low);
        assert_eq!(classify(text, GrievanceCategory::NewConnection), Priority::Low);
        assert_eq!(classify(text, GrievanceCategory::WaterSupply), Priority::Low);
        assert_eq!(classify(text, GrievanceCategory::Other), Priority::Low);
        assert_eq!(
            assess(text, GrievanceCategory::PowerOutage).basis,
            Basis::CategoryDefault
        );
    }

    #[test]
    fn empty_description_uses_category_default() {
        assert_eq!(classify("", GrievanceCategory::PowerOutage), Priority::High);
        assert_eq!(classify("", GrievanceCategory::Other), Priority::Low);
    }

    #[test]
    fn unknown_category_code_is_low_after_keywords() {
        assert_eq!(classify_code("nothing special", "STREET_LIGHT"), Priority::Low);
        assert_eq!(classify_code("fire!", "STREET_LIGHT"), Priority::Critical);
        assert_eq!(classify_code("nothing special", "POWER_OUTAGE"), Priority::High);
    }

    #[test]
    fn basis_display() {
        let basis = Basis::Keyword {
            rule: "high-severity",
            keyword: "leak",
        };
        assert_eq!(basis.to_string(), "high-severity:leak");
        assert_eq!(Basis::CategoryDefault.to_string(), "category-default");
    }

    #[test]
    fn rule_table_keywords_are_lowercase() {
        for rule in SEVERITY_RULES {
            for kw in rule.keywords {
                assert_eq!(*kw, kw.to_lowercase(), "rule {}", rule.name);
            }
        }
    }
}
