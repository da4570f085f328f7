//! Property tests for the triage engine.

use proptest::prelude::*;
use suvidha_core::triage::{classify, classify_code, estimate, estimate_code, extract, triage};
use suvidha_core::{GrievanceCategory, Priority, TicketId};

const CRITICAL_KEYWORDS: &[&str] = &["fire", "shock", "electrocution", "explosion"];

fn category() -> impl Strategy<Value = GrievanceCategory> {
    prop::sample::select(GrievanceCategory::all().to_vec())
}

fn priority() -> impl Strategy<Value = Priority> {
    prop_oneof![
        Just(Priority::Low),
        Just(Priority::Medium),
        Just(Priority::High),
        Just(Priority::Critical),
    ]
}

/// A critical keyword with each letter's case chosen at random.
fn critical_keyword_any_case() -> impl Strategy<Value = String> {
    prop::sample::select(CRITICAL_KEYWORDS.to_vec()).prop_flat_map(|kw| {
        prop::collection::vec(any::<bool>(), kw.len()).prop_map(move |upper| {
            kw.chars()
                .zip(upper)
                .map(|(c, u)| if u { c.to_ascii_uppercase() } else { c })
                .collect()
        })
    })
}

proptest! {
    #[test]
    fn critical_keyword_anywhere_is_critical(
        prefix in "[a-zA-Z ,.!]{0,40}",
        keyword in critical_keyword_any_case(),
        suffix in "[a-zA-Z ,.!]{0,40}",
        category in category(),
    ) {
        let text = format!("{prefix}{keyword}{suffix}");
        prop_assert_eq!(classify(&text, category), Priority::Critical);
    }

    /// Digits and punctuation never contain a keyword.
    #[test]
    fn keyword_free_text_uses_category_default(
        text in "[0-9 .,#/-]{0,60}",
        category in category(),
    ) {
        let expected = match category {
            GrievanceCategory::PowerOutage => Priority::High,
            GrievanceCategory::MeterProblem => Priority::Medium,
            _ => Priority::Low,
        };
        prop_assert_eq!(classify(&text, category), expected);
    }

    #[test]
    fn unknown_category_code_without_keywords_is_low(
        text in "[0-9 ]{0,40}",
        code in "[a-z_]{1,20}",
    ) {
        // Lower-case codes are never valid categories.
        prop_assert_eq!(classify_code(&text, &code), Priority::Low);
    }

    #[test]
    fn classification_is_idempotent(text in ".{0,120}", category in category()) {
        prop_assert_eq!(classify(&text, category), classify(&text, category));
    }

    #[test]
    fn extraction_is_idempotent(text in ".{0,120}") {
        prop_assert_eq!(extract(&text), extract(&text));
    }

    #[test]
    fn estimate_matches_code_entry_point(p in priority()) {
        prop_assert_eq!(estimate(p), estimate_code(p.as_str()));
    }

    #[test]
    fn estimate_code_is_total(code in ".{0,20}") {
        let sla = estimate_code(&code);
        prop_assert!(["2 Hours", "12 Hours", "24 Hours", "48 Hours"].contains(&sla));
    }

    #[test]
    fn triage_agrees_with_components(text in ".{0,120}", category in category()) {
        let outcome = triage(&text, category);
        prop_assert_eq!(outcome.priority, classify(&text, category));
        prop_assert_eq!(outcome.estimated_resolution, estimate(outcome.priority));
        prop_assert!(TicketId::parse(outcome.ticket_id.as_str()).is_ok());
    }
}

#[test]
fn end_to_end_transformer_report() {
    let text = "Urgent! Sparks seen near transformer in Sector 7, fire risk";
    let outcome = triage(text, GrievanceCategory::PowerOutage);
    assert_eq!(outcome.priority, Priority::Critical);
    assert_eq!(outcome.estimated_resolution, "2 Hours");

    let id = outcome.ticket_id.as_str();
    assert!(id.starts_with("GRV-"));
    assert_eq!(id.len(), 12);
    assert!(id[4..]
        .bytes()
        .all(|b| b.is_ascii_digit() || (b'A'..=b'F').contains(&b)));

    let entities = extract(text);
    assert_eq!(entities.location.as_deref(), Some("Sector 7"));
    assert_eq!(entities.consumer_id, None);
}
