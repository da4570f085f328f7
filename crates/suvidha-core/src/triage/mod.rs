//! # Grievance Triage Engine
//!
//! Maps an incoming grievance `(description, category)` to a priority, an
//! SLA estimate and a fresh ticket id.
//!
//! - [`priority`]: keyword-rule classification with category fallback.
//! - [`sla`]: priority to expected time-to-resolution.
//! - [`entities`]: consumer id and location extraction.
//!
//! Priority and SLA are a deterministic function of the inputs. The only
//! non-deterministic part of [`triage`] is the random ticket id.

pub mod entities;
pub mod priority;
pub mod sla;

pub use entities::{extract, ExtractedEntities};
pub use priority::{assess, classify, classify_code, Assessment, Basis, KeywordRule};
pub use sla::{estimate, estimate_code, DEFAULT_ESTIMATE};

use crate::domain::{GrievanceCategory, Priority};
use crate::ids::TicketId;

/// Everything the submission path needs from triage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriageOutcome {
    /// Assigned priority.
    pub priority: Priority,
    /// Human-readable SLA, e.g. "12 Hours".
    pub estimated_resolution: &'static str,
    /// Newly generated ticket id.
    pub ticket_id: TicketId,
    /// What produced the priority.
    pub basis: Basis,
}

/// Triage a new grievance.
pub fn triage(description: &str, category: GrievanceCategory) -> TriageOutcome {
    let Assessment { priority, basis } = assess(description, category);
    TriageOutcome {
        priority,
        estimated_resolution: estimate(priority),
        ticket_id: TicketId::generate(),
        basis,
    }
}
