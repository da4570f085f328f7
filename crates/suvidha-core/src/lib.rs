#![deny(missing_docs)]

//! # suvidha-core — Domain Vocabulary and Grievance Triage
//!
//! Foundational types for the SUVIDHA utility self-service backend. Every
//! other crate in the workspace depends on this one; it depends only on
//! `serde`, `thiserror`, `uuid`, and `regex` from the external ecosystem.
//!
//! ## Contents
//!
//! - [`domain`]: the enumerations shared by the API and the stores
//!   (grievance category/status/priority, bill, payment and user kinds).
//! - [`triage`]: the grievance triage engine. Keyword-rule priority
//!   classification, SLA estimation, and entity extraction.
//! - [`ids`]: human-readable identifiers (`GRV-…`, `ORDER-…`, `TXN-…`).
//!
//! ## Crate Policy
//!
//! No I/O and no shared mutable state. Every triage function is a total
//! function of its inputs and is safe to call from any number of request
//! handlers concurrently.

pub mod domain;
pub mod error;
pub mod ids;
pub mod triage;

pub use domain::{
    BillStatus, GrievanceCategory, GrievanceStatus, PaymentMethod, PaymentStatus, Priority,
    ServiceType, UserType,
};
pub use error::IdError;
pub use ids::{OrderId, TicketId, TransactionId};
pub use triage::{triage, Assessment, Basis, ExtractedEntities, TriageOutcome};
