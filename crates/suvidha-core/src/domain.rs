//! # Domain Enumerations
//!
//! The closed vocabularies of the self-service backend. Each enum
//! serializes to the exact wire string used by the API and stored in the
//! database, and offers `as_str()` / `from_code()` for text columns.
//!
//! `from_code` is case-sensitive. Callers that need a total mapping over
//! arbitrary input handle the `None` case themselves (see
//! [`crate::triage::priority::classify_code`]).

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Grievances
// ---------------------------------------------------------------------------

/// The service area a grievance is filed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GrievanceCategory {
    /// Loss of electricity supply.
    PowerOutage,
    /// Disputed or incorrect bill.
    BillingIssue,
    /// Faulty, tampered or unreadable meter.
    MeterProblem,
    /// Request or delay around a new connection.
    NewConnection,
    /// Wrongful or delayed disconnection.
    DisconnectionIssue,
    /// Water availability or quality.
    WaterSupply,
    /// Anything not covered above.
    Other,
}

impl GrievanceCategory {
    /// Every category, in declaration order.
    pub fn all() -> &'static [GrievanceCategory] {
        &[
            Self::PowerOutage,
            Self::BillingIssue,
            Self::MeterProblem,
            Self::NewConnection,
            Self::DisconnectionIssue,
            Self::WaterSupply,
            Self::Other,
        ]
    }

    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PowerOutage => "POWER_OUTAGE",
            Self::BillingIssue => "BILLING_ISSUE",
            Self::MeterProblem => "METER_PROBLEM",
            Self::NewConnection => "NEW_CONNECTION",
            Self::DisconnectionIssue => "DISCONNECTION_ISSUE",
            Self::WaterSupply => "WATER_SUPPLY",
            Self::Other => "OTHER",
        }
    }

    /// Parse a wire string. Returns `None` for anything unrecognized.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::all().iter().copied().find(|c| c.as_str() == code)
    }
}

impl std::fmt::Display for GrievanceCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of a grievance.
///
/// Only the initial assignment (`Open`) is made by this system. Later
/// transitions are performed by back-office processes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GrievanceStatus {
    /// Submitted, not yet picked up.
    Open,
    /// Assigned and being worked on.
    InProgress,
    /// Fixed; awaiting closure.
    Resolved,
    /// Closed.
    Closed,
    /// Rejected as invalid or duplicate.
    Rejected,
}

impl GrievanceStatus {
    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::InProgress => "IN_PROGRESS",
            Self::Resolved => "RESOLVED",
            Self::Closed => "CLOSED",
            Self::Rejected => "REJECTED",
        }
    }

    /// Parse a wire string.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "OPEN" => Some(Self::Open),
            "IN_PROGRESS" => Some(Self::InProgress),
            "RESOLVED" => Some(Self::Resolved),
            "CLOSED" => Some(Self::Closed),
            "REJECTED" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Whether the grievance still needs attention (open or in progress).
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Open | Self::InProgress)
    }
}

impl std::fmt::Display for GrievanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Triage priority of a grievance.
///
/// `Ord` follows declaration order: `Low < Medium < High < Critical`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    /// Routine.
    Low,
    /// Service degraded.
    Medium,
    /// Service lost or hazard suspected.
    High,
    /// Immediate danger to life or property.
    Critical,
}

impl Priority {
    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }

    /// Parse a wire string.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "LOW" => Some(Self::Low),
            "MEDIUM" => Some(Self::Medium),
            "HIGH" => Some(Self::High),
            "CRITICAL" => Some(Self::Critical),
            _ => None,
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Billing and payments
// ---------------------------------------------------------------------------

/// Utility service a bill is raised for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceType {
    /// Electricity supply.
    Electricity,
    /// Water supply.
    Water,
    /// Piped gas.
    Gas,
}

impl ServiceType {
    /// Every service type, in declaration order.
    pub fn all() -> &'static [ServiceType] {
        &[Self::Electricity, Self::Water, Self::Gas]
    }

    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Electricity => "electricity",
            Self::Water => "water",
            Self::Gas => "gas",
        }
    }

    /// Parse a wire string.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::all().iter().copied().find(|s| s.as_str() == code)
    }
}

impl std::fmt::Display for ServiceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settlement state of a bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BillStatus {
    /// Issued and unpaid.
    Pending,
    /// Settled.
    Paid,
    /// Past the due date and unpaid.
    Overdue,
    /// Withdrawn by the utility.
    Cancelled,
}

impl BillStatus {
    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Paid => "PAID",
            Self::Overdue => "OVERDUE",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Parse a wire string.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "PENDING" => Some(Self::Pending),
            "PAID" => Some(Self::Paid),
            "OVERDUE" => Some(Self::Overdue),
            "CANCELLED" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

impl std::fmt::Display for BillStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a citizen pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    /// Cash at a kiosk counter.
    Cash,
    /// Debit or credit card.
    Card,
    /// Unified Payments Interface.
    #[default]
    Upi,
    /// Internet banking transfer.
    NetBanking,
}

impl PaymentMethod {
    /// Accepted methods, in the order they are offered to clients.
    pub fn all() -> &'static [PaymentMethod] {
        &[Self::Cash, Self::Card, Self::Upi, Self::NetBanking]
    }

    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "CASH",
            Self::Card => "CARD",
            Self::Upi => "UPI",
            Self::NetBanking => "NET_BANKING",
        }
    }

    /// Parse a wire string.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::all().iter().copied().find(|m| m.as_str() == code)
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State of a payment order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    /// Order created, gateway confirmation outstanding.
    Pending,
    /// Confirmed by the gateway.
    Success,
    /// Rejected by the gateway.
    Failed,
    /// Reversed after success.
    Refunded,
}

impl PaymentStatus {
    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Success => "SUCCESS",
            Self::Failed => "FAILED",
            Self::Refunded => "REFUNDED",
        }
    }

    /// Parse a wire string.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "PENDING" => Some(Self::Pending),
            "SUCCESS" => Some(Self::Success),
            "FAILED" => Some(Self::Failed),
            "REFUNDED" => Some(Self::Refunded),
            _ => None,
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Kind of account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    /// A citizen with utility connections.
    #[default]
    Consumer,
    /// A shared self-service kiosk terminal.
    Kiosk,
    /// Back-office staff.
    Admin,
}

impl UserType {
    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Consumer => "consumer",
            Self::Kiosk => "kiosk",
            Self::Admin => "admin",
        }
    }

    /// Parse a wire string.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "consumer" => Some(Self::Consumer),
            "kiosk" => Some(Self::Kiosk),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }
}

impl std::fmt::Display for UserType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_codes_roundtrip_through_from_code() {
        for category in GrievanceCategory::all() {
            assert_eq!(GrievanceCategory::from_code(category.as_str()), Some(*category));
        }
        assert_eq!(GrievanceCategory::from_code("power_outage"), None);
        assert_eq!(GrievanceCategory::from_code("STREET_LIGHT"), None);
    }

    #[test]
    fn category_serde_matches_as_str() {
        let json = serde_json::to_string(&GrievanceCategory::DisconnectionIssue).unwrap();
        assert_eq!(json, "\"DISCONNECTION_ISSUE\"");
        let back: GrievanceCategory = serde_json::from_str("\"WATER_SUPPLY\"").unwrap();
        assert_eq!(back, GrievanceCategory::WaterSupply);
    }

    #[test]
    fn unknown_category_fails_deserialization() {
        assert!(serde_json::from_str::<GrievanceCategory>("\"GARBAGE\"").is_err());
    }

    #[test]
    fn priority_ordering_follows_severity() {
        assert!(Priority::Low < Priority::Medium);
        assert!(Priority::Medium < Priority::High);
        assert!(Priority::High < Priority::Critical);
    }

    #[test]
    fn priority_display_is_wire_form() {
        assert_eq!(Priority::Critical.to_string(), "CRITICAL");
        assert_eq!(Priority::from_code("MEDIUM"), Some(Priority::Medium));
        assert_eq!(Priority::from_code("URGENT"), None);
    }

    #[test]
    fn status_activity() {
        assert!(GrievanceStatus::Open.is_active());
        assert!(GrievanceStatus::InProgress.is_active());
        assert!(!GrievanceStatus::Resolved.is_active());
        assert!(!GrievanceStatus::Closed.is_active());
        assert!(!GrievanceStatus::Rejected.is_active());
    }

    #[test]
    fn service_type_is_lowercase_on_the_wire() {
        let json = serde_json::to_string(&ServiceType::Electricity).unwrap();
        assert_eq!(json, "\"electricity\"");
        assert_eq!(ServiceType::from_code("gas"), Some(ServiceType::Gas));
    }

    #[test]
    fn payment_method_defaults_to_upi() {
        assert_eq!(PaymentMethod::default(), PaymentMethod::Upi);
        let names: Vec<&str> = PaymentMethod::all().iter().map(|m| m.as_str()).collect();
        assert_eq!(names, ["CASH", "CARD", "UPI", "NET_BANKING"]);
    }

    #[test]
    fn user_type_defaults_to_consumer() {
        assert_eq!(UserType::default(), UserType::Consumer);
        assert_eq!(UserType::from_code("kiosk"), Some(UserType::Kiosk));
    }
}
