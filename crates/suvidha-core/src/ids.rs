//! # Human-Facing Identifiers
//!
//! Ticket, order and transaction identifiers are short, prefixed, uppercase
//! hex strings that citizens read out over the phone or type at a kiosk.
//! Each is a distinct newtype; you cannot pass an [`OrderId`] where a
//! [`TicketId`] is expected.
//!
//! ## Shape
//!
//! | Type              | Prefix   | Body                 |
//! |-------------------|----------|----------------------|
//! | [`TicketId`]      | `GRV-`   | 8 uppercase hex      |
//! | [`OrderId`]       | `ORDER-` | 12 uppercase hex     |
//! | [`TransactionId`] | `TXN-`   | 12 uppercase hex     |
//!
//! Bodies are taken from the leading hex digits of a random v4 UUID.
//! Uniqueness is probabilistic: 8 hex digits give 2^32 ticket ids, so the
//! store's primary key remains the final arbiter.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::IdError;

/// Leading `len` hex digits of a fresh v4 UUID, uppercased.
fn random_body(len: usize) -> String {
    let hex = Uuid::new_v4().simple().to_string();
    hex[..len].to_ascii_uppercase()
}

fn validate(
    value: &str,
    kind: &'static str,
    prefix: &'static str,
    len: usize,
) -> Result<(), IdError> {
    let body = value.strip_prefix(prefix).ok_or_else(|| IdError::WrongPrefix {
        kind,
        prefix,
        value: value.to_string(),
    })?;
    let well_formed = body.len() == len
        && body
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'A'..=b'F').contains(&b));
    if !well_formed {
        return Err(IdError::MalformedBody {
            kind,
            len,
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Declares a prefixed upper-hex identifier newtype.
///
/// Serde goes through [`TryFrom<String>`], so deserialization validates.
macro_rules! prefixed_id {
    ($(#[$meta:meta])* $ty:ident, kind = $kind:literal, prefix = $prefix:literal, len = $len:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $ty(String);

        impl $ty {
            #[doc = concat!("Prefix carried by every ", $kind, ".")]
            pub const PREFIX: &'static str = $prefix;
            /// Number of hex digits after the prefix.
            pub const BODY_LEN: usize = $len;

            #[doc = concat!("Generate a fresh random ", $kind, ".")]
            pub fn generate() -> Self {
                Self(format!("{}{}", Self::PREFIX, random_body(Self::BODY_LEN)))
            }

            #[doc = concat!("Validate an externally supplied ", $kind, ".")]
            pub fn parse(value: &str) -> Result<Self, IdError> {
                validate(value, $kind, Self::PREFIX, Self::BODY_LEN)?;
                Ok(Self(value.to_string()))
            }

            /// The identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl TryFrom<String> for $ty {
            type Error = IdError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::parse(&value)
            }
        }

        impl From<$ty> for String {
            fn from(id: $ty) -> Self {
                id.0
            }
        }
    };
}

prefixed_id!(
    /// Grievance ticket identifier, e.g. `GRV-1A2B3C4D`.
    TicketId,
    kind = "ticket id",
    prefix = "GRV-",
    len = 8
);

prefixed_id!(
    /// Payment order identifier, e.g. `ORDER-0A1B2C3D4E5F`.
    OrderId,
    kind = "order id",
    prefix = "ORDER-",
    len = 12
);

prefixed_id!(
    /// Payment transaction identifier, e.g. `TXN-0A1B2C3D4E5F`.
    TransactionId,
    kind = "transaction id",
    prefix = "TXN-",
    len = 12
);
