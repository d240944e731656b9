//! Strongly-typed ID wrappers for all ledger records
//!
//! A contract ID can never be passed where a client ID is expected; the
//! compiler rejects it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Macro to generate ID newtype wrappers
macro_rules! define_id {
    ($name:ident, $display_prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Create a new random ID
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Get the underlying UUID
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Short display form used in tables and by `find` lookups
            pub fn short(&self) -> String {
                self.to_string()
            }

            /// Whether a user-supplied short form refers to this ID
            pub fn matches_short(&self, s: &str) -> bool {
                let s = s.trim();
                let hex = s.strip_prefix($display_prefix).unwrap_or(s);
                hex.len() >= 4 && self.0.simple().to_string().starts_with(&hex.to_lowercase())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $display_prefix, &self.0.simple().to_string()[..8])
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.strip_prefix($display_prefix).unwrap_or(s);
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

define_id!(ClientId, "cli-");
define_id!(ContractId, "con-");
define_id!(SessionId, "ses-");
define_id!(ExpenseId, "exp-");
define_id!(InvoiceId, "inv-");
define_id!(GoalId, "gol-");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display() {
        let id = ContractId::new();
        let display = id.to_string();
        assert!(display.starts_with("con-"));
        assert_eq!(display.len(), 12);
    }

    #[test]
    fn test_matches_short() {
        let id = ClientId::new();
        assert!(id.matches_short(&id.short()));
        assert!(id.matches_short(&id.short()[4..]));
        // Too short to be a meaningful prefix
        assert!(!id.matches_short("cli-"));
    }

    #[test]
    fn test_from_str_full_uuid() {
        let uuid_str = "550e8400-e29b-41d4-a716-446655440000";
        let id: InvoiceId = uuid_str.parse().unwrap();
        assert_eq!(id.as_uuid().to_string(), uuid_str);
    }

    #[test]
    fn test_serialization_is_transparent() {
        let id = GoalId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.as_uuid()));
    }
}
