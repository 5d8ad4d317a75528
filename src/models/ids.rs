//! Strongly-typed ID wrappers for all entity types
//!
//! IDs are integers assigned by the store on insert. A freshly constructed
//! entity carries the unassigned ID (`0`) until it is inserted.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Macro to generate ID newtype wrappers
macro_rules! define_id {
    ($name:ident, $display_prefix:literal) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// The ID of an entity that has not been inserted yet
            pub const UNASSIGNED: Self = Self(0);

            pub const fn new(value: u64) -> Self {
                Self(value)
            }

            pub const fn value(&self) -> u64 {
                self.0
            }

            pub const fn is_assigned(&self) -> bool {
                self.0 != 0
            }

            /// The ID following this one
            pub const fn next(&self) -> Self {
                Self(self.0 + 1)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $display_prefix, self.0)
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            /// Accepts both the bare number and the prefixed display form
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                let s = s.strip_prefix($display_prefix).unwrap_or(s);
                Ok(Self(s.parse()?))
            }
        }
    };
}

define_id!(AccountId, "acc-");
define_id!(CategoryId, "cat-");
define_id!(TransactionId, "txn-");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unassigned_id() {
        assert!(!AccountId::UNASSIGNED.is_assigned());
        assert_eq!(AccountId::default(), AccountId::UNASSIGNED);
        assert!(AccountId::new(1).is_assigned());
    }

    #[test]
    fn test_id_display() {
        assert_eq!(CategoryId::new(12).to_string(), "cat-12");
        assert_eq!(TransactionId::new(3).to_string(), "txn-3");
    }

    #[test]
    fn test_id_parse() {
        assert_eq!("7".parse::<AccountId>().unwrap(), AccountId::new(7));
        assert_eq!("acc-7".parse::<AccountId>().unwrap(), AccountId::new(7));
        assert!("acc-x".parse::<AccountId>().is_err());
        assert!("Wallet".parse::<AccountId>().is_err());
    }

    #[test]
    fn test_id_serialization() {
        let id = TransactionId::new(42);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "42");
        let deserialized: TransactionId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }

    #[test]
    fn test_next() {
        assert_eq!(CategoryId::UNASSIGNED.next(), CategoryId::new(1));
    }
}
