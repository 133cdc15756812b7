//! Typed IDs for type-safe entity references.
//!
//! Using typed IDs prevents accidentally passing a `JournalId` where an `OwnerId` is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Creates a new random ID using UUID v7 (time-ordered).
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Creates an ID from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }
    };
}

typed_id!(
    OwnerId,
    "Identifier of the owner scope a journal entry belongs to."
);
typed_id!(JournalId, "Unique identifier for a journal entry header.");
typed_id!(JournalLineId, "Unique identifier for a journal line.");
typed_id!(ClosingRunId, "Unique identifier for a period-closing run.");

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_typed_id_from_uuid() {
        let uuid = Uuid::new_v4();
        let id = OwnerId::from_uuid(uuid);
        assert_eq!(id.into_inner(), uuid);
        assert_eq!(OwnerId::from(uuid), id);
    }

    #[test]
    fn test_typed_id_display_and_parse() {
        let id = JournalId::new();
        let parsed = JournalId::from_str(&id.to_string()).unwrap();
        assert_eq!(parsed, id);
        assert!(JournalId::from_str("not-a-uuid").is_err());
    }

    #[test]
    fn test_typed_ids_are_unique() {
        assert_ne!(ClosingRunId::new(), ClosingRunId::new());
    }
}
