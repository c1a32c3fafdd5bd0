//! # Identifier Newtypes
//!
//! UUID-backed newtypes for the addressing primitives of the tax platform:
//! tenants ([`StoreId`]), countries ([`CountryId`]), sub-national
//! jurisdictions ([`StateId`]), and tenant overrides ([`OverrideId`]).
//!
//! All four are valid by construction. Malformed identifier *strings* are
//! rejected at the API boundary when the UUID fails to parse — by the time
//! an id reaches a registry it is well-formed.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Declare a UUID-backed identifier newtype with the standard surface.
macro_rules! uuid_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Create a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Create an identifier from an existing UUID.
            pub const fn from_uuid(id: Uuid) -> Self {
                Self(id)
            }

            /// Access the underlying UUID.
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
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

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }
    };
}

uuid_id! {
    /// A tenant (store) identifier. Every tenant-scoped registry and engine
    /// operation takes an explicit `StoreId` — there is no ambient tenant
    /// context anywhere in the workspace.
    StoreId
}

uuid_id! {
    /// A country identifier in the jurisdiction catalog.
    CountryId
}

uuid_id! {
    /// A sub-national jurisdiction (state/province/territory) identifier.
    StateId
}

uuid_id! {
    /// A tenant tax override row identifier.
    OverrideId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        assert_ne!(StoreId::new(), StoreId::new());
        assert_ne!(CountryId::new(), CountryId::new());
        assert_ne!(StateId::new(), StateId::new());
        assert_ne!(OverrideId::new(), OverrideId::new());
    }

    #[test]
    fn from_uuid_roundtrip() {
        let uuid = Uuid::new_v4();
        let id = CountryId::from_uuid(uuid);
        assert_eq!(*id.as_uuid(), uuid);
    }

    #[test]
    fn display_matches_uuid() {
        let uuid = Uuid::new_v4();
        let id = StateId::from_uuid(uuid);
        assert_eq!(id.to_string(), uuid.to_string());
    }

    #[test]
    fn serde_is_transparent() {
        let uuid = Uuid::new_v4();
        let id = OverrideId::from_uuid(uuid);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{uuid}\""));
        let parsed: OverrideId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }
}
