//! Access-control lists: per-object, per-subject grant records.
//!
//! The ACL side is independent of the coarse role system in
//! [`crate::security::roles`]. It stores fine-grained grants keyed by
//! object instance and security identity, each grant carrying a
//! permission bitmask. The store behind it is pluggable via
//! [`AclStore`]; a concurrent in-memory implementation is bundled.

mod mask;
mod mem;
mod store;

use serde::{Deserialize, Serialize};

pub use mask::{MaskBuilder, permission, permission_mask};
pub use mem::MemoryAclStore;
pub use store::{AccessControlEntry, AclStore, ObjectAcl};

/// Identifies one securable object instance in the ACL store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectIdentity {
    /// Type code of the securable, e.g. `"app.news"`.
    pub code: String,
    /// Instance identifier within that type.
    pub identifier: String,
}

impl ObjectIdentity {
    pub fn new(code: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            identifier: identifier.into(),
        }
    }
}

impl std::fmt::Display for ObjectIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.code, self.identifier)
    }
}

/// The subject side of an ACL entry: a concrete user or a role.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum SecurityIdentity {
    /// An individual principal, by stable id.
    User(String),
    /// A role name; matches every subject holding the role.
    Role(String),
}

impl SecurityIdentity {
    pub fn user(id: impl Into<String>) -> Self {
        Self::User(id.into())
    }

    pub fn role(name: impl Into<String>) -> Self {
        Self::Role(name.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_identity_display() {
        let oid = ObjectIdentity::new("app.news", "42");
        assert_eq!(oid.to_string(), "app.news#42");
    }

    #[test]
    fn test_object_identity_equality_is_by_code_and_id() {
        assert_eq!(
            ObjectIdentity::new("app.news", "42"),
            ObjectIdentity::new("app.news", "42")
        );
        assert_ne!(
            ObjectIdentity::new("app.news", "42"),
            ObjectIdentity::new("app.post", "42")
        );
    }
}
