//! Concurrent in-memory ACL store.

use std::collections::HashMap;

use async_trait::async_trait;
use dashmap::DashMap;

use super::{AclStore, ObjectAcl, ObjectIdentity};
use crate::security::SecurityError;

/// In-memory [`AclStore`] backed by a concurrent map.
///
/// Suitable for single-process deployments and tests. Each object's ACL
/// is replaced wholesale on update, so per-object writes are atomic.
#[derive(Debug, Default)]
pub struct MemoryAclStore {
    acls: DashMap<ObjectIdentity, ObjectAcl>,
}

impl MemoryAclStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.acls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.acls.is_empty()
    }
}

#[async_trait]
impl AclStore for MemoryAclStore {
    async fn find_acl(&self, object: &ObjectIdentity) -> Result<Option<ObjectAcl>, SecurityError> {
        Ok(self.acls.get(object).map(|entry| entry.value().clone()))
    }

    async fn find_acls(
        &self,
        objects: &[ObjectIdentity],
    ) -> Result<HashMap<ObjectIdentity, ObjectAcl>, SecurityError> {
        let mut found = HashMap::with_capacity(objects.len());
        for object in objects {
            if let Some(entry) = self.acls.get(object) {
                found.insert(object.clone(), entry.value().clone());
            }
        }
        Ok(found)
    }

    async fn create_acl(&self, object: ObjectIdentity) -> Result<ObjectAcl, SecurityError> {
        let entry = self
            .acls
            .entry(object.clone())
            .or_insert_with(|| ObjectAcl::new(object));
        Ok(entry.value().clone())
    }

    async fn update_acl(&self, acl: &ObjectAcl) -> Result<(), SecurityError> {
        self.acls.insert(acl.object.clone(), acl.clone());
        Ok(())
    }

    async fn delete_acl(&self, object: &ObjectIdentity) -> Result<(), SecurityError> {
        self.acls.remove(object);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acl::{SecurityIdentity, permission_mask};

    fn oid(id: &str) -> ObjectIdentity {
        ObjectIdentity::new("app.news", id)
    }

    #[tokio::test]
    async fn test_create_is_idempotent() {
        let store = MemoryAclStore::new();

        let mut acl = store.create_acl(oid("1")).await.unwrap();
        acl.insert_object_ace(
            SecurityIdentity::user("u1"),
            permission_mask("VIEW").unwrap(),
            true,
        );
        store.update_acl(&acl).await.unwrap();

        // Creating again must return the stored ACL, not a fresh one.
        let again = store.create_acl(oid("1")).await.unwrap();
        assert_eq!(again.object_aces().len(), 1);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_find_missing_acl_is_none() {
        let store = MemoryAclStore::new();
        assert!(store.find_acl(&oid("404")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_acls_skips_missing_objects() {
        let store = MemoryAclStore::new();
        store.create_acl(oid("1")).await.unwrap();
        store.create_acl(oid("2")).await.unwrap();

        let found = store
            .find_acls(&[oid("1"), oid("2"), oid("3")])
            .await
            .unwrap();

        assert_eq!(found.len(), 2);
        assert!(found.contains_key(&oid("1")));
        assert!(!found.contains_key(&oid("3")));
    }

    #[tokio::test]
    async fn test_delete_acl() {
        let store = MemoryAclStore::new();
        store.create_acl(oid("1")).await.unwrap();

        store.delete_acl(&oid("1")).await.unwrap();
        assert!(store.find_acl(&oid("1")).await.unwrap().is_none());

        // Deleting a missing ACL is a no-op.
        store.delete_acl(&oid("1")).await.unwrap();
    }
}
