//! The ACL object model and the pluggable store trait.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{ObjectIdentity, SecurityIdentity};
use crate::security::SecurityError;

/// One grant (or denial) record: a security identity and the permission
/// mask it is granted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessControlEntry {
    pub sid: SecurityIdentity,
    pub mask: u32,
    /// `true` grants the mask, `false` explicitly denies it.
    pub granting: bool,
}

/// The ACL attached to one object instance.
///
/// Class ACEs apply to every instance of the object's type; object ACEs
/// apply to this instance only and take precedence. Entries are evaluated
/// in insertion order and the first entry whose identity matches and
/// whose mask covers the required bits decides the outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectAcl {
    pub object: ObjectIdentity,
    owner: Option<SecurityIdentity>,
    class_aces: Vec<AccessControlEntry>,
    object_aces: Vec<AccessControlEntry>,
}

impl ObjectAcl {
    pub fn new(object: ObjectIdentity) -> Self {
        Self {
            object,
            owner: None,
            class_aces: Vec::new(),
            object_aces: Vec::new(),
        }
    }

    pub fn owner(&self) -> Option<&SecurityIdentity> {
        self.owner.as_ref()
    }

    pub fn set_owner(&mut self, owner: SecurityIdentity) {
        self.owner = Some(owner);
    }

    pub fn class_aces(&self) -> &[AccessControlEntry] {
        &self.class_aces
    }

    pub fn object_aces(&self) -> &[AccessControlEntry] {
        &self.object_aces
    }

    /// Append a class-level entry. Re-inserting for an identity already
    /// present replaces its previous entry.
    pub fn insert_class_ace(&mut self, sid: SecurityIdentity, mask: u32, granting: bool) {
        Self::upsert(&mut self.class_aces, sid, mask, granting);
    }

    /// Append an object-level entry, replacing any previous entry for the
    /// same identity.
    pub fn insert_object_ace(&mut self, sid: SecurityIdentity, mask: u32, granting: bool) {
        Self::upsert(&mut self.object_aces, sid, mask, granting);
    }

    fn upsert(aces: &mut Vec<AccessControlEntry>, sid: SecurityIdentity, mask: u32, granting: bool) {
        if let Some(existing) = aces.iter_mut().find(|ace| ace.sid == sid) {
            existing.mask = mask;
            existing.granting = granting;
        } else {
            aces.push(AccessControlEntry {
                sid,
                mask,
                granting,
            });
        }
    }

    /// Remove every entry (class and object level) for an identity.
    pub fn revoke(&mut self, sid: &SecurityIdentity) {
        self.class_aces.retain(|ace| &ace.sid != sid);
        self.object_aces.retain(|ace| &ace.sid != sid);
    }

    /// Decide whether any of the given identities is granted every bit of
    /// `required`. Object entries are consulted before class entries; the
    /// first applicable entry decides.
    pub fn is_granted(&self, sids: &[SecurityIdentity], required: u32) -> bool {
        for ace in self.object_aces.iter().chain(self.class_aces.iter()) {
            if sids.contains(&ace.sid) && ace.mask & required == required {
                return ace.granting;
            }
        }
        false
    }
}

/// Pluggable backing store for per-object ACLs.
///
/// Implementations must make per-object updates atomic and reads
/// crash-consistent; the decision path treats the store as read-mostly
/// and all mutation flows through the administrative operations.
#[async_trait]
pub trait AclStore: Send + Sync {
    /// Fetch the ACL for one object, if one exists.
    async fn find_acl(&self, object: &ObjectIdentity) -> Result<Option<ObjectAcl>, SecurityError>;

    /// Fetch ACLs for several objects in one call. Objects without an ACL
    /// are absent from the result, not an error.
    async fn find_acls(
        &self,
        objects: &[ObjectIdentity],
    ) -> Result<HashMap<ObjectIdentity, ObjectAcl>, SecurityError>;

    /// Ensure an (empty) ACL exists for the object and return it. Calling
    /// this for an object that already has an ACL returns the existing one.
    async fn create_acl(&self, object: ObjectIdentity) -> Result<ObjectAcl, SecurityError>;

    /// Persist the given ACL, replacing the stored one for its object.
    async fn update_acl(&self, acl: &ObjectAcl) -> Result<(), SecurityError>;

    /// Delete the ACL for an object. Deleting a missing ACL is a no-op.
    async fn delete_acl(&self, object: &ObjectIdentity) -> Result<(), SecurityError>;
}
