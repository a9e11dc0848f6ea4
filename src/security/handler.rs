//! Security handlers: the permission-resolution engines.
//!
//! A [`SecurityHandler`] answers "is this subject granted these
//! permissions on this object". Three implementations ship:
//!
//! - [`AclSecurityHandler`]: derives role identifiers from the object's
//!   security information, delegates the coarse decision to the ambient
//!   [`AuthorizationChecker`], and maintains per-object ACLs through an
//!   [`AclStore`] for fine-grained administration.
//! - [`RoleSecurityHandler`]: role-only variant with a super-admin
//!   short-circuit and no ACL store.
//! - [`NoopSecurityHandler`]: grants everything; for development setups
//!   where security is switched off.
//!
//! All handlers share one failure contract: an unauthenticated caller is
//! denied (`Ok(false)`), never an error, while every other checker
//! failure propagates verbatim.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::acl::{AclStore, MaskBuilder, ObjectAcl, ObjectIdentity, SecurityIdentity};
use crate::config::SecurityConfig;

use super::checker::AuthorizationChecker;
use super::roles::{self, Securable, SecurityInformation};
use super::subject::{Subject, SubjectProvider};
use super::SecurityError;

/// One permission name or an ordered list of alternatives.
///
/// The semantics are disjunctive: the request is granted if any listed
/// permission is satisfied. Scalar and singleton-list forms are
/// equivalent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permissions(Vec<String>);

impl Permissions {
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Derive one role identifier per permission for the given type code,
    /// preserving order.
    pub fn derive_roles(&self, code: &str) -> Vec<String> {
        self.0.iter().map(|p| roles::role_for(code, p)).collect()
    }
}

impl From<&str> for Permissions {
    fn from(permission: &str) -> Self {
        Self(vec![permission.to_string()])
    }
}

impl From<String> for Permissions {
    fn from(permission: String) -> Self {
        Self(vec![permission])
    }
}

impl From<Vec<String>> for Permissions {
    fn from(permissions: Vec<String>) -> Self {
        Self(permissions)
    }
}

impl From<Vec<&str>> for Permissions {
    fn from(permissions: Vec<&str>) -> Self {
        Self(permissions.iter().map(|p| p.to_string()).collect())
    }
}

impl From<&[&str]> for Permissions {
    fn from(permissions: &[&str]) -> Self {
        Self(permissions.iter().map(|p| p.to_string()).collect())
    }
}

/// The seam every handler implements.
#[async_trait]
pub trait SecurityHandler: Send + Sync {
    /// Decide whether the subject is granted any of `permissions` on the
    /// securable, optionally scoped to a concrete object instance.
    ///
    /// `subject` overrides the handler's [`SubjectProvider`] when given.
    /// An unauthenticated caller yields `Ok(false)`; any other collaborator
    /// failure propagates.
    fn is_granted(
        &self,
        securable: &dyn Securable,
        permissions: Permissions,
        object: Option<&ObjectIdentity>,
        subject: Option<&Subject>,
    ) -> Result<bool, SecurityError>;

    /// The role identifier a permission expands to for this securable.
    fn role_for(&self, securable: &dyn Securable, permission: &str) -> String {
        roles::role_for(securable.code(), permission)
    }

    /// The full role mapping for this securable: role identifier to the
    /// permission names it expands from.
    fn build_security_information(&self, securable: &dyn Securable) -> SecurityInformation {
        roles::build_security_information(securable)
    }

    /// Set up object-level security after an instance is created.
    async fn create_object_security(
        &self,
        securable: &dyn Securable,
        object: ObjectIdentity,
    ) -> Result<(), SecurityError>;

    /// Tear down object-level security when an instance is deleted.
    async fn delete_object_security(&self, object: &ObjectIdentity) -> Result<(), SecurityError>;
}

// ─────────────────────────────────────────────────────────────────────────────
// ACL security handler
// ─────────────────────────────────────────────────────────────────────────────

/// Handler combining role-derived coarse checks with ACL-backed
/// fine-grained administration.
///
/// The decision path is stateless and synchronous: it derives role
/// identifiers, makes one disjunctive call to the ambient checker, and
/// classifies the outcome. The ACL store is only touched by the
/// administrative operations.
pub struct AclSecurityHandler {
    subjects: Arc<dyn SubjectProvider>,
    checker: Arc<dyn AuthorizationChecker>,
    acl_store: Arc<dyn AclStore>,
    config: SecurityConfig,
}

impl AclSecurityHandler {
    pub fn new(
        subjects: Arc<dyn SubjectProvider>,
        checker: Arc<dyn AuthorizationChecker>,
        acl_store: Arc<dyn AclStore>,
        config: SecurityConfig,
    ) -> Self {
        Self {
            subjects,
            checker,
            acl_store,
            config,
        }
    }

    fn resolve_subject(&self, subject_override: Option<&Subject>) -> Option<Subject> {
        match subject_override {
            Some(subject) => Some(subject.clone()),
            None => self.subjects.current_subject(),
        }
    }

    /// The stored ACL for an object, if any.
    pub async fn get_object_acl(
        &self,
        object: &ObjectIdentity,
    ) -> Result<Option<ObjectAcl>, SecurityError> {
        self.acl_store.find_acl(object).await
    }

    /// Batch ACL lookup; objects without an ACL are absent from the result.
    pub async fn find_object_acls(
        &self,
        objects: &[ObjectIdentity],
    ) -> Result<HashMap<ObjectIdentity, ObjectAcl>, SecurityError> {
        self.acl_store.find_acls(objects).await
    }

    /// Grant an additional owner on an existing object ACL.
    pub async fn add_object_owner(
        &self,
        object: &ObjectIdentity,
        owner: SecurityIdentity,
    ) -> Result<(), SecurityError> {
        let mut acl = match self.acl_store.find_acl(object).await? {
            Some(acl) => acl,
            None => self.acl_store.create_acl(object.clone()).await?,
        };
        let mask = MaskBuilder::mask_for(&self.config.object_owner_permissions)?;
        acl.insert_object_ace(owner, mask, true);
        self.acl_store.update_acl(&acl).await
    }
}

#[async_trait]
impl SecurityHandler for AclSecurityHandler {
    fn is_granted(
        &self,
        securable: &dyn Securable,
        permissions: Permissions,
        object: Option<&ObjectIdentity>,
        subject: Option<&Subject>,
    ) -> Result<bool, SecurityError> {
        let code = securable.code();
        let derived = permissions.derive_roles(code);
        let subject = self.resolve_subject(subject);

        match self
            .checker
            .is_granted_any(subject.as_ref(), &derived, object)
        {
            Ok(granted) => {
                tracing::debug!(
                    code,
                    roles = ?derived,
                    object = ?object,
                    granted,
                    "authorization check"
                );
                Ok(granted)
            }
            // Anonymous caller: denied, never an error.
            Err(SecurityError::Unauthenticated) => {
                tracing::debug!(code, roles = ?derived, "no authentication context, denying");
                Ok(false)
            }
            Err(e) => {
                tracing::warn!(code, roles = ?derived, error = %e, "authorization check failed");
                Err(e)
            }
        }
    }

    async fn create_object_security(
        &self,
        securable: &dyn Securable,
        object: ObjectIdentity,
    ) -> Result<(), SecurityError> {
        let mut acl = match self.acl_store.find_acl(&object).await? {
            Some(acl) => acl,
            None => self.acl_store.create_acl(object).await?,
        };

        // The creating subject becomes the object owner.
        if let Some(id) = self.subjects.current_subject().and_then(|s| s.id) {
            let owner = SecurityIdentity::user(id);
            let mask = MaskBuilder::mask_for(&self.config.object_owner_permissions)?;
            acl.insert_object_ace(owner.clone(), mask, true);
            acl.set_owner(owner);
        }

        // Class-level entries mirror the declared security information.
        for (role, permissions) in self.build_security_information(securable) {
            let mask = MaskBuilder::mask_for(&permissions)?;
            acl.insert_class_ace(SecurityIdentity::role(role), mask, true);
        }

        self.acl_store.update_acl(&acl).await
    }

    async fn delete_object_security(&self, object: &ObjectIdentity) -> Result<(), SecurityError> {
        self.acl_store.delete_acl(object).await
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Role security handler
// ─────────────────────────────────────────────────────────────────────────────

/// Role-only handler: no ACL store, with a super-admin short-circuit.
pub struct RoleSecurityHandler {
    subjects: Arc<dyn SubjectProvider>,
    checker: Arc<dyn AuthorizationChecker>,
    super_admin_roles: Vec<String>,
}

impl RoleSecurityHandler {
    pub fn new(
        subjects: Arc<dyn SubjectProvider>,
        checker: Arc<dyn AuthorizationChecker>,
        super_admin_roles: Vec<String>,
    ) -> Self {
        Self {
            subjects,
            checker,
            super_admin_roles,
        }
    }
}

#[async_trait]
impl SecurityHandler for RoleSecurityHandler {
    fn is_granted(
        &self,
        securable: &dyn Securable,
        permissions: Permissions,
        object: Option<&ObjectIdentity>,
        subject: Option<&Subject>,
    ) -> Result<bool, SecurityError> {
        let derived = permissions.derive_roles(securable.code());
        let subject = match subject {
            Some(s) => Some(s.clone()),
            None => self.subjects.current_subject(),
        };

        let super_admin =
            match self
                .checker
                .is_granted_any(subject.as_ref(), &self.super_admin_roles, None)
            {
                Ok(granted) => granted,
                Err(SecurityError::Unauthenticated) => return Ok(false),
                Err(e) => return Err(e),
            };
        if super_admin {
            return Ok(true);
        }

        match self
            .checker
            .is_granted_any(subject.as_ref(), &derived, object)
        {
            Ok(granted) => Ok(granted),
            Err(SecurityError::Unauthenticated) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn create_object_security(
        &self,
        _securable: &dyn Securable,
        _object: ObjectIdentity,
    ) -> Result<(), SecurityError> {
        // Role-based security has no per-object state.
        Ok(())
    }

    async fn delete_object_security(&self, _object: &ObjectIdentity) -> Result<(), SecurityError> {
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Noop security handler
// ─────────────────────────────────────────────────────────────────────────────

/// Handler that grants everything. For development setups only.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSecurityHandler;

impl NoopSecurityHandler {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SecurityHandler for NoopSecurityHandler {
    fn is_granted(
        &self,
        _securable: &dyn Securable,
        _permissions: Permissions,
        _object: Option<&ObjectIdentity>,
        _subject: Option<&Subject>,
    ) -> Result<bool, SecurityError> {
        Ok(true)
    }

    fn build_security_information(&self, _securable: &dyn Securable) -> SecurityInformation {
        SecurityInformation::new()
    }

    async fn create_object_security(
        &self,
        _securable: &dyn Securable,
        _object: ObjectIdentity,
    ) -> Result<(), SecurityError> {
        Ok(())
    }

    async fn delete_object_security(&self, _object: &ObjectIdentity) -> Result<(), SecurityError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::acl::MemoryAclStore;
    use crate::security::checker::SubjectRoleChecker;
    use crate::security::roles::SecurableType;
    use crate::security::subject::StaticSubjectProvider;

    /// Checker scripted to a fixed outcome, standing in for the host
    /// environment's ambient check.
    struct ScriptedChecker {
        outcome: Outcome,
    }

    enum Outcome {
        Grant,
        Deny,
        Unauthenticated,
        Broken,
    }

    impl ScriptedChecker {
        fn granting() -> Self {
            Self {
                outcome: Outcome::Grant,
            }
        }

        fn denying() -> Self {
            Self {
                outcome: Outcome::Deny,
            }
        }

        fn unauthenticated() -> Self {
            Self {
                outcome: Outcome::Unauthenticated,
            }
        }

        fn broken() -> Self {
            Self {
                outcome: Outcome::Broken,
            }
        }
    }

    impl AuthorizationChecker for ScriptedChecker {
        fn is_granted_any(
            &self,
            _subject: Option<&Subject>,
            _roles: &[String],
            _object: Option<&ObjectIdentity>,
        ) -> Result<bool, SecurityError> {
            match self.outcome {
                Outcome::Grant => Ok(true),
                Outcome::Deny => Ok(false),
                Outcome::Unauthenticated => Err(SecurityError::Unauthenticated),
                Outcome::Broken => Err(SecurityError::checker("backend unavailable")),
            }
        }
    }

    fn acl_handler(checker: ScriptedChecker) -> AclSecurityHandler {
        AclSecurityHandler::new(
            Arc::new(StaticSubjectProvider::anonymous()),
            Arc::new(checker),
            Arc::new(MemoryAclStore::new()),
            SecurityConfig::default(),
        )
    }

    fn securable() -> SecurableType {
        SecurableType::new("test").with_permission("EDIT", &["EDIT"])
    }

    // Scalar and list permission forms must behave identically.
    #[rstest]
    #[case(Permissions::from("TOTO"))]
    #[case(Permissions::from(vec!["TOTO"]))]
    fn test_is_granted_when_checker_grants(#[case] permissions: Permissions) {
        let handler = acl_handler(ScriptedChecker::granting());
        let granted = handler
            .is_granted(&securable(), permissions, None, None)
            .unwrap();
        assert!(granted);
    }

    #[rstest]
    #[case(Permissions::from("TOTO"))]
    #[case(Permissions::from(vec!["TOTO"]))]
    fn test_is_not_granted_when_checker_denies(#[case] permissions: Permissions) {
        let handler = acl_handler(ScriptedChecker::denying());
        let granted = handler
            .is_granted(&securable(), permissions, None, None)
            .unwrap();
        assert!(!granted);
    }

    #[test]
    fn test_unauthenticated_checker_failure_is_denied_not_an_error() {
        let handler = acl_handler(ScriptedChecker::unauthenticated());
        let object = ObjectIdentity::new("test", "1");

        let granted = handler
            .is_granted(&securable(), "EDIT".into(), Some(&object), None)
            .unwrap();
        assert!(!granted);
    }

    #[test]
    fn test_other_checker_failure_propagates() {
        let handler = acl_handler(ScriptedChecker::broken());
        let object = ObjectIdentity::new("test", "1");

        let err = handler
            .is_granted(&securable(), "EDIT".into(), Some(&object), None)
            .unwrap_err();
        assert!(matches!(err, SecurityError::Checker(_)));
    }

    #[test]
    fn test_build_security_information_uses_derived_roles() {
        let handler = acl_handler(ScriptedChecker::granting());

        let results = handler.build_security_information(&securable());

        assert!(results.contains_key("ROLE_TEST_EDIT"));
    }

    #[test]
    fn test_build_security_information_empty_for_bare_type() {
        let handler = acl_handler(ScriptedChecker::granting());
        let bare = SecurableType::new("bare");

        assert!(handler.build_security_information(&bare).is_empty());
    }

    #[test]
    fn test_role_for_matches_expander() {
        let handler = acl_handler(ScriptedChecker::granting());
        assert_eq!(handler.role_for(&securable(), "EDIT"), "ROLE_TEST_EDIT");
    }

    #[test]
    fn test_subject_override_reaches_checker() {
        // SubjectRoleChecker consults the subject directly, so an override
        // with the derived role must grant even though the provider is
        // anonymous.
        let handler = AclSecurityHandler::new(
            Arc::new(StaticSubjectProvider::anonymous()),
            Arc::new(SubjectRoleChecker::new()),
            Arc::new(MemoryAclStore::new()),
            SecurityConfig::default(),
        );
        let subject = Subject::new().with_role("ROLE_TEST_EDIT");

        let granted = handler
            .is_granted(&securable(), "EDIT".into(), None, Some(&subject))
            .unwrap();
        assert!(granted);

        // Without the override the anonymous provider applies: denied.
        let granted = handler
            .is_granted(&securable(), "EDIT".into(), None, None)
            .unwrap();
        assert!(!granted);
    }

    #[tokio::test]
    async fn test_create_object_security_writes_class_aces_and_owner() {
        let store = Arc::new(MemoryAclStore::new());
        let subject = Subject::new().with_id("u1");
        let handler = AclSecurityHandler::new(
            Arc::new(StaticSubjectProvider::new(Some(subject))),
            Arc::new(ScriptedChecker::granting()),
            store.clone(),
            SecurityConfig::default(),
        );
        let object = ObjectIdentity::new("test", "1");

        handler
            .create_object_security(&securable(), object.clone())
            .await
            .unwrap();

        let acl = store.find_acl(&object).await.unwrap().unwrap();
        assert_eq!(acl.owner(), Some(&SecurityIdentity::user("u1")));
        assert_eq!(acl.class_aces().len(), 1);
        assert_eq!(
            acl.class_aces()[0].sid,
            SecurityIdentity::role("ROLE_TEST_EDIT")
        );
        assert_eq!(acl.object_aces().len(), 1);
    }

    #[tokio::test]
    async fn test_create_object_security_without_subject_sets_no_owner() {
        let store = Arc::new(MemoryAclStore::new());
        let handler = AclSecurityHandler::new(
            Arc::new(StaticSubjectProvider::anonymous()),
            Arc::new(ScriptedChecker::granting()),
            store.clone(),
            SecurityConfig::default(),
        );
        let object = ObjectIdentity::new("test", "1");

        handler
            .create_object_security(&securable(), object.clone())
            .await
            .unwrap();

        let acl = store.find_acl(&object).await.unwrap().unwrap();
        assert!(acl.owner().is_none());
        assert!(acl.object_aces().is_empty());
    }

    #[tokio::test]
    async fn test_delete_object_security_removes_acl() {
        let store = Arc::new(MemoryAclStore::new());
        let handler = AclSecurityHandler::new(
            Arc::new(StaticSubjectProvider::anonymous()),
            Arc::new(ScriptedChecker::granting()),
            store.clone(),
            SecurityConfig::default(),
        );
        let object = ObjectIdentity::new("test", "1");

        handler
            .create_object_security(&securable(), object.clone())
            .await
            .unwrap();
        handler.delete_object_security(&object).await.unwrap();

        assert!(store.find_acl(&object).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_add_object_owner_grants_owner_mask() {
        let store = Arc::new(MemoryAclStore::new());
        let handler = AclSecurityHandler::new(
            Arc::new(StaticSubjectProvider::anonymous()),
            Arc::new(ScriptedChecker::granting()),
            store.clone(),
            SecurityConfig::default(),
        );
        let object = ObjectIdentity::new("test", "1");

        handler
            .add_object_owner(&object, SecurityIdentity::user("u2"))
            .await
            .unwrap();

        let acl = store.find_acl(&object).await.unwrap().unwrap();
        let owner_mask = MaskBuilder::mask_for(&["OWNER"]).unwrap();
        assert!(acl.is_granted(&[SecurityIdentity::user("u2")], owner_mask));
    }

    #[test]
    fn test_role_handler_super_admin_short_circuit() {
        let handler = RoleSecurityHandler::new(
            Arc::new(StaticSubjectProvider::new(Some(
                Subject::new().with_role("ROLE_SUPER_ADMIN"),
            ))),
            Arc::new(SubjectRoleChecker::new()),
            vec!["ROLE_SUPER_ADMIN".to_string()],
        );

        // No derived role held, yet granted through the super-admin roles.
        let granted = handler
            .is_granted(&securable(), "EDIT".into(), None, None)
            .unwrap();
        assert!(granted);
    }

    #[test]
    fn test_role_handler_anonymous_is_denied() {
        let handler = RoleSecurityHandler::new(
            Arc::new(StaticSubjectProvider::anonymous()),
            Arc::new(SubjectRoleChecker::new()),
            vec!["ROLE_SUPER_ADMIN".to_string()],
        );

        let granted = handler
            .is_granted(&securable(), "EDIT".into(), None, None)
            .unwrap();
        assert!(!granted);
    }

    #[test]
    fn test_role_handler_propagates_checker_failure() {
        let handler = RoleSecurityHandler::new(
            Arc::new(StaticSubjectProvider::anonymous()),
            Arc::new(ScriptedChecker::broken()),
            vec!["ROLE_SUPER_ADMIN".to_string()],
        );

        let err = handler
            .is_granted(&securable(), "EDIT".into(), None, None)
            .unwrap_err();
        assert!(matches!(err, SecurityError::Checker(_)));
    }

    #[test]
    fn test_noop_handler_grants_everything() {
        let handler = NoopSecurityHandler::new();

        let granted = handler
            .is_granted(&SecurableType::new("anything"), "DELETE".into(), None, None)
            .unwrap();
        assert!(granted);
        assert!(
            handler
                .build_security_information(&securable())
                .is_empty()
        );
    }
}
