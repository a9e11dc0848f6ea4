//! The ambient authorization checker seam.

use std::sync::Arc;

use crate::acl::ObjectIdentity;

use super::{SecurityError, Subject};

/// The ambient authorization check the surrounding service provides.
///
/// One implementation exists per host environment and is chosen at wiring
/// time. The contract is disjunctive: the check succeeds if *any* of the
/// given roles is granted. Implementations must signal the absence of an
/// authentication context with [`SecurityError::Unauthenticated`]; every
/// other error is treated as fatal by the handlers.
pub trait AuthorizationChecker: Send + Sync {
    /// `Ok(true)` if any of `roles` is granted to the subject, optionally
    /// in the context of a concrete object instance.
    fn is_granted_any(
        &self,
        subject: Option<&Subject>,
        roles: &[String],
        object: Option<&ObjectIdentity>,
    ) -> Result<bool, SecurityError>;
}

impl<C: AuthorizationChecker + ?Sized> AuthorizationChecker for Arc<C> {
    fn is_granted_any(
        &self,
        subject: Option<&Subject>,
        roles: &[String],
        object: Option<&ObjectIdentity>,
    ) -> Result<bool, SecurityError> {
        (**self).is_granted_any(subject, roles, object)
    }
}

/// Checker that grants a role iff the subject holds it directly.
///
/// This is the bundled implementation for services whose subjects carry a
/// flat role list (claims from an IdP, roles loaded from a user store).
/// Role hierarchies and voters belong to the host environment's own
/// checker implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubjectRoleChecker;

impl SubjectRoleChecker {
    pub fn new() -> Self {
        Self
    }
}

impl AuthorizationChecker for SubjectRoleChecker {
    fn is_granted_any(
        &self,
        subject: Option<&Subject>,
        roles: &[String],
        _object: Option<&ObjectIdentity>,
    ) -> Result<bool, SecurityError> {
        let subject = subject.ok_or(SecurityError::Unauthenticated)?;
        Ok(subject.has_any_role(roles))
    }
}
