//! Security errors.

use thiserror::Error;

/// Failure kinds recognized at the security-handler boundary.
///
/// `Unauthenticated` is the one recoverable kind: handlers map it to a
/// not-granted result instead of surfacing it, since an anonymous visitor
/// hitting a protected object is an expected path, not a fault. Every other
/// variant indicates a misconfiguration or backend failure and propagates
/// to the caller unchanged.
#[derive(Debug, Error)]
pub enum SecurityError {
    /// No authentication context is available (anonymous caller).
    #[error("no authentication context available")]
    Unauthenticated,

    /// The ambient authorization checker failed for a reason other than
    /// a missing authentication context.
    #[error("authorization check failed: {0}")]
    Checker(String),

    /// The ACL backing store failed.
    #[error("ACL store error: {0}")]
    AclStore(String),

    /// A permission name has no mask mapping.
    #[error("unknown permission: {0}")]
    UnknownPermission(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl SecurityError {
    pub fn checker(reason: impl Into<String>) -> Self {
        Self::Checker(reason.into())
    }

    pub fn acl_store(reason: impl Into<String>) -> Self {
        Self::AclStore(reason.into())
    }

    /// Whether this failure means "anonymous caller" rather than a fault.
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, Self::Unauthenticated)
    }
}
