//! Subject abstraction: "who is asking".
//!
//! A [`Subject`] is the authenticated principal attached to the current
//! call, however the surrounding service established it (session, token,
//! proxy header). Handlers never mutate or persist subjects; they read the
//! id and role names and pass the subject through to collaborators.
//!
//! The absence of a subject is meaningful on its own: a
//! [`SubjectProvider`] returning `None` is the anonymous-visitor state,
//! which is distinct from a present-but-unauthorized subject.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::acl::SecurityIdentity;

/// The principal on whose behalf a permission check runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Subject {
    /// Stable identifier (user id, service-account id). `None` for
    /// credentials that carry roles but no individual identity.
    pub id: Option<String>,
    /// Role names held by the subject.
    pub roles: Vec<String>,
}

impl Subject {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_roles(mut self, roles: Vec<String>) -> Self {
        self.roles = roles;
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.push(role.into());
        self
    }

    /// Check if the subject holds a specific role.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// Check if the subject holds any of the given roles.
    pub fn has_any_role<S: AsRef<str>>(&self, roles: &[S]) -> bool {
        roles.iter().any(|r| self.has_role(r.as_ref()))
    }

    /// The ACL security identities this subject resolves to: its user
    /// identity (if any) followed by one role identity per held role.
    pub fn security_identities(&self) -> Vec<SecurityIdentity> {
        let mut sids = Vec::with_capacity(self.roles.len() + 1);
        if let Some(id) = &self.id {
            sids.push(SecurityIdentity::user(id.clone()));
        }
        for role in &self.roles {
            sids.push(SecurityIdentity::role(role.clone()));
        }
        sids
    }
}

/// Source of the current subject, if any.
///
/// Implemented by the surrounding service over whatever session or token
/// storage it uses. Returning `None` means "anonymous caller" and is not
/// an error.
pub trait SubjectProvider: Send + Sync {
    fn current_subject(&self) -> Option<Subject>;
}

/// A provider that always yields the same subject (or none).
///
/// Useful for wiring per-request handlers where the subject was resolved
/// upstream, and for tests.
#[derive(Debug, Clone, Default)]
pub struct StaticSubjectProvider {
    subject: Option<Subject>,
}

impl StaticSubjectProvider {
    pub fn new(subject: Option<Subject>) -> Self {
        Self { subject }
    }

    pub fn anonymous() -> Self {
        Self { subject: None }
    }
}

impl SubjectProvider for StaticSubjectProvider {
    fn current_subject(&self) -> Option<Subject> {
        self.subject.clone()
    }
}

impl<P: SubjectProvider + ?Sized> SubjectProvider for Arc<P> {
    fn current_subject(&self) -> Option<Subject> {
        (**self).current_subject()
    }
}
