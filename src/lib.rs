//! Portcullis: a permission-resolution engine for admin surfaces.
//!
//! The crate decides whether a subject is authorized for an action on an
//! object. Each securable type declares *security information* (role
//! suffix → permission names); the engine derives concrete role
//! identifiers from it, delegates the coarse decision to the host
//! environment's [`security::AuthorizationChecker`], and maintains
//! per-object access-control lists through a pluggable [`acl::AclStore`]
//! for fine-grained administration.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use portcullis::acl::MemoryAclStore;
//! use portcullis::config::SecurityConfig;
//! use portcullis::security::{
//!     AclSecurityHandler, SecurableType, SecurityHandler, StaticSubjectProvider, Subject,
//!     SubjectRoleChecker,
//! };
//!
//! let subject = Subject::new().with_id("u1").with_role("ROLE_APP_NEWS_EDIT");
//! let handler = AclSecurityHandler::new(
//!     Arc::new(StaticSubjectProvider::new(Some(subject))),
//!     Arc::new(SubjectRoleChecker::new()),
//!     Arc::new(MemoryAclStore::new()),
//!     SecurityConfig::default(),
//! );
//!
//! let news = SecurableType::new("app.news").with_permission("EDIT", &["EDIT"]);
//! assert!(handler.is_granted(&news, "EDIT".into(), None, None).unwrap());
//! assert!(!handler.is_granted(&news, "DELETE".into(), None, None).unwrap());
//! ```
//!
//! Failure classification is part of the contract: an anonymous caller is
//! *denied* (`Ok(false)`), while any other collaborator failure is fatal
//! and propagates to the caller.

pub mod acl;
pub mod config;
pub mod security;

pub use acl::{AclStore, MemoryAclStore, ObjectIdentity, SecurityIdentity};
pub use config::SecurityConfig;
pub use security::{
    AclSecurityHandler, AuthorizationChecker, Permissions, Securable, SecurityError,
    SecurityHandler, Subject, SubjectProvider,
};
