//! Security module providing role-derived permission resolution.
//!
//! This module implements permission checks using:
//! - Declarative security information on each securable type
//! - Deterministic role-identifier derivation from (type code, permission)
//! - An ambient [`AuthorizationChecker`] supplied by the host environment
//!
//! The resolution flow:
//! 1. Normalize the requested permissions to an ordered list
//! 2. Derive one role identifier per permission from the object's type code
//! 3. Ask the ambient checker whether any derived role is granted (one call)
//! 4. Map "no authentication context" to a plain denial; propagate every
//!    other failure to the caller as fatal

mod checker;
mod error;
mod handler;
mod roles;
mod subject;

pub use checker::{AuthorizationChecker, SubjectRoleChecker};
pub use error::SecurityError;
pub use handler::{
    AclSecurityHandler, NoopSecurityHandler, Permissions, RoleSecurityHandler, SecurityHandler,
};
pub use roles::{
    PermissionCatalog, Securable, SecurableType, SecurityInformation, build_security_information,
    role_for,
};
pub use subject::{StaticSubjectProvider, Subject, SubjectProvider};
