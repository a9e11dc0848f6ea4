//! Role derivation and the permission catalog.
//!
//! Every securable type declares *security information*: a mapping from a
//! role suffix to the permission names that suffix covers. The role
//! expander turns `(type code, suffix)` into the concrete role identifier
//! the ambient authorization system understands, e.g. type `"app.news"`
//! with suffix `"EDIT"` becomes `ROLE_APP_NEWS_EDIT`.
//!
//! Derivation is deterministic: identical inputs always produce identical
//! role strings, so roles granted before a restart keep working after it.

use std::collections::HashMap;

/// Security information as declared by a securable type: role suffix to
/// the permission names it expands from. Several permission aliases may
/// map to the same role.
pub type SecurityInformation = HashMap<String, Vec<String>>;

/// An entity that can be the target of a permission check.
///
/// `code` must be stable across restarts; `security_information` is
/// queried lazily per check and may be empty, meaning the type declares
/// no fine-grained roles.
pub trait Securable: Send + Sync {
    /// Stable type code, e.g. `"app.news"`.
    fn code(&self) -> &str;

    /// Declared security information for this type.
    fn security_information(&self) -> SecurityInformation;
}

/// A plain value implementing [`Securable`], for class-level checks where
/// no richer domain object is at hand.
#[derive(Debug, Clone, Default)]
pub struct SecurableType {
    code: String,
    information: SecurityInformation,
}

impl SecurableType {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            information: SecurityInformation::new(),
        }
    }

    /// Declare a role suffix and the permission names it covers.
    pub fn with_permission(mut self, suffix: impl Into<String>, permissions: &[&str]) -> Self {
        self.information.insert(
            suffix.into(),
            permissions.iter().map(|p| p.to_string()).collect(),
        );
        self
    }
}

impl Securable for SecurableType {
    fn code(&self) -> &str {
        &self.code
    }

    fn security_information(&self) -> SecurityInformation {
        self.information.clone()
    }
}

/// Derive the role identifier for a type code and permission name.
///
/// The code is normalized (uppercased, non-alphanumeric characters become
/// underscores) so that dotted or dashed codes produce valid role names:
/// `role_for("app.news", "EDIT")` yields `"ROLE_APP_NEWS_EDIT"`.
pub fn role_for(code: &str, permission: &str) -> String {
    format!("ROLE_{}_{}", normalize_code(code), permission)
}

/// Normalize a type code for use inside a role identifier.
fn normalize_code(code: &str) -> String {
    code.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// Expand a securable's declared security information into the full
/// role-identifier mapping: role identifier to the permission names it
/// expands from.
///
/// A type declaring no security information yields an empty mapping; that
/// is valid, not an error. Administrative tooling uses this to enumerate
/// which roles exist for a type.
pub fn build_security_information(securable: &dyn Securable) -> SecurityInformation {
    let code = securable.code();
    securable
        .security_information()
        .into_iter()
        .map(|(suffix, permissions)| (role_for(code, &suffix), permissions))
        .collect()
}

/// Registry of declared security information, keyed by type code.
///
/// The catalog is built once at startup and read concurrently afterwards;
/// lookups on unknown codes yield the empty mapping.
#[derive(Debug, Clone, Default)]
pub struct PermissionCatalog {
    entries: HashMap<String, SecurityInformation>,
}

impl PermissionCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the security information declared by a type code.
    /// Re-registering a code replaces its previous entry.
    pub fn register(&mut self, code: impl Into<String>, information: SecurityInformation) {
        self.entries.insert(code.into(), information);
    }

    /// Declared security information for a code. Unknown codes yield the
    /// empty mapping.
    pub fn information_for(&self, code: &str) -> SecurityInformation {
        self.entries.get(code).cloned().unwrap_or_default()
    }

    /// A class-level [`Securable`] for a registered code.
    pub fn securable(&self, code: &str) -> SecurableType {
        SecurableType {
            code: code.to_string(),
            information: self.information_for(code),
        }
    }

    /// Enumerate every role identifier the catalog can expand, with the
    /// permission names each expands from.
    pub fn all_roles(&self) -> SecurityInformation {
        let mut roles = SecurityInformation::new();
        for (code, information) in &self.entries {
            for (suffix, permissions) in information {
                roles.insert(role_for(code, suffix), permissions.clone());
            }
        }
        roles
    }
}
