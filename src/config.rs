//! Security configuration.

use serde::{Deserialize, Serialize};

use crate::acl::permission_mask;
use crate::security::SecurityError;

/// Configuration for the security handlers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SecurityConfig {
    /// Roles that bypass per-type role checks in the role-based handler.
    #[serde(default = "default_super_admin_roles")]
    pub super_admin_roles: Vec<String>,

    /// Permissions granted to the owner identity when object security is
    /// created. Each name must resolve to a permission mask.
    #[serde(default = "default_object_owner_permissions")]
    pub object_owner_permissions: Vec<String>,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            super_admin_roles: default_super_admin_roles(),
            object_owner_permissions: default_object_owner_permissions(),
        }
    }
}

impl SecurityConfig {
    /// Reject configurations naming permissions that have no mask, so a
    /// typo fails at startup instead of at the first object creation.
    pub fn validate(&self) -> Result<(), SecurityError> {
        for name in &self.object_owner_permissions {
            permission_mask(name)?;
        }
        Ok(())
    }
}

fn default_super_admin_roles() -> Vec<String> {
    vec!["ROLE_SUPER_ADMIN".to_string()]
}

fn default_object_owner_permissions() -> Vec<String> {
    vec!["OWNER".to_string()]
}
