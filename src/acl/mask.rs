//! Permission bitmasks.
//!
//! Each named permission maps to one bit; an ACL entry carries the OR of
//! the bits it grants. The bit assignments are stable and must never be
//! renumbered, since masks are persisted by ACL backends.

use crate::security::SecurityError;

/// Named permission bits.
pub mod permission {
    pub const VIEW: u32 = 1;
    pub const CREATE: u32 = 1 << 1;
    pub const EDIT: u32 = 1 << 2;
    pub const DELETE: u32 = 1 << 3;
    pub const UNDELETE: u32 = 1 << 4;
    pub const OPERATOR: u32 = 1 << 5;
    pub const MASTER: u32 = 1 << 6;
    pub const OWNER: u32 = 1 << 7;

    // Admin-surface permissions, outside the classic object range.
    pub const LIST: u32 = 1 << 12;
    pub const EXPORT: u32 = 1 << 13;
}

/// Resolve a permission name to its mask bit.
///
/// Names are matched case-insensitively. Unknown names are an error: a
/// typo in configuration must fail loudly rather than silently grant
/// nothing.
pub fn permission_mask(name: &str) -> Result<u32, SecurityError> {
    match name.to_ascii_uppercase().as_str() {
        "VIEW" => Ok(permission::VIEW),
        "CREATE" => Ok(permission::CREATE),
        "EDIT" => Ok(permission::EDIT),
        "DELETE" => Ok(permission::DELETE),
        "UNDELETE" => Ok(permission::UNDELETE),
        "OPERATOR" => Ok(permission::OPERATOR),
        "MASTER" => Ok(permission::MASTER),
        "OWNER" => Ok(permission::OWNER),
        "LIST" => Ok(permission::LIST),
        "EXPORT" => Ok(permission::EXPORT),
        _ => Err(SecurityError::UnknownPermission(name.to_string())),
    }
}

/// Incrementally build a permission mask from named permissions.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaskBuilder {
    mask: u32,
}

impl MaskBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: &str) -> Result<&mut Self, SecurityError> {
        self.mask |= permission_mask(name)?;
        Ok(self)
    }

    pub fn remove(&mut self, name: &str) -> Result<&mut Self, SecurityError> {
        self.mask &= !permission_mask(name)?;
        Ok(self)
    }

    pub fn get(&self) -> u32 {
        self.mask
    }

    pub fn reset(&mut self) -> &mut Self {
        self.mask = 0;
        self
    }

    /// Build the OR of several named permissions in one go.
    pub fn mask_for<S: AsRef<str>>(names: &[S]) -> Result<u32, SecurityError> {
        let mut builder = Self::new();
        for name in names {
            builder.add(name.as_ref())?;
        }
        Ok(builder.get())
    }
}
