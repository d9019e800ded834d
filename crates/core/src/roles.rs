//! Well-known role names and the owner/admin gate.
//!
//! Role names must match the `ck_users_role` check constraint in
//! `20250101000001_create_users.sql`.

use crate::error::CoreError;
use crate::types::DbId;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_USER: &str = "user";

/// Whether `role` names the elevated admin role.
pub fn is_admin(role: &str) -> bool {
    role == ROLE_ADMIN
}

/// A resource may be mutated by its creator or by an admin.
pub fn is_owner_or_admin(owner_id: DbId, user_id: DbId, role: &str) -> bool {
    owner_id == user_id || is_admin(role)
}

/// Fail with [`CoreError::Forbidden`] unless the caller owns the resource or
/// is an admin.
pub fn ensure_owner_or_admin(owner_id: DbId, user_id: DbId, role: &str) -> Result<(), CoreError> {
    if is_owner_or_admin(owner_id, user_id, role) {
        Ok(())
    } else {
        Err(CoreError::Forbidden("Not allowed".into()))
    }
}
