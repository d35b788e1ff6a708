//! Administrator management.
//!
//! Writes the stored permission list of normal admins. Only main admins may
//! create administrators or change what a normal admin is granted.

use dataelf_common::{AdminType, User, UserRole};
use thiserror::Error;

use super::catalog::Permission;
use super::codec::{CodecError, JsonStringListCodec, StringListCodec};
use super::resolver::is_main_admin;

/// Admin management error type.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Caller is not a main admin.
    #[error("Only the main admin can manage administrators")]
    NotMainAdmin,

    /// Target account is not a normal admin.
    #[error("User {0} is not a normal admin")]
    NotNormalAdmin(i64),

    /// Permission list could not be encoded.
    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Creates administrator accounts and edits their permission lists.
#[derive(Debug, Clone, Default)]
pub struct AdminManager<C = JsonStringListCodec> {
    codec: C,
}

impl AdminManager<JsonStringListCodec> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            codec: JsonStringListCodec,
        }
    }
}

impl<C: StringListCodec> AdminManager<C> {
    pub const fn with_codec(codec: C) -> Self {
        Self { codec }
    }

    /// Build a new administrator account on behalf of `actor`.
    ///
    /// Anything but an explicit main-admin subtype creates a normal admin.
    /// The list is stored only when it has entries; if it cannot be encoded
    /// the account is still created without one.
    #[tracing::instrument(skip(self, actor, permissions), fields(actor_id = actor.map(|a| a.id)))]
    pub fn create_admin(
        &self,
        actor: Option<&User>,
        new_user_id: i64,
        admin_type: Option<AdminType>,
        permissions: &[String],
    ) -> Result<User, AdminError> {
        if !is_main_admin(actor) {
            return Err(AdminError::NotMainAdmin);
        }

        // An unset subtype would read back as a main admin.
        let admin_type = match admin_type {
            Some(AdminType::MainAdmin) => AdminType::MainAdmin,
            Some(AdminType::NormalAdmin | AdminType::Unset) | None => AdminType::NormalAdmin,
        };
        let mut admin = User::admin(new_user_id, admin_type);

        if !permissions.is_empty() {
            warn_unknown(new_user_id, permissions);
            match self.codec.encode(permissions) {
                Ok(encoded) => admin.admin_permissions = Some(encoded),
                Err(e) => tracing::error!(error = %e, "Failed to serialize permissions"),
            }
        }

        tracing::info!(user_id = new_user_id, "New admin user created");
        Ok(admin)
    }

    /// Replace the permission list of a normal admin.
    #[tracing::instrument(skip(self, actor, target, permissions), fields(actor_id = actor.map(|a| a.id), user_id = target.id))]
    pub fn update_admin_permissions(
        &self,
        actor: Option<&User>,
        target: &mut User,
        permissions: &[String],
    ) -> Result<(), AdminError> {
        if !is_main_admin(actor) {
            return Err(AdminError::NotMainAdmin);
        }

        if target.role != UserRole::Admin || target.admin_type != AdminType::NormalAdmin {
            return Err(AdminError::NotNormalAdmin(target.id));
        }

        warn_unknown(target.id, permissions);
        target.admin_permissions = Some(self.codec.encode(permissions)?);

        tracing::info!(count = permissions.len(), "Admin permissions updated");
        Ok(())
    }
}

fn warn_unknown(user_id: i64, permissions: &[String]) {
    for code in permissions {
        if Permission::from_code(code).is_none() {
            tracing::warn!(user_id, permission = %code, "Storing permission outside the catalog");
        }
    }
}
