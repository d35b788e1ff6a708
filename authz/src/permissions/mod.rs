//! Admin permission system.
//!
//! Two-tier model:
//! - Main admins: every catalog permission
//! - Normal admins: an explicitly stored subset of the catalog

pub mod catalog;
pub mod codec;
pub mod grant;
pub mod resolver;

pub use catalog::{Permission, PermissionKind, UnknownPermission};
pub use codec::{CodecError, JsonStringListCodec, StringListCodec};
pub use grant::{AdminError, AdminManager};
pub use resolver::{
    get_permissions, has_permission, is_main_admin, is_normal_admin, require_permission,
    EffectivePermissions, PermissionError, PermissionResolver,
};
