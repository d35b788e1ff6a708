//! Permission resolution logic.
//!
//! Computes the effective permission set of an account from its role, its
//! admin subtype and its stored permission list.
//!
//! Resolution order for a point query:
//! 1. No account: denied
//! 2. Main admin (including admins with no stored subtype): granted
//! 3. Not an admin: denied
//! 4. Normal admin: granted iff the code is in the stored list

use dataelf_common::{AdminType, User};
use thiserror::Error;

use super::catalog::Permission;
use super::codec::{CodecError, JsonStringListCodec, StringListCodec};

/// Permission codes held by an account, as resolved for one call.
///
/// Keeps the stored order. Duplicates and codes outside the catalog are
/// carried through untouched; callers should only ask set questions.
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize)]
#[serde(transparent)]
pub struct EffectivePermissions {
    codes: Vec<String>,
}

impl EffectivePermissions {
    /// No permissions.
    #[must_use]
    pub const fn empty() -> Self {
        Self { codes: Vec::new() }
    }

    /// Every catalog code.
    #[must_use]
    pub fn full_catalog() -> Self {
        Self {
            codes: Permission::all_codes(),
        }
    }

    /// Wrap an already decoded list.
    #[must_use]
    pub const fn from_codes(codes: Vec<String>) -> Self {
        Self { codes }
    }

    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.codes.iter().any(|c| c == code)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.codes.iter().map(String::as_str)
    }

    /// Number of stored entries, duplicates included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Catalog permissions present in the set, in catalog order.
    #[must_use]
    pub fn known(&self) -> Vec<Permission> {
        Permission::all()
            .iter()
            .copied()
            .filter(|p| self.contains(p.code()))
            .collect()
    }

    /// Entries that are not catalog codes.
    #[must_use]
    pub fn unknown(&self) -> Vec<&str> {
        self.iter()
            .filter(|c| Permission::from_code(c).is_none())
            .collect()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.codes
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<String> {
        self.codes
    }
}

impl IntoIterator for EffectivePermissions {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.codes.into_iter()
    }
}

/// Permission check errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PermissionError {
    /// No account, or the account is not an administrator.
    #[error("Admin privileges required")]
    NotAdmin,

    /// The administrator lacks the requested permission.
    #[error("Missing permission: {0}")]
    MissingPermission(String),
}

/// Returns true for main admins.
///
/// An admin whose subtype was never stored counts as a main admin, so
/// accounts created before subtypes existed keep full access.
#[must_use]
pub fn is_main_admin(user: Option<&User>) -> bool {
    let Some(user) = user else {
        return false;
    };

    user.is_admin() && matches!(user.admin_type, AdminType::MainAdmin | AdminType::Unset)
}

/// Returns true for admins whose subtype is exactly normal admin.
#[must_use]
pub fn is_normal_admin(user: &User) -> bool {
    user.is_admin() && user.admin_type == AdminType::NormalAdmin
}

/// Effective permissions using the JSON codec.
#[must_use]
pub fn get_permissions(user: &User) -> EffectivePermissions {
    PermissionResolver::new().get_permissions(user)
}

/// Point query using the JSON codec.
#[must_use]
pub fn has_permission(user: Option<&User>, permission: impl AsRef<str>) -> bool {
    PermissionResolver::new().has_permission(user, permission)
}

/// Point query using the JSON codec, as a `Result`.
pub fn require_permission(
    user: Option<&User>,
    permission: impl AsRef<str>,
) -> Result<(), PermissionError> {
    PermissionResolver::new().require_permission(user, permission)
}

/// Resolves permissions with a given codec for the stored list.
///
/// Stateless apart from the codec; every call re-reads the account it is
/// given.
#[derive(Debug, Clone, Default)]
pub struct PermissionResolver<C = JsonStringListCodec> {
    codec: C,
}

impl PermissionResolver<JsonStringListCodec> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            codec: JsonStringListCodec,
        }
    }
}

impl<C: StringListCodec> PermissionResolver<C> {
    pub const fn with_codec(codec: C) -> Self {
        Self { codec }
    }

    /// Resolve the effective permission set, surfacing decode failures.
    ///
    /// Only an explicit main-admin subtype yields the full catalog here; the
    /// role is not consulted and an unset subtype resolves to nothing. This
    /// differs from [`Self::has_permission`], which treats unset as main admin.
    pub fn try_get_permissions(&self, user: &User) -> Result<EffectivePermissions, CodecError> {
        match user.admin_type {
            AdminType::MainAdmin => Ok(EffectivePermissions::full_catalog()),
            AdminType::NormalAdmin => match stored_list(user) {
                Some(encoded) => self
                    .codec
                    .decode(encoded)
                    .map(EffectivePermissions::from_codes),
                None => Ok(EffectivePermissions::empty()),
            },
            AdminType::Unset => Ok(EffectivePermissions::empty()),
        }
    }

    /// Resolve the effective permission set.
    ///
    /// A stored list that fails to decode is logged and resolves to the empty
    /// set.
    pub fn get_permissions(&self, user: &User) -> EffectivePermissions {
        self.try_get_permissions(user).unwrap_or_else(|e| {
            tracing::error!(user_id = user.id, error = %e, "Failed to parse admin permissions");
            EffectivePermissions::empty()
        })
    }

    /// Whether `user` holds `permission`.
    pub fn has_permission(&self, user: Option<&User>, permission: impl AsRef<str>) -> bool {
        let Some(user) = user else {
            return false;
        };

        if is_main_admin(Some(user)) {
            return true;
        }

        if !user.is_admin() {
            return false;
        }

        match user.admin_type {
            AdminType::NormalAdmin => self.get_permissions(user).contains(permission.as_ref()),
            AdminType::MainAdmin | AdminType::Unset => false,
        }
    }

    /// Like [`Self::has_permission`], returning the reason for a denial.
    pub fn require_permission(
        &self,
        user: Option<&User>,
        permission: impl AsRef<str>,
    ) -> Result<(), PermissionError> {
        let code = permission.as_ref();

        match user {
            Some(u) if u.is_admin() => {
                if self.has_permission(Some(u), code) {
                    Ok(())
                } else {
                    tracing::debug!(user_id = u.id, permission = code, "Permission denied");
                    Err(PermissionError::MissingPermission(code.to_string()))
                }
            }
            _ => Err(PermissionError::NotAdmin),
        }
    }
}

fn stored_list(user: &User) -> Option<&str> {
    user.admin_permissions
        .as_deref()
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::layer::{Context, SubscriberExt as _};
    use tracing_subscriber::{Layer, Registry};

    use super::*;

    struct ErrorCounter(Arc<AtomicUsize>);

    impl<S: Subscriber> Layer<S> for ErrorCounter {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() == Level::ERROR {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    fn count_errors<T>(f: impl FnOnce() -> T) -> (T, usize) {
        let count = Arc::new(AtomicUsize::new(0));
        let subscriber = Registry::default().with(ErrorCounter(Arc::clone(&count)));
        let out = tracing::subscriber::with_default(subscriber, f);
        (out, count.load(Ordering::SeqCst))
    }

    fn normal_admin(stored: &str) -> User {
        User::admin(10, AdminType::NormalAdmin).with_admin_permissions(stored)
    }

    #[test]
    fn test_main_admin_gets_full_catalog() {
        let perms = get_permissions(&User::admin(1, AdminType::MainAdmin));
        assert_eq!(perms.len(), 11);
        assert_eq!(perms.known(), Permission::all());

        let main = User::admin(1, AdminType::MainAdmin);
        assert!(has_permission(Some(&main), "not_a_code"));
        assert!(has_permission(Some(&User::admin(2, AdminType::Unset)), "not_a_code"));
    }

    #[test]
    fn test_main_admin_ignores_stored_list() {
        let user = User::admin(1, AdminType::MainAdmin).with_admin_permissions("not json");
        let (perms, errors) = count_errors(|| get_permissions(&user));
        assert_eq!(perms, EffectivePermissions::full_catalog());
        assert_eq!(errors, 0);
    }

    #[test]
    fn test_main_admin_subtype_without_admin_role_gets_catalog() {
        // The subtype alone decides here.
        let user = User {
            admin_type: AdminType::MainAdmin,
            ..User::ordinary(2)
        };
        assert_eq!(get_permissions(&user).len(), 11);
        assert!(!has_permission(Some(&user), Permission::TagManage));
    }

    #[test]
    fn test_unset_admin_gets_empty_set_but_passes_checks() {
        let legacy = User::admin(3, AdminType::Unset);
        assert!(get_permissions(&legacy).is_empty());
        assert!(is_main_admin(Some(&legacy)));
        for perm in Permission::all() {
            assert!(has_permission(Some(&legacy), perm));
        }
    }

    #[test]
    fn test_normal_admin_decodes_stored_list() {
        let user = normal_admin(r#"["content_review","tag_manage"]"#);
        let perms = get_permissions(&user);
        assert_eq!(perms.as_slice(), ["content_review", "tag_manage"]);
        assert!(has_permission(Some(&user), "content_review"));
        assert!(has_permission(Some(&user), Permission::TagManage));
        assert!(!has_permission(Some(&user), "system_settings"));
    }

    #[test]
    fn test_unknown_codes_pass_through() {
        let user = normal_admin(r#"["legacy_export","tag_manage"]"#);
        let perms = get_permissions(&user);
        assert_eq!(perms.unknown(), vec!["legacy_export"]);
        assert_eq!(perms.known(), vec![Permission::TagManage]);
        assert!(has_permission(Some(&user), "legacy_export"));
    }

    #[test]
    fn test_duplicates_tolerated() {
        let user = normal_admin(r#"["tag_manage","tag_manage"]"#);
        let perms = get_permissions(&user);
        assert_eq!(perms.len(), 2);
        assert_eq!(perms.known(), vec![Permission::TagManage]);
    }

    #[test]
    fn test_malformed_list_fails_closed_and_logs() {
        let user = normal_admin("[\"tag_manage\"");
        let (perms, errors) = count_errors(|| get_permissions(&user));
        assert!(perms.is_empty());
        assert_eq!(errors, 1);

        let (allowed, errors) = count_errors(|| has_permission(Some(&user), "tag_manage"));
        assert!(!allowed);
        assert_eq!(errors, 1);
    }

    #[test]
    fn test_try_get_permissions_surfaces_decode_error() {
        let resolver = PermissionResolver::new();
        let err = resolver
            .try_get_permissions(&normal_admin("tag_manage"))
            .unwrap_err();
        assert!(matches!(err, CodecError::Malformed(_)));
    }

    #[test]
    fn test_normal_admin_without_list() {
        let user = User::admin(4, AdminType::NormalAdmin);
        let (perms, errors) = count_errors(|| get_permissions(&user));
        assert!(perms.is_empty());
        assert_eq!(errors, 0);
    }

    #[test]
    fn test_empty_list_treated_as_absent() {
        let (perms, errors) = count_errors(|| get_permissions(&normal_admin("")));
        assert!(perms.is_empty());
        assert_eq!(errors, 0);
    }

    #[test]
    fn test_whitespace_list_is_malformed() {
        let user = normal_admin("  ");
        assert!(matches!(
            PermissionResolver::new().try_get_permissions(&user),
            Err(CodecError::Malformed(_))
        ));

        let (perms, errors) = count_errors(|| get_permissions(&user));
        assert!(perms.is_empty());
        assert_eq!(errors, 1);
    }

    #[test]
    fn test_ordinary_user_denied_despite_stray_data() {
        let user = User {
            admin_type: AdminType::NormalAdmin,
            admin_permissions: Some(r#"["tag_manage"]"#.into()),
            ..User::ordinary(5)
        };
        assert!(!is_normal_admin(&user));
        assert!(!has_permission(Some(&user), "tag_manage"));
    }

    #[test]
    fn test_no_user() {
        assert!(!is_main_admin(None));
        assert!(!has_permission(None, Permission::UserApprove));
        assert_eq!(
            require_permission(None, Permission::UserApprove),
            Err(PermissionError::NotAdmin)
        );
    }

    #[test]
    fn test_admin_subtype_predicates() {
        let main = User::admin(1, AdminType::MainAdmin);
        let normal = User::admin(2, AdminType::NormalAdmin);
        let legacy = User::admin(3, AdminType::Unset);
        let member = User::ordinary(4);

        assert!(is_main_admin(Some(&main)));
        assert!(!is_main_admin(Some(&normal)));
        assert!(is_main_admin(Some(&legacy)));
        assert!(!is_main_admin(Some(&member)));

        assert!(!is_normal_admin(&main));
        assert!(is_normal_admin(&normal));
        assert!(!is_normal_admin(&legacy));
        assert!(!is_normal_admin(&member));
    }

    #[test]
    fn test_require_permission() {
        let user = normal_admin(r#"["user_approve"]"#);
        assert_eq!(require_permission(Some(&user), Permission::UserApprove), Ok(()));
        assert_eq!(
            require_permission(Some(&user), Permission::UserDelete),
            Err(PermissionError::MissingPermission("user_delete".into()))
        );
        assert_eq!(
            require_permission(Some(&User::ordinary(9)), Permission::UserApprove),
            Err(PermissionError::NotAdmin)
        );
    }

    #[test]
    fn test_custom_codec() {
        struct CommaCodec;

        impl StringListCodec for CommaCodec {
            fn encode(&self, items: &[String]) -> Result<String, CodecError> {
                Ok(items.join(","))
            }

            fn decode(&self, encoded: &str) -> Result<Vec<String>, CodecError> {
                Ok(encoded.split(',').map(str::to_string).collect())
            }
        }

        let resolver = PermissionResolver::with_codec(CommaCodec);
        let user = normal_admin("tag_manage,category_manage");
        assert!(resolver.has_permission(Some(&user), Permission::CategoryManage));
        assert!(!resolver.has_permission(Some(&user), Permission::SystemSettings));
    }

    #[test]
    fn test_effective_permissions_serialize_as_array() {
        let perms = EffectivePermissions::from_codes(vec!["tag_manage".into()]);
        assert_eq!(serde_json::to_string(&perms).unwrap(), r#"["tag_manage"]"#);
    }
}
