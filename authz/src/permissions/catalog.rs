//! Permission catalog.
//!
//! The fixed set of codes an administrator can be granted. Every other view of
//! the catalog (the main-admin full set, code lookup, serde names) is derived
//! from [`Permission::all`].

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Grantable administrative permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Approve members and extend their accounts
    UserApprove,
    /// Delete member accounts
    UserDelete,
    /// Review submitted content
    ContentReview,
    /// Delete content
    ContentDelete,
    /// View content the admin reviewed
    ContentViewOwn,
    /// Unpublish or delete content the admin reviewed
    ContentUnpublishOwn,
    /// Template management menu
    TemplateManage,
    /// Tag management menu
    TagManage,
    /// Category management menu
    CategoryManage,
    /// Data source management menu
    DataSourceManage,
    /// System settings menu
    SystemSettings,
}

/// Documentation-only grouping of catalog codes. Evaluation ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionKind {
    /// Guards an individual action.
    Action,
    /// Controls visibility of an admin menu.
    Menu,
}

/// A code that is not part of the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown permission code: {0}")]
pub struct UnknownPermission(pub String);

impl Permission {
    /// Returns the stored code of the permission.
    ///
    /// # Examples
    ///
    /// ```
    /// use dataelf_authz::permissions::Permission;
    ///
    /// assert_eq!(Permission::ContentReview.code(), "content_review");
    /// ```
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::UserApprove => "user_approve",
            Self::UserDelete => "user_delete",
            Self::ContentReview => "content_review",
            Self::ContentDelete => "content_delete",
            Self::ContentViewOwn => "content_view_own",
            Self::ContentUnpublishOwn => "content_unpublish_own",
            Self::TemplateManage => "template_manage",
            Self::TagManage => "tag_manage",
            Self::CategoryManage => "category_manage",
            Self::DataSourceManage => "data_source_manage",
            Self::SystemSettings => "system_settings",
        }
    }

    /// Returns the whole catalog, in its canonical order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::UserApprove,
            Self::UserDelete,
            Self::ContentReview,
            Self::ContentDelete,
            Self::ContentViewOwn,
            Self::ContentUnpublishOwn,
            Self::TemplateManage,
            Self::TagManage,
            Self::CategoryManage,
            Self::DataSourceManage,
            Self::SystemSettings,
        ]
    }

    /// Which group the permission is listed under.
    #[must_use]
    pub const fn kind(&self) -> PermissionKind {
        match self {
            Self::UserApprove
            | Self::UserDelete
            | Self::ContentReview
            | Self::ContentDelete
            | Self::ContentViewOwn
            | Self::ContentUnpublishOwn => PermissionKind::Action,
            Self::TemplateManage
            | Self::TagManage
            | Self::CategoryManage
            | Self::DataSourceManage
            | Self::SystemSettings => PermissionKind::Menu,
        }
    }

    /// Catalog entries guarding individual actions.
    pub fn actions() -> impl Iterator<Item = Self> {
        Self::all()
            .iter()
            .copied()
            .filter(|p| p.kind() == PermissionKind::Action)
    }

    /// Catalog entries controlling menu visibility.
    pub fn menus() -> impl Iterator<Item = Self> {
        Self::all()
            .iter()
            .copied()
            .filter(|p| p.kind() == PermissionKind::Menu)
    }

    /// Returns a human-readable description of the permission.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::UserApprove => "Approve members and extend membership",
            Self::UserDelete => "Delete members",
            Self::ContentReview => "Review content",
            Self::ContentDelete => "Delete content",
            Self::ContentViewOwn => "View content you reviewed",
            Self::ContentUnpublishOwn => "Unpublish or delete content you reviewed",
            Self::TemplateManage => "Manage templates",
            Self::TagManage => "Manage tags",
            Self::CategoryManage => "Manage categories",
            Self::DataSourceManage => "Manage data sources",
            Self::SystemSettings => "Change system settings",
        }
    }

    /// Look up a stored code. `None` for codes outside the catalog.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        Self::all().iter().copied().find(|p| p.code() == code)
    }

    /// The full catalog as owned codes.
    #[must_use]
    pub fn all_codes() -> Vec<String> {
        Self::all().iter().map(|p| p.code().to_string()).collect()
    }
}

impl FromStr for Permission {
    type Err = UnknownPermission;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| UnknownPermission(s.to_string()))
    }
}

impl AsRef<str> for Permission {
    fn as_ref(&self) -> &str {
        self.code()
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
