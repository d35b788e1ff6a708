//! User Types

use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum UserRole {
    /// Regular member without any administrative rights.
    #[default]
    #[serde(rename = "USER", alias = "ORDINARY")]
    Ordinary,
    /// Administrator. See [`AdminType`] for the subtype.
    #[serde(rename = "ADMIN")]
    Admin,
}

impl UserRole {
    /// Stored name of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ordinary => "USER",
            Self::Admin => "ADMIN",
        }
    }
}

impl FromStr for UserRole {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "USER" | "ORDINARY" => Ok(Self::Ordinary),
            "ADMIN" => Ok(Self::Admin),
            other => Err(Error::UnknownVariant {
                kind: "user role",
                value: other.to_string(),
            }),
        }
    }
}

/// Administrator subtype.
///
/// Only meaningful when the role is [`UserRole::Admin`]. Records created
/// before subtypes existed carry no value at all and read back as
/// [`AdminType::Unset`]; the resolver decides what that means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdminType {
    /// Unrestricted administrator.
    MainAdmin,
    /// Administrator limited to an explicitly granted permission list.
    NormalAdmin,
    /// No subtype stored.
    #[default]
    #[serde(skip)]
    Unset,
}

impl AdminType {
    /// Whether no subtype is stored.
    #[must_use]
    pub const fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }

    /// Stored name of the subtype, `None` when unset.
    #[must_use]
    pub const fn as_str(&self) -> Option<&'static str> {
        match self {
            Self::MainAdmin => Some("MAIN_ADMIN"),
            Self::NormalAdmin => Some("NORMAL_ADMIN"),
            Self::Unset => None,
        }
    }
}

impl FromStr for AdminType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "MAIN_ADMIN" => Ok(Self::MainAdmin),
            "NORMAL_ADMIN" => Ok(Self::NormalAdmin),
            other => Err(Error::UnknownVariant {
                kind: "admin type",
                value: other.to_string(),
            }),
        }
    }
}

impl From<Option<AdminType>> for AdminType {
    fn from(value: Option<Self>) -> Self {
        value.unwrap_or_default()
    }
}

// A stored `null` reads the same as a missing field.
fn admin_type_or_unset<'de, D>(deserializer: D) -> std::result::Result<AdminType, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<AdminType>::deserialize(deserializer).map(AdminType::from)
}

/// The account fields the authorization core reads.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Account ID.
    #[serde(default)]
    pub id: i64,
    /// Account role.
    pub role: UserRole,
    /// Administrator subtype.
    #[serde(
        default,
        deserialize_with = "admin_type_or_unset",
        skip_serializing_if = "AdminType::is_unset"
    )]
    pub admin_type: AdminType,
    /// Encoded permission list, only stored for normal administrators.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_permissions: Option<String>,
}

impl User {
    /// Regular member.
    #[must_use]
    pub fn ordinary(id: i64) -> Self {
        Self {
            id,
            role: UserRole::Ordinary,
            ..Self::default()
        }
    }

    /// Administrator of the given subtype, with no stored permission list.
    #[must_use]
    pub fn admin(id: i64, admin_type: AdminType) -> Self {
        Self {
            id,
            role: UserRole::Admin,
            admin_type,
            admin_permissions: None,
        }
    }

    /// Attach an already encoded permission list.
    #[must_use]
    pub fn with_admin_permissions(mut self, encoded: impl Into<String>) -> Self {
        self.admin_permissions = Some(encoded.into());
        self
    }

    /// Parse a user record from its JSON form.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Whether the account holds the admin role, whatever its subtype.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, UserRole::Admin)
    }
}
