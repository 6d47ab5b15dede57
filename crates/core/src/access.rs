//! Workspaces, roles, product access grants and feature flags.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Identity of the caller as reported by the upstream Onyx API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserIdentity {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub role: String,
}

impl UserIdentity {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role.eq_ignore_ascii_case("admin")
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    View,
    ManageAccess,
    ManageMembers,
}

impl Permission {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match *self {
            Self::View => "view",
            Self::ManageAccess => "manage_access",
            Self::ManageMembers => "manage_members",
        }
    }
}

impl FromStr for Permission {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "view" => Ok(Self::View),
            "manage_access" => Ok(Self::ManageAccess),
            "manage_members" => Ok(Self::ManageMembers),
            other => Err(CoreError::UnknownPermission(other.to_owned())),
        }
    }
}

/// Roles every new workspace starts with; the first one is given to the creator.
pub const DEFAULT_ROLES: [(&str, &[Permission]); 3] = [
    ("Admin", &[Permission::View, Permission::ManageAccess, Permission::ManageMembers]),
    ("Editor", &[Permission::View, Permission::ManageAccess]),
    ("Viewer", &[Permission::View]),
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Workspace {
    pub id: i64,
    pub name: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkspaceRole {
    pub id: i64,
    pub workspace_id: i64,
    pub name: String,
    pub permissions: Vec<Permission>,
}

impl WorkspaceRole {
    #[must_use]
    pub fn allows(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkspaceMember {
    pub id: i64,
    pub workspace_id: i64,
    pub user_id: String,
    pub role_id: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl WorkspaceMember {
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == "active"
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AccessType {
    Workspace,
    Role,
    Individual,
}

impl AccessType {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match *self {
            Self::Workspace => "workspace",
            Self::Role => "role",
            Self::Individual => "individual",
        }
    }
}

impl FromStr for AccessType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "workspace" => Ok(Self::Workspace),
            "role" => Ok(Self::Role),
            "individual" | "user" => Ok(Self::Individual),
            other => Err(CoreError::UnknownAccessType(other.to_owned())),
        }
    }
}

/// Grant of view access on a product (project).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductAccess {
    pub id: i64,
    pub product_id: i64,
    pub workspace_id: i64,
    pub access_type: AccessType,
    pub target_id: Option<String>,
    pub granted_by: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProductAccess {
    pub workspace_id: i64,
    pub access_type: AccessType,
    #[serde(default)]
    pub target_id: Option<String>,
}

impl NewProductAccess {
    pub fn validate(&self) -> Result<(), String> {
        let has_target = self.target_id.as_deref().is_some_and(|t| !t.trim().is_empty());
        match (self.access_type, has_target) {
            (AccessType::Workspace, true) => {
                Err("workspace access must not carry a target_id".to_owned())
            },
            (AccessType::Role | AccessType::Individual, false) => {
                Err(format!("{} access requires a target_id", self.access_type.as_str()))
            },
            (AccessType::Role, true)
                if self.target_id.as_deref().is_some_and(|t| t.trim().parse::<i64>().is_err()) =>
            {
                Err("role access target_id must be a role id".to_owned())
            },
            _ => Ok(()),
        }
    }
}

/// Decide whether `user` may view a product owned by `owner_id`.
///
/// `memberships` must be the user's own memberships.
#[must_use]
pub fn can_view_product(
    user: &UserIdentity,
    owner_id: &str,
    grants: &[ProductAccess],
    memberships: &[WorkspaceMember],
) -> bool {
    if user.id == owner_id {
        return true;
    }
    grants.iter().any(|grant| {
        let member = memberships
            .iter()
            .find(|m| m.workspace_id == grant.workspace_id && m.is_active());
        match grant.access_type {
            AccessType::Workspace => member.is_some(),
            AccessType::Role => member.is_some_and(|m| {
                grant.target_id.as_deref().map(str::trim) == Some(m.role_id.to_string().as_str())
            }),
            AccessType::Individual => grant.target_id.as_deref().is_some_and(|target| {
                target == user.id || target.eq_ignore_ascii_case(&user.email)
            }),
        }
    })
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeatureFlag {
    pub user_id: String,
    pub feature_name: String,
    pub is_enabled: bool,
    pub updated_at: DateTime<Utc>,
}
