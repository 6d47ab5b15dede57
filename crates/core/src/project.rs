//! Projects, folders and trash entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::content::ContentTree;

/// A deliverable (lesson plan, quiz, presentation, ...).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub id: i64,
    pub onyx_user_id: String,
    pub project_name: String,
    pub product_type: String,
    pub microproduct_name: Option<String>,
    pub microproduct_content: Value,
    pub quality_tier: Option<String>,
    pub folder_id: Option<i64>,
    /// Minutes; only used when the content has no lessons.
    pub completion_time: Option<i32>,
    pub order: i32,
    pub created_at: DateTime<Utc>,
}

impl Project {
    #[must_use]
    pub fn content_tree(&self) -> ContentTree {
        ContentTree::from_value(&self.microproduct_content)
    }

    /// Display name used in reports.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.microproduct_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.project_name)
    }
}

/// Input for creating a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProject {
    pub project_name: String,
    #[serde(default = "default_product_type")]
    pub product_type: String,
    #[serde(default)]
    pub microproduct_name: Option<String>,
    #[serde(default)]
    pub microproduct_content: Value,
    #[serde(default)]
    pub quality_tier: Option<String>,
    #[serde(default)]
    pub folder_id: Option<i64>,
    #[serde(default)]
    pub completion_time: Option<i32>,
}

fn default_product_type() -> String {
    "lesson_plan".to_owned()
}

/// Partial update of a project. `None` leaves a field untouched; an empty
/// `quality_tier` string clears the stored tier.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectUpdate {
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default)]
    pub microproduct_name: Option<String>,
    #[serde(default)]
    pub microproduct_content: Option<Value>,
    #[serde(default)]
    pub quality_tier: Option<String>,
    #[serde(default)]
    pub completion_time: Option<i32>,
    #[serde(default)]
    pub order: Option<i32>,
}

impl ProjectUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.project_name.is_none()
            && self.microproduct_name.is_none()
            && self.microproduct_content.is_none()
            && self.quality_tier.is_none()
            && self.completion_time.is_none()
            && self.order.is_none()
    }
}

/// Hierarchical container; its tier is the default for contained projects.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Folder {
    pub id: i64,
    pub onyx_user_id: String,
    pub name: String,
    pub parent_id: Option<i64>,
    pub quality_tier: Option<String>,
    pub order: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFolder {
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<i64>,
    #[serde(default)]
    pub quality_tier: Option<String>,
}

/// Partial folder update. `parent_id: Some(None)` is expressed as
/// `move_to_root: true` because JSON cannot tell null from absent here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FolderUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub parent_id: Option<i64>,
    #[serde(default)]
    pub move_to_root: bool,
    #[serde(default)]
    pub quality_tier: Option<String>,
    #[serde(default)]
    pub order: Option<i32>,
}

/// A soft-deleted project.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrashedProject {
    #[serde(flatten)]
    pub project: Project,
    pub trashed_at: DateTime<Utc>,
}
