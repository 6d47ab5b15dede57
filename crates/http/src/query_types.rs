//! Request/query types (Deserialize)

use onyx_ext_render::ChartStyle;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct FolderQuery {
    #[serde(default)]
    pub folder_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ChartQuery {
    #[serde(default)]
    pub labels: String,
    #[serde(default)]
    pub values: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub style: Option<ChartStyle>,
}

/// `{"folder_id": null}` moves the project to the root.
#[derive(Debug, Deserialize)]
pub struct MoveProjectRequest {
    #[serde(default)]
    pub folder_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct CreateWorkspaceRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    pub user_id: String,
    pub role_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateRoleRequest {
    pub name: String,
    #[serde(default)]
    pub permissions: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct SetFlagRequest {
    pub is_enabled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_query_style_is_optional() {
        let q: ChartQuery = serde_json::from_str(r#"{"labels": "a,b", "values": "1,2"}"#).unwrap();
        assert!(q.style.is_none());
        let q: ChartQuery = serde_json::from_str(r#"{"style": "donut"}"#).unwrap();
        assert_eq!(q.style, Some(ChartStyle::Donut));
        assert!(q.labels.is_empty());
    }

    #[test]
    fn test_move_request_null_means_root() {
        let req: MoveProjectRequest = serde_json::from_str(r#"{"folder_id": null}"#).unwrap();
        assert!(req.folder_id.is_none());
        let req: MoveProjectRequest = serde_json::from_str(r#"{"folder_id": 4}"#).unwrap();
        assert_eq!(req.folder_id, Some(4));
    }

    #[test]
    fn test_role_permissions_default_empty() {
        let req: CreateRoleRequest = serde_json::from_str(r#"{"name": "Guest"}"#).unwrap();
        assert!(req.permissions.is_empty());
    }
}
