//! Response types (Serialize)

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub deleted: bool,
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct AccessCheckResponse {
    pub product_id: i64,
    pub can_view: bool,
}
