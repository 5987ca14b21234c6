#![forbid(unsafe_code)]

use dk_core::model::{Category, Urgency};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InsertItemRequest {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub service_type: Option<String>,
    pub urgency: Option<Urgency>,
    pub scheduled_at_ms: Option<i64>,
}
