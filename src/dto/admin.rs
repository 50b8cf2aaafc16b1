use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

/// One page of admin rows, each projected to `id` plus the entity's list columns.
#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct AdminRows {
    #[schema(value_type = Vec<Object>)]
    pub items: Vec<Value>,
}
