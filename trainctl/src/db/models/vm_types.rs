use crate::types::VmTypeId;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Database request for creating a new VM type
#[derive(Debug, Clone)]
pub struct VmTypeCreateDBRequest {
    pub name: String,
    pub description: Option<String>,
}

/// Database request for updating a VM type
#[derive(Debug, Clone, Default)]
pub struct VmTypeUpdateDBRequest {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
}

/// Database response for a VM type
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct VmTypeDBResponse {
    pub id: VmTypeId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}
