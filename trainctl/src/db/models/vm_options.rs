use crate::types::{VmOptionId, VmTypeId};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Database request for creating an image option under a VM type
#[derive(Debug, Clone)]
pub struct VmOptionCreateDBRequest {
    pub vm_type_id: VmTypeId,
    pub name: String,
    pub sku: Option<String>,
    pub offer: Option<String>,
    pub version: Option<String>,
    pub iso_vhd: Option<String>,
}

/// Database response for a VM option
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct VmOptionDBResponse {
    pub id: VmOptionId,
    pub name: String,
    pub sku: Option<String>,
    pub offer: Option<String>,
    pub version: Option<String>,
    pub iso_vhd: Option<String>,
    pub vm_type_id: VmTypeId,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}
