use crate::types::{RdpFileId, StudentId, VirtualMachineId};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Database request for registering a remote-desktop connection file
#[derive(Debug, Clone)]
pub struct RdpFileCreateDBRequest {
    pub file_name: String,
    pub file_path: Option<String>,
    pub virtual_machine_id: VirtualMachineId,
    pub student_id: Option<StudentId>,
}

/// Database response for an RDP file
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct RdpFileDBResponse {
    pub id: RdpFileId,
    pub file_name: String,
    pub file_path: Option<String>,
    pub virtual_machine_id: VirtualMachineId,
    pub student_id: Option<StudentId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}
