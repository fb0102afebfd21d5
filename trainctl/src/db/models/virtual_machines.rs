use crate::types::{TrainingCourseId, VirtualMachineId, VmTypeId};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Status stored when a create request leaves it unset; equal to the `virtual_machines.status` column default
pub const DEFAULT_VM_STATUS: &str = "Stopped";

/// Database request for creating a new virtual machine
#[derive(Debug, Clone)]
pub struct VirtualMachineCreateDBRequest {
    pub name: String,
    pub ip_address: Option<String>,
    /// `None` stores [`DEFAULT_VM_STATUS`]
    pub status: Option<String>,
    pub training_course_id: Option<TrainingCourseId>,
    pub vm_type_id: VmTypeId,
}

/// Database request for updating a virtual machine
#[derive(Debug, Clone, Default)]
pub struct VirtualMachineUpdateDBRequest {
    pub name: Option<String>,
    pub ip_address: Option<Option<String>>,
    pub status: Option<String>,
    pub training_course_id: Option<Option<TrainingCourseId>>,
    pub vm_type_id: Option<VmTypeId>,
}

/// Database response for a virtual machine
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct VirtualMachineDBResponse {
    pub id: VirtualMachineId,
    pub name: String,
    pub ip_address: Option<String>,
    pub status: String,
    pub training_course_id: Option<TrainingCourseId>,
    pub vm_type_id: VmTypeId,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}
