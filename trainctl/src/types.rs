//! Common type definitions.
//!
//! This module defines:
//! - Type aliases for entity IDs (CustomerId, VmTypeId, etc.)
//! - The [`Operation`] enum used when reporting protected-entity errors
//!
//! # ID Types
//!
//! Every table uses a surrogate `INTEGER GENERATED BY DEFAULT AS IDENTITY` key, so all ids
//! are `i32` aliases. They exist for readability of signatures, not for type-level separation.

use std::fmt;

// Type aliases for IDs
pub type CustomerId = i32;
pub type UserId = i32;
pub type AdminUserId = i32;
pub type StudentId = i32;
pub type TrainerId = i32;
pub type TrainingCourseId = i32;
pub type ModuleId = i32;
pub type VmTypeId = i32;
pub type VmOptionId = i32;
pub type VirtualMachineId = i32;
pub type UsageStatisticId = i32;
pub type BillingInvoiceId = i32;
pub type RdpFileId = i32;

/// Id of the administrator row seeded by the initial migration (in both `users` and `admin_users`).
pub const SEEDED_ADMIN_ID: i32 = 1;

/// Write operations that can be refused on protected rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Update => write!(f, "update"),
            Operation::Delete => write!(f, "delete"),
        }
    }
}
