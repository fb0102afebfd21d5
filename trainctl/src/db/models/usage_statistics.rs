//! Database models for per-day VM usage (`daily_usage_statistics`).

use crate::types::{UsageStatisticId, VirtualMachineId};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

/// Database request for recording one day of usage for a virtual machine
#[derive(Debug, Clone)]
pub struct UsageStatisticCreateDBRequest {
    pub virtual_machine_id: VirtualMachineId,
    pub usage_date: NaiveDate,
    pub hours_used: Decimal,
    pub cost: Decimal,
}

/// Database response for a usage row. These rows are never updated, so there is no `updated_at`.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct UsageStatisticDBResponse {
    pub id: UsageStatisticId,
    pub virtual_machine_id: VirtualMachineId,
    pub usage_date: NaiveDate,
    pub hours_used: Decimal,
    pub cost: Decimal,
    pub created_at: DateTime<Utc>,
}
