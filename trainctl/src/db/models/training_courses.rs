use crate::types::TrainingCourseId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

/// Database request for creating a new training course
#[derive(Debug, Clone)]
pub struct TrainingCourseCreateDBRequest {
    pub name: String,
    pub description: Option<String>,
    pub duration_hours: Option<i32>,
    pub price: Option<Decimal>,
    /// `None` takes the column default (false)
    pub requires_vm: Option<bool>,
}

/// Database request for updating a training course
#[derive(Debug, Clone, Default)]
pub struct TrainingCourseUpdateDBRequest {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub duration_hours: Option<Option<i32>>,
    pub price: Option<Option<Decimal>>,
    pub requires_vm: Option<bool>,
}

/// Database response for a training course
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct TrainingCourseDBResponse {
    pub id: TrainingCourseId,
    pub name: String,
    pub description: Option<String>,
    pub duration_hours: Option<i32>,
    pub price: Option<Decimal>,
    pub requires_vm: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}
