//! Database models for course modules (the `modules` table).

use crate::types::{ModuleId, TrainingCourseId};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Database request for adding a module to a course
#[derive(Debug, Clone)]
pub struct ModuleCreateDBRequest {
    pub training_course_id: TrainingCourseId,
    pub name: String,
    pub description: Option<String>,
    /// Position within the course, unique per course
    pub order_number: i32,
    pub duration_hours: Option<i32>,
}

/// Database response for a module
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct ModuleDBResponse {
    pub id: ModuleId,
    pub name: String,
    pub description: Option<String>,
    pub order_number: i32,
    pub duration_hours: Option<i32>,
    pub training_course_id: TrainingCourseId,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}
