//! Database models for the student/course join table (`student_training_courses`).

use crate::types::{StudentId, TrainingCourseId};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// One student enrolled in one course
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct EnrollmentDBResponse {
    pub student_id: StudentId,
    pub training_course_id: TrainingCourseId,
    pub created_at: DateTime<Utc>,
}
