use crate::types::{CustomerId, StudentId, UserId};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Database request for creating a new student
#[derive(Debug, Clone)]
pub struct StudentCreateDBRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub customer_id: Option<CustomerId>,
    pub user_id: Option<UserId>,
}

/// Database request for updating a student
#[derive(Debug, Clone, Default)]
pub struct StudentUpdateDBRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<Option<String>>,
    pub customer_id: Option<Option<CustomerId>>,
}

/// Database response for a student
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct StudentDBResponse {
    pub id: StudentId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub customer_id: Option<CustomerId>,
    pub user_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}
