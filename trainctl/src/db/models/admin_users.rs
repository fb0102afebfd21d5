use crate::types::{AdminUserId, CustomerId, UserId};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Database request for creating an administrator profile for an existing user
#[derive(Debug, Clone)]
pub struct AdminUserCreateDBRequest {
    pub user_id: UserId,
    pub username: Option<String>,
    pub customer_id: Option<CustomerId>,
}

/// Database response for an administrator profile
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct AdminUserDBResponse {
    pub id: AdminUserId,
    pub user_id: UserId,
    pub username: Option<String>,
    pub customer_id: Option<CustomerId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}
