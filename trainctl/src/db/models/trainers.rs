use crate::types::{CustomerId, TrainerId, UserId};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Database request for creating a trainer profile for an existing user
#[derive(Debug, Clone)]
pub struct TrainerCreateDBRequest {
    pub name: String,
    pub user_id: UserId,
    pub customer_id: CustomerId,
}

/// Database response for a trainer
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct TrainerDBResponse {
    pub id: TrainerId,
    pub name: String,
    pub user_id: UserId,
    pub customer_id: CustomerId,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}
