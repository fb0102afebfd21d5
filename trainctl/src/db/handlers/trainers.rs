//! Database repository for trainers.

use crate::db::errors::Result;
use crate::db::models::trainers::{TrainerCreateDBRequest, TrainerDBResponse};
use crate::types::{CustomerId, TrainerId, UserId};
use sqlx::PgConnection;
use tracing::instrument;

pub struct Trainers<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Trainers<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self, request), fields(name = %request.name, customer_id = request.customer_id), err)]
    pub async fn create(&mut self, request: &TrainerCreateDBRequest) -> Result<TrainerDBResponse> {
        let trainer = sqlx::query_as::<_, TrainerDBResponse>(
            r#"
            INSERT INTO trainers (name, user_id, customer_id)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(&request.name)
        .bind(request.user_id)
        .bind(request.customer_id)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(trainer)
    }

    #[instrument(skip(self), fields(trainer_id = id), err)]
    pub async fn get_by_id(&mut self, id: TrainerId) -> Result<Option<TrainerDBResponse>> {
        let trainer = sqlx::query_as::<_, TrainerDBResponse>("SELECT * FROM trainers WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(trainer)
    }

    #[instrument(skip(self), err)]
    pub async fn get_by_user_id(&mut self, user_id: UserId) -> Result<Option<TrainerDBResponse>> {
        let trainer = sqlx::query_as::<_, TrainerDBResponse>("SELECT * FROM trainers WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(trainer)
    }

    #[instrument(skip(self), err)]
    pub async fn list_for_customer(&mut self, customer_id: CustomerId) -> Result<Vec<TrainerDBResponse>> {
        let trainers = sqlx::query_as::<_, TrainerDBResponse>("SELECT * FROM trainers WHERE customer_id = $1 ORDER BY id")
            .bind(customer_id)
            .fetch_all(&mut *self.db)
            .await?;

        Ok(trainers)
    }

    #[instrument(skip(self), fields(trainer_id = id), err)]
    pub async fn delete(&mut self, id: TrainerId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM trainers WHERE id = $1")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
