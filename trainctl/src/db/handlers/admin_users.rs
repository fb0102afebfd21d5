//! Database repository for administrator profiles.
//!
//! An admin profile hangs off a `users` row (one-to-one, removed with the user) and may be
//! attached to a customer (detached, not removed, when that customer is deleted).

use crate::db::errors::{DbError, Result};
use crate::db::models::admin_users::{AdminUserCreateDBRequest, AdminUserDBResponse};
use crate::types::{AdminUserId, CustomerId, Operation, SEEDED_ADMIN_ID, UserId};
use sqlx::PgConnection;
use tracing::instrument;

pub struct AdminUsers<'c> {
    db: &'c mut PgConnection,
}

impl<'c> AdminUsers<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self, request), fields(user_id = request.user_id), err)]
    pub async fn create(&mut self, request: &AdminUserCreateDBRequest) -> Result<AdminUserDBResponse> {
        let admin = sqlx::query_as::<_, AdminUserDBResponse>(
            r#"
            INSERT INTO admin_users (user_id, username, customer_id)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(request.user_id)
        .bind(&request.username)
        .bind(request.customer_id)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(admin)
    }

    #[instrument(skip(self), fields(admin_user_id = id), err)]
    pub async fn get_by_id(&mut self, id: AdminUserId) -> Result<Option<AdminUserDBResponse>> {
        let admin = sqlx::query_as::<_, AdminUserDBResponse>("SELECT * FROM admin_users WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(admin)
    }

    #[instrument(skip(self), err)]
    pub async fn get_by_user_id(&mut self, user_id: UserId) -> Result<Option<AdminUserDBResponse>> {
        let admin = sqlx::query_as::<_, AdminUserDBResponse>("SELECT * FROM admin_users WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(admin)
    }

    #[instrument(skip(self), err)]
    pub async fn list(&mut self) -> Result<Vec<AdminUserDBResponse>> {
        let admins = sqlx::query_as::<_, AdminUserDBResponse>("SELECT * FROM admin_users ORDER BY id")
            .fetch_all(&mut *self.db)
            .await?;

        Ok(admins)
    }

    #[instrument(skip(self), err)]
    pub async fn list_for_customer(&mut self, customer_id: CustomerId) -> Result<Vec<AdminUserDBResponse>> {
        let admins = sqlx::query_as::<_, AdminUserDBResponse>("SELECT * FROM admin_users WHERE customer_id = $1 ORDER BY id")
            .bind(customer_id)
            .fetch_all(&mut *self.db)
            .await?;

        Ok(admins)
    }

    /// Delete the admin profile only. The underlying user account is left in place.
    #[instrument(skip(self), fields(admin_user_id = id), err)]
    pub async fn delete(&mut self, id: AdminUserId) -> Result<bool> {
        if id == SEEDED_ADMIN_ID {
            return Err(DbError::ProtectedEntity {
                operation: Operation::Delete,
                reason: "the seeded administrator is managed by migrations".to_string(),
                entity_type: "admin user".to_string(),
                entity_id: Some(id.to_string()),
            });
        }

        let result = sqlx::query("DELETE FROM admin_users WHERE id = $1")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
