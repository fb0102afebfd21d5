//! Database repository for VM types.

use crate::db::errors::{DbError, Result};
use crate::db::handlers::repository::Repository;
use crate::db::models::vm_types::{VmTypeCreateDBRequest, VmTypeDBResponse, VmTypeUpdateDBRequest};
use crate::types::VmTypeId;
use sqlx::PgConnection;
use std::collections::HashMap;
use tracing::instrument;

/// Filter for listing VM types
#[derive(Debug, Clone)]
pub struct VmTypeFilter {
    pub skip: i64,
    pub limit: i64,
}

impl VmTypeFilter {
    pub fn new(skip: i64, limit: i64) -> Self {
        Self { skip, limit }
    }
}

pub struct VmTypes<'c> {
    db: &'c mut PgConnection,
}

impl<'c> VmTypes<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self), err)]
    pub async fn get_by_name(&mut self, name: &str) -> Result<Option<VmTypeDBResponse>> {
        let vm_type = sqlx::query_as::<_, VmTypeDBResponse>("SELECT * FROM vm_types WHERE name = $1")
            .bind(name)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(vm_type)
    }
}

#[async_trait::async_trait]
impl<'c> Repository for VmTypes<'c> {
    type CreateRequest = VmTypeCreateDBRequest;
    type UpdateRequest = VmTypeUpdateDBRequest;
    type Response = VmTypeDBResponse;
    type Id = VmTypeId;
    type Filter = VmTypeFilter;

    #[instrument(skip(self, request), fields(name = %request.name), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let vm_type = sqlx::query_as::<_, VmTypeDBResponse>(
            r#"
            INSERT INTO vm_types (name, description)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(&request.name)
        .bind(&request.description)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(vm_type)
    }

    #[instrument(skip(self), fields(vm_type_id = id), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let vm_type = sqlx::query_as::<_, VmTypeDBResponse>("SELECT * FROM vm_types WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(vm_type)
    }

    #[instrument(skip(self, ids), fields(count = ids.len()), err)]
    async fn get_bulk(&mut self, ids: Vec<Self::Id>) -> Result<HashMap<Self::Id, Self::Response>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let vm_types = sqlx::query_as::<_, VmTypeDBResponse>("SELECT * FROM vm_types WHERE id = ANY($1)")
            .bind(&ids)
            .fetch_all(&mut *self.db)
            .await?;

        Ok(vm_types.into_iter().map(|t| (t.id, t)).collect())
    }

    #[instrument(skip(self, filter), fields(limit = filter.limit, skip = filter.skip), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let vm_types = sqlx::query_as::<_, VmTypeDBResponse>("SELECT * FROM vm_types ORDER BY id LIMIT $1 OFFSET $2")
            .bind(filter.limit)
            .bind(filter.skip)
            .fetch_all(&mut *self.db)
            .await?;

        Ok(vm_types)
    }

    /// Fails with a foreign-key violation while any virtual machine still uses the type.
    /// Otherwise its options are removed with it.
    #[instrument(skip(self), fields(vm_type_id = id), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM vm_types WHERE id = $1")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, request), fields(vm_type_id = id), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let vm_type = sqlx::query_as::<_, VmTypeDBResponse>(
            r#"
            UPDATE vm_types SET
                name = COALESCE($2, name),
                description = CASE WHEN $3 THEN $4 ELSE description END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&request.name)
        .bind(request.description.is_some())
        .bind(request.description.as_ref().and_then(|v| v.as_deref()))
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(vm_type)
    }
}
