//! Database repository for training courses.

use crate::db::errors::{DbError, Result};
use crate::db::handlers::repository::Repository;
use crate::db::models::training_courses::{TrainingCourseCreateDBRequest, TrainingCourseDBResponse, TrainingCourseUpdateDBRequest};
use crate::types::TrainingCourseId;
use sqlx::PgConnection;
use std::collections::HashMap;
use tracing::instrument;

/// Filter for listing training courses
#[derive(Debug, Clone)]
pub struct TrainingCourseFilter {
    pub skip: i64,
    pub limit: i64,
    pub requires_vm: Option<bool>,
}

impl TrainingCourseFilter {
    pub fn new(skip: i64, limit: i64) -> Self {
        Self {
            skip,
            limit,
            requires_vm: None,
        }
    }
}

pub struct TrainingCourses<'c> {
    db: &'c mut PgConnection,
}

impl<'c> TrainingCourses<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl<'c> Repository for TrainingCourses<'c> {
    type CreateRequest = TrainingCourseCreateDBRequest;
    type UpdateRequest = TrainingCourseUpdateDBRequest;
    type Response = TrainingCourseDBResponse;
    type Id = TrainingCourseId;
    type Filter = TrainingCourseFilter;

    #[instrument(skip(self, request), fields(name = %request.name), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let course = sqlx::query_as::<_, TrainingCourseDBResponse>(
            r#"
            INSERT INTO training_courses (name, description, duration_hours, price, requires_vm)
            VALUES ($1, $2, $3, $4, COALESCE($5, FALSE))
            RETURNING *
            "#,
        )
        .bind(&request.name)
        .bind(&request.description)
        .bind(request.duration_hours)
        .bind(request.price)
        .bind(request.requires_vm)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(course)
    }

    #[instrument(skip(self), fields(training_course_id = id), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let course = sqlx::query_as::<_, TrainingCourseDBResponse>("SELECT * FROM training_courses WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(course)
    }

    #[instrument(skip(self, ids), fields(count = ids.len()), err)]
    async fn get_bulk(&mut self, ids: Vec<Self::Id>) -> Result<HashMap<Self::Id, Self::Response>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let courses = sqlx::query_as::<_, TrainingCourseDBResponse>("SELECT * FROM training_courses WHERE id = ANY($1)")
            .bind(&ids)
            .fetch_all(&mut *self.db)
            .await?;

        Ok(courses.into_iter().map(|c| (c.id, c)).collect())
    }

    #[instrument(skip(self, filter), fields(limit = filter.limit, skip = filter.skip), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let courses = sqlx::query_as::<_, TrainingCourseDBResponse>(
            r#"
            SELECT * FROM training_courses
            WHERE ($1::bool IS NULL OR requires_vm = $1)
            ORDER BY id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(filter.requires_vm)
        .bind(filter.limit)
        .bind(filter.skip)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(courses)
    }

    /// Modules and enrollments go with the course; its virtual machines are kept, unassigned.
    #[instrument(skip(self), fields(training_course_id = id), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM training_courses WHERE id = $1")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, request), fields(training_course_id = id), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let course = sqlx::query_as::<_, TrainingCourseDBResponse>(
            r#"
            UPDATE training_courses SET
                name = COALESCE($2, name),
                description = CASE WHEN $3 THEN $4 ELSE description END,
                duration_hours = CASE WHEN $5 THEN $6 ELSE duration_hours END,
                price = CASE WHEN $7 THEN $8 ELSE price END,
                requires_vm = COALESCE($9, requires_vm),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&request.name)
        .bind(request.description.is_some())
        .bind(request.description.as_ref().and_then(|v| v.as_deref()))
        .bind(request.duration_hours.is_some())
        .bind(request.duration_hours.flatten())
        .bind(request.price.is_some())
        .bind(request.price.flatten())
        .bind(request.requires_vm)
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(course)
    }
}
