//! Database repository for course modules.

use crate::db::errors::Result;
use crate::db::models::course_modules::{ModuleCreateDBRequest, ModuleDBResponse};
use crate::types::{ModuleId, TrainingCourseId};
use sqlx::PgConnection;
use tracing::instrument;

pub struct CourseModules<'c> {
    db: &'c mut PgConnection,
}

impl<'c> CourseModules<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self, request), fields(training_course_id = request.training_course_id, order_number = request.order_number), err)]
    pub async fn create(&mut self, request: &ModuleCreateDBRequest) -> Result<ModuleDBResponse> {
        let module = sqlx::query_as::<_, ModuleDBResponse>(
            r#"
            INSERT INTO modules (name, description, order_number, duration_hours, training_course_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&request.name)
        .bind(&request.description)
        .bind(request.order_number)
        .bind(request.duration_hours)
        .bind(request.training_course_id)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(module)
    }

    #[instrument(skip(self), fields(module_id = id), err)]
    pub async fn get_by_id(&mut self, id: ModuleId) -> Result<Option<ModuleDBResponse>> {
        let module = sqlx::query_as::<_, ModuleDBResponse>("SELECT * FROM modules WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(module)
    }

    /// Modules of one course in teaching order
    #[instrument(skip(self), err)]
    pub async fn list_for_course(&mut self, training_course_id: TrainingCourseId) -> Result<Vec<ModuleDBResponse>> {
        let modules = sqlx::query_as::<_, ModuleDBResponse>(
            "SELECT * FROM modules WHERE training_course_id = $1 ORDER BY order_number",
        )
        .bind(training_course_id)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(modules)
    }

    #[instrument(skip(self), fields(module_id = id), err)]
    pub async fn delete(&mut self, id: ModuleId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM modules WHERE id = $1")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
