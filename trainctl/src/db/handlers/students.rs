//! Database repository for students and their course enrollments.

use crate::db::errors::{DbError, Result};
use crate::db::handlers::repository::Repository;
use crate::db::models::enrollments::EnrollmentDBResponse;
use crate::db::models::students::{StudentCreateDBRequest, StudentDBResponse, StudentUpdateDBRequest};
use crate::types::{CustomerId, StudentId, TrainingCourseId};
use sqlx::PgConnection;
use std::collections::HashMap;
use tracing::instrument;

/// Filter for listing students
#[derive(Debug, Clone)]
pub struct StudentFilter {
    pub skip: i64,
    pub limit: i64,
    pub customer_id: Option<CustomerId>,
}

impl StudentFilter {
    pub fn new(skip: i64, limit: i64) -> Self {
        Self {
            skip,
            limit,
            customer_id: None,
        }
    }

    pub fn for_customer(mut self, customer_id: CustomerId) -> Self {
        self.customer_id = Some(customer_id);
        self
    }
}

pub struct Students<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Students<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Enroll a student in a course. Enrolling twice is a unique violation on the join key.
    #[instrument(skip(self), err)]
    pub async fn enroll(&mut self, student_id: StudentId, training_course_id: TrainingCourseId) -> Result<EnrollmentDBResponse> {
        let enrollment = sqlx::query_as::<_, EnrollmentDBResponse>(
            r#"
            INSERT INTO student_training_courses (student_id, training_course_id)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(student_id)
        .bind(training_course_id)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(enrollment)
    }

    #[instrument(skip(self), err)]
    pub async fn unenroll(&mut self, student_id: StudentId, training_course_id: TrainingCourseId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM student_training_courses WHERE student_id = $1 AND training_course_id = $2")
            .bind(student_id)
            .bind(training_course_id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self), err)]
    pub async fn list_enrollments(&mut self, student_id: StudentId) -> Result<Vec<EnrollmentDBResponse>> {
        let enrollments = sqlx::query_as::<_, EnrollmentDBResponse>(
            "SELECT * FROM student_training_courses WHERE student_id = $1 ORDER BY training_course_id",
        )
        .bind(student_id)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(enrollments)
    }

    #[instrument(skip(self), err)]
    pub async fn list_for_course(&mut self, training_course_id: TrainingCourseId) -> Result<Vec<StudentDBResponse>> {
        let students = sqlx::query_as::<_, StudentDBResponse>(
            r#"
            SELECT s.* FROM students s
            JOIN student_training_courses e ON e.student_id = s.id
            WHERE e.training_course_id = $1
            ORDER BY s.id
            "#,
        )
        .bind(training_course_id)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(students)
    }
}

#[async_trait::async_trait]
impl<'c> Repository for Students<'c> {
    type CreateRequest = StudentCreateDBRequest;
    type UpdateRequest = StudentUpdateDBRequest;
    type Response = StudentDBResponse;
    type Id = StudentId;
    type Filter = StudentFilter;

    #[instrument(skip(self, request), fields(name = %request.name), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let student = sqlx::query_as::<_, StudentDBResponse>(
            r#"
            INSERT INTO students (name, email, phone, customer_id, user_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&request.name)
        .bind(&request.email)
        .bind(&request.phone)
        .bind(request.customer_id)
        .bind(request.user_id)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(student)
    }

    #[instrument(skip(self), fields(student_id = id), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let student = sqlx::query_as::<_, StudentDBResponse>("SELECT * FROM students WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(student)
    }

    #[instrument(skip(self, ids), fields(count = ids.len()), err)]
    async fn get_bulk(&mut self, ids: Vec<Self::Id>) -> Result<HashMap<Self::Id, Self::Response>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let students = sqlx::query_as::<_, StudentDBResponse>("SELECT * FROM students WHERE id = ANY($1)")
            .bind(&ids)
            .fetch_all(&mut *self.db)
            .await?;

        Ok(students.into_iter().map(|s| (s.id, s)).collect())
    }

    #[instrument(skip(self, filter), fields(limit = filter.limit, skip = filter.skip), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let students = sqlx::query_as::<_, StudentDBResponse>(
            r#"
            SELECT * FROM students
            WHERE ($1::int IS NULL OR customer_id = $1)
            ORDER BY id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(filter.customer_id)
        .bind(filter.limit)
        .bind(filter.skip)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(students)
    }

    /// Enrollments go with the student; RDP files stay with their VM, unassigned.
    #[instrument(skip(self), fields(student_id = id), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, request), fields(student_id = id), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let student = sqlx::query_as::<_, StudentDBResponse>(
            r#"
            UPDATE students SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                phone = CASE WHEN $4 THEN $5 ELSE phone END,
                customer_id = CASE WHEN $6 THEN $7 ELSE customer_id END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&request.name)
        .bind(&request.email)
        .bind(request.phone.is_some())
        .bind(request.phone.as_ref().and_then(|v| v.as_deref()))
        .bind(request.customer_id.is_some())
        .bind(request.customer_id.flatten())
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(student)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::users::UserType;
    use crate::test::utils::{create_test_course, create_test_customer, create_test_user};
    use sqlx::PgPool;

    fn alice(customer_id: Option<CustomerId>) -> StudentCreateDBRequest {
        StudentCreateDBRequest {
            name: "Alice Developer".to_string(),
            email: "alice@acme.com".to_string(),
            phone: Some("+1-555-0101".to_string()),
            customer_id,
            user_id: None,
        }
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_create_and_filter_students(pool: PgPool) {
        let acme = create_test_customer(&pool, "Acme Corporation").await;
        let other = create_test_customer(&pool, "Other Ltd").await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Students::new(&mut conn);

        let alice = repo.create(&alice(Some(acme.id))).await.unwrap();
        repo.create(&StudentCreateDBRequest {
            name: "Carol".to_string(),
            email: "carol@other.com".to_string(),
            phone: None,
            customer_id: Some(other.id),
            user_id: None,
        })
        .await
        .unwrap();
        repo.create(&StudentCreateDBRequest {
            name: "Independent".to_string(),
            email: "solo@example.com".to_string(),
            phone: None,
            customer_id: None,
            user_id: None,
        })
        .await
        .unwrap();

        assert_eq!(repo.list(&StudentFilter::new(0, 10)).await.unwrap().len(), 3);

        let acme_students = repo.list(&StudentFilter::new(0, 10).for_customer(acme.id)).await.unwrap();
        assert_eq!(acme_students, vec![alice]);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_duplicate_student_email(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Students::new(&mut conn);

        repo.create(&alice(None)).await.unwrap();
        let err = repo.create(&alice(None)).await.unwrap_err();
        assert_eq!(err.constraint(), Some("ix_students_email"));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_update_clears_customer(pool: PgPool) {
        let acme = create_test_customer(&pool, "Acme Corporation").await;
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Students::new(&mut conn);
        let student = repo.create(&alice(Some(acme.id))).await.unwrap();

        let updated = repo
            .update(
                student.id,
                &StudentUpdateDBRequest {
                    customer_id: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(updated.customer_id.is_none());
        assert_eq!(updated.phone, student.phone);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_student_removed_with_user(pool: PgPool) {
        let user = create_test_user(&pool, UserType::Student).await;
        let mut conn = pool.acquire().await.unwrap();

        let mut request = alice(None);
        request.user_id = Some(user.id);
        let student = Students::new(&mut conn).create(&request).await.unwrap();

        crate::db::handlers::Users::new(&mut conn).delete(user.id).await.unwrap();
        assert!(Students::new(&mut conn).get_by_id(student.id).await.unwrap().is_none());
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_enrollments(pool: PgPool) {
        let dotnet = create_test_course(&pool, ".NET 9 Fundamentals").await;
        let cloud = create_test_course(&pool, "Cloud Architecture").await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Students::new(&mut conn);
        let student = repo.create(&alice(None)).await.unwrap();

        repo.enroll(student.id, dotnet.id).await.unwrap();
        repo.enroll(student.id, cloud.id).await.unwrap();

        let err = repo.enroll(student.id, dotnet.id).await.unwrap_err();
        assert_eq!(err.constraint(), Some("pk_student_training_courses"));

        let courses: Vec<_> = repo
            .list_enrollments(student.id)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.training_course_id)
            .collect();
        assert_eq!(courses, vec![dotnet.id, cloud.id]);
        assert_eq!(repo.list_for_course(cloud.id).await.unwrap().len(), 1);

        assert!(repo.unenroll(student.id, cloud.id).await.unwrap());
        assert!(!repo.unenroll(student.id, cloud.id).await.unwrap());

        // Deleting the student removes the remaining enrollment
        assert!(repo.delete(student.id).await.unwrap());
        assert!(repo.list_for_course(dotnet.id).await.unwrap().is_empty());
    }
}
