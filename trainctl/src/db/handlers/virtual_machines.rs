//! Database repository for virtual machines.

use crate::db::errors::{DbError, Result};
use crate::db::handlers::repository::Repository;
use crate::db::models::virtual_machines::{
    DEFAULT_VM_STATUS, VirtualMachineCreateDBRequest, VirtualMachineDBResponse, VirtualMachineUpdateDBRequest,
};
use crate::types::{TrainingCourseId, VirtualMachineId, VmTypeId};
use sqlx::PgConnection;
use std::collections::HashMap;
use tracing::instrument;

/// Filter for listing virtual machines
#[derive(Debug, Clone)]
pub struct VirtualMachineFilter {
    pub skip: i64,
    pub limit: i64,
    pub status: Option<String>,
    pub vm_type_id: Option<VmTypeId>,
    pub training_course_id: Option<TrainingCourseId>,
}

impl VirtualMachineFilter {
    pub fn new(skip: i64, limit: i64) -> Self {
        Self {
            skip,
            limit,
            status: None,
            vm_type_id: None,
            training_course_id: None,
        }
    }
}

pub struct VirtualMachines<'c> {
    db: &'c mut PgConnection,
}

impl<'c> VirtualMachines<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl<'c> Repository for VirtualMachines<'c> {
    type CreateRequest = VirtualMachineCreateDBRequest;
    type UpdateRequest = VirtualMachineUpdateDBRequest;
    type Response = VirtualMachineDBResponse;
    type Id = VirtualMachineId;
    type Filter = VirtualMachineFilter;

    #[instrument(skip(self, request), fields(name = %request.name, vm_type_id = request.vm_type_id), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let vm = sqlx::query_as::<_, VirtualMachineDBResponse>(
            r#"
            INSERT INTO virtual_machines (name, ip_address, status, training_course_id, vm_type_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&request.name)
        .bind(&request.ip_address)
        .bind(request.status.as_deref().unwrap_or(DEFAULT_VM_STATUS))
        .bind(request.training_course_id)
        .bind(request.vm_type_id)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(vm)
    }

    #[instrument(skip(self), fields(virtual_machine_id = id), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let vm = sqlx::query_as::<_, VirtualMachineDBResponse>("SELECT * FROM virtual_machines WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(vm)
    }

    #[instrument(skip(self, ids), fields(count = ids.len()), err)]
    async fn get_bulk(&mut self, ids: Vec<Self::Id>) -> Result<HashMap<Self::Id, Self::Response>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let vms = sqlx::query_as::<_, VirtualMachineDBResponse>("SELECT * FROM virtual_machines WHERE id = ANY($1)")
            .bind(&ids)
            .fetch_all(&mut *self.db)
            .await?;

        Ok(vms.into_iter().map(|vm| (vm.id, vm)).collect())
    }

    #[instrument(skip(self, filter), fields(limit = filter.limit, skip = filter.skip), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let vms = sqlx::query_as::<_, VirtualMachineDBResponse>(
            r#"
            SELECT * FROM virtual_machines
            WHERE ($1::text IS NULL OR status = $1)
              AND ($2::int IS NULL OR vm_type_id = $2)
              AND ($3::int IS NULL OR training_course_id = $3)
            ORDER BY id
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(&filter.status)
        .bind(filter.vm_type_id)
        .bind(filter.training_course_id)
        .bind(filter.limit)
        .bind(filter.skip)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(vms)
    }

    /// Usage statistics and RDP files go with the machine.
    #[instrument(skip(self), fields(virtual_machine_id = id), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM virtual_machines WHERE id = $1")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, request), fields(virtual_machine_id = id), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let vm = sqlx::query_as::<_, VirtualMachineDBResponse>(
            r#"
            UPDATE virtual_machines SET
                name = COALESCE($2, name),
                ip_address = CASE WHEN $3 THEN $4 ELSE ip_address END,
                status = COALESCE($5, status),
                training_course_id = CASE WHEN $6 THEN $7 ELSE training_course_id END,
                vm_type_id = COALESCE($8, vm_type_id),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&request.name)
        .bind(request.ip_address.is_some())
        .bind(request.ip_address.as_ref().and_then(|v| v.as_deref()))
        .bind(&request.status)
        .bind(request.training_course_id.is_some())
        .bind(request.training_course_id.flatten())
        .bind(request.vm_type_id)
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(vm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::handlers::TrainingCourses;
    use crate::test::utils::{create_test_course, create_test_vm_type};
    use sqlx::PgPool;

    fn vm(name: &str, vm_type_id: VmTypeId, training_course_id: Option<TrainingCourseId>) -> VirtualMachineCreateDBRequest {
        VirtualMachineCreateDBRequest {
            name: name.to_string(),
            ip_address: Some("10.0.1.10".to_string()),
            status: None,
            training_course_id,
            vm_type_id,
        }
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_status_defaults_to_stopped(pool: PgPool) {
        let windows = create_test_vm_type(&pool, "Windows").await;
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = VirtualMachines::new(&mut conn);

        let created = repo.create(&vm("training-vm-001", windows.id, None)).await.unwrap();
        assert_eq!(created.status, DEFAULT_VM_STATUS);

        let mut running = vm("training-vm-002", windows.id, None);
        running.status = Some("Running".to_string());
        assert_eq!(repo.create(&running).await.unwrap().status, "Running");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_default_status_matches_column_default(pool: PgPool) {
        let column_default: String = sqlx::query_scalar(
            "SELECT column_default::TEXT FROM information_schema.columns WHERE table_name = 'virtual_machines' AND column_name = 'status'",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert!(column_default.starts_with(&format!("'{DEFAULT_VM_STATUS}'")), "{column_default}");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_vm_requires_known_type(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let err = VirtualMachines::new(&mut conn)
            .create(&vm("training-vm-001", 999, None))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_vm_kept_when_course_deleted(pool: PgPool) {
        let windows = create_test_vm_type(&pool, "Windows").await;
        let course = create_test_course(&pool, ".NET 9 Fundamentals").await;

        let mut conn = pool.acquire().await.unwrap();
        let created = VirtualMachines::new(&mut conn)
            .create(&vm("training-vm-001", windows.id, Some(course.id)))
            .await
            .unwrap();

        TrainingCourses::new(&mut conn).delete(course.id).await.unwrap();

        let after = VirtualMachines::new(&mut conn).get_by_id(created.id).await.unwrap().unwrap();
        assert!(after.training_course_id.is_none());
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_list_filters_and_update(pool: PgPool) {
        let windows = create_test_vm_type(&pool, "Windows").await;
        let linux = create_test_vm_type(&pool, "Linux").await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = VirtualMachines::new(&mut conn);
        let win = repo.create(&vm("training-vm-001", windows.id, None)).await.unwrap();
        repo.create(&vm("training-vm-002", linux.id, None)).await.unwrap();

        let updated = repo
            .update(
                win.id,
                &VirtualMachineUpdateDBRequest {
                    status: Some("Running".to_string()),
                    ip_address: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.status, "Running");
        assert!(updated.ip_address.is_none());

        let mut filter = VirtualMachineFilter::new(0, 10);
        filter.status = Some("Running".to_string());
        assert_eq!(repo.list(&filter).await.unwrap(), vec![updated]);

        let mut filter = VirtualMachineFilter::new(0, 10);
        filter.vm_type_id = Some(linux.id);
        let linux_vms = repo.list(&filter).await.unwrap();
        assert_eq!(linux_vms.len(), 1);
        assert_eq!(linux_vms[0].name, "training-vm-002");
    }
}
