//! Database repository for RDP connection files.

use crate::db::errors::Result;
use crate::db::models::rdp_files::{RdpFileCreateDBRequest, RdpFileDBResponse};
use crate::types::{RdpFileId, StudentId, VirtualMachineId};
use sqlx::PgConnection;
use tracing::instrument;

pub struct RdpFiles<'c> {
    db: &'c mut PgConnection,
}

impl<'c> RdpFiles<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self, request), fields(file_name = %request.file_name, virtual_machine_id = request.virtual_machine_id), err)]
    pub async fn create(&mut self, request: &RdpFileCreateDBRequest) -> Result<RdpFileDBResponse> {
        let file = sqlx::query_as::<_, RdpFileDBResponse>(
            r#"
            INSERT INTO rdp_files (file_name, file_path, virtual_machine_id, student_id)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&request.file_name)
        .bind(&request.file_path)
        .bind(request.virtual_machine_id)
        .bind(request.student_id)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(file)
    }

    #[instrument(skip(self), fields(rdp_file_id = id), err)]
    pub async fn get_by_id(&mut self, id: RdpFileId) -> Result<Option<RdpFileDBResponse>> {
        let file = sqlx::query_as::<_, RdpFileDBResponse>("SELECT * FROM rdp_files WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(file)
    }

    /// Lookup by file name (indexed, not unique)
    #[instrument(skip(self), err)]
    pub async fn find_by_file_name(&mut self, file_name: &str) -> Result<Vec<RdpFileDBResponse>> {
        let files = sqlx::query_as::<_, RdpFileDBResponse>("SELECT * FROM rdp_files WHERE file_name = $1 ORDER BY id")
            .bind(file_name)
            .fetch_all(&mut *self.db)
            .await?;

        Ok(files)
    }

    #[instrument(skip(self), err)]
    pub async fn list_for_student(&mut self, student_id: StudentId) -> Result<Vec<RdpFileDBResponse>> {
        let files = sqlx::query_as::<_, RdpFileDBResponse>("SELECT * FROM rdp_files WHERE student_id = $1 ORDER BY id")
            .bind(student_id)
            .fetch_all(&mut *self.db)
            .await?;

        Ok(files)
    }

    #[instrument(skip(self), err)]
    pub async fn list_for_virtual_machine(&mut self, virtual_machine_id: VirtualMachineId) -> Result<Vec<RdpFileDBResponse>> {
        let files = sqlx::query_as::<_, RdpFileDBResponse>("SELECT * FROM rdp_files WHERE virtual_machine_id = $1 ORDER BY id")
            .bind(virtual_machine_id)
            .fetch_all(&mut *self.db)
            .await?;

        Ok(files)
    }

    #[instrument(skip(self), fields(rdp_file_id = id), err)]
    pub async fn delete(&mut self, id: RdpFileId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM rdp_files WHERE id = $1")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::handlers::{Repository, Students};
    use crate::test::utils::{create_test_student, create_test_vm, create_test_vm_type};
    use sqlx::PgPool;

    #[sqlx::test]
    #[test_log::test]
    async fn test_file_detached_when_student_deleted(pool: PgPool) {
        let windows = create_test_vm_type(&pool, "Windows").await;
        let vm = create_test_vm(&pool, "training-vm-001", windows.id, None).await;
        let student = create_test_student(&pool, "Alice Developer", None).await;

        let mut conn = pool.acquire().await.unwrap();
        let file = RdpFiles::new(&mut conn)
            .create(&RdpFileCreateDBRequest {
                file_name: "training-vm-001.rdp".to_string(),
                file_path: Some("/rdp-files/training-vm-001.rdp".to_string()),
                virtual_machine_id: vm.id,
                student_id: Some(student.id),
            })
            .await
            .unwrap();
        assert_eq!(RdpFiles::new(&mut conn).list_for_student(student.id).await.unwrap(), vec![file.clone()]);

        Students::new(&mut conn).delete(student.id).await.unwrap();

        let after = RdpFiles::new(&mut conn).get_by_id(file.id).await.unwrap().unwrap();
        assert!(after.student_id.is_none());
        assert_eq!(after.virtual_machine_id, vm.id);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_file_names_are_not_unique(pool: PgPool) {
        let windows = create_test_vm_type(&pool, "Windows").await;
        let vm = create_test_vm(&pool, "training-vm-001", windows.id, None).await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = RdpFiles::new(&mut conn);
        for _ in 0..2 {
            repo.create(&RdpFileCreateDBRequest {
                file_name: "shared.rdp".to_string(),
                file_path: None,
                virtual_machine_id: vm.id,
                student_id: None,
            })
            .await
            .unwrap();
        }

        assert_eq!(repo.find_by_file_name("shared.rdp").await.unwrap().len(), 2);
        let for_vm = repo.list_for_virtual_machine(vm.id).await.unwrap();
        assert_eq!(for_vm.len(), 2);

        assert!(repo.delete(for_vm[0].id).await.unwrap());
        assert_eq!(repo.list_for_virtual_machine(vm.id).await.unwrap().len(), 1);
    }
}
