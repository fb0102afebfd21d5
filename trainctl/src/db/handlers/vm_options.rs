//! Database repository for VM image options.

use crate::db::errors::Result;
use crate::db::models::vm_options::{VmOptionCreateDBRequest, VmOptionDBResponse};
use crate::types::{VmOptionId, VmTypeId};
use sqlx::PgConnection;
use tracing::instrument;

pub struct VmOptions<'c> {
    db: &'c mut PgConnection,
}

impl<'c> VmOptions<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self, request), fields(name = %request.name, vm_type_id = request.vm_type_id), err)]
    pub async fn create(&mut self, request: &VmOptionCreateDBRequest) -> Result<VmOptionDBResponse> {
        let option = sqlx::query_as::<_, VmOptionDBResponse>(
            r#"
            INSERT INTO vm_options (name, sku, offer, version, iso_vhd, vm_type_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&request.name)
        .bind(&request.sku)
        .bind(&request.offer)
        .bind(&request.version)
        .bind(&request.iso_vhd)
        .bind(request.vm_type_id)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(option)
    }

    #[instrument(skip(self), fields(vm_option_id = id), err)]
    pub async fn get_by_id(&mut self, id: VmOptionId) -> Result<Option<VmOptionDBResponse>> {
        let option = sqlx::query_as::<_, VmOptionDBResponse>("SELECT * FROM vm_options WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(option)
    }

    #[instrument(skip(self), err)]
    pub async fn list_for_vm_type(&mut self, vm_type_id: VmTypeId) -> Result<Vec<VmOptionDBResponse>> {
        let options = sqlx::query_as::<_, VmOptionDBResponse>("SELECT * FROM vm_options WHERE vm_type_id = $1 ORDER BY id")
            .bind(vm_type_id)
            .fetch_all(&mut *self.db)
            .await?;

        Ok(options)
    }

    #[instrument(skip(self), fields(vm_option_id = id), err)]
    pub async fn delete(&mut self, id: VmOptionId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM vm_options WHERE id = $1")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::handlers::{Repository, VmTypes};
    use crate::test::utils::create_test_vm_type;
    use sqlx::PgPool;

    fn windows_server(vm_type_id: VmTypeId) -> VmOptionCreateDBRequest {
        VmOptionCreateDBRequest {
            vm_type_id,
            name: "Windows Server 2022".to_string(),
            sku: Some("2022-datacenter".to_string()),
            offer: Some("WindowsServer".to_string()),
            version: Some("latest".to_string()),
            iso_vhd: None,
        }
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_options_for_type(pool: PgPool) {
        let windows = create_test_vm_type(&pool, "Windows").await;
        let linux = create_test_vm_type(&pool, "Linux").await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = VmOptions::new(&mut conn);

        let option = repo.create(&windows_server(windows.id)).await.unwrap();
        assert_eq!(repo.get_by_id(option.id).await.unwrap().unwrap(), option);
        assert_eq!(repo.list_for_vm_type(windows.id).await.unwrap(), vec![option.clone()]);
        assert!(repo.list_for_vm_type(linux.id).await.unwrap().is_empty());

        assert!(repo.delete(option.id).await.unwrap());
        assert!(!repo.delete(option.id).await.unwrap());
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_options_removed_with_unused_type(pool: PgPool) {
        let windows = create_test_vm_type(&pool, "Windows").await;
        let mut conn = pool.acquire().await.unwrap();

        let option = VmOptions::new(&mut conn).create(&windows_server(windows.id)).await.unwrap();
        assert!(VmTypes::new(&mut conn).delete(windows.id).await.unwrap());
        assert!(VmOptions::new(&mut conn).get_by_id(option.id).await.unwrap().is_none());
    }
}
