//! Database repository for daily VM usage.

use crate::db::errors::Result;
use crate::db::models::usage_statistics::{UsageStatisticCreateDBRequest, UsageStatisticDBResponse};
use crate::types::{UsageStatisticId, VirtualMachineId};
use sqlx::PgConnection;
use tracing::instrument;

pub struct UsageStatistics<'c> {
    db: &'c mut PgConnection,
}

impl<'c> UsageStatistics<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Record one day of usage. A second row for the same machine and date is a unique violation.
    #[instrument(skip(self, request), fields(virtual_machine_id = request.virtual_machine_id, usage_date = %request.usage_date), err)]
    pub async fn create(&mut self, request: &UsageStatisticCreateDBRequest) -> Result<UsageStatisticDBResponse> {
        let stat = sqlx::query_as::<_, UsageStatisticDBResponse>(
            r#"
            INSERT INTO daily_usage_statistics (virtual_machine_id, usage_date, hours_used, cost)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(request.virtual_machine_id)
        .bind(request.usage_date)
        .bind(request.hours_used)
        .bind(request.cost)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(stat)
    }

    #[instrument(skip(self), fields(usage_statistic_id = id), err)]
    pub async fn get_by_id(&mut self, id: UsageStatisticId) -> Result<Option<UsageStatisticDBResponse>> {
        let stat = sqlx::query_as::<_, UsageStatisticDBResponse>("SELECT * FROM daily_usage_statistics WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(stat)
    }

    /// Usage rows of one machine, oldest day first
    #[instrument(skip(self), err)]
    pub async fn list_for_virtual_machine(&mut self, virtual_machine_id: VirtualMachineId) -> Result<Vec<UsageStatisticDBResponse>> {
        let stats = sqlx::query_as::<_, UsageStatisticDBResponse>(
            "SELECT * FROM daily_usage_statistics WHERE virtual_machine_id = $1 ORDER BY usage_date",
        )
        .bind(virtual_machine_id)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(stats)
    }

    #[instrument(skip(self), fields(usage_statistic_id = id), err)]
    pub async fn delete(&mut self, id: UsageStatisticId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM daily_usage_statistics WHERE id = $1")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
