//! Database repository for billing invoices.

use crate::db::errors::{DbError, Result};
use crate::db::handlers::repository::Repository;
use crate::db::models::billing_invoices::{
    BillingInvoiceCreateDBRequest, BillingInvoiceDBResponse, BillingInvoiceUpdateDBRequest, DEFAULT_INVOICE_STATUS,
};
use crate::types::{BillingInvoiceId, CustomerId};
use sqlx::PgConnection;
use std::collections::HashMap;
use tracing::instrument;

/// Filter for listing invoices
#[derive(Debug, Clone)]
pub struct BillingInvoiceFilter {
    pub skip: i64,
    pub limit: i64,
    pub status: Option<String>,
    pub customer_id: Option<CustomerId>,
}

impl BillingInvoiceFilter {
    pub fn new(skip: i64, limit: i64) -> Self {
        Self {
            skip,
            limit,
            status: None,
            customer_id: None,
        }
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }
}

pub struct BillingInvoices<'c> {
    db: &'c mut PgConnection,
}

impl<'c> BillingInvoices<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self), err)]
    pub async fn get_by_invoice_number(&mut self, invoice_number: &str) -> Result<Option<BillingInvoiceDBResponse>> {
        let invoice = sqlx::query_as::<_, BillingInvoiceDBResponse>("SELECT * FROM billing_invoices WHERE invoice_number = $1")
            .bind(invoice_number)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(invoice)
    }
}

#[async_trait::async_trait]
impl<'c> Repository for BillingInvoices<'c> {
    type CreateRequest = BillingInvoiceCreateDBRequest;
    type UpdateRequest = BillingInvoiceUpdateDBRequest;
    type Response = BillingInvoiceDBResponse;
    type Id = BillingInvoiceId;
    type Filter = BillingInvoiceFilter;

    #[instrument(skip(self, request), fields(invoice_number = %request.invoice_number, customer_id = request.customer_id), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let invoice = sqlx::query_as::<_, BillingInvoiceDBResponse>(
            r#"
            INSERT INTO billing_invoices (invoice_number, customer_id, invoice_date, due_date, total_amount, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&request.invoice_number)
        .bind(request.customer_id)
        .bind(request.invoice_date)
        .bind(request.due_date)
        .bind(request.total_amount)
        .bind(request.status.as_deref().unwrap_or(DEFAULT_INVOICE_STATUS))
        .fetch_one(&mut *self.db)
        .await?;

        Ok(invoice)
    }

    #[instrument(skip(self), fields(billing_invoice_id = id), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let invoice = sqlx::query_as::<_, BillingInvoiceDBResponse>("SELECT * FROM billing_invoices WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(invoice)
    }

    #[instrument(skip(self, ids), fields(count = ids.len()), err)]
    async fn get_bulk(&mut self, ids: Vec<Self::Id>) -> Result<HashMap<Self::Id, Self::Response>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let invoices = sqlx::query_as::<_, BillingInvoiceDBResponse>("SELECT * FROM billing_invoices WHERE id = ANY($1)")
            .bind(&ids)
            .fetch_all(&mut *self.db)
            .await?;

        Ok(invoices.into_iter().map(|i| (i.id, i)).collect())
    }

    #[instrument(skip(self, filter), fields(limit = filter.limit, skip = filter.skip), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let invoices = sqlx::query_as::<_, BillingInvoiceDBResponse>(
            r#"
            SELECT * FROM billing_invoices
            WHERE ($1::text IS NULL OR status = $1)
              AND ($2::int IS NULL OR customer_id = $2)
            ORDER BY invoice_date, id
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(&filter.status)
        .bind(filter.customer_id)
        .bind(filter.limit)
        .bind(filter.skip)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(invoices)
    }

    #[instrument(skip(self), fields(billing_invoice_id = id), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM billing_invoices WHERE id = $1")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, request), fields(billing_invoice_id = id), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let invoice = sqlx::query_as::<_, BillingInvoiceDBResponse>(
            r#"
            UPDATE billing_invoices SET
                due_date = COALESCE($2, due_date),
                total_amount = COALESCE($3, total_amount),
                status = COALESCE($4, status),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(request.due_date)
        .bind(request.total_amount)
        .bind(&request.status)
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(invoice)
    }
}
