use crate::types::{BillingInvoiceId, CustomerId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

/// Status stored when a create request leaves it unset; equal to the `billing_invoices.status` column default
pub const DEFAULT_INVOICE_STATUS: &str = "Pending";

/// Database request for issuing an invoice
#[derive(Debug, Clone)]
pub struct BillingInvoiceCreateDBRequest {
    pub invoice_number: String,
    pub customer_id: CustomerId,
    pub invoice_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub total_amount: Decimal,
    /// `None` stores [`DEFAULT_INVOICE_STATUS`]
    pub status: Option<String>,
}

/// Database request for updating an invoice
#[derive(Debug, Clone, Default)]
pub struct BillingInvoiceUpdateDBRequest {
    pub due_date: Option<DateTime<Utc>>,
    pub total_amount: Option<Decimal>,
    pub status: Option<String>,
}

/// Database response for an invoice
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct BillingInvoiceDBResponse {
    pub id: BillingInvoiceId,
    pub invoice_number: String,
    pub customer_id: CustomerId,
    pub invoice_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub total_amount: Decimal,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}
