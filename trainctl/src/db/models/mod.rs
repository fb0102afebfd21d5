//! Database record models matching table schemas.
//!
//! Each entity module holds up to three structs:
//!
//! - `<Entity>CreateDBRequest`: the columns a caller supplies on insert. Identity columns,
//!   `created_at` and column defaults are left to PostgreSQL.
//! - `<Entity>UpdateDBRequest`: `None` leaves a column untouched (applied with `COALESCE`).
//!   Nullable columns that can be cleared use `Option<Option<T>>`.
//! - `<Entity>DBResponse`: a full row, deriving `sqlx::FromRow`.
//!
//! Relationships are plain foreign-key fields. There is no navigation graph: anything that
//! spans tables is a join in [`crate::db::handlers::reports`].
//!
//! # Column types
//!
//! | SQL | Rust |
//! |---|---|
//! | `INTEGER` identity | `i32` aliases from [`crate::types`] |
//! | `NUMERIC(p, 2)` | [`rust_decimal::Decimal`] |
//! | `TIMESTAMPTZ` | `chrono::DateTime<Utc>` |
//! | `DATE` | `chrono::NaiveDate` |

pub mod admin_users;
pub mod billing_invoices;
pub mod course_modules;
pub mod customers;
pub mod enrollments;
pub mod rdp_files;
pub mod students;
pub mod trainers;
pub mod training_courses;
pub mod usage_statistics;
pub mod users;
pub mod virtual_machines;
pub mod vm_options;
pub mod vm_types;
