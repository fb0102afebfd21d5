//! Repository implementations for database access.
//!
//! One repository struct per table, each wrapping a borrowed `&mut PgConnection`.
//!
//! # Available Repositories
//!
//! Implementing [`Repository`] (create, get, bulk get, list, update, delete):
//!
//! - [`Customers`], [`Users`], [`Students`], [`TrainingCourses`], [`VmTypes`],
//!   [`VirtualMachines`], [`BillingInvoices`]
//!
//! Rows that only exist under a parent expose inherent `create` / `get_by_id` /
//! `list_for_<parent>` / `delete` methods instead:
//!
//! - [`AdminUsers`], [`Trainers`], [`CourseModules`], [`VmOptions`], [`UsageStatistics`],
//!   [`RdpFiles`], and the enrollment methods on [`Students`]
//!
//! [`Reports`] runs the joined read queries.
//!
//! # Common Pattern
//!
//! ```ignore
//! use trainctl::db::handlers::{Customers, Repository};
//!
//! async fn example(pool: &sqlx::PgPool) -> anyhow::Result<()> {
//!     let mut tx = pool.begin().await?;
//!     let mut repo = Customers::new(&mut tx);
//!
//!     let customers = repo.list(&CustomerFilter::new(0, 50)).await?;
//!
//!     tx.commit().await?;
//!     Ok(())
//! }
//! ```

pub mod admin_users;
pub mod billing_invoices;
pub mod course_modules;
pub mod customers;
pub mod rdp_files;
pub mod reports;
pub mod repository;
pub mod students;
pub mod trainers;
pub mod training_courses;
pub mod usage_statistics;
pub mod users;
pub mod virtual_machines;
pub mod vm_options;
pub mod vm_types;

pub use admin_users::AdminUsers;
pub use billing_invoices::BillingInvoices;
pub use course_modules::CourseModules;
pub use customers::Customers;
pub use rdp_files::RdpFiles;
pub use reports::Reports;
pub use repository::Repository;
pub use students::Students;
pub use trainers::Trainers;
pub use training_courses::TrainingCourses;
pub use usage_statistics::UsageStatistics;
pub use users::Users;
pub use virtual_machines::VirtualMachines;
pub use vm_options::VmOptions;
pub use vm_types::VmTypes;
