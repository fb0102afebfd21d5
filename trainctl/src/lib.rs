//! # trainctl: data layer for a training-services business
//!
//! `trainctl` owns the PostgreSQL schema behind a company that sells instructor-led training
//! courses, provisions virtual machines for the students taking them, tracks daily VM usage
//! and invoices the customers that employ those students.
//!
//! ## Overview
//!
//! The crate is organised around the database. Tables, constraints and the seeded
//! administrator are defined by the reversible migrations in `migrations/`, and every table has
//! a repository in [`db::handlers`] that reads and writes it through a borrowed connection.
//! Integrity rules (uniqueness, required fields, length limits and what happens to children
//! when a parent is deleted) are enforced by PostgreSQL; repositories turn violations into
//! [`db::errors::DbError`] values instead of checking ahead of time.
//!
//! ### Entities
//!
//! - **Customers** employ students and trainers and receive billing invoices.
//! - **Users** are login accounts with a [`db::models::users::UserType`]. Administrators and
//!   trainers are profiles attached to a user.
//! - **Training courses** are split into ordered modules and have enrolled students.
//! - **VM types** (Windows, Linux, ...) offer image options. **Virtual machines** of a type may
//!   be assigned to a course, accumulate daily usage statistics and are reached through RDP files
//!   handed to students.
//!
//! ### Command line
//!
//! The `trainctl` binary loads [`config::Config`], connects, and runs one of:
//!
//! - `migrate up` / `migrate down --target <version>`: apply or revert migrations
//! - `demo`: insert a sample data set and print the six example reports ([`demo`])
//! - `set-password --email <email>`: give an account a new password
//!
//! ## Modules
//!
//! - [`config`]: CLI arguments and layered YAML/env configuration
//! - [`db`]: connection setup, models, repositories, relationship metadata and reports
//! - [`auth`]: argon2 password hashing
//! - [`demo`]: sample data and report rendering
//! - [`errors`]: crate-level error type
//! - [`telemetry`]: tracing subscriber setup
//! - [`types`]: id aliases and shared enums

pub mod auth;
pub mod config;
pub mod db;
pub mod demo;
pub mod errors;
pub mod telemetry;
pub mod types;

#[cfg(test)]
mod test;

use sqlx::PgPool;
use tracing::{info, instrument};

use crate::auth::password;
use crate::db::handlers::Users;
use crate::errors::{Error, Result};
use crate::types::UserId;

pub use config::Config;

/// Get the trainctl database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

/// Set the password of an existing account, identified by email.
///
/// The seeded administrator is refused: its credential only changes through migrations.
///
/// # Errors
///
/// Returns [`Error::BadRequest`] if the password is empty or no account has this email, and
/// [`db::errors::DbError::ProtectedEntity`] for the seeded administrator.
#[instrument(skip(pool, password), err)]
pub async fn set_password(pool: &PgPool, email: &str, password: &str) -> Result<UserId> {
    let password_hash = password::hash_password(password)?;

    let mut tx = pool.begin().await.map_err(db::errors::DbError::from)?;
    let mut users = Users::new(&mut tx);

    let user = users.get_by_email(email).await?.ok_or_else(|| Error::BadRequest {
        message: format!("No account with email {email}"),
    })?;
    users.set_password_hash(user.id, &password_hash).await?;

    tx.commit().await.map_err(db::errors::DbError::from)?;
    info!(user_id = user.id, "Password updated");
    Ok(user.id)
}
