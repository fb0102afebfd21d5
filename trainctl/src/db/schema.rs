//! Relationship and unique-index metadata.
//!
//! The migrations are what PostgreSQL enforces; the tables here describe the same rules so
//! that code (and tests) can reason about them without parsing SQL. [`catalog_foreign_keys`]
//! reads the live catalog for comparison.

use serde::Serialize;
use sqlx::{FromRow, PgConnection};
use std::fmt;

use crate::db::errors::Result;

/// What happens to referencing rows when the referenced row is deleted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum OnDelete {
    /// Referencing rows are deleted too
    Cascade,
    /// The referencing column is set to NULL
    SetNull,
    /// The delete fails while referencing rows exist
    Restrict,
}

impl OnDelete {
    /// Decode `pg_constraint.confdeltype`
    pub fn from_pg_code(code: &str) -> Option<Self> {
        match code {
            "c" => Some(OnDelete::Cascade),
            "n" => Some(OnDelete::SetNull),
            // 'a' (NO ACTION) behaves like RESTRICT for non-deferred constraints
            "r" | "a" => Some(OnDelete::Restrict),
            _ => None,
        }
    }
}

impl fmt::Display for OnDelete {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OnDelete::Cascade => write!(f, "CASCADE"),
            OnDelete::SetNull => write!(f, "SET NULL"),
            OnDelete::Restrict => write!(f, "RESTRICT"),
        }
    }
}

/// A foreign key from `table.column` (owned side) to `references.id` (owning side)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ForeignKey {
    pub name: &'static str,
    pub table: &'static str,
    pub column: &'static str,
    pub references: &'static str,
    pub on_delete: OnDelete,
}

/// A unique index over one or more columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UniqueIndex {
    pub name: &'static str,
    pub table: &'static str,
    pub columns: &'static [&'static str],
}

const fn fk(name: &'static str, table: &'static str, column: &'static str, references: &'static str, on_delete: OnDelete) -> ForeignKey {
    ForeignKey {
        name,
        table,
        column,
        references,
        on_delete,
    }
}

pub const FOREIGN_KEYS: &[ForeignKey] = &[
    fk("fk_admin_users_users_user_id", "admin_users", "user_id", "users", OnDelete::Cascade),
    fk("fk_admin_users_customers_customer_id", "admin_users", "customer_id", "customers", OnDelete::SetNull),
    fk("fk_billing_invoices_customers_customer_id", "billing_invoices", "customer_id", "customers", OnDelete::Cascade),
    fk("fk_students_customers_customer_id", "students", "customer_id", "customers", OnDelete::SetNull),
    fk("fk_students_users_user_id", "students", "user_id", "users", OnDelete::Cascade),
    fk("fk_trainers_customers_customer_id", "trainers", "customer_id", "customers", OnDelete::Cascade),
    fk("fk_trainers_users_user_id", "trainers", "user_id", "users", OnDelete::Cascade),
    fk(
        "fk_student_training_courses_students_student_id",
        "student_training_courses",
        "student_id",
        "students",
        OnDelete::Cascade,
    ),
    fk(
        "fk_student_training_courses_training_courses_training_course_id",
        "student_training_courses",
        "training_course_id",
        "training_courses",
        OnDelete::Cascade,
    ),
    fk("fk_modules_training_courses_training_course_id", "modules", "training_course_id", "training_courses", OnDelete::Cascade),
    fk(
        "fk_virtual_machines_training_courses_training_course_id",
        "virtual_machines",
        "training_course_id",
        "training_courses",
        OnDelete::SetNull,
    ),
    fk("fk_virtual_machines_vm_types_vm_type_id", "virtual_machines", "vm_type_id", "vm_types", OnDelete::Restrict),
    fk("fk_vm_options_vm_types_vm_type_id", "vm_options", "vm_type_id", "vm_types", OnDelete::Cascade),
    fk(
        "fk_daily_usage_statistics_virtual_machines_virtual_machine_id",
        "daily_usage_statistics",
        "virtual_machine_id",
        "virtual_machines",
        OnDelete::Cascade,
    ),
    fk("fk_rdp_files_students_student_id", "rdp_files", "student_id", "students", OnDelete::SetNull),
    fk("fk_rdp_files_virtual_machines_virtual_machine_id", "rdp_files", "virtual_machine_id", "virtual_machines", OnDelete::Cascade),
];

pub const UNIQUE_INDEXES: &[UniqueIndex] = &[
    UniqueIndex { name: "ix_admin_users_user_id", table: "admin_users", columns: &["user_id"] },
    UniqueIndex { name: "ix_admin_users_username", table: "admin_users", columns: &["username"] },
    UniqueIndex { name: "ix_billing_invoices_invoice_number", table: "billing_invoices", columns: &["invoice_number"] },
    UniqueIndex { name: "ix_customers_email", table: "customers", columns: &["email"] },
    UniqueIndex {
        name: "ix_daily_usage_statistics_virtual_machine_id_usage_date",
        table: "daily_usage_statistics",
        columns: &["virtual_machine_id", "usage_date"],
    },
    UniqueIndex {
        name: "ix_modules_training_course_id_order_number",
        table: "modules",
        columns: &["training_course_id", "order_number"],
    },
    UniqueIndex { name: "ix_students_email", table: "students", columns: &["email"] },
    UniqueIndex { name: "ix_trainers_user_id", table: "trainers", columns: &["user_id"] },
    UniqueIndex { name: "ix_users_email", table: "users", columns: &["email"] },
    UniqueIndex { name: "ix_vm_types_name", table: "vm_types", columns: &["name"] },
];

/// Every application table, in an order that is safe to create (parents first)
pub const TABLES: &[&str] = &[
    "customers",
    "training_courses",
    "users",
    "vm_types",
    "admin_users",
    "billing_invoices",
    "students",
    "trainers",
    "student_training_courses",
    "modules",
    "virtual_machines",
    "vm_options",
    "daily_usage_statistics",
    "rdp_files",
];

/// Relationships in which `table` is the referenced (owning) side
pub fn dependents_of(table: &str) -> impl Iterator<Item = &'static ForeignKey> + '_ {
    FOREIGN_KEYS.iter().filter(move |fk| fk.references == table)
}

/// Look up a declared foreign key by constraint name
pub fn foreign_key(name: &str) -> Option<&'static ForeignKey> {
    FOREIGN_KEYS.iter().find(|fk| fk.name == name)
}

/// A foreign key as PostgreSQL reports it
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct CatalogForeignKey {
    pub name: String,
    pub table: String,
    pub column: String,
    pub references: String,
    pub delete_action: String,
}

impl CatalogForeignKey {
    pub fn on_delete(&self) -> Option<OnDelete> {
        OnDelete::from_pg_code(&self.delete_action)
    }
}

/// Read single-column foreign keys on the application tables from `pg_constraint`
pub async fn catalog_foreign_keys(conn: &mut PgConnection) -> Result<Vec<CatalogForeignKey>> {
    let rows = sqlx::query_as::<_, CatalogForeignKey>(
        r#"
        SELECT c.conname::TEXT AS name,
               src.relname::TEXT AS "table",
               a.attname::TEXT AS "column",
               dst.relname::TEXT AS "references",
               c.confdeltype::TEXT AS delete_action
        FROM pg_constraint c
        JOIN pg_class src ON src.oid = c.conrelid
        JOIN pg_class dst ON dst.oid = c.confrelid
        JOIN pg_attribute a ON a.attrelid = c.conrelid AND a.attnum = c.conkey[1]
        WHERE c.contype = 'f'
          AND src.relname = ANY($1)
          AND c.connamespace = current_schema()::regnamespace
        ORDER BY c.conname
        "#,
    )
    .bind(TABLES)
    .fetch_all(conn)
    .await?;

    Ok(rows)
}
