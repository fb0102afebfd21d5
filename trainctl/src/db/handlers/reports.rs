//! Read-only joined queries across the training tables.
//!
//! Each report runs its own query and returns freshly built values. Parent/child reports use a
//! LEFT JOIN ordered by the parent key and are folded into nested structs in Rust, so parents
//! without children still appear (with an empty list).

use crate::db::errors::Result;
use crate::db::models::billing_invoices::DEFAULT_INVOICE_STATUS;
use crate::types::{CustomerId, StudentId, TrainingCourseId, VirtualMachineId, VmTypeId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{FromRow, PgConnection};
use tracing::instrument;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseWithModules {
    pub course_id: TrainingCourseId,
    pub name: String,
    pub duration_hours: Option<i32>,
    pub price: Option<Decimal>,
    /// Ordered by `order_number`
    pub modules: Vec<ModuleSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleSummary {
    pub order_number: i32,
    pub name: String,
    pub duration_hours: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerWithStudents {
    pub customer_id: CustomerId,
    pub name: String,
    pub email: Option<String>,
    pub students: Vec<String>,
}

/// A virtual machine with its type name and usage totals over all recorded days
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct VmUsage {
    pub virtual_machine_id: VirtualMachineId,
    pub name: String,
    pub vm_type: String,
    pub status: String,
    pub total_hours: Decimal,
    pub total_cost: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentRdpAccess {
    pub student_id: StudentId,
    pub name: String,
    pub email: String,
    pub rdp_files: Vec<RdpAccess>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RdpAccess {
    pub file_name: String,
    pub virtual_machine: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct PendingInvoice {
    pub invoice_number: String,
    pub customer: String,
    pub total_amount: Decimal,
    pub due_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VmTypeWithOptions {
    pub vm_type_id: VmTypeId,
    pub name: String,
    pub options: Vec<VmOptionSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VmOptionSummary {
    pub name: String,
    pub sku: Option<String>,
    pub offer: Option<String>,
}

/// All six reports, as printed by `trainctl demo`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSet {
    pub courses: Vec<CourseWithModules>,
    pub customers: Vec<CustomerWithStudents>,
    pub virtual_machines: Vec<VmUsage>,
    pub students: Vec<StudentRdpAccess>,
    pub pending_invoices: Vec<PendingInvoice>,
    pub vm_types: Vec<VmTypeWithOptions>,
}

#[derive(FromRow)]
struct CourseModuleRow {
    course_id: TrainingCourseId,
    course_name: String,
    course_hours: Option<i32>,
    price: Option<Decimal>,
    order_number: Option<i32>,
    module_name: Option<String>,
    module_hours: Option<i32>,
}

#[derive(FromRow)]
struct CustomerStudentRow {
    customer_id: CustomerId,
    customer_name: String,
    email: Option<String>,
    student_name: Option<String>,
}

#[derive(FromRow)]
struct StudentRdpRow {
    student_id: StudentId,
    student_name: String,
    email: String,
    file_name: Option<String>,
    virtual_machine: Option<String>,
}

#[derive(FromRow)]
struct VmTypeOptionRow {
    vm_type_id: VmTypeId,
    vm_type_name: String,
    option_name: Option<String>,
    sku: Option<String>,
    offer: Option<String>,
}

/// Fold rows that arrive ordered by parent id into one parent per id.
fn group_by_parent<R, P>(
    rows: Vec<R>,
    parent_id: impl Fn(&R) -> i32,
    new_parent: impl Fn(&R) -> P,
    add_child: impl Fn(&mut P, R),
) -> Vec<P> {
    let mut grouped: Vec<(i32, P)> = Vec::new();

    for row in rows {
        let id = parent_id(&row);
        if grouped.last().is_none_or(|(last, _)| *last != id) {
            grouped.push((id, new_parent(&row)));
        }
        if let Some((_, parent)) = grouped.last_mut() {
            add_child(parent, row);
        }
    }

    grouped.into_iter().map(|(_, parent)| parent).collect()
}

pub struct Reports<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Reports<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Every course with its modules in teaching order
    #[instrument(skip(self), err)]
    pub async fn courses_with_modules(&mut self) -> Result<Vec<CourseWithModules>> {
        let rows = sqlx::query_as::<_, CourseModuleRow>(
            r#"
            SELECT c.id AS course_id, c.name AS course_name, c.duration_hours AS course_hours, c.price,
                   m.order_number, m.name AS module_name, m.duration_hours AS module_hours
            FROM training_courses c
            LEFT JOIN modules m ON m.training_course_id = c.id
            ORDER BY c.id, m.order_number
            "#,
        )
        .fetch_all(&mut *self.db)
        .await?;

        Ok(group_by_parent(
            rows,
            |r| r.course_id,
            |r| CourseWithModules {
                course_id: r.course_id,
                name: r.course_name.clone(),
                duration_hours: r.course_hours,
                price: r.price,
                modules: Vec::new(),
            },
            |course, r| {
                if let (Some(order_number), Some(name)) = (r.order_number, r.module_name) {
                    course.modules.push(ModuleSummary {
                        order_number,
                        name,
                        duration_hours: r.module_hours,
                    });
                }
            },
        ))
    }

    /// Every customer with the names of its students
    #[instrument(skip(self), err)]
    pub async fn customers_with_students(&mut self) -> Result<Vec<CustomerWithStudents>> {
        let rows = sqlx::query_as::<_, CustomerStudentRow>(
            r#"
            SELECT c.id AS customer_id, c.name AS customer_name, c.email, s.name AS student_name
            FROM customers c
            LEFT JOIN students s ON s.customer_id = c.id
            ORDER BY c.id, s.id
            "#,
        )
        .fetch_all(&mut *self.db)
        .await?;

        Ok(group_by_parent(
            rows,
            |r| r.customer_id,
            |r| CustomerWithStudents {
                customer_id: r.customer_id,
                name: r.customer_name.clone(),
                email: r.email.clone(),
                students: Vec::new(),
            },
            |customer, r| customer.students.extend(r.student_name),
        ))
    }

    /// Every virtual machine with its type and summed usage. Machines without usage show zeros.
    #[instrument(skip(self), err)]
    pub async fn vm_usage(&mut self) -> Result<Vec<VmUsage>> {
        let usage = sqlx::query_as::<_, VmUsage>(
            r#"
            SELECT vm.id AS virtual_machine_id, vm.name, t.name AS vm_type, vm.status,
                   COALESCE(SUM(u.hours_used), 0) AS total_hours,
                   COALESCE(SUM(u.cost), 0) AS total_cost
            FROM virtual_machines vm
            JOIN vm_types t ON t.id = vm.vm_type_id
            LEFT JOIN daily_usage_statistics u ON u.virtual_machine_id = vm.id
            GROUP BY vm.id, t.name
            ORDER BY vm.id
            "#,
        )
        .fetch_all(&mut *self.db)
        .await?;

        Ok(usage)
    }

    /// Every student with the RDP files assigned to them and the machine each one opens
    #[instrument(skip(self), err)]
    pub async fn students_with_rdp_access(&mut self) -> Result<Vec<StudentRdpAccess>> {
        let rows = sqlx::query_as::<_, StudentRdpRow>(
            r#"
            SELECT s.id AS student_id, s.name AS student_name, s.email,
                   r.file_name, vm.name AS virtual_machine
            FROM students s
            LEFT JOIN rdp_files r ON r.student_id = s.id
            LEFT JOIN virtual_machines vm ON vm.id = r.virtual_machine_id
            ORDER BY s.id, r.id
            "#,
        )
        .fetch_all(&mut *self.db)
        .await?;

        Ok(group_by_parent(
            rows,
            |r| r.student_id,
            |r| StudentRdpAccess {
                student_id: r.student_id,
                name: r.student_name.clone(),
                email: r.email.clone(),
                rdp_files: Vec::new(),
            },
            |student, r| {
                if let (Some(file_name), Some(virtual_machine)) = (r.file_name, r.virtual_machine) {
                    student.rdp_files.push(RdpAccess {
                        file_name,
                        virtual_machine,
                    });
                }
            },
        ))
    }

    /// Invoices still in the default "Pending" status, soonest due first
    #[instrument(skip(self), err)]
    pub async fn pending_invoices(&mut self) -> Result<Vec<PendingInvoice>> {
        let invoices = sqlx::query_as::<_, PendingInvoice>(
            r#"
            SELECT i.invoice_number, c.name AS customer, i.total_amount, i.due_date
            FROM billing_invoices i
            JOIN customers c ON c.id = i.customer_id
            WHERE i.status = $1
            ORDER BY i.due_date, i.id
            "#,
        )
        .bind(DEFAULT_INVOICE_STATUS)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(invoices)
    }

    /// Every VM type with its image options
    #[instrument(skip(self), err)]
    pub async fn vm_types_with_options(&mut self) -> Result<Vec<VmTypeWithOptions>> {
        let rows = sqlx::query_as::<_, VmTypeOptionRow>(
            r#"
            SELECT t.id AS vm_type_id, t.name AS vm_type_name,
                   o.name AS option_name, o.sku, o.offer
            FROM vm_types t
            LEFT JOIN vm_options o ON o.vm_type_id = t.id
            ORDER BY t.id, o.id
            "#,
        )
        .fetch_all(&mut *self.db)
        .await?;

        Ok(group_by_parent(
            rows,
            |r| r.vm_type_id,
            |r| VmTypeWithOptions {
                vm_type_id: r.vm_type_id,
                name: r.vm_type_name.clone(),
                options: Vec::new(),
            },
            |vm_type, r| {
                if let Some(name) = r.option_name {
                    vm_type.options.push(VmOptionSummary {
                        name,
                        sku: r.sku,
                        offer: r.offer,
                    });
                }
            },
        ))
    }

    /// Run all six reports in sequence
    #[instrument(skip(self), err)]
    pub async fn all(&mut self) -> Result<ReportSet> {
        Ok(ReportSet {
            courses: self.courses_with_modules().await?,
            customers: self.customers_with_students().await?,
            virtual_machines: self.vm_usage().await?,
            students: self.students_with_rdp_access().await?,
            pending_invoices: self.pending_invoices().await?,
            vm_types: self.vm_types_with_options().await?,
        })
    }
}
