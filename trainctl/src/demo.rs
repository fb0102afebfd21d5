//! Sample data set and report printer behind `trainctl demo`.
//!
//! [`seed_sample_data`] inserts one small, fully connected data set (a customer with staff and
//! students, two courses, two VM types with machines, usage and RDP files, and an invoice) in
//! a single transaction. [`run`] seeds it when missing and prints the six reports.

use std::fmt::Write as _;

use chrono::{Days, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{info, instrument};

use crate::auth::password;
use crate::db::errors::DbError;
use crate::db::handlers::reports::ReportSet;
use crate::db::handlers::{
    AdminUsers, BillingInvoices, CourseModules, Customers, RdpFiles, Reports, Repository, Students, Trainers, TrainingCourses,
    UsageStatistics, Users, VirtualMachines, VmOptions, VmTypes,
};
use crate::db::models::{
    admin_users::AdminUserCreateDBRequest,
    billing_invoices::BillingInvoiceCreateDBRequest,
    course_modules::ModuleCreateDBRequest,
    customers::CustomerCreateDBRequest,
    rdp_files::RdpFileCreateDBRequest,
    students::StudentCreateDBRequest,
    trainers::TrainerCreateDBRequest,
    training_courses::TrainingCourseCreateDBRequest,
    usage_statistics::UsageStatisticCreateDBRequest,
    users::{UserCreateDBRequest, UserType},
    virtual_machines::VirtualMachineCreateDBRequest,
    vm_options::VmOptionCreateDBRequest,
    vm_types::VmTypeCreateDBRequest,
};
use crate::errors::{Error, Result};
use crate::types::{
    AdminUserId, BillingInvoiceId, CustomerId, ModuleId, RdpFileId, StudentId, TrainerId, TrainingCourseId, UsageStatisticId, UserId,
    VirtualMachineId, VmOptionId, VmTypeId,
};

/// Name of the VM type whose presence marks the sample data as already loaded
const MARKER_VM_TYPE: &str = "Windows";

/// Ids of every row inserted by [`seed_sample_data`]
#[derive(Debug, Clone)]
pub struct SampleData {
    pub vm_types: Vec<VmTypeId>,
    pub vm_options: Vec<VmOptionId>,
    pub customer: CustomerId,
    pub users: Vec<UserId>,
    pub admin_user: AdminUserId,
    pub trainer: TrainerId,
    pub students: Vec<StudentId>,
    pub courses: Vec<TrainingCourseId>,
    pub modules: Vec<ModuleId>,
    pub virtual_machines: Vec<VirtualMachineId>,
    pub rdp_files: Vec<RdpFileId>,
    pub usage: Vec<UsageStatisticId>,
    pub invoice: BillingInvoiceId,
}

fn some(s: &str) -> Option<String> {
    Some(s.to_string())
}

/// Insert the sample data set in one transaction. Nothing is written if any insert fails.
#[instrument(skip_all, err)]
pub async fn seed_sample_data(pool: &PgPool) -> Result<SampleData> {
    let trainer_password = password::hash_password("trainerpass")?;
    let mut tx = pool.begin().await.map_err(DbError::from)?;

    let windows = VmTypes::new(&mut tx)
        .create(&VmTypeCreateDBRequest {
            name: MARKER_VM_TYPE.to_string(),
            description: some("Windows-based virtual machines"),
        })
        .await?;
    let linux = VmTypes::new(&mut tx)
        .create(&VmTypeCreateDBRequest {
            name: "Linux".to_string(),
            description: some("Linux-based virtual machines"),
        })
        .await?;

    let mut options = VmOptions::new(&mut tx);
    let windows_option = options
        .create(&VmOptionCreateDBRequest {
            vm_type_id: windows.id,
            name: "Windows Server 2022".to_string(),
            sku: some("2022-datacenter"),
            offer: some("WindowsServer"),
            version: some("latest"),
            iso_vhd: None,
        })
        .await?;
    let linux_option = options
        .create(&VmOptionCreateDBRequest {
            vm_type_id: linux.id,
            name: "Ubuntu 22.04 LTS".to_string(),
            sku: some("22_04-lts"),
            offer: some("UbuntuServer"),
            version: some("latest"),
            iso_vhd: None,
        })
        .await?;

    let customer = Customers::new(&mut tx)
        .create(&CustomerCreateDBRequest {
            name: "Acme Corporation".to_string(),
            email: some("contact@acme.com"),
            phone: some("+1-555-0100"),
            address: some("123 Business St, Tech City, TC 12345"),
        })
        .await?;

    let mut users = Users::new(&mut tx);
    let admin_account = users
        .create(&UserCreateDBRequest {
            name: "John Admin".to_string(),
            email: "john.admin@acme.com".to_string(),
            password_hash: None,
            user_type: UserType::Admin,
        })
        .await?;
    let trainer_account = users
        .create(&UserCreateDBRequest {
            name: "Trainer Bob".to_string(),
            email: "bob.trainer@acme.com".to_string(),
            password_hash: Some(trainer_password),
            user_type: UserType::Trainer,
        })
        .await?;

    let admin_user = AdminUsers::new(&mut tx)
        .create(&AdminUserCreateDBRequest {
            user_id: admin_account.id,
            username: some("jadmin"),
            customer_id: Some(customer.id),
        })
        .await?;

    let trainer = Trainers::new(&mut tx)
        .create(&TrainerCreateDBRequest {
            name: "Bob Trainer".to_string(),
            user_id: trainer_account.id,
            customer_id: customer.id,
        })
        .await?;

    let mut students = Students::new(&mut tx);
    let alice = students
        .create(&StudentCreateDBRequest {
            name: "Alice Developer".to_string(),
            email: "alice@acme.com".to_string(),
            phone: some("+1-555-0101"),
            customer_id: Some(customer.id),
            user_id: None,
        })
        .await?;
    let bob = students
        .create(&StudentCreateDBRequest {
            name: "Bob Engineer".to_string(),
            email: "bob@acme.com".to_string(),
            phone: some("+1-555-0102"),
            customer_id: Some(customer.id),
            user_id: None,
        })
        .await?;

    let mut courses = TrainingCourses::new(&mut tx);
    let dotnet = courses
        .create(&TrainingCourseCreateDBRequest {
            name: ".NET 9 Fundamentals".to_string(),
            description: some("Comprehensive introduction to .NET 9 development"),
            duration_hours: Some(40),
            price: Some(Decimal::new(250000, 2)),
            requires_vm: Some(true),
        })
        .await?;
    let cloud = courses
        .create(&TrainingCourseCreateDBRequest {
            name: "Cloud Architecture".to_string(),
            description: some("Learn cloud computing principles and Azure services"),
            duration_hours: Some(32),
            price: Some(Decimal::new(300000, 2)),
            requires_vm: Some(true),
        })
        .await?;

    let mut enrollments = Students::new(&mut tx);
    enrollments.enroll(alice.id, dotnet.id).await?;
    enrollments.enroll(bob.id, cloud.id).await?;

    let mut modules = Vec::new();
    let mut course_modules = CourseModules::new(&mut tx);
    for (order_number, name, description, hours) in [
        (1, "Introduction to .NET", "Overview of the .NET ecosystem", 8),
        (2, "C# Fundamentals", "Core C# programming concepts", 16),
        (3, "ASP.NET Core", "Building web applications with ASP.NET Core", 16),
    ] {
        let module = course_modules
            .create(&ModuleCreateDBRequest {
                training_course_id: dotnet.id,
                name: name.to_string(),
                description: some(description),
                order_number,
                duration_hours: Some(hours),
            })
            .await?;
        modules.push(module.id);
    }

    let mut vms = VirtualMachines::new(&mut tx);
    let vm1 = vms
        .create(&VirtualMachineCreateDBRequest {
            name: "training-vm-001".to_string(),
            ip_address: some("10.0.1.10"),
            status: some("Running"),
            training_course_id: Some(dotnet.id),
            vm_type_id: windows.id,
        })
        .await?;
    let vm2 = vms
        .create(&VirtualMachineCreateDBRequest {
            name: "training-vm-002".to_string(),
            ip_address: some("10.0.1.11"),
            status: some("Running"),
            training_course_id: Some(cloud.id),
            vm_type_id: linux.id,
        })
        .await?;

    let mut rdp = RdpFiles::new(&mut tx);
    let mut rdp_files = Vec::new();
    for (vm, student) in [(&vm1, &alice), (&vm2, &bob)] {
        let file = rdp
            .create(&RdpFileCreateDBRequest {
                file_name: format!("{}.rdp", vm.name),
                file_path: Some(format!("/rdp-files/{}.rdp", vm.name)),
                virtual_machine_id: vm.id,
                student_id: Some(student.id),
            })
            .await?;
        rdp_files.push(file.id);
    }

    let today = Utc::now().date_naive();
    let yesterday = today.checked_sub_days(Days::new(1)).ok_or_else(|| Error::Internal {
        operation: "compute the previous day".to_string(),
    })?;

    let mut usage_repo = UsageStatistics::new(&mut tx);
    let mut usage = Vec::new();
    for (vm_id, usage_date, hours_used, cost) in [
        (vm1.id, yesterday, Decimal::new(85, 1), Decimal::new(3400, 2)),
        (vm1.id, today, Decimal::new(60, 1), Decimal::new(2400, 2)),
        (vm2.id, yesterday, Decimal::new(70, 1), Decimal::new(2800, 2)),
    ] {
        let stat = usage_repo
            .create(&UsageStatisticCreateDBRequest {
                virtual_machine_id: vm_id,
                usage_date,
                hours_used,
                cost,
            })
            .await?;
        usage.push(stat.id);
    }

    let invoice_date = today.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc()).ok_or_else(|| Error::Internal {
        operation: "compute the invoice date".to_string(),
    })?;
    let invoice = BillingInvoices::new(&mut tx)
        .create(&BillingInvoiceCreateDBRequest {
            invoice_number: "INV-2024-001".to_string(),
            customer_id: customer.id,
            invoice_date,
            due_date: invoice_date + chrono::Duration::days(30),
            total_amount: Decimal::new(550000, 2),
            status: None,
        })
        .await?;

    tx.commit().await.map_err(DbError::from)?;
    info!(customer_id = customer.id, "Sample data seeded");

    Ok(SampleData {
        vm_types: vec![windows.id, linux.id],
        vm_options: vec![windows_option.id, linux_option.id],
        customer: customer.id,
        users: vec![admin_account.id, trainer_account.id],
        admin_user: admin_user.id,
        trainer: trainer.id,
        students: vec![alice.id, bob.id],
        courses: vec![dotnet.id, cloud.id],
        modules,
        virtual_machines: vec![vm1.id, vm2.id],
        rdp_files,
        usage,
        invoice: invoice.id,
    })
}

/// Seed the sample data unless it is already present (or `skip_seed` is set), then print all
/// six reports to stdout.
#[instrument(skip(pool), err)]
pub async fn run(pool: &PgPool, skip_seed: bool, json: bool) -> Result<()> {
    if !skip_seed {
        let mut conn = pool.acquire().await.map_err(DbError::from)?;
        let already_seeded = VmTypes::new(&mut conn).get_by_name(MARKER_VM_TYPE).await?.is_some();
        drop(conn);

        if already_seeded {
            info!("Sample data already present, skipping seed");
        } else {
            seed_sample_data(pool).await?;
        }
    }

    let mut conn = pool.acquire().await.map_err(DbError::from)?;
    let reports = Reports::new(&mut conn).all().await?;

    if json {
        let rendered = serde_json::to_string_pretty(&reports).map_err(anyhow::Error::from)?;
        println!("{rendered}");
    } else {
        print!("{}", render_text(&reports));
    }
    Ok(())
}

/// Human-readable rendering of the six reports
pub fn render_text(reports: &ReportSet) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail
    let _ = write_reports(&mut out, reports);
    out
}

fn write_reports(out: &mut String, reports: &ReportSet) -> std::fmt::Result {
    let hours = |h: Option<i32>| h.map(|h| format!("{h}h")).unwrap_or_else(|| "-".to_string());
    let money = |m: Option<Decimal>| m.map(|m| format!("${m}")).unwrap_or_else(|| "-".to_string());
    let text = |s: &Option<String>| s.clone().unwrap_or_else(|| "-".to_string());

    writeln!(out, "1. Training Courses with Modules:")?;
    for course in &reports.courses {
        writeln!(out, "   - {} ({}, {})", course.name, hours(course.duration_hours), money(course.price))?;
        for module in &course.modules {
            writeln!(out, "     {}. {} ({})", module.order_number, module.name, hours(module.duration_hours))?;
        }
    }

    writeln!(out, "\n2. Customers and Students:")?;
    for customer in &reports.customers {
        writeln!(out, "   - {} ({})", customer.name, text(&customer.email))?;
        writeln!(out, "     Students: {}", customer.students.join(", "))?;
    }

    writeln!(out, "\n3. Virtual Machines with Usage:")?;
    for vm in &reports.virtual_machines {
        writeln!(out, "   - {} ({}) - {}", vm.name, vm.vm_type, vm.status)?;
        writeln!(out, "     Total Usage: {}h, Total Cost: ${}", vm.total_hours, vm.total_cost)?;
    }

    writeln!(out, "\n4. Students with RDP Access:")?;
    for student in &reports.students {
        writeln!(out, "   - {} ({})", student.name, student.email)?;
        for rdp in &student.rdp_files {
            writeln!(out, "     RDP: {} -> {}", rdp.file_name, rdp.virtual_machine)?;
        }
    }

    writeln!(out, "\n5. Pending Invoices:")?;
    for invoice in &reports.pending_invoices {
        writeln!(out, "   - {} - {}", invoice.invoice_number, invoice.customer)?;
        writeln!(out, "     Amount: ${}, Due: {}", invoice.total_amount, invoice.due_date.format("%Y-%m-%d"))?;
    }

    writeln!(out, "\n6. VM Types and Options:")?;
    for vm_type in &reports.vm_types {
        writeln!(out, "   - {}", vm_type.name)?;
        for option in &vm_type.options {
            writeln!(out, "     * {} (SKU: {}, Offer: {})", option.name, text(&option.sku), text(&option.offer))?;
        }
    }

    Ok(())
}
