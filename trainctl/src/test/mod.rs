//! Cross-table tests: delete policies, the seeded administrator and migration reversibility.

pub mod utils;

use crate::db::errors::DbError;
use crate::db::handlers::{
    AdminUsers, BillingInvoices, Customers, RdpFiles, Reports, Repository, Students, Trainers, UsageStatistics, VirtualMachines,
    VmOptions, VmTypes,
};
use crate::db::models::{
    admin_users::AdminUserCreateDBRequest, billing_invoices::BillingInvoiceCreateDBRequest, rdp_files::RdpFileCreateDBRequest,
    trainers::TrainerCreateDBRequest, usage_statistics::UsageStatisticCreateDBRequest, users::UserType,
    vm_options::VmOptionCreateDBRequest,
};
use crate::db::schema::TABLES;
use crate::migrator;
use crate::types::SEEDED_ADMIN_ID;
use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use utils::{create_test_customer, create_test_student, create_test_user, create_test_vm, create_test_vm_type};

async fn count(pool: &PgPool, table: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap()
}

async fn app_table_count(pool: &PgPool) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM information_schema.tables WHERE table_schema = current_schema() AND table_name = ANY($1)")
        .bind(TABLES)
        .fetch_one(pool)
        .await
        .unwrap()
}

#[sqlx::test]
#[test_log::test]
async fn test_customer_delete_applies_each_policy(pool: PgPool) {
    let acme = create_test_customer(&pool, "Acme Corporation").await;
    let student = create_test_student(&pool, "Alice Developer", Some(acme.id)).await;
    let admin_user = create_test_user(&pool, UserType::Admin).await;
    let trainer_user = create_test_user(&pool, UserType::Trainer).await;

    let mut conn = pool.acquire().await.unwrap();
    let admin = AdminUsers::new(&mut conn)
        .create(&AdminUserCreateDBRequest {
            user_id: admin_user.id,
            username: Some("jadmin".to_string()),
            customer_id: Some(acme.id),
        })
        .await
        .unwrap();
    let trainer = Trainers::new(&mut conn)
        .create(&TrainerCreateDBRequest {
            name: "Bob Trainer".to_string(),
            user_id: trainer_user.id,
            customer_id: acme.id,
        })
        .await
        .unwrap();
    let invoice = BillingInvoices::new(&mut conn)
        .create(&BillingInvoiceCreateDBRequest {
            invoice_number: "INV-2024-001".to_string(),
            customer_id: acme.id,
            invoice_date: Utc::now(),
            due_date: Utc::now() + chrono::Duration::days(30),
            total_amount: Decimal::new(15000, 2),
            status: None,
        })
        .await
        .unwrap();

    assert!(Customers::new(&mut conn).delete(acme.id).await.unwrap());

    // Cascaded
    assert!(BillingInvoices::new(&mut conn).get_by_id(invoice.id).await.unwrap().is_none());
    assert!(Trainers::new(&mut conn).get_by_id(trainer.id).await.unwrap().is_none());

    // Detached
    let student = Students::new(&mut conn).get_by_id(student.id).await.unwrap().unwrap();
    assert_eq!(student.customer_id, None);
    let admin = AdminUsers::new(&mut conn).get_by_id(admin.id).await.unwrap().unwrap();
    assert_eq!(admin.customer_id, None);
}

#[sqlx::test]
#[test_log::test]
async fn test_virtual_machine_delete_cascades(pool: PgPool) {
    let windows = create_test_vm_type(&pool, "Windows").await;
    let vm = create_test_vm(&pool, "training-vm-001", windows.id, None).await;
    let student = create_test_student(&pool, "Alice Developer", None).await;

    let mut conn = pool.acquire().await.unwrap();
    let usage = UsageStatistics::new(&mut conn)
        .create(&UsageStatisticCreateDBRequest {
            virtual_machine_id: vm.id,
            usage_date: NaiveDate::from_ymd_opt(2024, 10, 1).unwrap(),
            hours_used: Decimal::new(850, 2),
            cost: Decimal::new(1275, 2),
        })
        .await
        .unwrap();
    let rdp = RdpFiles::new(&mut conn)
        .create(&RdpFileCreateDBRequest {
            file_name: "alice-vm-001.rdp".to_string(),
            file_path: None,
            virtual_machine_id: vm.id,
            student_id: Some(student.id),
        })
        .await
        .unwrap();

    assert!(VirtualMachines::new(&mut conn).delete(vm.id).await.unwrap());

    assert!(UsageStatistics::new(&mut conn).get_by_id(usage.id).await.unwrap().is_none());
    assert!(RdpFiles::new(&mut conn).get_by_id(rdp.id).await.unwrap().is_none());
    // The student only loses the file, not their record
    assert!(Students::new(&mut conn).get_by_id(student.id).await.unwrap().is_some());
}

#[sqlx::test]
#[test_log::test]
async fn test_vm_type_deletable_only_after_its_machines(pool: PgPool) {
    let windows = create_test_vm_type(&pool, "Windows").await;
    let mut conn = pool.acquire().await.unwrap();
    VmOptions::new(&mut conn)
        .create(&VmOptionCreateDBRequest {
            vm_type_id: windows.id,
            name: "Windows Server 2022".to_string(),
            sku: Some("2022-datacenter".to_string()),
            offer: Some("WindowsServer".to_string()),
            version: Some("latest".to_string()),
            iso_vhd: None,
        })
        .await
        .unwrap();
    drop(conn);
    let vm = create_test_vm(&pool, "training-vm-001", windows.id, None).await;

    let mut conn = pool.acquire().await.unwrap();
    let usage = Reports::new(&mut conn).vm_usage().await.unwrap();
    assert_eq!(usage.len(), 1);
    assert_eq!(usage[0].vm_type, "Windows");
    assert_eq!(usage[0].total_hours, Decimal::ZERO);

    let err = VmTypes::new(&mut conn).delete(windows.id).await.unwrap_err();
    assert!(matches!(
        err,
        DbError::ForeignKeyViolation { constraint: Some(ref c), .. } if c == "fk_virtual_machines_vm_types_vm_type_id"
    ));

    assert!(VirtualMachines::new(&mut conn).delete(vm.id).await.unwrap());
    assert!(VmTypes::new(&mut conn).delete(windows.id).await.unwrap());
    assert_eq!(count(&pool, "vm_options").await, 0);
}

#[sqlx::test]
#[test_log::test]
async fn test_exactly_one_seeded_admin(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();
    let seed_time = Utc.with_ymd_and_hms(2025, 10, 7, 0, 0, 0).unwrap();

    assert_eq!(count(&pool, "users").await, 1);
    assert_eq!(count(&pool, "admin_users").await, 1);

    let admin = AdminUsers::new(&mut conn).get_by_id(SEEDED_ADMIN_ID).await.unwrap().unwrap();
    assert_eq!(admin.user_id, SEEDED_ADMIN_ID);
    assert_eq!(admin.username.as_deref(), Some("Super Admin"));
    assert_eq!(admin.customer_id, None);
    assert_eq!(admin.created_at, seed_time);
    assert_eq!(admin.updated_at, None);
}

#[sqlx::test]
#[test_log::test]
async fn test_ids_continue_after_seed(pool: PgPool) {
    let first = create_test_user(&pool, UserType::Student).await;
    let second = create_test_user(&pool, UserType::Student).await;

    assert!(first.id > SEEDED_ADMIN_ID);
    assert!(second.id > first.id);

    let c1 = create_test_customer(&pool, "First").await;
    let c2 = create_test_customer(&pool, "Second").await;
    assert!(c2.id > c1.id);
}

#[sqlx::test]
#[test_log::test]
async fn test_migrations_are_reversible(pool: PgPool) {
    assert_eq!(app_table_count(&pool).await, TABLES.len() as i64);

    migrator().undo(&pool, 0).await.unwrap();
    assert_eq!(app_table_count(&pool).await, 0);

    migrator().run(&pool).await.unwrap();
    assert_eq!(app_table_count(&pool).await, TABLES.len() as i64);
    assert_eq!(count(&pool, "users").await, 1);

    let created_at: chrono::DateTime<Utc> = sqlx::query_scalar("SELECT created_at FROM users WHERE id = $1")
        .bind(SEEDED_ADMIN_ID)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(created_at, Utc.with_ymd_and_hms(2025, 10, 7, 0, 0, 0).unwrap());
}

/// `created_at` of the seeded user and admin rows, rendered in UTC with microseconds
async fn seed_timestamps(pool: &PgPool) -> (String, String) {
    sqlx::query_as::<_, (String, String)>(
        r#"
        SELECT (u.created_at AT TIME ZONE 'UTC')::TEXT, (a.created_at AT TIME ZONE 'UTC')::TEXT
        FROM users u
        JOIN admin_users a ON a.user_id = u.id
        WHERE u.id = $1
        "#,
    )
    .bind(SEEDED_ADMIN_ID)
    .fetch_one(pool)
    .await
    .unwrap()
}

#[sqlx::test]
#[test_log::test]
async fn test_each_down_step_restores_previous_seed_timestamps(pool: PgPool) {
    let versions: Vec<i64> = migrator()
        .iter()
        .filter(|m| m.migration_type.is_up_migration())
        .map(|m| m.version)
        .collect();
    assert_eq!(versions.len(), 3);

    assert_eq!(
        seed_timestamps(&pool).await,
        ("2025-10-07 00:00:00".to_string(), "2025-10-07 00:00:00".to_string())
    );

    // Revert pin_seed_admin_timestamp
    migrator().undo(&pool, versions[1]).await.unwrap();
    assert_eq!(
        seed_timestamps(&pool).await,
        ("2025-10-07 19:38:10.786588".to_string(), "2025-10-07 19:38:10.786026".to_string())
    );

    // Revert seed_admin_timestamp
    migrator().undo(&pool, versions[0]).await.unwrap();
    assert_eq!(
        seed_timestamps(&pool).await,
        ("2025-10-07 19:35:58.402894".to_string(), "2025-10-07 19:35:58.402238".to_string())
    );
    assert_eq!(count(&pool, "users").await, 1);
    assert_eq!(count(&pool, "admin_users").await, 1);

    migrator().run(&pool).await.unwrap();
    assert_eq!(
        seed_timestamps(&pool).await,
        ("2025-10-07 00:00:00".to_string(), "2025-10-07 00:00:00".to_string())
    );
}
