//! Test fixtures: one helper per entity, each inserting a row through its repository.
use crate::db::handlers::{Customers, Repository, Students, TrainingCourses, Users, VirtualMachines, VmTypes};
use crate::db::models::{
    customers::{CustomerCreateDBRequest, CustomerDBResponse},
    students::{StudentCreateDBRequest, StudentDBResponse},
    training_courses::{TrainingCourseCreateDBRequest, TrainingCourseDBResponse},
    users::{UserCreateDBRequest, UserDBResponse, UserType},
    virtual_machines::{VirtualMachineCreateDBRequest, VirtualMachineDBResponse},
    vm_types::{VmTypeCreateDBRequest, VmTypeDBResponse},
};
use crate::types::{CustomerId, TrainingCourseId, VmTypeId};
use rust_decimal::Decimal;
use sqlx::PgPool;
use std::sync::atomic::{AtomicU32, Ordering};

static SEQUENCE: AtomicU32 = AtomicU32::new(1);

/// Suffix for values that must be unique within a test database
fn unique_suffix() -> u32 {
    SEQUENCE.fetch_add(1, Ordering::Relaxed)
}

fn slug(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect()
}

pub async fn create_test_customer(pool: &PgPool, name: &str) -> CustomerDBResponse {
    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    Customers::new(&mut conn)
        .create(&CustomerCreateDBRequest {
            name: name.to_string(),
            email: Some(format!("{}-{}@example.com", slug(name), unique_suffix())),
            phone: None,
            address: None,
        })
        .await
        .expect("Failed to create test customer")
}

pub async fn create_test_user(pool: &PgPool, user_type: UserType) -> UserDBResponse {
    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    let n = unique_suffix();
    Users::new(&mut conn)
        .create(&UserCreateDBRequest {
            name: format!("Test {user_type} {n}"),
            email: format!("{user_type}-{n}@example.com"),
            password_hash: None,
            user_type,
        })
        .await
        .expect("Failed to create test user")
}

pub async fn create_test_student(pool: &PgPool, name: &str, customer_id: Option<CustomerId>) -> StudentDBResponse {
    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    Students::new(&mut conn)
        .create(&StudentCreateDBRequest {
            name: name.to_string(),
            email: format!("{}-{}@example.com", slug(name), unique_suffix()),
            phone: None,
            customer_id,
            user_id: None,
        })
        .await
        .expect("Failed to create test student")
}

pub async fn create_test_course(pool: &PgPool, name: &str) -> TrainingCourseDBResponse {
    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    TrainingCourses::new(&mut conn)
        .create(&TrainingCourseCreateDBRequest {
            name: name.to_string(),
            description: None,
            duration_hours: Some(8),
            price: Some(Decimal::new(10000, 2)),
            requires_vm: Some(true),
        })
        .await
        .expect("Failed to create test course")
}

pub async fn create_test_vm_type(pool: &PgPool, name: &str) -> VmTypeDBResponse {
    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    VmTypes::new(&mut conn)
        .create(&VmTypeCreateDBRequest {
            name: name.to_string(),
            description: None,
        })
        .await
        .expect("Failed to create test VM type")
}

pub async fn create_test_vm(
    pool: &PgPool,
    name: &str,
    vm_type_id: VmTypeId,
    training_course_id: Option<TrainingCourseId>,
) -> VirtualMachineDBResponse {
    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    VirtualMachines::new(&mut conn)
        .create(&VirtualMachineCreateDBRequest {
            name: name.to_string(),
            ip_address: None,
            status: None,
            training_course_id,
            vm_type_id,
        })
        .await
        .expect("Failed to create test virtual machine")
}
