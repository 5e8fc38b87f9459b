//! Vacation ledger integration tests against a real SQLite database.

use chrono::NaiveDate;
use sqlx::SqlitePool;

use hr_server::db::DbService;
use hr_server::db::repository::{RepoError, employee, identity, vacation};
use hr_server::leave;
use shared::models::{EmployeeCreate, EmployeeProfile, IdentityCreate, VacationCreate};

async fn setup() -> (tempfile::TempDir, SqlitePool) {
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir.path().join("hr.db");
    let service = DbService::new(&db_path.to_string_lossy())
        .await
        .expect("database init");
    (dir, service.pool)
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn employee_payload(national_id: &str, email: &str) -> EmployeeCreate {
    EmployeeCreate {
        first_name: "Ana".into(),
        last_name: "Rojas".into(),
        email: email.into(),
        national_id: national_id.into(),
        employee_code: None,
        birth_date: None,
        hire_date: Some(date(2020, 3, 1)),
        position: None,
        phone: None,
        address: None,
        emergency_phone: None,
        emergency_contact: None,
        personal_email: None,
        linkedin_url: None,
        location: None,
        department: None,
        health_insurance: None,
        pension_fund: None,
        annual_vacation_days: Some(15),
        favorite_dessert: None,
        notes: None,
        status: None,
        specialty_ids: vec![],
    }
}

async fn create_employee(pool: &SqlitePool, national_id: &str) -> EmployeeProfile {
    let mut conn = pool.acquire().await.unwrap();
    let code = employee::next_employee_code(&mut conn).await.unwrap();
    employee::create(
        &mut conn,
        &employee_payload(national_id, ""),
        &code,
        None,
    )
    .await
    .unwrap()
}

async fn create_approver(pool: &SqlitePool) -> i64 {
    let mut conn = pool.acquire().await.unwrap();
    identity::create(
        &mut conn,
        IdentityCreate {
            username: "hr.manager".into(),
            email: "hr@example.com".into(),
            first_name: "HR".into(),
            last_name: "Manager".into(),
            password: Some("manager-pass".into()),
        },
    )
    .await
    .unwrap()
    .id
}

#[tokio::test]
async fn requested_days_are_derived_and_overwrite_client_value() {
    let (_dir, pool) = setup().await;
    let emp = create_employee(&pool, "11111111-1").await;

    let request = vacation::create(
        &pool,
        emp.id,
        &VacationCreate {
            start_date: date(2024, 1, 1),
            end_date: date(2024, 1, 5),
            // Client lies; the server recomputes from the range
            requested_days: Some(999),
            reason: Some("Summer break".into()),
        },
    )
    .await
    .unwrap();

    assert_eq!(request.requested_days, 5);
    assert_eq!(request.status, shared::models::VacationStatus::Pending);
}

#[tokio::test]
async fn persistence_boundary_rejects_bad_date_ranges() {
    let (_dir, pool) = setup().await;
    let emp = create_employee(&pool, "11111111-1").await;

    let equal = vacation::create(
        &pool,
        emp.id,
        &VacationCreate {
            start_date: date(2024, 5, 10),
            end_date: date(2024, 5, 10),
            requested_days: None,
            reason: None,
        },
    )
    .await;
    assert!(matches!(equal, Err(RepoError::Business(_, _))));

    let inverted = vacation::create(
        &pool,
        emp.id,
        &VacationCreate {
            start_date: date(2024, 5, 10),
            end_date: date(2024, 5, 1),
            requested_days: None,
            reason: None,
        },
    )
    .await;
    assert!(inverted.is_err());
}

#[tokio::test]
async fn balance_is_clamped_never_negative() {
    let (_dir, pool) = setup().await;
    let emp = create_employee(&pool, "11111111-1").await;
    let approver = create_approver(&pool).await;

    // First approved request: 10 days (Jan 1 - Jan 10)
    let first = vacation::create(
        &pool,
        emp.id,
        &VacationCreate {
            start_date: date(2024, 1, 1),
            end_date: date(2024, 1, 10),
            requested_days: None,
            reason: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(first.requested_days, 10);
    vacation::decide(&pool, first.id, leave::DecisionAction::Approve, approver, None)
        .await
        .unwrap();

    let used = vacation::sum_active_days(&pool, emp.id, 2024).await.unwrap();
    assert_eq!(used, 10);
    assert_eq!(leave::remaining(emp.annual_vacation_days, used), 5);

    // Second approved request: 7 days -> 17 used, balance clamps to 0
    let second = vacation::create(
        &pool,
        emp.id,
        &VacationCreate {
            start_date: date(2024, 2, 1),
            end_date: date(2024, 2, 7),
            requested_days: None,
            reason: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(second.requested_days, 7);
    vacation::decide(&pool, second.id, leave::DecisionAction::Approve, approver, None)
        .await
        .unwrap();

    let used = vacation::sum_active_days(&pool, emp.id, 2024).await.unwrap();
    assert_eq!(used, 17);
    assert_eq!(leave::remaining(emp.annual_vacation_days, used), 0);
}

#[tokio::test]
async fn approving_twice_warns_and_keeps_state() {
    let (_dir, pool) = setup().await;
    let emp = create_employee(&pool, "11111111-1").await;
    let approver = create_approver(&pool).await;

    let request = vacation::create(
        &pool,
        emp.id,
        &VacationCreate {
            start_date: date(2024, 3, 4),
            end_date: date(2024, 3, 8),
            requested_days: None,
            reason: None,
        },
    )
    .await
    .unwrap();
    assert!(request.approved_by.is_none());
    assert!(request.approved_at.is_none());

    // First decision applies and records the approver
    let outcome = vacation::decide(
        &pool,
        request.id,
        leave::DecisionAction::Approve,
        approver,
        Some("Enjoy"),
    )
    .await
    .unwrap();
    let approved = match outcome {
        vacation::DecideOutcome::Decided(r) => r,
        vacation::DecideOutcome::AlreadyDecided(_) => panic!("first decision must apply"),
    };
    assert_eq!(approved.status, shared::models::VacationStatus::Approved);
    assert_eq!(approved.approved_by, Some(approver));
    assert!(approved.approved_at.is_some());
    assert_eq!(approved.approval_comment.as_deref(), Some("Enjoy"));

    // Second attempt (either action) is a warning no-op
    let second = vacation::decide(&pool, request.id, leave::DecisionAction::Reject, approver, None)
        .await
        .unwrap();
    match second {
        vacation::DecideOutcome::AlreadyDecided(r) => {
            assert_eq!(r.status, shared::models::VacationStatus::Approved);
            assert_eq!(r.approved_by, Some(approver));
            assert_eq!(r.approval_comment.as_deref(), Some("Enjoy"));
        }
        vacation::DecideOutcome::Decided(_) => panic!("second decision must not apply"),
    }
}

#[tokio::test]
async fn rejected_and_pending_requests_do_not_consume_days() {
    let (_dir, pool) = setup().await;
    let emp = create_employee(&pool, "11111111-1").await;
    let approver = create_approver(&pool).await;

    // Pending: 5 days
    vacation::create(
        &pool,
        emp.id,
        &VacationCreate {
            start_date: date(2024, 1, 1),
            end_date: date(2024, 1, 5),
            requested_days: None,
            reason: None,
        },
    )
    .await
    .unwrap();

    // Rejected: 3 days
    let rejected = vacation::create(
        &pool,
        emp.id,
        &VacationCreate {
            start_date: date(2024, 2, 1),
            end_date: date(2024, 2, 3),
            requested_days: None,
            reason: None,
        },
    )
    .await
    .unwrap();
    vacation::decide(&pool, rejected.id, leave::DecisionAction::Reject, approver, None)
        .await
        .unwrap();

    assert_eq!(vacation::sum_active_days(&pool, emp.id, 2024).await.unwrap(), 0);
}

#[tokio::test]
async fn the_two_usage_aggregates_diverge_on_completed_requests() {
    let (_dir, pool) = setup().await;
    let emp = create_employee(&pool, "11111111-1").await;
    let approver = create_approver(&pool).await;

    // Approved: 4 days
    let approved = vacation::create(
        &pool,
        emp.id,
        &VacationCreate {
            start_date: date(2024, 1, 8),
            end_date: date(2024, 1, 11),
            requested_days: None,
            reason: None,
        },
    )
    .await
    .unwrap();
    vacation::decide(&pool, approved.id, leave::DecisionAction::Approve, approver, None)
        .await
        .unwrap();

    // Completed: 6 days (status written directly; nothing in this core
    // transitions to completed)
    let completed = vacation::create(
        &pool,
        emp.id,
        &VacationCreate {
            start_date: date(2024, 6, 3),
            end_date: date(2024, 6, 8),
            requested_days: None,
            reason: None,
        },
    )
    .await
    .unwrap();
    sqlx::query("UPDATE vacation_request SET status = 'completed' WHERE id = ?")
        .bind(completed.id)
        .execute(&pool)
        .await
        .unwrap();

    // Employee-level balance ignores completed requests
    assert_eq!(vacation::sum_active_days(&pool, emp.id, 2024).await.unwrap(), 4);

    // Request-level aggregate counts completed ones, minus the excluded id
    assert_eq!(
        vacation::sum_counted_days_excluding(&pool, emp.id, 2024, approved.id)
            .await
            .unwrap(),
        6
    );
    assert_eq!(
        vacation::sum_counted_days_excluding(&pool, emp.id, 2024, completed.id)
            .await
            .unwrap(),
        4
    );
    // Excluding an unrelated id counts both
    assert_eq!(
        vacation::sum_counted_days_excluding(&pool, emp.id, 2024, -1)
            .await
            .unwrap(),
        10
    );
}

#[tokio::test]
async fn usage_is_scoped_to_the_start_date_year() {
    let (_dir, pool) = setup().await;
    let emp = create_employee(&pool, "11111111-1").await;
    let approver = create_approver(&pool).await;

    // Approved request starting in 2023
    let last_year = vacation::create(
        &pool,
        emp.id,
        &VacationCreate {
            start_date: date(2023, 12, 27),
            end_date: date(2024, 1, 2),
            requested_days: None,
            reason: None,
        },
    )
    .await
    .unwrap();
    vacation::decide(&pool, last_year.id, leave::DecisionAction::Approve, approver, None)
        .await
        .unwrap();

    assert_eq!(vacation::sum_active_days(&pool, emp.id, 2023).await.unwrap(), 7);
    // The request starts in 2023, so 2024 usage stays empty
    assert_eq!(vacation::sum_active_days(&pool, emp.id, 2024).await.unwrap(), 0);
}

#[tokio::test]
async fn deleting_a_profile_cascades_to_its_requests() {
    let (_dir, pool) = setup().await;
    let emp = create_employee(&pool, "11111111-1").await;

    let request = vacation::create(
        &pool,
        emp.id,
        &VacationCreate {
            start_date: date(2024, 4, 1),
            end_date: date(2024, 4, 3),
            requested_days: None,
            reason: None,
        },
    )
    .await
    .unwrap();

    let mut conn = pool.acquire().await.unwrap();
    assert!(employee::delete(&mut conn, emp.id).await.unwrap());
    drop(conn);

    assert!(vacation::find_by_id(&pool, request.id).await.unwrap().is_none());
}
