//! Employee profile lifecycle integration tests: code generation, identity
//! sync, specialties, cascades.

use sqlx::SqlitePool;

use hr_server::db::DbService;
use hr_server::db::repository::{RepoError, employee, identity, specialty, vacation};
use hr_server::services::identity_sync::{self, SyncOutcome};
use shared::models::{
    EmployeeCreate, EmployeeProfile, EmployeeUpdate, IdentityCreate, SpecialtyCreate,
};

async fn setup() -> (tempfile::TempDir, SqlitePool) {
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir.path().join("hr.db");
    let service = DbService::new(&db_path.to_string_lossy())
        .await
        .expect("database init");
    (dir, service.pool)
}

fn payload(national_id: &str, email: &str) -> EmployeeCreate {
    EmployeeCreate {
        first_name: "Juan".into(),
        last_name: "Soto".into(),
        email: email.into(),
        national_id: national_id.into(),
        employee_code: None,
        birth_date: None,
        hire_date: None,
        position: Some("Field Technician".into()),
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
        annual_vacation_days: None,
        favorite_dessert: None,
        notes: None,
        status: None,
        specialty_ids: vec![],
    }
}

/// Create a profile the way the handler does: generated code, then an
/// explicit identity sync, all on one connection.
async fn create_with_sync(pool: &SqlitePool, national_id: &str, email: &str) -> EmployeeProfile {
    // Snowflake IDs only order across milliseconds; space the inserts so
    // "latest profile" is deterministic for the code generator.
    tokio::time::sleep(std::time::Duration::from_millis(2)).await;
    let mut conn = pool.acquire().await.unwrap();
    let code = employee::next_employee_code(&mut conn).await.unwrap();
    let profile = employee::create(&mut conn, &payload(national_id, email), &code, None)
        .await
        .unwrap();
    identity_sync::sync_profile_identity(&mut conn, &profile)
        .await
        .unwrap();
    drop(conn);
    employee::find_by_id(pool, profile.id).await.unwrap().unwrap()
}

#[tokio::test]
async fn employee_codes_start_at_se1000_and_increment() {
    let (_dir, pool) = setup().await;

    let first = create_with_sync(&pool, "11111111-1", "").await;
    assert_eq!(first.employee_code, "SE1000");

    let second = create_with_sync(&pool, "22222222-2", "").await;
    assert_eq!(second.employee_code, "SE1001");

    let third = create_with_sync(&pool, "33333333-3", "").await;
    assert_eq!(third.employee_code, "SE1002");
}

#[tokio::test]
async fn unparsable_latest_code_restarts_numbering() {
    let (_dir, pool) = setup().await;

    // Latest profile carries a hand-assigned, foreign-format code
    let mut conn = pool.acquire().await.unwrap();
    employee::create(&mut conn, &payload("11111111-1", ""), "LEGACY-7", None)
        .await
        .unwrap();

    let next = employee::next_employee_code(&mut conn).await.unwrap();
    assert_eq!(next, "SE1000");
}

#[tokio::test]
async fn duplicate_codes_are_rejected_by_the_unique_constraint() {
    let (_dir, pool) = setup().await;

    let mut conn = pool.acquire().await.unwrap();
    employee::create(&mut conn, &payload("11111111-1", ""), "SE1000", None)
        .await
        .unwrap();

    // Simulates the generator race: same candidate code, second insert loses
    let result = employee::create(&mut conn, &payload("22222222-2", ""), "SE1000", None).await;
    assert!(matches!(result, Err(RepoError::Duplicate(_))));
}

#[tokio::test]
async fn duplicate_national_ids_are_rejected() {
    let (_dir, pool) = setup().await;

    let mut conn = pool.acquire().await.unwrap();
    employee::create(&mut conn, &payload("11111111-1", ""), "SE1000", None)
        .await
        .unwrap();
    let result = employee::create(&mut conn, &payload("11111111-1", ""), "SE1001", None).await;
    assert!(matches!(result, Err(RepoError::Duplicate(_))));
}

#[tokio::test]
async fn profile_with_email_gets_an_identity_with_unusable_credential() {
    let (_dir, pool) = setup().await;

    let profile = create_with_sync(&pool, "11111111-1", "jsoto@example.com").await;
    let identity_id = profile.identity_id.expect("identity should be linked");

    let account = identity::find_by_id(&pool, identity_id).await.unwrap().unwrap();
    assert_eq!(account.username, "jsoto");
    assert_eq!(account.email, "jsoto@example.com");
    assert_eq!(account.first_name, "Juan");
    assert_eq!(account.last_name, "Soto");
    assert!(account.has_unusable_credential());
}

#[tokio::test]
async fn taken_usernames_are_disambiguated_with_suffixes() {
    let (_dir, pool) = setup().await;

    // jdoe already exists in the identity system
    let mut conn = pool.acquire().await.unwrap();
    identity::create(
        &mut conn,
        IdentityCreate {
            username: "jdoe".into(),
            email: "old.jdoe@example.com".into(),
            first_name: "Old".into(),
            last_name: "Doe".into(),
            password: Some("old-pass".into()),
        },
    )
    .await
    .unwrap();
    drop(conn);

    // New profile derives the same local part: no uniqueness failure
    let profile = create_with_sync(&pool, "11111111-1", "jdoe@corp.cl").await;
    let account = identity::find_by_id(&pool, profile.identity_id.unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(account.username, "jdoe_1");

    // And a third takes the next suffix
    let profile2 = create_with_sync(&pool, "22222222-2", "jdoe@elsewhere.cl").await;
    let account2 = identity::find_by_id(&pool, profile2.identity_id.unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(account2.username, "jdoe_2");
}

#[tokio::test]
async fn sync_fills_only_empty_identity_fields_and_forces_reset() {
    let (_dir, pool) = setup().await;

    // Identity with its own last name and a usable password
    let mut conn = pool.acquire().await.unwrap();
    let account = identity::create(
        &mut conn,
        IdentityCreate {
            username: "msilva".into(),
            email: String::new(),
            first_name: String::new(),
            last_name: "Silva-Perez".into(),
            password: Some("their-own-pass".into()),
        },
    )
    .await
    .unwrap();

    let mut data = payload("11111111-1", "msilva@example.com");
    data.first_name = "Maria".into();
    data.last_name = "Silva".into();
    let profile = employee::create(&mut conn, &data, "SE1000", Some(account.id))
        .await
        .unwrap();

    let outcome = identity_sync::sync_profile_identity(&mut conn, &profile)
        .await
        .unwrap();
    let synced = match outcome {
        SyncOutcome::Updated(i) => i,
        other => panic!("expected update, got {other:?}"),
    };

    // Empty fields filled from the profile, populated ones preserved
    assert_eq!(synced.first_name, "Maria");
    assert_eq!(synced.last_name, "Silva-Perez");
    assert_eq!(synced.email, "msilva@example.com");
    // HR edits always force a credential reset
    assert!(synced.has_unusable_credential());
}

#[tokio::test]
async fn sync_without_identity_or_email_is_skipped() {
    let (_dir, pool) = setup().await;

    let mut conn = pool.acquire().await.unwrap();
    let profile = employee::create(&mut conn, &payload("11111111-1", ""), "SE1000", None)
        .await
        .unwrap();
    let outcome = identity_sync::sync_profile_identity(&mut conn, &profile)
        .await
        .unwrap();
    assert!(matches!(outcome, SyncOutcome::Skipped));

    let reloaded = employee::find_by_id_conn(&mut conn, profile.id)
        .await
        .unwrap()
        .unwrap();
    assert!(reloaded.identity_id.is_none());
}

#[tokio::test]
async fn deleting_the_identity_cascades_to_the_profile() {
    let (_dir, pool) = setup().await;

    let profile = create_with_sync(&pool, "11111111-1", "cascade@example.com").await;
    let identity_id = profile.identity_id.unwrap();

    // A vacation request that must disappear with the profile
    let request = vacation::create(
        &pool,
        profile.id,
        &shared::models::VacationCreate {
            start_date: chrono::NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
            end_date: chrono::NaiveDate::from_ymd_opt(2024, 7, 5).unwrap(),
            requested_days: None,
            reason: None,
        },
    )
    .await
    .unwrap();

    let mut conn = pool.acquire().await.unwrap();
    assert!(identity::delete(&mut conn, identity_id).await.unwrap());
    drop(conn);

    assert!(employee::find_by_id(&pool, profile.id).await.unwrap().is_none());
    assert!(vacation::find_by_id(&pool, request.id).await.unwrap().is_none());
    assert!(identity::find_by_id(&pool, identity_id).await.unwrap().is_none());
}

#[tokio::test]
async fn update_coalesces_absent_fields() {
    let (_dir, pool) = setup().await;

    let profile = create_with_sync(&pool, "11111111-1", "").await;

    let mut conn = pool.acquire().await.unwrap();
    let update = EmployeeUpdate {
        first_name: None,
        last_name: None,
        email: None,
        national_id: None,
        birth_date: None,
        hire_date: None,
        position: Some("Senior Technician".into()),
        phone: Some("+56 9 1234 5678".into()),
        address: None,
        emergency_phone: None,
        emergency_contact: None,
        personal_email: None,
        linkedin_url: None,
        location: None,
        department: None,
        health_insurance: None,
        pension_fund: None,
        annual_vacation_days: Some(20),
        favorite_dessert: None,
        notes: None,
        status: Some(shared::models::EmployeeStatus::Probation),
        is_active: None,
        specialty_ids: None,
    };
    let updated = employee::update(&mut conn, profile.id, &update).await.unwrap();

    assert_eq!(updated.first_name, "Juan");
    assert_eq!(updated.position.as_deref(), Some("Senior Technician"));
    assert_eq!(updated.annual_vacation_days, 20);
    assert_eq!(updated.status, shared::models::EmployeeStatus::Probation);
    assert_eq!(updated.employee_code, profile.employee_code);
}

#[tokio::test]
async fn specialties_attach_filter_and_refuse_in_use_deletes() {
    let (_dir, pool) = setup().await;

    let welding = specialty::create(
        &pool,
        SpecialtyCreate {
            name: "Welding".into(),
            description: None,
        },
    )
    .await
    .unwrap();
    let electrical = specialty::create(
        &pool,
        SpecialtyCreate {
            name: "Electrical".into(),
            description: Some("High/low voltage".into()),
        },
    )
    .await
    .unwrap();

    let profile = create_with_sync(&pool, "11111111-1", "").await;
    let other = create_with_sync(&pool, "22222222-2", "").await;

    let mut conn = pool.acquire().await.unwrap();
    employee::set_specialties(&mut conn, profile.id, &[welding.id, electrical.id])
        .await
        .unwrap();
    employee::set_specialties(&mut conn, other.id, &[electrical.id])
        .await
        .unwrap();
    drop(conn);

    let attached = employee::find_specialties(&pool, profile.id).await.unwrap();
    assert_eq!(attached.len(), 2);

    // Specialty filter narrows the list
    let filter = employee::EmployeeFilter {
        specialty_id: Some(welding.id),
        ..Default::default()
    };
    let welders = employee::find_all(&pool, &filter).await.unwrap();
    assert_eq!(welders.len(), 1);
    assert_eq!(welders[0].id, profile.id);

    // Attached specialties cannot be hard-deleted
    let result = specialty::delete(&pool, welding.id).await;
    assert!(matches!(result, Err(RepoError::Business(_, _))));

    // Deactivation is the supported path
    let deactivated = specialty::update(
        &pool,
        welding.id,
        shared::models::SpecialtyUpdate {
            name: None,
            description: None,
            is_active: Some(false),
        },
    )
    .await
    .unwrap();
    assert!(!deactivated.is_active);
    assert!(
        specialty::find_all(&pool)
            .await
            .unwrap()
            .iter()
            .all(|s| s.id != welding.id)
    );

    // Duplicate names are refused
    let dup = specialty::create(
        &pool,
        SpecialtyCreate {
            name: "Electrical".into(),
            description: None,
        },
    )
    .await;
    assert!(matches!(dup, Err(RepoError::Business(_, _))));
}

#[tokio::test]
async fn list_filters_combine_search_status_and_department() {
    let (_dir, pool) = setup().await;

    let mut conn = pool.acquire().await.unwrap();
    let mut a = payload("11111111-1", "");
    a.first_name = "Carla".into();
    a.last_name = "Mendoza".into();
    a.department = Some(shared::models::Department::Finance);
    employee::create(&mut conn, &a, "SE1000", None).await.unwrap();

    let mut b = payload("22222222-2", "");
    b.first_name = "Carlos".into();
    b.last_name = "Vera".into();
    b.status = Some(shared::models::EmployeeStatus::Inactive);
    employee::create(&mut conn, &b, "SE1001", None).await.unwrap();
    drop(conn);

    // Free-text over names
    let by_name = employee::find_all(
        &pool,
        &employee::EmployeeFilter {
            search: Some("carl".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(by_name.len(), 2);

    // Free-text over the code
    let by_code = employee::find_all(
        &pool,
        &employee::EmployeeFilter {
            search: Some("SE1001".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(by_code.len(), 1);
    assert_eq!(by_code[0].last_name, "Vera");

    // Status + department narrow further
    let finance = employee::find_all(
        &pool,
        &employee::EmployeeFilter {
            department: Some(shared::models::Department::Finance),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(finance.len(), 1);
    assert_eq!(finance[0].last_name, "Mendoza");

    let inactive = employee::find_all(
        &pool,
        &employee::EmployeeFilter {
            status: Some(shared::models::EmployeeStatus::Inactive),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(inactive.len(), 1);
    assert_eq!(inactive[0].last_name, "Vera");
}
