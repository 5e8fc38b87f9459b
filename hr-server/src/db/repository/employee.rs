//! Employee Profile Repository

use super::{RepoError, RepoResult};
use shared::models::{
    Department, EmployeeCreate, EmployeeProfile, EmployeeStatus, EmployeeUpdate, Specialty,
};
use shared::util::{now_millis, snowflake_id};
use sqlx::{SqliteConnection, SqlitePool};

const EMPLOYEE_SELECT: &str = "SELECT id, identity_id, employee_code, national_id, first_name, last_name, email, birth_date, hire_date, position, phone, address, emergency_phone, emergency_contact, personal_email, linkedin_url, location, department, health_insurance, pension_fund, annual_vacation_days, photo_file, favorite_dessert, notes, status, is_active, created_at, updated_at FROM employee_profile";

/// Employee-code prefix; codes render as `SE` + 4-digit zero-padded number.
const CODE_PREFIX: &str = "SE";
/// Numbering restarts here when no prior code can be parsed.
const CODE_BASE: i64 = 1000;

/// List filters (free-text search, status, department, specialty).
#[derive(Debug, Default, Clone)]
pub struct EmployeeFilter {
    pub search: Option<String>,
    pub status: Option<EmployeeStatus>,
    pub department: Option<Department>,
    pub specialty_id: Option<i64>,
}

/// Find all profiles matching the filter, ordered by employee code.
pub async fn find_all(
    pool: &SqlitePool,
    filter: &EmployeeFilter,
) -> RepoResult<Vec<EmployeeProfile>> {
    // Dynamic filter set: placeholders are appended and bound in the same order
    let mut sql = format!("{EMPLOYEE_SELECT} WHERE 1 = 1");
    if filter.search.is_some() {
        sql.push_str(" AND (first_name LIKE ? OR last_name LIKE ? OR employee_code LIKE ?)");
    }
    if filter.status.is_some() {
        sql.push_str(" AND status = ?");
    }
    if filter.department.is_some() {
        sql.push_str(" AND department = ?");
    }
    if filter.specialty_id.is_some() {
        sql.push_str(
            " AND EXISTS (SELECT 1 FROM employee_specialty es WHERE es.employee_id = employee_profile.id AND es.specialty_id = ?)",
        );
    }
    sql.push_str(" ORDER BY employee_code");

    let mut query = sqlx::query_as::<_, EmployeeProfile>(&sql);
    if let Some(search) = &filter.search {
        let pattern = format!("%{search}%");
        query = query.bind(pattern.clone()).bind(pattern.clone()).bind(pattern);
    }
    if let Some(status) = filter.status {
        query = query.bind(status);
    }
    if let Some(department) = filter.department {
        query = query.bind(department);
    }
    if let Some(specialty_id) = filter.specialty_id {
        query = query.bind(specialty_id);
    }

    let rows = query.fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<EmployeeProfile>> {
    let sql = format!("{EMPLOYEE_SELECT} WHERE id = ?");
    let profile = sqlx::query_as::<_, EmployeeProfile>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(profile)
}

/// `find_by_id` over an explicit connection (usable inside transactions).
pub async fn find_by_id_conn(
    conn: &mut SqliteConnection,
    id: i64,
) -> RepoResult<Option<EmployeeProfile>> {
    let sql = format!("{EMPLOYEE_SELECT} WHERE id = ?");
    let profile = sqlx::query_as::<_, EmployeeProfile>(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(profile)
}

pub async fn find_by_identity(
    pool: &SqlitePool,
    identity_id: i64,
) -> RepoResult<Option<EmployeeProfile>> {
    let sql = format!("{EMPLOYEE_SELECT} WHERE identity_id = ? LIMIT 1");
    let profile = sqlx::query_as::<_, EmployeeProfile>(&sql)
        .bind(identity_id)
        .fetch_optional(pool)
        .await?;
    Ok(profile)
}

/// Most recently created profile, by internal id ordering (not by code).
async fn find_latest(conn: &mut SqliteConnection) -> RepoResult<Option<EmployeeProfile>> {
    let sql = format!("{EMPLOYEE_SELECT} ORDER BY id DESC LIMIT 1");
    let profile = sqlx::query_as::<_, EmployeeProfile>(&sql)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(profile)
}

/// Compute the code following `last_code`.
///
/// A prior `SE<digits>` code increments its numeric suffix; anything else
/// (no prior profile, foreign prefix, unparsable suffix) restarts at 1000.
fn next_code_after(last_code: Option<&str>) -> String {
    let next = last_code
        .and_then(|code| code.strip_prefix(CODE_PREFIX))
        .and_then(|suffix| suffix.parse::<i64>().ok())
        .map(|n| n + 1)
        .unwrap_or(CODE_BASE);
    format!("{CODE_PREFIX}{next:04}")
}

/// Next employee code, advisory only: concurrent creations may produce the
/// same candidate, in which case the unique constraint on `employee_code`
/// rejects the second insert (no retry).
pub async fn next_employee_code(conn: &mut SqliteConnection) -> RepoResult<String> {
    let latest = find_latest(&mut *conn).await?;
    Ok(next_code_after(latest.as_ref().map(|p| p.employee_code.as_str())))
}

/// Insert a new profile. The caller supplies the employee code (explicit or
/// generated) and runs inside a transaction together with identity creation.
pub async fn create(
    conn: &mut SqliteConnection,
    data: &EmployeeCreate,
    employee_code: &str,
    identity_id: Option<i64>,
) -> RepoResult<EmployeeProfile> {
    let id = snowflake_id();
    let now = now_millis();
    let hire_date = data
        .hire_date
        .unwrap_or_else(|| chrono::Utc::now().date_naive());

    sqlx::query(
        "INSERT INTO employee_profile (
            id, identity_id, employee_code, national_id, first_name, last_name, email,
            birth_date, hire_date, position, phone, address, emergency_phone,
            emergency_contact, personal_email, linkedin_url, location, department,
            health_insurance, pension_fund, annual_vacation_days, favorite_dessert,
            notes, status, is_active, created_at, updated_at
        ) VALUES (
            ?1, ?2, ?3, ?4, ?5, ?6, ?7,
            ?8, ?9, ?10, ?11, ?12, ?13,
            ?14, ?15, ?16, ?17, ?18,
            ?19, ?20, ?21, ?22,
            ?23, ?24, 1, ?25, ?25
        )",
    )
    .bind(id)
    .bind(identity_id)
    .bind(employee_code)
    .bind(&data.national_id)
    .bind(&data.first_name)
    .bind(&data.last_name)
    .bind(&data.email)
    .bind(data.birth_date)
    .bind(hire_date)
    .bind(&data.position)
    .bind(&data.phone)
    .bind(&data.address)
    .bind(&data.emergency_phone)
    .bind(&data.emergency_contact)
    .bind(&data.personal_email)
    .bind(&data.linkedin_url)
    .bind(data.location.unwrap_or(shared::models::Location::Santiago))
    .bind(data.department.unwrap_or(Department::Operations))
    .bind(
        data.health_insurance
            .unwrap_or(shared::models::HealthInsurance::Fonasa),
    )
    .bind(
        data.pension_fund
            .unwrap_or(shared::models::PensionFund::Capital),
    )
    .bind(data.annual_vacation_days.unwrap_or(15))
    .bind(&data.favorite_dessert)
    .bind(&data.notes)
    .bind(data.status.unwrap_or(EmployeeStatus::Active))
    .bind(now)
    .execute(&mut *conn)
    .await?;

    let sql = format!("{EMPLOYEE_SELECT} WHERE id = ?");
    sqlx::query_as::<_, EmployeeProfile>(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create employee profile".into()))
}

/// Update a profile; absent fields keep their current values.
pub async fn update(
    conn: &mut SqliteConnection,
    id: i64,
    data: &EmployeeUpdate,
) -> RepoResult<EmployeeProfile> {
    let now = now_millis();
    let rows = sqlx::query(
        "UPDATE employee_profile SET
            first_name = COALESCE(?1, first_name),
            last_name = COALESCE(?2, last_name),
            email = COALESCE(?3, email),
            national_id = COALESCE(?4, national_id),
            birth_date = COALESCE(?5, birth_date),
            hire_date = COALESCE(?6, hire_date),
            position = COALESCE(?7, position),
            phone = COALESCE(?8, phone),
            address = COALESCE(?9, address),
            emergency_phone = COALESCE(?10, emergency_phone),
            emergency_contact = COALESCE(?11, emergency_contact),
            personal_email = COALESCE(?12, personal_email),
            linkedin_url = COALESCE(?13, linkedin_url),
            location = COALESCE(?14, location),
            department = COALESCE(?15, department),
            health_insurance = COALESCE(?16, health_insurance),
            pension_fund = COALESCE(?17, pension_fund),
            annual_vacation_days = COALESCE(?18, annual_vacation_days),
            favorite_dessert = COALESCE(?19, favorite_dessert),
            notes = COALESCE(?20, notes),
            status = COALESCE(?21, status),
            is_active = COALESCE(?22, is_active),
            updated_at = ?23
        WHERE id = ?24",
    )
    .bind(&data.first_name)
    .bind(&data.last_name)
    .bind(&data.email)
    .bind(&data.national_id)
    .bind(data.birth_date)
    .bind(data.hire_date)
    .bind(&data.position)
    .bind(&data.phone)
    .bind(&data.address)
    .bind(&data.emergency_phone)
    .bind(&data.emergency_contact)
    .bind(&data.personal_email)
    .bind(&data.linkedin_url)
    .bind(data.location)
    .bind(data.department)
    .bind(data.health_insurance)
    .bind(data.pension_fund)
    .bind(data.annual_vacation_days)
    .bind(&data.favorite_dessert)
    .bind(&data.notes)
    .bind(data.status)
    .bind(data.is_active)
    .bind(now)
    .bind(id)
    .execute(&mut *conn)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Employee {id} not found")));
    }

    let sql = format!("{EMPLOYEE_SELECT} WHERE id = ?");
    sqlx::query_as::<_, EmployeeProfile>(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Employee {id} not found")))
}

/// Link a profile to its identity record.
pub async fn link_identity(
    conn: &mut SqliteConnection,
    id: i64,
    identity_id: i64,
) -> RepoResult<()> {
    let now = now_millis();
    sqlx::query("UPDATE employee_profile SET identity_id = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(identity_id)
        .bind(now)
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Store the profile-photo file reference.
pub async fn set_photo_file(pool: &SqlitePool, id: i64, photo_file: &str) -> RepoResult<()> {
    let now = now_millis();
    let rows =
        sqlx::query("UPDATE employee_profile SET photo_file = ?1, updated_at = ?2 WHERE id = ?3")
            .bind(photo_file)
            .bind(now)
            .bind(id)
            .execute(pool)
            .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Employee {id} not found")));
    }
    Ok(())
}

/// Replace the profile's specialty attachments (unordered many-to-many).
pub async fn set_specialties(
    conn: &mut SqliteConnection,
    employee_id: i64,
    specialty_ids: &[i64],
) -> RepoResult<()> {
    sqlx::query("DELETE FROM employee_specialty WHERE employee_id = ?")
        .bind(employee_id)
        .execute(&mut *conn)
        .await?;
    for specialty_id in specialty_ids {
        sqlx::query(
            "INSERT OR IGNORE INTO employee_specialty (employee_id, specialty_id) VALUES (?, ?)",
        )
        .bind(employee_id)
        .bind(specialty_id)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

/// Specialties attached to a profile.
pub async fn find_specialties(pool: &SqlitePool, employee_id: i64) -> RepoResult<Vec<Specialty>> {
    let rows = sqlx::query_as::<_, Specialty>(
        "SELECT s.id, s.name, s.description, s.is_active FROM specialty s JOIN employee_specialty es ON es.specialty_id = s.id WHERE es.employee_id = ? ORDER BY s.name",
    )
    .bind(employee_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Hard delete a profile. Vacation requests and documents cascade.
pub async fn delete(conn: &mut SqliteConnection, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM employee_profile WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(rows.rows_affected() > 0)
}
