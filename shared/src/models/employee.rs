//! Employee Profile Model

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Employee status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum EmployeeStatus {
    Active,
    Inactive,
    OnVacation,
    OnLeave,
    Probation,
}

impl EmployeeStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
            Self::OnVacation => "On Vacation",
            Self::OnLeave => "On Leave",
            Self::Probation => "Probation Period",
        }
    }
}

/// Office location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum Location {
    Santiago,
    Valparaiso,
    Concepcion,
    Antofagasta,
    Temuco,
    Iquique,
    Rancagua,
    Talca,
    Osorno,
    PuertoMontt,
    PuntaArenas,
    Arica,
}

impl Location {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Santiago => "Santiago",
            Self::Valparaiso => "Valparaíso",
            Self::Concepcion => "Concepción",
            Self::Antofagasta => "Antofagasta",
            Self::Temuco => "Temuco",
            Self::Iquique => "Iquique",
            Self::Rancagua => "Rancagua",
            Self::Talca => "Talca",
            Self::Osorno => "Osorno",
            Self::PuertoMontt => "Puerto Montt",
            Self::PuntaArenas => "Punta Arenas",
            Self::Arica => "Arica",
        }
    }
}

/// Department
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum Department {
    Administration,
    Sales,
    Operations,
    Support,
    Marketing,
    HumanResources,
    Finance,
    Logistics,
    It,
    QualityAssurance,
}

impl Department {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Administration => "Administration",
            Self::Sales => "Sales",
            Self::Operations => "Operations",
            Self::Support => "Technical Support",
            Self::Marketing => "Marketing",
            Self::HumanResources => "Human Resources",
            Self::Finance => "Finance",
            Self::Logistics => "Logistics",
            Self::It => "Information Technology",
            Self::QualityAssurance => "Quality Assurance",
        }
    }
}

/// Health insurance affiliation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum HealthInsurance {
    Fonasa,
    Banmedica,
    Colmena,
    Consalud,
    CruzBlanca,
    VidaTres,
}

impl HealthInsurance {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Fonasa => "FONASA",
            Self::Banmedica => "Isapre Banmédica",
            Self::Colmena => "Isapre Colmena",
            Self::Consalud => "Isapre Consalud",
            Self::CruzBlanca => "Isapre Cruz Blanca",
            Self::VidaTres => "Isapre Vida Tres",
        }
    }
}

/// Pension fund affiliation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum PensionFund {
    Capital,
    Provida,
    Habitat,
    PlanVital,
    Cuprum,
    Modelo,
    Uno,
}

impl PensionFund {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Capital => "AFP Capital",
            Self::Provida => "AFP Provida",
            Self::Habitat => "AFP Habitat",
            Self::PlanVital => "AFP PlanVital",
            Self::Cuprum => "AFP Cuprum",
            Self::Modelo => "AFP Modelo",
            Self::Uno => "AFP Uno",
        }
    }
}

/// Employee profile entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct EmployeeProfile {
    pub id: i64,
    /// Linked identity; a profile may exist without a login account.
    pub identity_id: Option<i64>,
    pub employee_code: String,
    pub national_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub birth_date: Option<NaiveDate>,
    pub hire_date: NaiveDate,
    pub position: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub emergency_phone: Option<String>,
    pub emergency_contact: Option<String>,
    pub personal_email: Option<String>,
    pub linkedin_url: Option<String>,
    pub location: Location,
    pub department: Department,
    pub health_insurance: HealthInsurance,
    pub pension_fund: PensionFund,
    pub annual_vacation_days: i64,
    pub photo_file: Option<String>,
    pub favorite_dessert: Option<String>,
    pub notes: Option<String>,
    pub status: EmployeeStatus,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Whole years elapsed from `from` to `today` (birthday-style).
fn years_between(from: NaiveDate, today: NaiveDate) -> i32 {
    let mut years = today.year() - from.year();
    if (today.month(), today.day()) < (from.month(), from.day()) {
        years -= 1;
    }
    years.max(0)
}

impl EmployeeProfile {
    pub fn full_name(&self) -> String {
        let name = format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string();
        if name.is_empty() {
            format!("Employee {}", self.employee_code)
        } else {
            name
        }
    }

    /// Age in whole years as of `today`; 0 when the birth date is unknown.
    pub fn age_on(&self, today: NaiveDate) -> i32 {
        self.birth_date.map_or(0, |born| years_between(born, today))
    }

    pub fn age(&self) -> i32 {
        self.age_on(chrono::Utc::now().date_naive())
    }

    /// Tenure in whole years as of `today`.
    pub fn tenure_years_on(&self, today: NaiveDate) -> i32 {
        years_between(self.hire_date, today)
    }

    pub fn tenure_years(&self) -> i32 {
        self.tenure_years_on(chrono::Utc::now().date_naive())
    }
}

/// Create employee profile payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeCreate {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub national_id: String,
    /// Generated (`SE` + 4-digit sequence) when absent.
    pub employee_code: Option<String>,
    pub birth_date: Option<NaiveDate>,
    /// Defaults to today when absent.
    pub hire_date: Option<NaiveDate>,
    pub position: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub emergency_phone: Option<String>,
    pub emergency_contact: Option<String>,
    pub personal_email: Option<String>,
    pub linkedin_url: Option<String>,
    pub location: Option<Location>,
    pub department: Option<Department>,
    pub health_insurance: Option<HealthInsurance>,
    pub pension_fund: Option<PensionFund>,
    pub annual_vacation_days: Option<i64>,
    pub favorite_dessert: Option<String>,
    pub notes: Option<String>,
    pub status: Option<EmployeeStatus>,
    #[serde(default)]
    pub specialty_ids: Vec<i64>,
}

/// Update employee profile payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub national_id: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub hire_date: Option<NaiveDate>,
    pub position: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub emergency_phone: Option<String>,
    pub emergency_contact: Option<String>,
    pub personal_email: Option<String>,
    pub linkedin_url: Option<String>,
    pub location: Option<Location>,
    pub department: Option<Department>,
    pub health_insurance: Option<HealthInsurance>,
    pub pension_fund: Option<PensionFund>,
    pub annual_vacation_days: Option<i64>,
    pub favorite_dessert: Option<String>,
    pub notes: Option<String>,
    pub status: Option<EmployeeStatus>,
    pub is_active: Option<bool>,
    pub specialty_ids: Option<Vec<i64>>,
}
