//! Document Attachment Model

use serde::{Deserialize, Serialize};

/// Document kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum DocumentKind {
    Cv,
    Contract,
    Annex,
    VacationCertificate,
    Payslip,
    ReprimandLetter,
    Report,
    Severance,
    Identification,
    Other,
}

impl DocumentKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Cv => "Curriculum Vitae",
            Self::Contract => "Contract",
            Self::Annex => "Annex",
            Self::VacationCertificate => "Vacation Certificate",
            Self::Payslip => "Payslip",
            Self::ReprimandLetter => "Reprimand Letter",
            Self::Report => "Report",
            Self::Severance => "Severance",
            Self::Identification => "Identification",
            Self::Other => "Other",
        }
    }
}

/// Document attachment entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct DocumentAttachment {
    pub id: i64,
    pub employee_id: i64,
    pub kind: DocumentKind,
    pub name: String,
    /// Path of the stored file relative to the uploads directory.
    pub stored_file: String,
    pub description: Option<String>,
    pub uploaded_at: i64,
}

/// Create document metadata (the file itself arrives as a multipart part)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentCreate {
    pub kind: DocumentKind,
    pub name: String,
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_serde_uses_snake_case() {
        assert_eq!(
            serde_json::to_string(&DocumentKind::VacationCertificate).unwrap(),
            "\"vacation_certificate\""
        );
        assert_eq!(
            serde_json::from_str::<DocumentKind>("\"payslip\"").unwrap(),
            DocumentKind::Payslip
        );
    }

    #[test]
    fn kind_labels() {
        assert_eq!(DocumentKind::Cv.label(), "Curriculum Vitae");
        assert_eq!(DocumentKind::Severance.label(), "Severance");
    }
}
