//! The output record of a parse call.

use serde::{Deserialize, Serialize};

/// The experience string reported when no valid date range was found.
pub const ZERO_EXPERIENCE: &str = "0 years and 0 months";

/// Extracted personal and contact fields. Individual fields degrade to
/// `None` (or `"Unknown"` for the name) when no heuristic matched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PersonalInfo {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub location: Option<String>,
}

impl Default for PersonalInfo {
    fn default() -> Self {
        Self {
            name: "Unknown".to_string(),
            email: None,
            phone: None,
            linkedin: None,
            github: None,
            location: None,
        }
    }
}

/// The structured result of parsing one resume.
///
/// Always well-formed: the assembler populates it fully on success and
/// produces the fixed fallback shape on any internal failure. Never mutated
/// after being returned.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResumeRecord {
    #[serde(rename = "personalInfo")]
    pub personal_info: PersonalInfo,
    pub skills: Vec<String>,
    pub total_experience: String,
    /// Present only on the fallback path; carries the failure message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Default for ResumeRecord {
    fn default() -> Self {
        Self {
            personal_info: PersonalInfo::default(),
            skills: Vec::new(),
            total_experience: ZERO_EXPERIENCE.to_string(),
            error: None,
        }
    }
}

impl ResumeRecord {
    /// The fixed-shape degraded record returned when the pipeline fails.
    pub fn fallback(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.error.is_some()
    }

    /// Pretty-printed JSON. Serialization of this record cannot fail.
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).expect("record serialization is infallible")
    }
}
