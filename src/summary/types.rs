use serde::{Deserialize, Serialize};

/// Patient context passed along to the summarization backend and the
/// export document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatientInfo {
    pub name: Option<String>,
    pub mrn: Option<String>,
}

/// A four-section clinical note (Subjective, Objective, Assessment, Plan)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SoapNote {
    pub subjective: String,
    pub objective: String,
    pub assessment: String,
    pub plan: String,
}

/// Brief clinical recommendations, one short entry per category
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recommendations {
    pub medications: String,
    pub lifestyle: String,
    pub followup: String,
    pub education: String,
    pub tests: String,
    pub referrals: String,
}

/// Structured sidebar extraction returned by the backend as a single JSON
/// object. Every field defaults so a partial object still parses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SidebarData {
    #[serde(default)]
    pub demographics: Demographics,
    #[serde(default)]
    pub chief_complaint: String,
    #[serde(default)]
    pub vitals: Vitals,
    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(default)]
    pub medications: Vec<String>,
    #[serde(default)]
    pub active_problems: Vec<ActiveProblem>,
    #[serde(default)]
    pub care_gaps: Vec<CareGap>,
    #[serde(default)]
    pub suggested_icd10: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Demographics {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub mrn: Option<String>,
    #[serde(default)]
    pub dob: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default = "unknown_gender")]
    pub gender: String,
}

impl Default for Demographics {
    fn default() -> Self {
        Self {
            name: None,
            mrn: None,
            dob: None,
            age: None,
            gender: unknown_gender(),
        }
    }
}

fn unknown_gender() -> String {
    "Unknown".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Vitals {
    #[serde(default)]
    pub bp_systolic: Option<u32>,
    #[serde(default)]
    pub bp_diastolic: Option<u32>,
    #[serde(default)]
    pub heart_rate: Option<u32>,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub temperature_unit: String,
    #[serde(default)]
    pub o2_saturation: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActiveProblem {
    #[serde(default)]
    pub condition: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CareGap {
    #[serde(default)]
    pub issue: String,
    #[serde(default)]
    pub severity: String,
    #[serde(default)]
    pub due_date: Option<String>,
}

impl SidebarData {
    /// Safe fallback when the backend's response cannot be parsed: carry
    /// over what we already know about the patient, leave the rest empty
    pub fn fallback(patient: &PatientInfo) -> Self {
        Self {
            demographics: Demographics {
                name: patient.name.clone(),
                mrn: patient.mrn.clone(),
                ..Demographics::default()
            },
            ..Self::default()
        }
    }
}
