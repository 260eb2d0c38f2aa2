//! Static reference data and the naive SOAP templating used by the demo
//! endpoints. This duplicates part of the AI flow with fixed logic so the
//! API surface works without backend credentials.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct Icd10Entry {
    pub code: &'static str,
    pub name: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Medication {
    pub name: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct TemplateField {
    pub id: &'static str,
    pub label: &'static str,
}

const ICD10: &[Icd10Entry] = &[
    Icd10Entry { code: "I10", name: "Essential (primary) hypertension" },
    Icd10Entry { code: "E11.9", name: "Type 2 diabetes mellitus without complications" },
    Icd10Entry { code: "R07.9", name: "Chest pain, unspecified" },
    Icd10Entry { code: "J10.1", name: "Influenza with pneumonia" },
    Icd10Entry { code: "R51.9", name: "Headache, unspecified" },
];

const MEDS: &[Medication] = &[
    Medication { name: "Lisinopril 10 mg daily" },
    Medication { name: "Metformin 500 mg BID" },
    Medication { name: "Atorvastatin 20 mg nightly" },
    Medication { name: "Amoxicillin 500 mg TID x7d" },
];

const MAX_RESULTS: usize = 10;

/// Search ICD-10 codes by code or description. Empty queries return
/// nothing rather than the whole catalog.
pub fn search_icd10(query: &str) -> Vec<Icd10Entry> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }

    ICD10
        .iter()
        .filter(|entry| {
            entry.code.to_lowercase().contains(&query)
                || entry.name.to_lowercase().contains(&query)
        })
        .take(MAX_RESULTS)
        .cloned()
        .collect()
}

/// Search the medication catalog by name substring
pub fn search_meds(query: &str) -> Vec<Medication> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }

    MEDS.iter()
        .filter(|med| med.name.to_lowercase().contains(&query))
        .take(MAX_RESULTS)
        .cloned()
        .collect()
}

/// Dynamic intake fields for a chief complaint; unknown complaints get an
/// empty template
pub fn template_fields(chief: &str) -> Vec<TemplateField> {
    let fields: &[TemplateField] = match chief {
        "chest-pain" => &[
            TemplateField { id: "onset", label: "Onset" },
            TemplateField { id: "quality", label: "Quality" },
            TemplateField { id: "radiation", label: "Radiation" },
            TemplateField { id: "triggers", label: "Triggers/Relief" },
            TemplateField { id: "assoc", label: "Associated Sx" },
            TemplateField { id: "duration", label: "Duration" },
        ],
        "headache" => &[
            TemplateField { id: "location", label: "Location" },
            TemplateField { id: "severity", label: "Severity (0-10)" },
            TemplateField { id: "features", label: "Features" },
            TemplateField { id: "redflags", label: "Red Flags" },
        ],
        "fever" => &[
            TemplateField { id: "temp", label: "Max Temp" },
            TemplateField { id: "duration", label: "Duration" },
            TemplateField { id: "focus", label: "Focus" },
            TemplateField { id: "exposure", label: "Exposure" },
        ],
        "physical" => &[
            TemplateField { id: "screenings", label: "Screenings Due" },
            TemplateField { id: "concerns", label: "Patient Concerns" },
        ],
        "diabetes" => &[
            TemplateField { id: "meds", label: "Current Regimen" },
            TemplateField { id: "glucose", label: "Home Glucose" },
            TemplateField { id: "complications", label: "Complications" },
            TemplateField { id: "labs", label: "Recent Labs" },
        ],
        _ => &[],
    };

    fields.to_vec()
}

/// Canned suggestions per clinical context
pub fn suggestions(context: &str) -> Vec<&'static str> {
    match context {
        "diabetes" => vec![
            "Order HbA1c and lipid panel.",
            "Assess hypoglycemia episodes.",
            "Foot exam and retinal screening status.",
        ],
        _ => vec!["No specific suggestions."],
    }
}

// ---- Note templating ----

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteInput {
    pub patient: NotePatient,
    #[serde(default)]
    pub chief_complaint: Option<String>,
    #[serde(default)]
    pub hpi: Option<String>,
    #[serde(default)]
    pub dynamic_fields: Option<Vec<DynamicField>>,
    #[serde(default)]
    pub assessment: Option<String>,
    #[serde(default)]
    pub plan: Option<String>,
    #[serde(default)]
    pub vitals: Option<NoteVitals>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotePatient {
    pub name: String,
    pub mrn: String,
    #[serde(default)]
    pub dob: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DynamicField {
    pub label: String,
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NoteVitals {
    #[serde(default)]
    pub bp: Option<String>,
    #[serde(default)]
    pub hr: Option<String>,
    #[serde(default)]
    pub temp: Option<String>,
    #[serde(default)]
    pub o2: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GeneratedNote {
    pub subjective: String,
    pub objective: String,
    pub assessment: String,
    pub plan: String,
    pub note: String,
}

/// Assemble a SOAP note from structured note input with fixed templating.
/// Sections with no content render as an em dash placeholder.
pub fn generate_note(input: &NoteInput) -> GeneratedNote {
    let cc = input
        .chief_complaint
        .as_deref()
        .filter(|cc| !cc.trim().is_empty())
        .map(|cc| format!("Chief complaint: {}.", cc));

    let hpi = input
        .hpi
        .as_deref()
        .filter(|hpi| !hpi.trim().is_empty())
        .map(|hpi| format!("HPI: {}", hpi));

    let dynamic = input
        .dynamic_fields
        .as_deref()
        .unwrap_or_default()
        .iter()
        .filter_map(|field| {
            let value = field.value.as_deref().unwrap_or("").trim();
            if value.is_empty() {
                None
            } else {
                Some(format!("{}: {}", field.label, value))
            }
        })
        .collect::<Vec<_>>()
        .join("\n");

    let subjective_parts: Vec<String> = [cc, hpi, Some(dynamic)]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect();

    let subjective = if subjective_parts.is_empty() {
        "—".to_string()
    } else {
        subjective_parts.join("\n")
    };

    let vitals = input.vitals.clone().unwrap_or_default();
    let vitals_line = [
        vitals.bp.as_deref().map(|v| format!("BP {}", v)),
        vitals.hr.as_deref().map(|v| format!("HR {}", v)),
        vitals.temp.as_deref().map(|v| format!("Temp {}", v)),
        vitals.o2.as_deref().map(|v| format!("O2 {}", v)),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(", ");

    let objective = if vitals_line.is_empty() {
        "Vitals reviewed. Physical exam documented as above.".to_string()
    } else {
        format!(
            "Vitals reviewed: {}. Physical exam documented as above.",
            vitals_line
        )
    };

    let assessment = input
        .assessment
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("—")
        .to_string();

    let plan = input
        .plan
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("—")
        .to_string();

    let note = format!(
        "Subjective\n{}\n\nObjective\n{}\n\nAssessment\n{}\n\nPlan\n{}",
        subjective, objective, assessment, plan
    );

    GeneratedNote {
        subjective,
        objective,
        assessment,
        plan,
        note,
    }
}
