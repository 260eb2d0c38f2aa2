// Tests for the reference catalogs and the naive SOAP note templating
// behind the demo endpoints.

use smartscribe::http::catalog::{
    generate_note, search_icd10, search_meds, suggestions, template_fields, DynamicField,
    NoteInput, NotePatient, NoteVitals,
};

fn base_input() -> NoteInput {
    NoteInput {
        patient: NotePatient {
            name: "Jane Doe".to_string(),
            mrn: "MRN-1001".to_string(),
            dob: None,
        },
        chief_complaint: None,
        hpi: None,
        dynamic_fields: None,
        assessment: None,
        plan: None,
        vitals: None,
    }
}

#[test]
fn icd10_search_matches_code_and_name() {
    let by_code = search_icd10("i10");
    assert_eq!(by_code.len(), 1);
    assert_eq!(by_code[0].code, "I10");

    let by_name = search_icd10("diabetes");
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0].code, "E11.9");
}

#[test]
fn empty_queries_return_nothing() {
    assert!(search_icd10("").is_empty());
    assert!(search_icd10("   ").is_empty());
    assert!(search_meds("").is_empty());
}

#[test]
fn med_search_is_case_insensitive() {
    let results = search_meds("METFORMIN");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].name, "Metformin 500 mg BID");
}

#[test]
fn known_chief_complaints_have_templates() {
    let fields = template_fields("chest-pain");
    assert_eq!(fields.len(), 6);
    assert_eq!(fields[0].id, "onset");

    assert!(template_fields("unknown-complaint").is_empty());
}

#[test]
fn diabetes_context_gets_specific_suggestions() {
    let diabetes = suggestions("diabetes");
    assert_eq!(diabetes.len(), 3);
    assert!(diabetes[0].contains("HbA1c"));

    assert_eq!(suggestions("anything-else"), vec!["No specific suggestions."]);
}

#[test]
fn note_templating_assembles_all_sections() {
    let input = NoteInput {
        chief_complaint: Some("Chest pain".to_string()),
        hpi: Some("Started two days ago".to_string()),
        dynamic_fields: Some(vec![
            DynamicField {
                label: "Onset".to_string(),
                value: Some("Sudden".to_string()),
            },
            DynamicField {
                label: "Quality".to_string(),
                value: Some("".to_string()), // blank values are dropped
            },
        ]),
        assessment: Some("Likely musculoskeletal".to_string()),
        plan: Some("NSAIDs, follow up in a week".to_string()),
        vitals: Some(NoteVitals {
            bp: Some("120/80".to_string()),
            hr: Some("72".to_string()),
            temp: None,
            o2: None,
        }),
        ..base_input()
    };

    let note = generate_note(&input);

    assert_eq!(
        note.subjective,
        "Chief complaint: Chest pain.\nHPI: Started two days ago\nOnset: Sudden"
    );
    assert_eq!(
        note.objective,
        "Vitals reviewed: BP 120/80, HR 72. Physical exam documented as above."
    );
    assert_eq!(note.assessment, "Likely musculoskeletal");
    assert_eq!(note.plan, "NSAIDs, follow up in a week");
    assert!(note.note.starts_with("Subjective\n"));
    assert!(note.note.contains("\n\nPlan\n"));
}

#[test]
fn empty_note_input_renders_placeholders() {
    let note = generate_note(&base_input());

    assert_eq!(note.subjective, "—");
    assert_eq!(note.assessment, "—");
    assert_eq!(note.plan, "—");
    assert_eq!(
        note.objective,
        "Vitals reviewed. Physical exam documented as above."
    );
}
