// Tests for the summarization response parsers: SOAP sections,
// recommendation categories, and the sidebar JSON extraction fallback.

use smartscribe::session::TranscriptSegment;
use smartscribe::summary::{
    extract_sidebar_json, format_transcript, parse_recommendations, parse_soap_note, PatientInfo,
};

fn patient() -> PatientInfo {
    PatientInfo {
        name: Some("Jane Doe".to_string()),
        mrn: Some("MRN-1001".to_string()),
    }
}

#[test]
fn soap_sections_parse_in_order() {
    let text = "SUBJECTIVE:\nHeadache for three days.\n\n\
                OBJECTIVE:\nBP 120/80.\n\n\
                ASSESSMENT:\nTension headache.\n\n\
                PLAN:\nIbuprofen as needed.";

    let note = parse_soap_note(text);

    assert_eq!(note.subjective, "Headache for three days.");
    assert_eq!(note.objective, "BP 120/80.");
    assert_eq!(note.assessment, "Tension headache.");
    assert_eq!(note.plan, "Ibuprofen as needed.");
}

#[test]
fn soap_labels_match_case_insensitively() {
    let text = "subjective: feels tired\nobjective: unremarkable\n\
                assessment: fatigue\nplan: rest";

    let note = parse_soap_note(text);

    assert_eq!(note.subjective, "feels tired");
    assert_eq!(note.plan, "rest");
}

#[test]
fn missing_soap_sections_come_back_empty() {
    let text = "SUBJECTIVE:\nChest pain.\n\nPLAN:\nECG today.";

    let note = parse_soap_note(text);

    // Subjective runs to the next *expected* label; with OBJECTIVE absent
    // it absorbs the rest up to nothing, mirroring the section scheme.
    assert!(note.subjective.contains("Chest pain."));
    assert_eq!(note.objective, "");
    assert_eq!(note.assessment, "");
    assert_eq!(note.plan, "ECG today.");
}

#[test]
fn unlabeled_soap_response_falls_back_to_subjective() {
    let text = "The patient reports a mild headache and was advised rest.";

    let note = parse_soap_note(text);

    assert_eq!(note.subjective, text);
    assert_eq!(note.objective, "");
    assert_eq!(note.assessment, "");
    assert_eq!(note.plan, "");
}

#[test]
fn recommendations_parse_all_six_categories() {
    let text = "MEDICATIONS:\nLisinopril 10mg daily.\n\n\
                LIFESTYLE MODIFICATIONS:\n30 minutes walking daily.\n\n\
                FOLLOW-UP:\nReturn in 3 months.\n\n\
                PATIENT EDUCATION:\nMedication adherence.\n\n\
                DIAGNOSTIC TESTS:\nLipid panel and HbA1c.\n\n\
                REFERRALS:\nNone needed.";

    let recs = parse_recommendations(text);

    assert_eq!(recs.medications, "Lisinopril 10mg daily.");
    assert_eq!(recs.lifestyle, "30 minutes walking daily.");
    assert_eq!(recs.followup, "Return in 3 months.");
    assert_eq!(recs.education, "Medication adherence.");
    assert_eq!(recs.tests, "Lipid panel and HbA1c.");
    assert_eq!(recs.referrals, "None needed.");
}

#[test]
fn unlabeled_recommendations_stay_empty() {
    let recs = parse_recommendations("Nothing matching the expected format.");

    assert_eq!(recs.medications, "");
    assert_eq!(recs.referrals, "");
}

#[test]
fn sidebar_json_parses_from_a_clean_object() {
    let text = r#"{
        "demographics": {"name": "Jane Doe", "mrn": "MRN-1001", "gender": "Female"},
        "chief_complaint": "headache",
        "allergies": ["penicillin"],
        "suggested_icd10": ["R51.9"]
    }"#;

    let data = extract_sidebar_json(text, &patient());

    assert_eq!(data.demographics.name.as_deref(), Some("Jane Doe"));
    assert_eq!(data.demographics.gender, "Female");
    assert_eq!(data.chief_complaint, "headache");
    assert_eq!(data.allergies, vec!["penicillin"]);
    assert_eq!(data.suggested_icd10, vec!["R51.9"]);
}

#[test]
fn sidebar_json_is_extracted_from_markdown_wrapping() {
    let text = "Here is the data you asked for:\n```json\n\
                {\"chief_complaint\": \"chest pain\", \"medications\": [\"aspirin\"]}\n\
                ```";

    let data = extract_sidebar_json(text, &patient());

    assert_eq!(data.chief_complaint, "chest pain");
    assert_eq!(data.medications, vec!["aspirin"]);
}

#[test]
fn unparseable_sidebar_response_degrades_to_fallback() {
    let data = extract_sidebar_json("I'm sorry, I cannot do that.", &patient());

    assert_eq!(data.demographics.name.as_deref(), Some("Jane Doe"));
    assert_eq!(data.demographics.mrn.as_deref(), Some("MRN-1001"));
    assert_eq!(data.demographics.gender, "Unknown");
    assert!(data.allergies.is_empty());
    assert!(data.care_gaps.is_empty());
}

#[test]
fn partial_sidebar_objects_fill_missing_fields_with_defaults() {
    let data = extract_sidebar_json(r#"{"chief_complaint": "fever"}"#, &patient());

    assert_eq!(data.chief_complaint, "fever");
    assert!(data.vitals.heart_rate.is_none());
    assert!(data.active_problems.is_empty());
}

#[test]
fn transcript_formatting_for_prompts() {
    let transcript = vec![
        TranscriptSegment {
            speaker: "Doctor".to_string(),
            text: "What brings you in?".to_string(),
            timestamp: "00:03".to_string(),
            is_final: true,
            confidence: 0.97,
        },
        TranscriptSegment {
            speaker: "Patient".to_string(),
            text: "A headache.".to_string(),
            timestamp: "00:07".to_string(),
            is_final: true,
            confidence: 0.92,
        },
    ];

    assert_eq!(
        format_transcript(&transcript),
        "[00:03] Doctor: What brings you in?\n[00:07] Patient: A headache."
    );
}
