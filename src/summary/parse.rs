use super::types::{PatientInfo, Recommendations, SidebarData, SoapNote};
use tracing::warn;

/// Parse a SOAP note out of the backend's labeled free-text response.
///
/// Each section runs from its label to the next expected label (or the end
/// of the text). Labels match case-insensitively. When no label is
/// recognized at all the entire response becomes the subjective section;
/// that fallback keeps unlabeled output visible instead of dropping it,
/// at the cost of masking upstream format drift (logged at warn).
pub fn parse_soap_note(text: &str) -> SoapNote {
    let subjective = section(text, "SUBJECTIVE:", Some("OBJECTIVE:"));
    let objective = section(text, "OBJECTIVE:", Some("ASSESSMENT:"));
    let assessment = section(text, "ASSESSMENT:", Some("PLAN:"));
    let plan = section(text, "PLAN:", None);

    if subjective.is_none() && objective.is_none() && assessment.is_none() && plan.is_none() {
        warn!("No SOAP section labels recognized, treating entire response as subjective");
        return SoapNote {
            subjective: text.trim().to_string(),
            ..SoapNote::default()
        };
    }

    SoapNote {
        subjective: subjective.unwrap_or_default(),
        objective: objective.unwrap_or_default(),
        assessment: assessment.unwrap_or_default(),
        plan: plan.unwrap_or_default(),
    }
}

/// Parse the six labeled recommendation categories. Unrecognized sections
/// come back empty; there is no whole-text fallback here.
pub fn parse_recommendations(text: &str) -> Recommendations {
    Recommendations {
        medications: section(text, "MEDICATIONS:", Some("LIFESTYLE MODIFICATIONS:"))
            .unwrap_or_default(),
        lifestyle: section(text, "LIFESTYLE MODIFICATIONS:", Some("FOLLOW-UP:"))
            .unwrap_or_default(),
        followup: section(text, "FOLLOW-UP:", Some("PATIENT EDUCATION:")).unwrap_or_default(),
        education: section(text, "PATIENT EDUCATION:", Some("DIAGNOSTIC TESTS:"))
            .unwrap_or_default(),
        tests: section(text, "DIAGNOSTIC TESTS:", Some("REFERRALS:")).unwrap_or_default(),
        referrals: section(text, "REFERRALS:", None).unwrap_or_default(),
    }
}

/// Extract the sidebar JSON object from a response that may wrap it in
/// markdown fences or prose: everything from the first `{` to the last `}`
/// is treated as the object. Parse failure degrades to the safe fallback.
pub fn extract_sidebar_json(text: &str, patient: &PatientInfo) -> SidebarData {
    let candidate = match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => text,
    };

    match serde_json::from_str::<SidebarData>(candidate) {
        Ok(data) => data,
        Err(e) => {
            warn!("Failed to parse sidebar JSON from backend response: {}", e);
            SidebarData::fallback(patient)
        }
    }
}

/// The text between `label` and `next_label` (or the end), trimmed.
/// `None` when the label does not occur.
fn section(text: &str, label: &str, next_label: Option<&str>) -> Option<String> {
    let start = find_ignore_ascii_case(text, label)? + label.len();
    let rest = &text[start..];

    let end = next_label
        .and_then(|next| find_ignore_ascii_case(rest, next))
        .unwrap_or(rest.len());

    Some(rest[..end].trim().to_string())
}

/// Byte offset of the first ASCII-case-insensitive occurrence of `needle`
fn find_ignore_ascii_case(haystack: &str, needle: &str) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }

    haystack
        .as_bytes()
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle.as_bytes()))
}
