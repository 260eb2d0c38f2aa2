use super::parse::{extract_sidebar_json, parse_recommendations, parse_soap_note};
use super::types::{PatientInfo, Recommendations, SidebarData, SoapNote};
use crate::config::SummarySettings;
use crate::session::TranscriptSegment;
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tracing::info;

/// Client for the summarization backend (a Gemini-style `generateContent`
/// HTTP API). Prompt text is kept deliberately plain; the contract that
/// matters is the labeled-section / single-JSON-object response formats
/// the parsers expect.
pub struct SummaryClient {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

impl SummaryClient {
    pub fn new(settings: &SummarySettings) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: settings.api_url.clone(),
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
        }
    }

    /// Generate a SOAP note from a finalized transcript
    pub async fn generate_soap_note(
        &self,
        transcript: &[TranscriptSegment],
        patient: &PatientInfo,
    ) -> Result<SoapNote> {
        if transcript.is_empty() {
            bail!("No transcript available to summarize");
        }

        let conversation = format_transcript(transcript);
        let prompt = format!(
            "You are a medical documentation assistant. Based on the following \
             doctor-patient conversation, generate a SOAP note in professional \
             medical format.\n\n\
             Patient: {}\nMRN: {}\n\n\
             Conversation transcript:\n{}\n\n\
             Include only information explicitly mentioned in the conversation. \
             If a section has no relevant information, write \"Not documented in \
             this visit\".\n\n\
             Format your response exactly as:\n\n\
             SUBJECTIVE:\n[findings]\n\nOBJECTIVE:\n[findings]\n\n\
             ASSESSMENT:\n[assessment]\n\nPLAN:\n[plan]",
            patient.name.as_deref().unwrap_or("Not provided"),
            patient.mrn.as_deref().unwrap_or("Not provided"),
            conversation,
        );

        let response = self.generate(&prompt).await?;
        Ok(parse_soap_note(&response))
    }

    /// Generate brief clinical recommendations from the transcript and an
    /// already-generated SOAP note
    pub async fn generate_recommendations(
        &self,
        transcript: &[TranscriptSegment],
        soap: &SoapNote,
        patient: &PatientInfo,
    ) -> Result<Recommendations> {
        if transcript.is_empty() {
            bail!("No transcript available to summarize");
        }

        let conversation = format_transcript(transcript);
        let prompt = format!(
            "You are a clinical decision support assistant. Based on the \
             conversation and SOAP note below, provide brief, actionable \
             recommendations (1-2 sentences per category). If a category does \
             not apply, write \"None needed\".\n\n\
             Patient: {}\nMRN: {}\n\n\
             Conversation transcript:\n{}\n\n\
             SOAP note:\nSUBJECTIVE: {}\nOBJECTIVE: {}\nASSESSMENT: {}\nPLAN: {}\n\n\
             Format your response exactly as:\n\n\
             MEDICATIONS:\n[...]\n\nLIFESTYLE MODIFICATIONS:\n[...]\n\n\
             FOLLOW-UP:\n[...]\n\nPATIENT EDUCATION:\n[...]\n\n\
             DIAGNOSTIC TESTS:\n[...]\n\nREFERRALS:\n[...]",
            patient.name.as_deref().unwrap_or("Not provided"),
            patient.mrn.as_deref().unwrap_or("Not provided"),
            conversation,
            soap.subjective,
            soap.objective,
            soap.assessment,
            soap.plan,
        );

        let response = self.generate(&prompt).await?;
        Ok(parse_recommendations(&response))
    }

    /// Extract structured sidebar data (demographics, vitals, meds,
    /// problems, care gaps, ICD-10 suggestions). Parse failures degrade to
    /// a safe fallback rather than erroring.
    pub async fn generate_sidebar_data(
        &self,
        transcript: &[TranscriptSegment],
        patient: &PatientInfo,
    ) -> Result<SidebarData> {
        if transcript.is_empty() {
            bail!("No transcript available to summarize");
        }

        let conversation = format_transcript(transcript);
        let prompt = format!(
            "You are a clinical extraction assistant. From the following \
             doctor-patient conversation, extract structured patient sidebar \
             data. Return a single valid JSON object with the fields: \
             demographics, chief_complaint, vitals, allergies, medications, \
             active_problems, care_gaps, suggested_icd10. Only return JSON, \
             nothing else. Use null or empty arrays for absent values and ISO \
             YYYY-MM-DD dates.\n\n\
             Patient: {} (MRN {})\n\nConversation:\n{}",
            patient.name.as_deref().unwrap_or("Unknown"),
            patient.mrn.as_deref().unwrap_or("Unknown"),
            conversation,
        );

        let response = self.generate(&prompt).await?;
        Ok(extract_sidebar_json(&response, patient))
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/{}:generateContent", self.api_url, self.model);

        let payload = serde_json::json!({
            "contents": [ { "parts": [ { "text": prompt } ] } ],
            "generationConfig": {
                "temperature": 0.2,
                "topK": 40,
                "topP": 0.95,
                "maxOutputTokens": 2048,
            },
        });

        info!("Requesting summary from {}", self.model);

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&payload)
            .send()
            .await
            .context("Failed to reach summarization backend")?;

        if !response.status().is_success() {
            bail!("Summarization backend error: {}", response.status());
        }

        let body: GenerateResponse = response
            .json()
            .await
            .context("Failed to decode summarization response")?;

        let text = body
            .candidates
            .first()
            .and_then(|candidate| candidate.content.parts.first())
            .map(|part| part.text.clone());

        match text {
            Some(text) if !text.is_empty() => Ok(text),
            _ => bail!("Summarization backend returned no content"),
        }
    }
}

/// Render a transcript the way the summarization prompts expect it
pub fn format_transcript(transcript: &[TranscriptSegment]) -> String {
    transcript
        .iter()
        .map(|segment| {
            format!(
                "[{}] {}: {}",
                segment.timestamp, segment.speaker, segment.text
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
