use super::catalog::{self, NoteInput};
use super::state::AppState;
use crate::deepgram::DeepgramConfig;
use crate::export::render_transcript_export;
use crate::session::{
    ConsultationSession, SessionConfig, TranscriptObserver, TranscriptSegment,
};
use crate::summary::{PatientInfo, SummaryClient};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct StartConsultationRequest {
    /// Optional consultation ID (if not provided, generate UUID)
    pub consultation_id: Option<String>,

    /// Patient display name
    pub patient_name: Option<String>,

    /// Medical record number
    pub mrn: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StartConsultationResponse {
    pub consultation_id: String,
    pub status: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct StopConsultationResponse {
    pub consultation_id: String,
    pub status: String,
    pub duration: String,
    pub transcript_segments: usize,
}

#[derive(Debug, Serialize)]
pub struct ConsultationStatus {
    pub consultation_id: String,
    pub is_active: bool,
    pub duration_secs: f64,
    pub duration: String,
    pub transcript_segments: usize,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct SuggestQuery {
    #[serde(default)]
    pub context: String,
}

/// Observer used for HTTP-controlled sessions: finals go to the log,
/// interim updates stay at debug
struct TracingObserver;

impl TranscriptObserver for TracingObserver {
    fn on_update(&self, segment: &TranscriptSegment) {
        if segment.is_final {
            info!(
                "[{}] {}: {}",
                segment.timestamp, segment.speaker, segment.text
            );
        } else {
            debug!("(interim) {}: {}", segment.speaker, segment.text);
        }
    }
}

// ============================================================================
// Session control handlers
// ============================================================================

/// POST /consultations/start
pub async fn start_consultation(
    State(state): State<AppState>,
    Json(req): Json<StartConsultationRequest>,
) -> impl IntoResponse {
    let consultation_id = req
        .consultation_id
        .unwrap_or_else(|| format!("consultation-{}", uuid::Uuid::new_v4()));

    info!("Starting consultation: {}", consultation_id);

    let config = SessionConfig {
        consultation_id: consultation_id.clone(),
        patient_name: req.patient_name,
        mrn: req.mrn,
        sample_rate: state.config.audio.sample_rate,
        channels: state.config.audio.channels,
        deepgram: DeepgramConfig::from_settings(
            &state.config.deepgram,
            state.config.audio.sample_rate,
            state.config.audio.channels,
        ),
    };

    let session = Arc::new(ConsultationSession::new(config));

    // Reserve the id before the slow start: a concurrent request with the
    // same id must hit the conflict arm, not overwrite this entry after
    // both pass a pre-start check
    {
        let mut sessions = state.sessions.write().await;
        if sessions.contains_key(&consultation_id) {
            return (
                StatusCode::CONFLICT,
                Json(ErrorResponse {
                    error: format!("Consultation {} is already recording", consultation_id),
                }),
            )
                .into_response();
        }
        sessions.insert(consultation_id.clone(), Arc::clone(&session));
    }

    if let Err(e) = session.start(Arc::new(TracingObserver)).await {
        error!("Failed to start consultation: {}", e);
        state.sessions.write().await.remove(&consultation_id);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: format!("Failed to start recording: {}", e),
            }),
        )
            .into_response();
    }

    info!("Consultation started: {}", consultation_id);

    (
        StatusCode::OK,
        Json(StartConsultationResponse {
            consultation_id: consultation_id.clone(),
            status: "recording".to_string(),
            message: format!("Recording started for consultation {}", consultation_id),
        }),
    )
        .into_response()
}

/// POST /consultations/stop/:consultation_id
pub async fn stop_consultation(
    State(state): State<AppState>,
    Path(consultation_id): Path<String>,
) -> impl IntoResponse {
    info!("Stopping consultation: {}", consultation_id);

    let session = {
        let mut sessions = state.sessions.write().await;
        sessions.remove(&consultation_id)
    };

    match session {
        Some(session) => {
            if let Err(e) = session.stop().await {
                error!("Failed to stop consultation: {}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        error: format!("Failed to stop recording: {}", e),
                    }),
                )
                    .into_response();
            }

            let duration = session.formatted_duration().await;
            let transcript_segments = session.transcript().await.len();

            (
                StatusCode::OK,
                Json(StopConsultationResponse {
                    consultation_id,
                    status: "stopped".to_string(),
                    duration,
                    transcript_segments,
                }),
            )
                .into_response()
        }
        None => not_found(&consultation_id),
    }
}

/// GET /consultations/:consultation_id/status
pub async fn consultation_status(
    State(state): State<AppState>,
    Path(consultation_id): Path<String>,
) -> impl IntoResponse {
    let sessions = state.sessions.read().await;

    match sessions.get(&consultation_id) {
        Some(session) => {
            let duration = session.duration().await;
            let status = ConsultationStatus {
                consultation_id,
                is_active: session.is_active(),
                duration_secs: duration.as_secs_f64(),
                duration: session.formatted_duration().await,
                transcript_segments: session.transcript().await.len(),
            };
            (StatusCode::OK, Json(status)).into_response()
        }
        None => not_found(&consultation_id),
    }
}

/// GET /consultations/:consultation_id/transcript
pub async fn consultation_transcript(
    State(state): State<AppState>,
    Path(consultation_id): Path<String>,
) -> impl IntoResponse {
    let sessions = state.sessions.read().await;

    match sessions.get(&consultation_id) {
        Some(session) => {
            let transcript: Vec<TranscriptSegment> = session.transcript().await;
            (StatusCode::OK, Json(transcript)).into_response()
        }
        None => not_found(&consultation_id),
    }
}

/// GET /consultations/:consultation_id/export
pub async fn consultation_export(
    State(state): State<AppState>,
    Path(consultation_id): Path<String>,
) -> impl IntoResponse {
    let sessions = state.sessions.read().await;

    match sessions.get(&consultation_id) {
        Some(session) => {
            let patient = PatientInfo {
                name: session.config().patient_name.clone(),
                mrn: session.config().mrn.clone(),
            };
            let transcript = session.formatted_transcript().await;
            let duration = session.formatted_duration().await;

            match render_transcript_export(&patient, &transcript, &duration) {
                Ok(document) => (StatusCode::OK, document).into_response(),
                Err(e) => (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse {
                        error: e.to_string(),
                    }),
                )
                    .into_response(),
            }
        }
        None => not_found(&consultation_id),
    }
}

/// POST /consultations/:consultation_id/summary
///
/// Generate a SOAP note plus clinical recommendations from the transcript
/// accumulated so far. An empty transcript is a 400, not an empty note.
pub async fn consultation_summary(
    State(state): State<AppState>,
    Path(consultation_id): Path<String>,
) -> impl IntoResponse {
    let (transcript, patient) = {
        let sessions = state.sessions.read().await;
        match sessions.get(&consultation_id) {
            Some(session) => (
                session.transcript().await,
                PatientInfo {
                    name: session.config().patient_name.clone(),
                    mrn: session.config().mrn.clone(),
                },
            ),
            None => return not_found(&consultation_id),
        }
    };

    let client = SummaryClient::new(&state.config.summary);

    let soap = match client.generate_soap_note(&transcript, &patient).await {
        Ok(soap) => soap,
        Err(e) => return summary_failed(e),
    };

    let recommendations = match client
        .generate_recommendations(&transcript, &soap, &patient)
        .await
    {
        Ok(recommendations) => recommendations,
        Err(e) => return summary_failed(e),
    };

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "soap": soap,
            "recommendations": recommendations,
        })),
    )
        .into_response()
}

/// POST /consultations/:consultation_id/sidebar
pub async fn consultation_sidebar(
    State(state): State<AppState>,
    Path(consultation_id): Path<String>,
) -> impl IntoResponse {
    let (transcript, patient) = {
        let sessions = state.sessions.read().await;
        match sessions.get(&consultation_id) {
            Some(session) => (
                session.transcript().await,
                PatientInfo {
                    name: session.config().patient_name.clone(),
                    mrn: session.config().mrn.clone(),
                },
            ),
            None => return not_found(&consultation_id),
        }
    };

    let client = SummaryClient::new(&state.config.summary);

    match client.generate_sidebar_data(&transcript, &patient).await {
        Ok(sidebar) => (StatusCode::OK, Json(sidebar)).into_response(),
        Err(e) => summary_failed(e),
    }
}

fn summary_failed(e: anyhow::Error) -> axum::response::Response {
    error!("Summary generation failed: {}", e);
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
        .into_response()
}

fn not_found(consultation_id: &str) -> axum::response::Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: format!("Consultation {} not found", consultation_id),
        }),
    )
        .into_response()
}

// ============================================================================
// Reference/demo handlers
// ============================================================================

/// POST /api/notes
pub async fn generate_note(Json(input): Json<NoteInput>) -> impl IntoResponse {
    if input.patient.name.trim().is_empty() || input.patient.mrn.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Invalid input: patient name and MRN are required".to_string(),
            }),
        )
            .into_response();
    }

    let soap = catalog::generate_note(&input);
    (
        StatusCode::OK,
        Json(serde_json::json!({ "ok": true, "soap": soap })),
    )
        .into_response()
}

/// GET /api/icd10?q=
pub async fn search_icd10(Query(query): Query<SearchQuery>) -> impl IntoResponse {
    Json(catalog::search_icd10(&query.q))
}

/// GET /api/meds?q=
pub async fn search_meds(Query(query): Query<SearchQuery>) -> impl IntoResponse {
    Json(catalog::search_meds(&query.q))
}

/// GET /api/templates/:chief
pub async fn template_fields(Path(chief): Path<String>) -> impl IntoResponse {
    Json(catalog::template_fields(&chief))
}

/// GET /api/suggest?context=
pub async fn suggest(Query(query): Query<SuggestQuery>) -> impl IntoResponse {
    Json(serde_json::json!({ "suggestions": catalog::suggestions(&query.context) }))
}

/// GET /api/health
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({ "ok": true }))
}
