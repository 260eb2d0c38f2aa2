//! HTTP API server
//!
//! Session control:
//! - POST /consultations/start - Start a consultation session
//! - POST /consultations/stop/:id - Stop a session
//! - GET /consultations/:id/status - Query session status
//! - GET /consultations/:id/transcript - Accumulated transcript
//! - GET /consultations/:id/export - Plain-text transcript export
//! - POST /consultations/:id/summary - SOAP note plus recommendations
//! - POST /consultations/:id/sidebar - Structured patient sidebar data
//!
//! Reference/demo endpoints:
//! - POST /api/notes - Naive SOAP templating over validated note input
//! - GET /api/icd10?q= - ICD-10 code search
//! - GET /api/meds?q= - Medication search
//! - GET /api/templates/:chief - Dynamic fields for a chief complaint
//! - GET /api/suggest?context= - Canned suggestions
//! - GET /api/health - Health check

pub mod catalog;
mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
