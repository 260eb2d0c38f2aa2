//! Summarization backend integration
//!
//! Sends the finalized transcript plus patient context to the language
//! model API and parses the labeled free-text (SOAP note, clinical
//! recommendations) and structured JSON (sidebar data) it returns.

mod client;
mod parse;
mod types;

pub use client::{format_transcript, SummaryClient};
pub use parse::{extract_sidebar_json, parse_recommendations, parse_soap_note};
pub use types::{
    ActiveProblem, CareGap, Demographics, PatientInfo, Recommendations, SidebarData, SoapNote,
    Vitals,
};
