//! Consultation transcription session
//!
//! This module provides the `ConsultationSession` abstraction that manages:
//! - Microphone capture and PCM16 conversion
//! - The live streaming connection to the transcription backend
//! - Interim/final recognition event reconciliation
//! - The accumulated speaker-tagged transcript
//! - Duration tracking and speaker labeling

mod collector;
mod config;
mod segment;
mod session;

pub use collector::TranscriptCollector;
pub use config::SessionConfig;
pub use segment::{format_clock, SpeakerMap, TranscriptSegment};
pub use session::{BackendFactory, ConsultationSession, StartError, TranscriptObserver};
