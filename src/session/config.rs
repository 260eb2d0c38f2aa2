use crate::deepgram::DeepgramConfig;
use serde::{Deserialize, Serialize};

/// Configuration for a consultation session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Unique consultation identifier
    pub consultation_id: String,

    /// Patient display name, if known at session start
    pub patient_name: Option<String>,

    /// Medical record number, if known at session start
    pub mrn: Option<String>,

    /// Sample rate for audio streaming (speech backends expect 16kHz)
    pub sample_rate: u32,

    /// Number of audio channels (1 = mono)
    pub channels: u16,

    /// Streaming backend connection parameters
    #[serde(skip)]
    pub deepgram: DeepgramConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            consultation_id: format!("consultation-{}", uuid::Uuid::new_v4()),
            patient_name: None,
            mrn: None,
            sample_rate: 16000, // Optimal for speech recognition
            channels: 1,        // Mono
            deepgram: DeepgramConfig::default(),
        }
    }
}
