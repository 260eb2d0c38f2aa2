use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// A single utterance from the transcription backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Resolved speaker label ("Doctor", "Patient", "Speaker 3", "Unknown")
    pub speaker: String,

    /// Recognized utterance text
    pub text: String,

    /// Elapsed time since session start when this segment was first
    /// observed, formatted MM:SS; never recomputed on later updates
    pub timestamp: String,

    /// Whether the backend has committed this utterance
    pub is_final: bool,

    /// Recognition confidence (0.0 to 1.0), 0 when the backend omits it
    pub confidence: f32,
}

/// Mapping from the backend's diarization channel ids to display names.
///
/// Channel 0 is conventionally the doctor and channel 1 the patient; ids
/// outside the map render as "Speaker N".
#[derive(Debug, Clone)]
pub struct SpeakerMap {
    labels: HashMap<u32, String>,
}

impl Default for SpeakerMap {
    fn default() -> Self {
        let mut labels = HashMap::new();
        labels.insert(0, "Doctor".to_string());
        labels.insert(1, "Patient".to_string());
        Self { labels }
    }
}

impl SpeakerMap {
    pub fn new(labels: HashMap<u32, String>) -> Self {
        Self { labels }
    }

    /// Resolve a word-level diarization id to a display label.
    ///
    /// Events without word-level speaker info resolve to "Unknown".
    pub fn resolve(&self, speaker_id: Option<u32>) -> String {
        match speaker_id {
            Some(id) => self
                .labels
                .get(&id)
                .cloned()
                .unwrap_or_else(|| format!("Speaker {}", id)),
            None => "Unknown".to_string(),
        }
    }
}

impl<const N: usize> From<[(u32, &str); N]> for SpeakerMap {
    fn from(entries: [(u32, &str); N]) -> Self {
        Self::new(
            entries
                .into_iter()
                .map(|(id, name)| (id, name.to_string()))
                .collect(),
        )
    }
}

/// Format an elapsed duration as MM:SS
pub fn format_clock(elapsed: Duration) -> String {
    let total_seconds = elapsed.as_secs();
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}", minutes, seconds)
}
