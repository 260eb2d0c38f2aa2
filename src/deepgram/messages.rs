use serde::{Deserialize, Serialize};

/// One recognition event from the live transcription socket.
///
/// Unknown fields are ignored and missing ones default so a single oddly
/// shaped event deserializes rather than tearing down the session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StreamingResponse {
    #[serde(default)]
    pub is_final: bool,
    #[serde(default)]
    pub speech_final: bool,
    #[serde(default)]
    pub channel: Channel,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Channel {
    #[serde(default)]
    pub alternatives: Vec<Alternative>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Alternative {
    #[serde(default)]
    pub transcript: String,
    /// Recognition confidence, 0 when the backend omits it
    #[serde(default)]
    pub confidence: f32,
    #[serde(default)]
    pub words: Vec<Word>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Word {
    #[serde(default)]
    pub word: String,
    /// Diarization channel id; absent when diarization is off
    #[serde(default)]
    pub speaker: Option<u32>,
    #[serde(default)]
    pub confidence: f32,
}

impl StreamingResponse {
    /// The best alternative, if the event carries one
    pub fn alternative(&self) -> Option<&Alternative> {
        self.channel.alternatives.first()
    }
}
