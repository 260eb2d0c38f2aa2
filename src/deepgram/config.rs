use crate::config::DeepgramSettings;

/// Connection parameters for the live transcription socket.
///
/// Defaults mirror the production configuration: the medical model with
/// punctuation, diarization, utterance grouping, smart formatting and
/// interim results enabled, finalizing an utterance after 300ms of silence.
#[derive(Debug, Clone)]
pub struct DeepgramConfig {
    pub api_key: String,
    pub endpoint: String,
    pub model: String,
    pub language: String,
    pub punctuate: bool,
    pub diarize: bool,
    pub utterances: bool,
    pub smart_format: bool,
    pub interim_results: bool,
    /// Milliseconds of silence before finalizing an utterance
    pub endpointing_ms: u32,
    pub sample_rate: u32,
    pub channels: u16,
}

impl Default for DeepgramConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: "wss://api.deepgram.com/v1/listen".to_string(),
            model: "nova-2-medical".to_string(),
            language: "en-US".to_string(),
            punctuate: true,
            diarize: true,
            utterances: true,
            smart_format: true,
            interim_results: true,
            endpointing_ms: 300,
            sample_rate: 16000,
            channels: 1,
        }
    }
}

impl DeepgramConfig {
    pub fn from_settings(settings: &DeepgramSettings, sample_rate: u32, channels: u16) -> Self {
        Self {
            api_key: settings.api_key.clone(),
            endpoint: settings.endpoint.clone(),
            model: settings.model.clone(),
            language: settings.language.clone(),
            endpointing_ms: settings.endpointing_ms,
            sample_rate,
            channels,
            ..Self::default()
        }
    }

    /// Full WebSocket URL with negotiated query parameters
    pub fn ws_url(&self) -> String {
        format!(
            "{}?model={}&language={}&punctuate={}&diarize={}&utterances={}&smart_format={}&interim_results={}&endpointing={}&encoding=linear16&sample_rate={}&channels={}",
            self.endpoint,
            self.model,
            self.language,
            self.punctuate,
            self.diarize,
            self.utterances,
            self.smart_format,
            self.interim_results,
            self.endpointing_ms,
            self.sample_rate,
            self.channels,
        )
    }
}
