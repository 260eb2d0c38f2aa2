use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub audio: AudioConfig,
    pub deepgram: DeepgramSettings,
    pub summary: SummarySettings,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct AudioConfig {
    pub sample_rate: u32,
    pub channels: u16,
}

/// Deepgram streaming settings. The API key is expected to come from the
/// environment (SMARTSCRIBE_DEEPGRAM__API_KEY) rather than the config file.
#[derive(Debug, Deserialize)]
pub struct DeepgramSettings {
    pub api_key: String,
    #[serde(default = "default_deepgram_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_deepgram_model")]
    pub model: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_endpointing_ms")]
    pub endpointing_ms: u32,
}

#[derive(Debug, Deserialize)]
pub struct SummarySettings {
    pub api_key: String,
    pub api_url: String,
    pub model: String,
}

fn default_deepgram_endpoint() -> String {
    "wss://api.deepgram.com/v1/listen".to_string()
}

fn default_deepgram_model() -> String {
    // Medical-specific model for better accuracy
    "nova-2-medical".to_string()
}

fn default_language() -> String {
    "en-US".to_string()
}

fn default_endpointing_ms() -> u32 {
    300
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix("SMARTSCRIBE").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
