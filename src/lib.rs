pub mod audio;
pub mod config;
pub mod deepgram;
pub mod export;
pub mod http;
pub mod session;
pub mod summary;

pub use audio::{AudioBackend, AudioFrame, CaptureConfig, CaptureError, MicBackend};
pub use config::Config;
pub use deepgram::{DeepgramConfig, StreamingResponse};
pub use http::{create_router, AppState};
pub use session::{
    ConsultationSession, SessionConfig, SpeakerMap, TranscriptObserver, TranscriptSegment,
};
pub use summary::{Recommendations, SidebarData, SoapNote, SummaryClient};
