pub mod backend;
pub mod mic;

pub use backend::{AudioBackend, AudioFrame, CaptureConfig, CaptureError};
pub use mic::MicBackend;
