//! Deepgram live-streaming client
//!
//! Opens the `/v1/listen` WebSocket with the negotiated query parameters,
//! forwards binary PCM16 frames, and deserializes the JSON recognition
//! events the server pushes back.

pub mod client;
pub mod config;
pub mod messages;

pub use client::{connect, close_stream_message, WsSink, WsSource};
pub use config::DeepgramConfig;
pub use messages::{Alternative, Channel, StreamingResponse, Word};
