use super::collector::TranscriptCollector;
use super::config::SessionConfig;
use super::segment::{format_clock, SpeakerMap, TranscriptSegment};
use crate::audio::{AudioBackend, CaptureConfig, CaptureError, MicBackend};
use crate::deepgram::{self, StreamingResponse};
use anyhow::Result;
use futures::{SinkExt, StreamExt};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tracing::{error, info, warn};

/// Sink for live transcript updates.
///
/// Invoked once per usable recognition event, in backend delivery order:
/// with `is_final == false` for interim results (each superseding the last
/// shown for the utterance in progress) and `is_final == true` exactly when
/// a segment is committed to the durable transcript.
pub trait TranscriptObserver: Send + Sync {
    fn on_update(&self, segment: &TranscriptSegment);
}

/// Why a session failed to start. Permission and device failures need
/// different operator guidance, so they stay distinguishable.
#[derive(Debug, thiserror::Error)]
pub enum StartError {
    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error("failed to open streaming connection: {0}")]
    Connect(String),
}

/// Builds a fresh capture backend at the beginning of each capture period
pub type BackendFactory = Box<dyn Fn() -> Box<dyn AudioBackend> + Send + Sync>;

/// A consultation transcription session.
///
/// Owns the capture backend and the streaming connection exclusively for
/// the duration of a capture period. Lifecycle is `Idle -> Capturing ->
/// Idle`; a second `start` while capturing and a `stop` while idle are
/// warned no-ops.
pub struct ConsultationSession {
    config: SessionConfig,

    /// Source of capture backends, one per capture period
    backend_factory: BackendFactory,

    /// Whether a capture period is active
    capturing: Arc<AtomicBool>,

    /// Set once per capture period; all duration and timestamp computations
    /// use it until the next start
    started_at: Mutex<Option<Instant>>,

    /// Speaker mapping plus the accumulated transcript
    collector: Arc<RwLock<TranscriptCollector>>,

    /// The capture backend, held so `stop` can release the device
    backend: Mutex<Option<Box<dyn AudioBackend>>>,

    /// Handle for the audio forwarding task
    forward_task: Mutex<Option<JoinHandle<()>>>,

    /// Handle for the recognition event task
    receive_task: Mutex<Option<JoinHandle<()>>>,
}

impl ConsultationSession {
    pub fn new(config: SessionConfig) -> Self {
        let capture = CaptureConfig {
            target_sample_rate: config.sample_rate,
            target_channels: config.channels,
            ..CaptureConfig::default()
        };
        Self::with_backend_factory(
            config,
            Box::new(move || Box::new(MicBackend::new(capture.clone()))),
        )
    }

    /// Build a session over a custom capture source instead of the default
    /// microphone backend
    pub fn with_backend_factory(config: SessionConfig, backend_factory: BackendFactory) -> Self {
        Self {
            config,
            backend_factory,
            capturing: Arc::new(AtomicBool::new(false)),
            started_at: Mutex::new(None),
            collector: Arc::new(RwLock::new(TranscriptCollector::new(SpeakerMap::default()))),
            backend: Mutex::new(None),
            forward_task: Mutex::new(None),
            receive_task: Mutex::new(None),
        }
    }

    /// Start capturing and streaming.
    ///
    /// Acquires the capture backend, opens the streaming connection, and
    /// begins forwarding PCM16 frames. The observer receives every interim
    /// and final recognition event until the session stops. Fails with a
    /// categorized error when capture or the connection cannot be opened; a
    /// backend acquired before a failed connect is released again.
    pub async fn start(&self, observer: Arc<dyn TranscriptObserver>) -> Result<(), StartError> {
        if self.capturing.load(Ordering::SeqCst) {
            warn!("Session already capturing, ignoring start");
            return Ok(());
        }

        info!(
            "Starting consultation session: {}",
            self.config.consultation_id
        );

        // New capture period: previous transcript does not carry over
        self.collector.write().await.clear();
        *self.started_at.lock().await = None;

        let mut backend = (self.backend_factory)();
        let mut audio_rx = backend.start().await?;

        let (mut ws_tx, mut ws_rx) = match deepgram::connect(&self.config.deepgram).await {
            Ok(halves) => halves,
            Err(e) => {
                // Release the device before surfacing the failure
                if let Err(stop_err) = backend.stop().await {
                    warn!("Failed to release microphone: {}", stop_err);
                }
                return Err(StartError::Connect(e.to_string()));
            }
        };

        let started = Instant::now();
        *self.started_at.lock().await = Some(started);
        self.capturing.store(true, Ordering::SeqCst);

        // Audio forwarding task: frames go to the socket fire-and-forget;
        // when the frame channel ends it signals end-of-stream and closes.
        let capturing = Arc::clone(&self.capturing);
        let forward_task = tokio::spawn(async move {
            info!("Audio forwarding task started");

            while let Some(frame) = audio_rx.recv().await {
                if !capturing.load(Ordering::SeqCst) {
                    break;
                }

                let pcm = frame.to_pcm_bytes();
                if let Err(e) = ws_tx.send(Message::Binary(pcm)).await {
                    error!("Failed to forward audio frame: {}", e);
                    break;
                }
            }

            // Graceful teardown, each step tolerated independently: a dead
            // socket must not prevent the close attempt that follows it
            if let Err(e) = ws_tx.send(deepgram::close_stream_message()).await {
                warn!("Failed to send end-of-stream signal: {}", e);
            }
            if let Err(e) = ws_tx.close().await {
                warn!("Failed to close streaming connection: {}", e);
            }

            info!("Audio forwarding task stopped");
        });

        // Recognition event task: backend delivery order, no re-sorting.
        // Malformed events are logged and skipped; connection errors are
        // logged rather than surfaced, per the no-reconnect design.
        let collector = Arc::clone(&self.collector);
        let receive_task = tokio::spawn(async move {
            info!("Recognition event task started");

            while let Some(message) = ws_rx.next().await {
                let message = match message {
                    Ok(m) => m,
                    Err(e) => {
                        error!("Streaming connection error: {}", e);
                        break;
                    }
                };

                let text = match message {
                    Message::Text(text) => text,
                    Message::Close(_) => {
                        info!("Streaming connection closed by backend");
                        break;
                    }
                    _ => continue,
                };

                let event: StreamingResponse = match serde_json::from_str(&text) {
                    Ok(event) => event,
                    Err(e) => {
                        warn!("Ignoring malformed recognition event: {}", e);
                        continue;
                    }
                };

                let segment = {
                    let mut collector = collector.write().await;
                    collector.handle_event(&event, started.elapsed())
                };

                if let Some(segment) = segment {
                    observer.on_update(&segment);
                }
            }

            info!("Recognition event task stopped");
        });

        *self.backend.lock().await = Some(backend);
        *self.forward_task.lock().await = Some(forward_task);
        *self.receive_task.lock().await = Some(receive_task);

        info!("Consultation session started");
        Ok(())
    }

    /// Stop capturing.
    ///
    /// Releases the capture device first; that ends the frame channel, which
    /// lets the forwarding task send the end-of-stream signal and close the
    /// socket. Every step is best-effort so a dead connection never keeps
    /// the microphone held.
    pub async fn stop(&self) -> Result<()> {
        if !self.capturing.load(Ordering::SeqCst) {
            warn!("Session not capturing, ignoring stop");
            return Ok(());
        }

        info!(
            "Stopping consultation session: {}",
            self.config.consultation_id
        );

        self.capturing.store(false, Ordering::SeqCst);

        {
            let mut backend = self.backend.lock().await;
            if let Some(mut backend) = backend.take() {
                if let Err(e) = backend.stop().await {
                    warn!("Failed to stop audio backend: {}", e);
                }
            }
        }

        {
            let mut handle = self.forward_task.lock().await;
            if let Some(task) = handle.take() {
                if let Err(e) = task.await {
                    error!("Audio forwarding task panicked: {}", e);
                }
            }
        }

        {
            let mut handle = self.receive_task.lock().await;
            if let Some(task) = handle.take() {
                if let Err(e) = task.await {
                    error!("Recognition event task panicked: {}", e);
                }
            }
        }

        info!("Consultation session stopped");
        Ok(())
    }

    /// The accumulated finalized transcript, in finalization order.
    /// Returns a copy; only the session itself appends to the transcript.
    pub async fn transcript(&self) -> Vec<TranscriptSegment> {
        self.collector.read().await.transcript().to_vec()
    }

    /// Human-readable transcript rendering
    pub async fn formatted_transcript(&self) -> String {
        self.collector.read().await.formatted_transcript()
    }

    /// Empty the accumulated transcript. Capture state and the session
    /// start time are unaffected.
    pub async fn clear_transcript(&self) {
        self.collector.write().await.clear();
    }

    /// Replace the speaker mapping used for subsequent segments.
    /// Already-finalized segments are not relabeled.
    pub async fn set_speaker_labels(&self, speaker_map: SpeakerMap) {
        self.collector.write().await.set_speaker_labels(speaker_map);
    }

    /// Whether a capture period is active
    pub fn is_active(&self) -> bool {
        self.capturing.load(Ordering::SeqCst)
    }

    /// Elapsed time since the current capture period started; zero if the
    /// session was never started
    pub async fn duration(&self) -> Duration {
        self.started_at
            .lock()
            .await
            .map(|started| started.elapsed())
            .unwrap_or_default()
    }

    /// Elapsed time formatted MM:SS ("00:00" when never started)
    pub async fn formatted_duration(&self) -> String {
        format_clock(self.duration().await)
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }
}
