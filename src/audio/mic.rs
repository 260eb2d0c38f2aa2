use super::backend::{
    process_frame, AudioBackend, AudioFrame, CaptureConfig, CaptureError,
};
use anyhow::Result;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, SupportedStreamConfig};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

/// Microphone capture backend built on cpal.
///
/// `cpal::Stream` is not `Send`, so the stream lives on a dedicated thread
/// for the whole capture period. The thread reports the stream build result
/// back over a oneshot channel so `start` fails fast with a categorized
/// error, then parks until it is told to stop and drops the stream.
pub struct MicBackend {
    config: CaptureConfig,
    capturing: Arc<AtomicBool>,
    stop_tx: Option<std::sync::mpsc::Sender<()>>,
    thread: Option<std::thread::JoinHandle<()>>,
}

impl MicBackend {
    pub fn new(config: CaptureConfig) -> Self {
        Self {
            config,
            capturing: Arc::new(AtomicBool::new(false)),
            stop_tx: None,
            thread: None,
        }
    }
}

#[async_trait::async_trait]
impl AudioBackend for MicBackend {
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>, CaptureError> {
        if self.capturing.load(Ordering::SeqCst) {
            return Err(CaptureError::Other("capture already active".to_string()));
        }

        let (frame_tx, frame_rx) = mpsc::channel(self.config.channel_capacity);
        let (ready_tx, ready_rx) = oneshot::channel::<Result<(), CaptureError>>();
        let (stop_tx, stop_rx) = std::sync::mpsc::channel::<()>();

        let config = self.config.clone();
        let capturing = Arc::clone(&self.capturing);

        let thread = std::thread::spawn(move || {
            let stream = match build_input_stream(&config, frame_tx) {
                Ok(stream) => stream,
                Err(e) => {
                    let _ = ready_tx.send(Err(e));
                    return;
                }
            };

            if let Err(e) = stream.play() {
                let _ = ready_tx.send(Err(CaptureError::Other(e.to_string())));
                return;
            }

            capturing.store(true, Ordering::SeqCst);
            let _ = ready_tx.send(Ok(()));

            // Park until stop; recv also returns when the sender is dropped
            let _ = stop_rx.recv();
            drop(stream);
            capturing.store(false, Ordering::SeqCst);
        });

        match ready_rx.await {
            Ok(Ok(())) => {
                info!("Microphone capture started");
                self.stop_tx = Some(stop_tx);
                self.thread = Some(thread);
                Ok(frame_rx)
            }
            Ok(Err(e)) => {
                let _ = thread.join();
                Err(e)
            }
            Err(_) => Err(CaptureError::Other(
                "capture thread exited before reporting readiness".to_string(),
            )),
        }
    }

    async fn stop(&mut self) -> Result<()> {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }

        if let Some(thread) = self.thread.take() {
            // Join off the async runtime; releasing the device is quick
            let joined = tokio::task::spawn_blocking(move || thread.join()).await;
            match joined {
                Ok(Ok(())) => info!("Microphone capture stopped"),
                Ok(Err(_)) => warn!("Capture thread panicked during shutdown"),
                Err(e) => warn!("Failed to join capture thread: {}", e),
            }
        }

        self.capturing.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.capturing.load(Ordering::SeqCst)
    }

    fn name(&self) -> &str {
        "cpal-microphone"
    }
}

fn build_input_stream(
    config: &CaptureConfig,
    frame_tx: mpsc::Sender<AudioFrame>,
) -> Result<cpal::Stream, CaptureError> {
    let host = cpal::default_host();

    let device = host
        .default_input_device()
        .ok_or_else(|| CaptureError::DeviceNotFound("no default input device".to_string()))?;

    let device_name = device
        .name()
        .unwrap_or_else(|_| "unknown device".to_string());
    info!("Using audio device: {}", device_name);

    let supported = device
        .default_input_config()
        .map_err(classify_config_error)?;

    let sample_format = supported.sample_format();
    let stream_config = stream_config_for(&supported);

    info!(
        "Capture config: {} Hz, {} channel(s), {:?}",
        stream_config.sample_rate.0, stream_config.channels, sample_format
    );

    let target_rate = config.target_sample_rate;
    let target_channels = config.target_channels;
    let source_rate = stream_config.sample_rate.0;
    let source_channels = stream_config.channels;

    let stream = match sample_format {
        SampleFormat::F32 => build_typed_stream::<f32>(
            &device, &stream_config, frame_tx, source_rate, source_channels,
            target_rate, target_channels,
        ),
        SampleFormat::I16 => build_typed_stream::<i16>(
            &device, &stream_config, frame_tx, source_rate, source_channels,
            target_rate, target_channels,
        ),
        SampleFormat::U16 => build_typed_stream::<u16>(
            &device, &stream_config, frame_tx, source_rate, source_channels,
            target_rate, target_channels,
        ),
        other => {
            return Err(CaptureError::Other(format!(
                "unsupported sample format: {:?}",
                other
            )))
        }
    }?;

    Ok(stream)
}

fn build_typed_stream<T>(
    device: &cpal::Device,
    stream_config: &cpal::StreamConfig,
    frame_tx: mpsc::Sender<AudioFrame>,
    source_rate: u32,
    source_channels: u16,
    target_rate: u32,
    target_channels: u16,
) -> Result<cpal::Stream, CaptureError>
where
    T: cpal::SizedSample,
    f32: cpal::FromSample<T>,
{
    let started = Instant::now();

    let stream = device
        .build_input_stream(
            stream_config,
            move |data: &[T], _: &cpal::InputCallbackInfo| {
                // linear16 conversion, same clamp the wire format expects
                let samples: Vec<i16> = data
                    .iter()
                    .map(|&sample| {
                        let s: f32 = cpal::Sample::to_sample(sample);
                        let s = s.clamp(-1.0, 1.0);
                        if s < 0.0 {
                            (s * 0x8000 as f32) as i16
                        } else {
                            (s * 0x7FFF as f32) as i16
                        }
                    })
                    .collect();

                let frame = AudioFrame {
                    samples,
                    sample_rate: source_rate,
                    channels: source_channels,
                    timestamp_ms: started.elapsed().as_millis() as u64,
                };

                let frame = process_frame(frame, target_rate, target_channels);

                // Never block the audio callback on the consumer; a full
                // channel means the consumer is behind and the frame is lost
                if let Err(e) = frame_tx.try_send(frame) {
                    debug!("Dropped audio frame: {}", e);
                }
            },
            move |err| {
                warn!("Audio stream error: {}", err);
            },
            None,
        )
        .map_err(classify_build_error)?;

    Ok(stream)
}

fn stream_config_for(supported: &SupportedStreamConfig) -> cpal::StreamConfig {
    cpal::StreamConfig {
        channels: supported.channels(),
        sample_rate: supported.sample_rate(),
        buffer_size: cpal::BufferSize::Default,
    }
}

fn classify_config_error(err: cpal::DefaultStreamConfigError) -> CaptureError {
    match err {
        cpal::DefaultStreamConfigError::DeviceNotAvailable => {
            CaptureError::DeviceNotFound("input device disappeared".to_string())
        }
        other => classify_message(other.to_string()),
    }
}

fn classify_build_error(err: cpal::BuildStreamError) -> CaptureError {
    match err {
        cpal::BuildStreamError::DeviceNotAvailable => {
            CaptureError::DeviceNotFound("input device disappeared".to_string())
        }
        other => classify_message(other.to_string()),
    }
}

/// cpal reports OS permission failures as backend-specific errors, so the
/// message text is the only signal available for the permission category.
fn classify_message(message: String) -> CaptureError {
    let lower = message.to_lowercase();
    if lower.contains("permission") || lower.contains("denied") || lower.contains("not authorized")
    {
        CaptureError::PermissionDenied(message)
    } else {
        CaptureError::Other(message)
    }
}
