// Tests for the transcription session core: interim/final reconciliation,
// speaker mapping, timestamps, and the session state machine edges.

use futures::StreamExt;
use smartscribe::audio::{AudioBackend, AudioFrame, CaptureError};
use smartscribe::deepgram::{Alternative, Channel, DeepgramConfig, StreamingResponse, Word};
use smartscribe::session::{
    format_clock, ConsultationSession, SessionConfig, SpeakerMap, TranscriptCollector,
    TranscriptObserver, TranscriptSegment,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

fn event(
    transcript: &str,
    is_final: bool,
    confidence: f32,
    speaker: Option<u32>,
) -> StreamingResponse {
    let words = match speaker {
        Some(_) => vec![Word {
            word: transcript.split(' ').next().unwrap_or("").to_string(),
            speaker,
            confidence,
        }],
        None => Vec::new(),
    };

    StreamingResponse {
        is_final,
        speech_final: is_final,
        channel: Channel {
            alternatives: vec![Alternative {
                transcript: transcript.to_string(),
                confidence,
                words,
            }],
        },
    }
}

#[test]
fn final_events_accumulate_in_arrival_order() {
    let mut collector = TranscriptCollector::new(SpeakerMap::default());

    collector.handle_event(&event("First utterance.", true, 0.9, Some(0)), Duration::ZERO);
    collector.handle_event(
        &event("Second utterance.", true, 0.8, Some(1)),
        Duration::from_secs(3),
    );
    collector.handle_event(
        &event("Third utterance.", true, 0.7, Some(0)),
        Duration::from_secs(9),
    );

    let transcript = collector.transcript();
    assert_eq!(transcript.len(), 3, "every final event commits one segment");
    assert_eq!(transcript[0].text, "First utterance.");
    assert_eq!(transcript[1].text, "Second utterance.");
    assert_eq!(transcript[2].text, "Third utterance.");
}

#[test]
fn interim_events_never_mutate_the_transcript() {
    let mut collector = TranscriptCollector::new(SpeakerMap::default());

    let first = collector.handle_event(&event("Patient ha", false, 0.5, Some(1)), Duration::ZERO);
    let second = collector.handle_event(
        &event("Patient has", false, 0.6, Some(1)),
        Duration::from_secs(1),
    );

    assert!(first.is_some(), "interim events still reach the observer");
    assert!(second.is_some());
    assert!(
        collector.transcript().is_empty(),
        "interim events must not commit segments"
    );
}

#[test]
fn interim_then_final_commits_exactly_one_segment() {
    // The end-to-end scenario: an interim event followed by its final at
    // five seconds elapsed.
    let mut collector = TranscriptCollector::new(SpeakerMap::default());
    let elapsed = Duration::from_secs(5);

    let interim = collector
        .handle_event(&event("Patient has", false, 0.0, Some(1)), elapsed)
        .expect("interim event produces an observer update");

    assert_eq!(interim.speaker, "Patient");
    assert!(!interim.is_final);

    collector
        .handle_event(&event("Patient has a headache", true, 0.91, Some(1)), elapsed)
        .expect("final event produces an observer update");

    let transcript = collector.transcript();
    assert_eq!(transcript.len(), 1);

    let segment = &transcript[0];
    assert_eq!(segment.speaker, "Patient");
    assert_eq!(segment.text, "Patient has a headache");
    assert_eq!(segment.timestamp, "00:05");
    assert!(segment.is_final);
    assert!((segment.confidence - 0.91).abs() < 1e-6);
}

#[test]
fn events_without_text_are_ignored() {
    let mut collector = TranscriptCollector::new(SpeakerMap::default());

    assert!(collector
        .handle_event(&event("", true, 0.9, Some(0)), Duration::ZERO)
        .is_none());
    assert!(collector
        .handle_event(&event("   ", true, 0.9, Some(0)), Duration::ZERO)
        .is_none());

    let no_alternatives = StreamingResponse {
        is_final: true,
        ..StreamingResponse::default()
    };
    assert!(collector
        .handle_event(&no_alternatives, Duration::ZERO)
        .is_none());

    assert!(collector.transcript().is_empty());
}

#[test]
fn default_speaker_map_labels_doctor_and_patient() {
    let mut collector = TranscriptCollector::new(SpeakerMap::default());

    collector.handle_event(&event("Hello.", true, 0.9, Some(0)), Duration::ZERO);
    collector.handle_event(&event("Hi doctor.", true, 0.9, Some(1)), Duration::ZERO);

    let transcript = collector.transcript();
    assert_eq!(transcript[0].speaker, "Doctor");
    assert_eq!(transcript[1].speaker, "Patient");
}

#[test]
fn unmapped_speaker_ids_render_as_speaker_n() {
    let mut collector = TranscriptCollector::new(SpeakerMap::default());

    collector.handle_event(&event("Who am I?", true, 0.9, Some(5)), Duration::ZERO);

    assert_eq!(collector.transcript()[0].speaker, "Speaker 5");
}

#[test]
fn events_without_word_info_resolve_to_unknown() {
    let mut collector = TranscriptCollector::new(SpeakerMap::default());

    collector.handle_event(&event("No diarization here.", true, 0.9, None), Duration::ZERO);

    assert_eq!(collector.transcript()[0].speaker, "Unknown");
}

#[test]
fn custom_speaker_labels_apply_to_subsequent_events() {
    let mut collector = TranscriptCollector::new(SpeakerMap::default());
    collector.set_speaker_labels(SpeakerMap::from([(0, "Dr. A"), (1, "Pt. B")]));

    collector.handle_event(&event("Good morning.", true, 0.9, Some(0)), Duration::ZERO);
    collector.handle_event(&event("Morning.", true, 0.9, Some(1)), Duration::ZERO);

    let transcript = collector.transcript();
    assert_eq!(transcript[0].speaker, "Dr. A");
    assert_eq!(transcript[1].speaker, "Pt. B");
}

#[test]
fn relabeling_is_not_retroactive() {
    let mut collector = TranscriptCollector::new(SpeakerMap::default());

    collector.handle_event(&event("Before relabel.", true, 0.9, Some(0)), Duration::ZERO);
    collector.set_speaker_labels(SpeakerMap::from([(0, "Dr. Smith")]));
    collector.handle_event(&event("After relabel.", true, 0.9, Some(0)), Duration::ZERO);

    let transcript = collector.transcript();
    assert_eq!(
        transcript[0].speaker, "Doctor",
        "committed segments keep their original label"
    );
    assert_eq!(transcript[1].speaker, "Dr. Smith");
}

#[test]
fn timestamps_reflect_elapsed_time_at_receipt() {
    let mut collector = TranscriptCollector::new(SpeakerMap::default());

    collector.handle_event(&event("Early.", true, 0.9, Some(0)), Duration::from_secs(2));
    collector.handle_event(&event("Late.", true, 0.9, Some(0)), Duration::from_secs(65));

    let transcript = collector.transcript();
    assert_eq!(transcript[0].timestamp, "00:02");
    assert_eq!(transcript[1].timestamp, "01:05");
}

#[test]
fn formatted_transcript_uses_blank_line_separation() {
    let mut collector = TranscriptCollector::new(SpeakerMap::default());

    collector.handle_event(&event("How are you?", true, 0.9, Some(0)), Duration::ZERO);
    collector.handle_event(
        &event("Fine, thanks.", true, 0.9, Some(1)),
        Duration::from_secs(4),
    );

    assert_eq!(
        collector.formatted_transcript(),
        "[00:00] Doctor: How are you?\n\n[00:04] Patient: Fine, thanks."
    );
}

#[test]
fn clear_empties_the_transcript() {
    let mut collector = TranscriptCollector::new(SpeakerMap::default());

    collector.handle_event(&event("Something.", true, 0.9, Some(0)), Duration::ZERO);
    collector.clear();

    assert!(collector.transcript().is_empty());
    assert_eq!(collector.formatted_transcript(), "");
}

#[test]
fn clock_formatting() {
    assert_eq!(format_clock(Duration::ZERO), "00:00");
    assert_eq!(format_clock(Duration::from_secs(5)), "00:05");
    assert_eq!(format_clock(Duration::from_secs(65)), "01:05");
    assert_eq!(format_clock(Duration::from_secs(600)), "10:00");
    assert_eq!(format_clock(Duration::from_millis(4999)), "00:04");
}

#[test]
fn wire_format_events_deserialize() {
    let raw = r#"{
        "is_final": true,
        "speech_final": true,
        "channel": {
            "alternatives": [{
                "transcript": "Patient has a headache",
                "confidence": 0.91,
                "words": [{"word": "Patient", "speaker": 1, "confidence": 0.95}]
            }]
        }
    }"#;

    let event: StreamingResponse = serde_json::from_str(raw).unwrap();
    assert!(event.is_final);

    let alternative = event.alternative().unwrap();
    assert_eq!(alternative.transcript, "Patient has a headache");
    assert_eq!(alternative.words[0].speaker, Some(1));
}

#[test]
fn oddly_shaped_events_still_deserialize_with_defaults() {
    // One bad event must not be able to terminate a session, so unknown
    // shapes fall back to defaults instead of failing outright.
    let event: StreamingResponse = serde_json::from_str(r#"{"type": "Metadata"}"#).unwrap();

    assert!(!event.is_final);
    assert!(event.alternative().is_none());
}

/// Capture backend that counts acquisitions and produces no frames
struct ScriptedBackend {
    starts: Arc<AtomicUsize>,
    frame_tx: Option<mpsc::Sender<AudioFrame>>,
}

#[async_trait::async_trait]
impl AudioBackend for ScriptedBackend {
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>, CaptureError> {
        self.starts.fetch_add(1, Ordering::SeqCst);
        let (tx, rx) = mpsc::channel(4);
        self.frame_tx = Some(tx);
        Ok(rx)
    }

    async fn stop(&mut self) -> anyhow::Result<()> {
        self.frame_tx = None;
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.frame_tx.is_some()
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

struct NoopObserver;

impl TranscriptObserver for NoopObserver {
    fn on_update(&self, _segment: &TranscriptSegment) {}
}

/// Accept streaming connections locally and read each one until it closes
async fn spawn_ws_server() -> std::net::SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
                while let Some(Ok(_)) = ws.next().await {}
            });
        }
    });

    addr
}

fn scripted_session(addr: std::net::SocketAddr, starts: Arc<AtomicUsize>) -> ConsultationSession {
    let config = SessionConfig {
        deepgram: DeepgramConfig {
            endpoint: format!("ws://{}", addr),
            api_key: "test-key".to_string(),
            ..DeepgramConfig::default()
        },
        ..SessionConfig::default()
    };

    ConsultationSession::with_backend_factory(
        config,
        Box::new(move || {
            Box::new(ScriptedBackend {
                starts: Arc::clone(&starts),
                frame_tx: None,
            })
        }),
    )
}

#[tokio::test]
async fn double_start_does_not_reacquire_resources() {
    let addr = spawn_ws_server().await;
    let starts = Arc::new(AtomicUsize::new(0));
    let session = scripted_session(addr, Arc::clone(&starts));

    session
        .start(Arc::new(NoopObserver))
        .await
        .expect("first start succeeds");
    assert!(session.is_active());
    assert_eq!(starts.load(Ordering::SeqCst), 1);

    session
        .start(Arc::new(NoopObserver))
        .await
        .expect("second start without a stop is accepted");
    assert_eq!(
        starts.load(Ordering::SeqCst),
        1,
        "a start while capturing must not acquire a second backend"
    );

    session.stop().await.expect("stop succeeds");
    assert!(!session.is_active());
}

#[tokio::test]
async fn restart_after_stop_acquires_a_fresh_backend() {
    let addr = spawn_ws_server().await;
    let starts = Arc::new(AtomicUsize::new(0));
    let session = scripted_session(addr, Arc::clone(&starts));

    session
        .start(Arc::new(NoopObserver))
        .await
        .expect("first start succeeds");
    session.stop().await.expect("first stop succeeds");

    session
        .start(Arc::new(NoopObserver))
        .await
        .expect("restart succeeds");
    assert_eq!(
        starts.load(Ordering::SeqCst),
        2,
        "each capture period gets its own backend"
    );
    assert!(session.is_active());

    session.stop().await.expect("second stop succeeds");
}

#[tokio::test]
async fn stop_when_idle_is_a_noop() {
    let session = ConsultationSession::new(SessionConfig::default());

    assert!(!session.is_active());
    session.stop().await.expect("stop while idle must not fail");
    assert!(!session.is_active());
}

#[tokio::test]
async fn duration_is_zero_before_first_start() {
    let session = ConsultationSession::new(SessionConfig::default());

    assert_eq!(session.duration().await, Duration::ZERO);
    assert_eq!(session.formatted_duration().await, "00:00");
}

#[tokio::test]
async fn transcript_is_empty_before_any_events() {
    let session = ConsultationSession::new(SessionConfig::default());

    assert!(session.transcript().await.is_empty());
    assert_eq!(session.formatted_transcript().await, "");
}
