use super::segment::{format_clock, SpeakerMap, TranscriptSegment};
use crate::deepgram::StreamingResponse;
use std::time::Duration;
use tracing::debug;

/// Reconciles the backend's interim/final recognition events into the
/// durable transcript.
///
/// Final events append exactly one segment, in arrival order. Interim
/// events never touch the durable transcript; they only produce a segment
/// for the caller to surface transiently. There is no local merging of
/// interim fragments: the backend's final text is authoritative as
/// received.
#[derive(Debug)]
pub struct TranscriptCollector {
    speaker_map: SpeakerMap,
    transcript: Vec<TranscriptSegment>,
}

impl TranscriptCollector {
    pub fn new(speaker_map: SpeakerMap) -> Self {
        Self {
            speaker_map,
            transcript: Vec::new(),
        }
    }

    /// Process one recognition event.
    ///
    /// `elapsed` is the time since session start at the moment of receipt;
    /// it becomes the segment's timestamp and is never recomputed. Returns
    /// the segment to hand to the observer, or `None` when the event
    /// carries no usable text.
    pub fn handle_event(
        &mut self,
        event: &StreamingResponse,
        elapsed: Duration,
    ) -> Option<TranscriptSegment> {
        let alternative = match event.alternative() {
            Some(alt) => alt,
            None => return None,
        };

        if alternative.transcript.trim().is_empty() {
            return None;
        }

        let speaker_id = alternative.words.first().and_then(|word| word.speaker);
        let speaker = self.speaker_map.resolve(speaker_id);

        let segment = TranscriptSegment {
            speaker,
            text: alternative.transcript.clone(),
            timestamp: format_clock(elapsed),
            is_final: event.is_final,
            confidence: alternative.confidence,
        };

        if event.is_final {
            debug!(
                "[{}] {}: {}",
                segment.timestamp, segment.speaker, segment.text
            );
            self.transcript.push(segment.clone());
        }

        Some(segment)
    }

    /// Replace the speaker label mapping for subsequent events.
    ///
    /// Already-finalized segments keep the labels they were committed with.
    pub fn set_speaker_labels(&mut self, speaker_map: SpeakerMap) {
        self.speaker_map = speaker_map;
    }

    /// The accumulated finalized segments, in finalization order
    pub fn transcript(&self) -> &[TranscriptSegment] {
        &self.transcript
    }

    pub fn clear(&mut self) {
        self.transcript.clear();
    }

    /// Human-readable transcript: `[timestamp] speaker: text`, blank-line
    /// separated
    pub fn formatted_transcript(&self) -> String {
        self.transcript
            .iter()
            .map(|segment| {
                format!(
                    "[{}] {}: {}",
                    segment.timestamp, segment.speaker, segment.text
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
