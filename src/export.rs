//! Plain-text consultation transcript export

use crate::summary::PatientInfo;
use anyhow::{bail, Context, Result};
use chrono::Local;
use std::path::Path;
use tracing::info;

const BANNER: &str = "==============================================";

/// Render the export document: banner, patient identity, date/time,
/// duration, and the formatted transcript body.
///
/// An empty transcript is rejected rather than producing an empty
/// document.
pub fn render_transcript_export(
    patient: &PatientInfo,
    formatted_transcript: &str,
    formatted_duration: &str,
) -> Result<String> {
    if formatted_transcript.trim().is_empty() {
        bail!("No transcript to export");
    }

    let now = Local::now();

    Ok(format!(
        "SmartScribe - Consultation Transcript\n\
         {banner}\n\
         \n\
         Patient: {name}\n\
         MRN: {mrn}\n\
         Date: {date}\n\
         Time: {time}\n\
         Duration: {duration}\n\
         \n\
         Transcript:\n\
         -----------\n\
         \n\
         {transcript}\n\
         \n\
         {banner}\n\
         Generated by SmartScribe\n",
        banner = BANNER,
        name = patient.name.as_deref().unwrap_or("Unknown"),
        mrn = patient.mrn.as_deref().unwrap_or("Unknown"),
        date = now.format("%Y-%m-%d"),
        time = now.format("%H:%M:%S"),
        duration = formatted_duration,
        transcript = formatted_transcript,
    ))
}

/// Render and write the export document to disk. Nothing is written when
/// the transcript is empty.
pub fn export_to_file(
    patient: &PatientInfo,
    formatted_transcript: &str,
    formatted_duration: &str,
    path: impl AsRef<Path>,
) -> Result<()> {
    let document = render_transcript_export(patient, formatted_transcript, formatted_duration)?;

    let path = path.as_ref();
    std::fs::write(path, document)
        .with_context(|| format!("Failed to write transcript export to {}", path.display()))?;

    info!("Transcript exported to {}", path.display());
    Ok(())
}
