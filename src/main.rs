use anyhow::Result;
use clap::{Parser, Subcommand};
use smartscribe::deepgram::DeepgramConfig;
use smartscribe::export::export_to_file;
use smartscribe::session::{ConsultationSession, SessionConfig, TranscriptObserver};
use smartscribe::summary::PatientInfo;
use smartscribe::{create_router, AppState, Config, TranscriptSegment};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "smartscribe", about = "Clinical consultation transcription service")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config/smartscribe")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API server
    Serve,

    /// Record a consultation from the default microphone, printing the
    /// live transcript to the console
    Record {
        /// Patient display name for the export header
        #[arg(long)]
        patient: Option<String>,

        /// Medical record number for the export header
        #[arg(long)]
        mrn: Option<String>,

        /// Write the transcript export to this file on stop
        #[arg(long)]
        export: Option<PathBuf>,
    },
}

/// Console observer: interim results overwrite the current line, finals
/// are committed with their timestamp and speaker
struct ConsoleObserver;

impl TranscriptObserver for ConsoleObserver {
    fn on_update(&self, segment: &TranscriptSegment) {
        if segment.is_final {
            println!(
                "\r[{}] {}: {}",
                segment.timestamp, segment.speaker, segment.text
            );
        } else {
            print!("\r{}: {}", segment.speaker, segment.text);
            std::io::Write::flush(&mut std::io::stdout()).ok();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = Arc::new(Config::load(&cli.config)?);

    info!("SmartScribe v{}", env!("CARGO_PKG_VERSION"));
    info!("Loaded config: {}", config.service.name);

    match cli.command {
        Command::Serve => serve(config).await,
        Command::Record {
            patient,
            mrn,
            export,
        } => record(config, patient, mrn, export).await,
    }
}

async fn serve(config: Arc<Config>) -> Result<()> {
    let addr = format!("{}:{}", config.service.http.bind, config.service.http.port);

    let state = AppState::new(config);
    let router = create_router(state);

    info!("HTTP server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

async fn record(
    config: Arc<Config>,
    patient: Option<String>,
    mrn: Option<String>,
    export: Option<PathBuf>,
) -> Result<()> {
    let session_config = SessionConfig {
        patient_name: patient.clone(),
        mrn: mrn.clone(),
        sample_rate: config.audio.sample_rate,
        channels: config.audio.channels,
        deepgram: DeepgramConfig::from_settings(
            &config.deepgram,
            config.audio.sample_rate,
            config.audio.channels,
        ),
        ..SessionConfig::default()
    };

    let session = ConsultationSession::new(session_config);

    session.start(Arc::new(ConsoleObserver)).await?;
    info!("Recording; press Ctrl-C to stop");

    tokio::signal::ctrl_c().await?;

    session.stop().await?;

    let segments = session.transcript().await;
    info!(
        "Recording stopped after {} ({} segments)",
        session.formatted_duration().await,
        segments.len()
    );

    if let Some(path) = export {
        let patient_info = PatientInfo { name: patient, mrn };
        export_to_file(
            &patient_info,
            &session.formatted_transcript().await,
            &session.formatted_duration().await,
            &path,
        )?;
    }

    Ok(())
}
