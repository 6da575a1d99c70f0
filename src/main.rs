//! gaze-pointer - landmark recording replay
//!
//! Entry point for the replay binary.

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gaze_pointer::config::{Config, LoggingConfig, SharedConfig};
use gaze_pointer::cursor::{ActuationThread, CursorDispatcher, CursorSink, TracingActuator};
use gaze_pointer::gesture::ManualClock;
use gaze_pointer::pipeline::{GazePipeline, PipelineStats};
use gaze_pointer::replay::{load_frames, FrameRecord};
use gaze_pointer::tracking::LandmarkSchema;
use gaze_pointer::utils::format_user_error;

/// Command-line arguments for gaze-pointer
#[derive(Parser, Debug)]
#[command(name = "gaze-pointer")]
#[command(version, about = "Replay landmark recordings through the gaze pointer", long_about = None)]
pub struct Args {
    /// Configuration file path (built-in defaults if omitted)
    #[arg(short, long, env = "GAZE_POINTER_CONFIG")]
    pub config: Option<String>,

    /// JSON-lines landmark recording
    #[arg(short, long)]
    pub frames: String,

    /// Screen width override
    #[arg(long, env = "GAZE_POINTER_WIDTH")]
    pub width: Option<u32>,

    /// Screen height override
    #[arg(long, env = "GAZE_POINTER_HEIGHT")]
    pub height: Option<u32>,

    /// Track the primary eye only
    #[arg(long)]
    pub one_eye: bool,

    /// Pace frames by their timestamps and actuate on the actuation thread
    #[arg(long)]
    pub realtime: bool,

    /// Verbose logging (can be specified multiple times)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Log format (json|pretty|compact), overrides the config file
    #[arg(long)]
    pub log_format: Option<String>,

    /// Write logs to file (in addition to stdout)
    #[arg(long)]
    pub log_file: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", format_user_error(&e));
            return Err(e);
        }
    };

    init_logging(&args, &config.logging)?;

    info!("════════════════════════════════════════════════════════");
    info!("  gaze-pointer v{}", env!("CARGO_PKG_VERSION"));
    info!("  Built: {} {}", env!("BUILD_DATE"), env!("BUILD_TIME"));
    info!("  Commit: {}", env!("GIT_HASH"));
    info!("  Profile: {}", if cfg!(debug_assertions) { "debug" } else { "release" });
    info!("════════════════════════════════════════════════════════");
    debug!("Config: {:?}", config);

    match replay(&args, config).await {
        Ok(stats) => {
            print_summary(&stats);
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", format_user_error(&e));
            Err(e)
        }
    }
}

fn load_config(args: &Args) -> Result<Config> {
    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let config = config.with_overrides(args.width, args.height, args.one_eye);
    config.validate().context("Invalid config after CLI overrides")?;
    Ok(config)
}

async fn replay(args: &Args, config: Config) -> Result<PipelineStats> {
    let frames = load_frames(&args.frames)
        .with_context(|| format!("Failed to load frame recording: {}", args.frames))?;
    info!("Loaded {} frames from {}", frames.len(), args.frames);

    let shared = SharedConfig::new(config);
    let start_ms = frames.first().map_or(0, |f| f.timestamp_ms);
    let clock = Arc::new(ManualClock::new(start_ms));
    let dispatcher = CursorDispatcher::new(TracingActuator::new(), shared.clone(), clock.clone());

    if args.realtime {
        info!("Replaying in real time on the actuation thread");
        let mut actuation = ActuationThread::spawn(dispatcher)?;
        let mut pipeline = GazePipeline::new(
            LandmarkSchema::FACE_MESH,
            shared,
            clock.clone(),
            actuation.handle(),
        );
        drive(&mut pipeline, &clock, &frames, true).await?;
        let stats = pipeline.stats();
        actuation.shutdown()?;
        Ok(stats)
    } else {
        let mut pipeline =
            GazePipeline::new(LandmarkSchema::FACE_MESH, shared, clock.clone(), dispatcher);
        drive(&mut pipeline, &clock, &frames, false).await?;
        let stats = pipeline.stats();
        info!(
            "Actuator received {} strokes",
            pipeline.into_sink().actuator().dispatched()
        );
        Ok(stats)
    }
}

async fn drive<S: CursorSink>(
    pipeline: &mut GazePipeline<S>,
    clock: &ManualClock,
    frames: &[FrameRecord],
    paced: bool,
) -> Result<()> {
    let mut previous_ms: Option<u64> = None;

    for record in frames {
        if paced {
            if let Some(previous) = previous_ms {
                let gap = record.timestamp_ms.saturating_sub(previous);
                tokio::time::sleep(Duration::from_millis(gap)).await;
            }
        }
        previous_ms = Some(record.timestamp_ms);
        clock.set(record.timestamp_ms);

        match (&record.landmarks, record.eye_area) {
            (None, Some(area)) => {
                pipeline.process_eye_area(area)?;
            }
            (landmarks, _) => {
                pipeline.process_frame(landmarks.as_ref())?;
            }
        }
    }

    Ok(())
}

fn print_summary(stats: &PipelineStats) {
    println!("Frames:        {}", stats.frames);
    println!("  without face {}", stats.frames_without_face);
    println!("Moves:         {}", stats.moves);
    println!("Taps:          {}", stats.taps);
    println!("Drags:         {} started, {} ended", stats.drag_starts, stats.drag_ends);
}

fn init_logging(args: &Args, logging: &LoggingConfig) -> Result<()> {
    use std::fs::File;

    let log_level = match args.verbose {
        0 => logging.level.as_str(),
        1 => "debug",
        _ => "trace",
    };
    let log_format = args.log_format.as_deref().unwrap_or(logging.format.as_str());

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!("gaze_pointer={},warn", log_level))
    });

    // If log file is specified, write to both stdout and file
    if let Some(log_file_path) = &args.log_file {
        let file = File::create(log_file_path)
            .with_context(|| format!("Failed to create log file: {}", log_file_path))?;

        match log_format {
            "json" => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .json()
                            .with_writer(std::io::stdout),
                    )
                    .with(
                        tracing_subscriber::fmt::layer()
                            .json()
                            .with_writer(file)
                            .with_ansi(false),
                    )
                    .init();
            }
            "compact" => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .compact()
                            .with_writer(std::io::stdout),
                    )
                    .with(
                        tracing_subscriber::fmt::layer()
                            .compact()
                            .with_writer(file)
                            .with_ansi(false),
                    )
                    .init();
            }
            _ => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .pretty()
                            .with_writer(std::io::stdout),
                    )
                    .with(
                        tracing_subscriber::fmt::layer()
                            .with_writer(file)
                            .with_ansi(false),
                    )
                    .init();
            }
        }
        info!("Logging to file: {}", log_file_path);
    } else {
        match log_format {
            "json" => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(tracing_subscriber::fmt::layer().json())
                    .init();
            }
            "compact" => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(tracing_subscriber::fmt::layer().compact())
                    .init();
            }
            _ => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(tracing_subscriber::fmt::layer().pretty())
                    .init();
            }
        }
    }

    Ok(())
}
