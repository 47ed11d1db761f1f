//! Repetition engine CLI
//!
//! Replays a synthetic push-up stream through a session and reports the
//! finished record. Useful for exercising thresholds and configuration
//! without a camera or pose model.

use clap::Parser;
use rep_engine::{
    config::{ConfigError, FileConfig},
    metrics::{MetricsRegistry, MetricsSnapshot},
    pose::{PoseSource, SourceError, SyntheticPoseSource},
    session::{
        replay, Clock, FrameReport, ManualClock, Notes, RecordError, ReplayOutcome, ReportError,
        Session, SessionRecord, SessionReporter, SystemClock, TickReport, TomlReporter,
    },
};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Count push-ups in a synthetic pose stream.
#[derive(Debug, Parser)]
#[command(name = "rep-engine", version, about)]
struct Args {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Repetitions performed by the synthetic athlete.
    #[arg(long)]
    reps: Option<u32>,

    /// Frames per second.
    #[arg(long)]
    fps: Option<u32>,

    /// Elbow angle noise amplitude in degrees.
    #[arg(long)]
    jitter: Option<f32>,

    /// Fraction of frames that are occluded.
    #[arg(long)]
    occlusion: Option<f32>,

    /// RNG seed for jitter and occlusion.
    #[arg(long)]
    seed: Option<u64>,

    /// Notes attached to the session record.
    #[arg(long)]
    notes: Option<String>,

    /// Pace frames against the wall clock.
    #[arg(long)]
    realtime: bool,

    /// Append the session record to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print final metrics in Prometheus text format.
    #[arg(long)]
    metrics: bool,
}

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Record(#[from] RecordError),
    #[error(transparent)]
    Report(#[from] ReportError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to install signal handler: {0}")]
    Signal(#[from] ctrlc::Error),
    #[error("metrics error: {0}")]
    Metrics(#[from] rep_engine::metrics::MetricsError),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    info!("Rep engine v{}", rep_engine::VERSION);

    if let Err(e) = run(args) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), AppError> {
    let mut config = match &args.config {
        Some(path) => FileConfig::from_file(path)?,
        None => FileConfig::default(),
    };
    apply_overrides(&mut config, &args);
    config.simulation.validate()?;
    let notes = Notes::new(&config.output.notes)?;

    let cancelled = Arc::new(AtomicBool::new(false));
    {
        let cancelled = Arc::clone(&cancelled);
        ctrlc::set_handler(move || cancelled.store(true, Ordering::SeqCst))?;
    }

    let sim = &config.simulation;
    let lead_in = config.engine.thresholds.setup() + Duration::from_millis(500);
    let mut source = SyntheticPoseSource::push_ups(sim.reps, sim.fps, lead_in);
    source.open(&sim.source)?;
    let interval = Duration::from_secs_f64(1.0 / f64::from(sim.fps));

    let publish = metrics_publisher(config.output.metrics_port)?;

    let finished = if sim.realtime {
        let session = Session::start(&config.engine, SystemClock::new())?;
        let pace = std::thread::sleep;
        run_session(session, &mut source, interval, &cancelled, pace, publish, notes)?
    } else {
        let clock = ManualClock::new(chrono::Utc::now());
        let session = Session::start(&config.engine, clock.clone())?;
        let pace = |d: Duration| clock.advance(d);
        run_session(session, &mut source, interval, &cancelled, pace, publish, notes)?
    };
    source.close();

    let Some((snapshot, record)) = finished else {
        warn!("Session cancelled, nothing recorded");
        return Ok(());
    };
    report(&record, config.output.path.as_ref())?;

    info!(
        count = record.count(),
        duration = %record.duration_formatted(),
        "Session complete"
    );

    if args.metrics {
        let registry = MetricsRegistry::new()?;
        registry.update(&snapshot);
        print!("{}", registry.encode()?);
    }

    Ok(())
}

type Publisher = Box<dyn FnMut(&MetricsSnapshot)>;

/// Starts the HTTP exporter on `port` and returns a callback that pushes
/// snapshots to it. Port 0 disables the exporter.
#[cfg(feature = "metrics")]
fn metrics_publisher(port: u16) -> Result<Publisher, AppError> {
    use rep_engine::metrics::{MetricsServer, MetricsServerConfig};

    if port == 0 {
        return Ok(Box::new(|_| {}));
    }

    let server = MetricsServer::new(MetricsServerConfig::with_port(port), MetricsRegistry::new()?);
    let state = server.state();
    let runtime = tokio::runtime::Runtime::new()?;
    std::thread::spawn(move || {
        if let Err(e) = runtime.block_on(server.run()) {
            error!("Metrics server stopped: {}", e);
        }
    });

    Ok(Box::new(move |snapshot| state.blocking_write().update(snapshot)))
}

#[cfg(not(feature = "metrics"))]
fn metrics_publisher(port: u16) -> Result<Publisher, AppError> {
    if port != 0 {
        warn!(port, "Built without the metrics feature, exporter disabled");
    }
    Ok(Box::new(|_| {}))
}

fn apply_overrides(config: &mut FileConfig, args: &Args) {
    let sim = &mut config.simulation;
    if let Some(reps) = args.reps {
        sim.reps = reps;
    }
    if let Some(fps) = args.fps {
        sim.fps = fps;
    }
    if let Some(jitter) = args.jitter {
        sim.source.jitter_deg = jitter;
    }
    if let Some(occlusion) = args.occlusion {
        sim.source.occlusion_rate = occlusion;
    }
    if let Some(seed) = args.seed {
        sim.source.seed = seed;
    }
    sim.realtime |= args.realtime;
    if let Some(notes) = &args.notes {
        config.output.notes = notes.clone();
    }
    if let Some(path) = &args.output {
        config.output.path = Some(path.clone());
    }
}

/// Replays `source` through `session`, then finishes it.
///
/// Returns the final metrics and the record, or `None` if cancelled.
fn run_session<C: Clock>(
    mut session: Session<C>,
    source: &mut SyntheticPoseSource,
    interval: Duration,
    cancelled: &AtomicBool,
    pace: impl FnMut(Duration),
    mut publish: impl FnMut(&MetricsSnapshot),
    notes: Notes,
) -> Result<Option<(MetricsSnapshot, SessionRecord)>, AppError> {
    info!(frames = source.remaining(), "Processing frames...");
    let mut last_status = None;

    let on_frame = |session: &Session<C>, tick: &TickReport, report: &FrameReport| {
        publish(&MetricsSnapshot::from_session(session));

        let status = (tick.phase, tick.setup_remaining_secs, tick.elapsed_secs);
        if last_status != Some(status) {
            last_status = Some(status);
            debug!(
                phase = %report.phase,
                clock = %tick.clock_text(),
                visibility = report.visibility_pct,
                guidance = %report.guidance,
                "Status"
            );
        }
    };
    let outcome = replay(&mut session, source, interval, cancelled, pace, on_frame)?;

    match outcome {
        ReplayOutcome::Cancelled => {
            session.cancel();
            Ok(None)
        }
        ReplayOutcome::Exhausted => {
            let snapshot = MetricsSnapshot::from_session(&session);
            let record = session.finish(notes)?;
            Ok(Some((snapshot, record)))
        }
    }
}

fn report(record: &SessionRecord, path: Option<&PathBuf>) -> Result<(), AppError> {
    match path {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            TomlReporter::new(file).report(record)?;
            info!(path = %path.display(), "Session record appended");
        }
        None => TomlReporter::new(std::io::stdout().lock()).report(record)?,
    }
    Ok(())
}
