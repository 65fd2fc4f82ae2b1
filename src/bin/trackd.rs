//! trackd - pan tracking daemon
//!
//! This daemon:
//! 1. Ingests per-frame detection batches from the configured source
//! 2. Filters to the allowed labels above the confidence floor
//! 3. Selects the target nearest the frame center
//! 4. Classifies the target into a horizontal zone
//! 5. Dispatches a serial command only when the zone changes
//! 6. Halts the actuator unconditionally on teardown

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;

use pan_tracker::{
    open_source, ActuatorSink, DetectionSource, SerialSink, TrackdConfig, TrackingPipeline,
};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Path to a JSON config file (overrides TRACKD_CONFIG).
    #[arg(long)]
    config: Option<String>,
    /// Stop after this many frames (0 = run until the stream ends).
    #[arg(long, default_value_t = 0)]
    max_frames: u64,
}

#[derive(Debug, Default)]
struct LoopStats {
    frames: u64,
    commands: u64,
    send_failures: u64,
    /// A source error ends the loop; it is reported only after the
    /// teardown halt has gone out.
    source_error: Option<anyhow::Error>,
}

/// Run the frame loop until stop, stream end, frame budget, or a source
/// error. Never returns early through `?`: every exit path hands control
/// back to the caller, who owns the teardown halt.
fn run_loop(
    source: &mut dyn DetectionSource,
    sink: &mut dyn ActuatorSink,
    pipeline: &mut TrackingPipeline,
    stop: &AtomicBool,
    max_frames: u64,
    frame_interval: Duration,
) -> LoopStats {
    let mut stats = LoopStats::default();
    let mut last_health_log = Instant::now();

    loop {
        // Cooperative stop, checked once per frame boundary.
        if stop.load(Ordering::SeqCst) {
            log::info!("stop requested");
            break;
        }
        if max_frames > 0 && stats.frames >= max_frames {
            log::info!("reached max frames ({max_frames})");
            break;
        }

        let batch = match source.next_batch() {
            Ok(Some(batch)) => batch,
            Ok(None) => {
                log::info!("detection stream ended");
                break;
            }
            Err(e) => {
                log::error!("detection source failed: {e:#}");
                stats.source_error = Some(e);
                break;
            }
        };
        stats.frames += 1;

        let outcome = pipeline.process(&batch);
        if let Some(command) = outcome.command {
            log::info!("zone={} -> {}", outcome.zone, command);
            match sink.send(command) {
                Ok(()) => stats.commands += 1,
                // last_zone is already updated; the next differing zone
                // still triggers a fresh command.
                Err(e) => {
                    stats.send_failures += 1;
                    log::warn!("command delivery failed: {e:#}");
                }
            }
        }

        if last_health_log.elapsed() >= Duration::from_secs(5) {
            log::info!(
                "health: frames={} commands={} send_failures={} zone={}",
                stats.frames,
                stats.commands,
                stats.send_failures,
                pipeline.last_zone()
            );
            last_health_log = Instant::now();
        }

        std::thread::sleep(frame_interval);
    }

    stats
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if let Some(path) = &args.config {
        std::env::set_var("TRACKD_CONFIG", path);
    }
    let cfg = TrackdConfig::load()?;

    let policy = cfg.filter_policy()?;
    let thresholds = cfg.zone_thresholds()?;
    let mut pipeline = TrackingPipeline::new(policy, thresholds);

    let mut source = open_source(&cfg.source, cfg.frame_width, cfg.frame_height)?;
    let mut sink = SerialSink::open(cfg.serial.clone())?;

    let stop = Arc::new(AtomicBool::new(false));
    {
        let stop = stop.clone();
        ctrlc::set_handler(move || {
            stop.store(true, Ordering::SeqCst);
        })
        .context("install ctrl-c handler")?;
    }

    log::info!(
        "trackd running. source={} ({}) sink={} ({})",
        cfg.source,
        source.name(),
        cfg.serial.port,
        sink.name()
    );
    log::info!(
        "labels={:?} min_confidence={} thresholds=({}, {})",
        cfg.labels,
        cfg.min_confidence,
        cfg.left_threshold,
        cfg.right_threshold
    );

    let frame_interval = Duration::from_millis(1000 / u64::from(cfg.target_fps.max(1)));
    let stats = run_loop(
        source.as_mut(),
        &mut sink,
        &mut pipeline,
        &stop,
        args.max_frames,
        frame_interval,
    );

    // Safety invariant: never leave the actuator moving, whatever ended
    // the loop.
    let halt = pipeline.shutdown();
    if let Err(e) = sink.send(halt) {
        log::error!("final halt delivery failed: {e:#}");
    } else {
        log::info!("actuator halted");
    }

    log::info!(
        "trackd done: frames={} commands={} send_failures={}",
        stats.frames,
        stats.commands,
        stats.send_failures
    );

    match stats.source_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
