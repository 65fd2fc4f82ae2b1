//! replay - run a recorded detection log through the tracking pipeline
//!
//! Prints the command timeline a live run would have produced, without
//! touching any serial hardware. Useful for tuning zone thresholds and
//! the confidence floor against captured footage.

use anyhow::Result;
use clap::Parser;

use pan_tracker::{
    ActuatorSink, DetectionSource, FilterPolicy, JsonlSource, StubSink, TrackingPipeline,
    ZoneThresholds,
};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Path to a JSONL detection log (one frame batch per line).
    log: String,
    /// Comma-separated labels to track.
    #[arg(long, default_value = "person,dog")]
    labels: String,
    /// Strict confidence floor in (0, 1].
    #[arg(long, default_value_t = 0.8)]
    min_confidence: f32,
    /// Left zone boundary (normalized).
    #[arg(long, default_value_t = 0.425)]
    left_threshold: f32,
    /// Right zone boundary (normalized).
    #[arg(long, default_value_t = 0.575)]
    right_threshold: f32,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let labels: Vec<&str> = args
        .labels
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    let policy = FilterPolicy::new(labels, args.min_confidence)?;
    let thresholds = ZoneThresholds::new(args.left_threshold, args.right_threshold)?;

    let mut source = JsonlSource::open(&args.log)?;
    let mut pipeline = TrackingPipeline::new(policy, thresholds);
    let mut sink = StubSink::new();

    while let Some(batch) = source.next_batch()? {
        let frame = source.frames_produced();
        let outcome = pipeline.process(&batch);
        if let Some(command) = outcome.command {
            let center = outcome
                .target
                .as_ref()
                .map(|t| format!("{:.1}", t.center_x))
                .unwrap_or_else(|| "-".to_string());
            println!("frame {frame:>6}  zone={:<7}  center_x={center:>8}  -> {command}", outcome.zone);
            sink.send(command)?;
        }
    }

    let halt = pipeline.shutdown();
    sink.send(halt)?;
    println!(
        "replayed {} frame(s), {} command(s) incl. final {}",
        source.frames_produced(),
        sink.sent().len(),
        halt
    );
    Ok(())
}
