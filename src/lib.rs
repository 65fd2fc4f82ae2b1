//! pan-tracker
//!
//! A closed-loop pan actuator controller. Each frame, a detection batch
//! flows through four stages and at most one command leaves for the
//! actuator:
//!
//! 1. **Filter**: keep detections whose label is allowed and whose
//!    confidence strictly exceeds the floor; drop malformed records.
//! 2. **Select**: pick the one target nearest the horizontal frame
//!    center (ties go to the first in input order).
//! 3. **Classify**: map the target's normalized center into a zone
//!    (Left / Middle / Right), or Stopped when there is no target.
//! 4. **Dispatch**: emit a command only on a zone transition. Staying
//!    in a zone is silent; the actuator is never flooded.
//!
//! Invariants the loop holds by construction:
//!
//! - The only cross-frame state is the controller's `last_zone`, updated
//!   at most once per frame; everything else is recomputed.
//! - `last_zone` reflects the most recently dispatched command's zone
//!   even when sink delivery fails: state update and I/O are decoupled.
//! - Teardown always sends one final halt, whatever the last zone was.
//!
//! # Module Structure
//!
//! - `detect`: detection sources and record extraction
//! - `track`: filter, selector, zone classifier, controller
//! - `sink`: actuator sinks (serial, stub)
//! - `config`: daemon configuration

pub mod config;
pub mod detect;
pub mod sink;
pub mod track;

pub use config::TrackdConfig;
pub use detect::{
    open_source, BoundingBox, Detection, DetectionRecord, DetectionSource, FrameBatch,
    JsonlSource, StubConfig, StubSource, Target,
};
pub use sink::{ActuatorSink, SerialConfig, SerialSink, StubSink};
pub use track::{
    filter_targets, frame_center_x, select_target, Command, Controller, FilterPolicy,
    FrameOutcome, TrackingPipeline, Zone, ZoneThresholds,
};
