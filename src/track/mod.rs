//! Tracking core: the per-frame control loop stages.
//!
//! One pass per frame, in order:
//! filter (keep trackable records) → select (nearest to center) →
//! classify (zone from normalized position) → dispatch (command on
//! zone transition only).

mod controller;
mod filter;
mod select;
mod zone;

pub use controller::{Command, Controller, FrameOutcome, TrackingPipeline};
pub use filter::{filter_targets, FilterPolicy};
pub use select::{frame_center_x, select_target};
pub use zone::{Zone, ZoneThresholds};
