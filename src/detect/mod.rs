//! Detection ingestion.
//!
//! This module provides the detector-facing side of the controller:
//! - `stub://` synthetic sources (testing, bench runs without hardware)
//! - JSON-lines replay of recorded detection logs
//!
//! All sources produce `FrameBatch` instances that flow into the tracking
//! pipeline. Sources carry frame geometry with every batch; the core never
//! caches it. Record validation happens downstream in the filter stage so
//! a malformed record costs one record, not one frame.

mod record;
mod source;
mod sources;

pub use record::{BoundingBox, Detection, DetectionRecord, Target};
pub use source::{DetectionSource, FrameBatch};
pub use sources::{JsonlSource, StubConfig, StubSource};

use anyhow::Result;

/// Open a detection source from a configured path.
///
/// `stub://<label>` paths get a synthetic scripted source; anything else
/// is treated as a local JSON-lines detection log.
pub fn open_source(path: &str, width: u32, height: u32) -> Result<Box<dyn DetectionSource>> {
    if path.starts_with("stub://") {
        Ok(Box::new(StubSource::new(StubConfig {
            path: path.to_string(),
            width,
            height,
        })))
    } else {
        Ok(Box::new(JsonlSource::open(path)?))
    }
}
