//! Detection source seam.
//!
//! The controller does not run inference itself. Anything that can produce
//! per-frame detection batches with frame geometry sits behind
//! `DetectionSource`: a replayed log, a synthetic walker, or (out of tree)
//! a real detector bridge.

use anyhow::Result;

use crate::detect::record::DetectionRecord;

/// One frame's worth of detector output.
///
/// Frame geometry travels with the batch; the core uses it to scale
/// thresholds and never stores it.
#[derive(Clone, Debug, Default)]
pub struct FrameBatch {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Raw records, not yet validated.
    pub records: Vec<DetectionRecord>,
}

impl FrameBatch {
    pub fn new(width: u32, height: u32, records: Vec<DetectionRecord>) -> Self {
        Self {
            width,
            height,
            records,
        }
    }

    /// An empty batch: a frame where the detector saw nothing.
    pub fn empty(width: u32, height: u32) -> Self {
        Self::new(width, height, Vec::new())
    }
}

/// Per-frame detection producer.
///
/// `next_batch` blocks until the next frame's detections are available.
/// `Ok(None)` is the normal end of stream, not an error.
pub trait DetectionSource {
    /// Source identifier for logs.
    fn name(&self) -> &'static str;

    /// Produce the next frame's batch, or `None` at end of stream.
    fn next_batch(&mut self) -> Result<Option<FrameBatch>>;

    /// Frames produced so far.
    fn frames_produced(&self) -> u64;
}
