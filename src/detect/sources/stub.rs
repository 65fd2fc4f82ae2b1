//! Synthetic detection source.
//!
//! Handles `stub://` source paths. Produces a deterministic scripted
//! scene so the full loop (filter, select, classify, dispatch) can run
//! without a camera, a model, or a device on the bench.
//!
//! The script: a single labeled target enters at the left edge, sweeps
//! across the frame, leaves at the right edge, then the scene goes empty
//! for a stretch before the sweep repeats. Every zone transition the
//! controller can make shows up within one period.

use anyhow::Result;

use crate::detect::record::{BoundingBox, DetectionRecord};
use crate::detect::source::{DetectionSource, FrameBatch};

/// Frames per sweep period. The target is visible for the first
/// three quarters and absent for the rest.
const SWEEP_PERIOD: u64 = 120;
const VISIBLE_FRAMES: u64 = 90;

/// Configuration for a synthetic source.
#[derive(Clone, Debug)]
pub struct StubConfig {
    /// Source path, e.g. "stub://walker". The host part names the label
    /// attached to synthetic detections.
    pub path: String,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
}

impl Default for StubConfig {
    fn default() -> Self {
        Self {
            path: "stub://person".to_string(),
            width: 1920,
            height: 1080,
        }
    }
}

/// Deterministic scripted detection source.
pub struct StubSource {
    config: StubConfig,
    label: String,
    frame_count: u64,
}

impl StubSource {
    pub fn new(config: StubConfig) -> Self {
        let label = config
            .path
            .strip_prefix("stub://")
            .filter(|rest| !rest.is_empty())
            .unwrap_or("person")
            .to_string();
        Self {
            config,
            label,
            frame_count: 0,
        }
    }

    fn scripted_records(&self) -> Vec<DetectionRecord> {
        let phase = self.frame_count % SWEEP_PERIOD;
        if phase >= VISIBLE_FRAMES {
            return Vec::new();
        }

        // Sweep the target's center from the left edge to the right edge.
        let width = self.config.width as f32;
        let height = self.config.height as f32;
        let progress = phase as f32 / (VISIBLE_FRAMES - 1) as f32;
        let center_x = progress * width;
        let half_w = width * 0.05;
        let bbox = BoundingBox::new(
            (center_x - half_w).max(0.0),
            height * 0.25,
            (center_x + half_w).min(width),
            height * 0.85,
        );
        vec![DetectionRecord::new(&self.label, 0.92, bbox)]
    }
}

impl DetectionSource for StubSource {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn next_batch(&mut self) -> Result<Option<FrameBatch>> {
        let records = self.scripted_records();
        self.frame_count += 1;
        Ok(Some(FrameBatch::new(
            self.config.width,
            self.config.height,
            records,
        )))
    }

    fn frames_produced(&self) -> u64 {
        self.frame_count
    }
}
