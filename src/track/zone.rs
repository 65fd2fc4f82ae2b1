//! Zone classification.
//!
//! The frame is split into three horizontal zones by two normalized
//! thresholds. A target's center picks the zone; no target at all is the
//! distinct `Stopped` zone, which the classifier never returns for a
//! real target.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use crate::detect::Target;

/// Discrete horizontal position of the tracked target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Zone {
    Left,
    Right,
    Middle,
    /// No valid target this frame. Also the controller's initial state.
    Stopped,
}

impl std::fmt::Display for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Zone::Left => "left",
            Zone::Right => "right",
            Zone::Middle => "middle",
            Zone::Stopped => "stopped",
        };
        f.pad(name)
    }
}

/// Validated pair of normalized zone boundaries.
///
/// The invariant `0 < left < right < 1` is enforced here, once, at
/// configuration time. A violated invariant would silently produce a
/// dead middle zone of zero or negative width, so construction fails
/// instead of correcting.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoneThresholds {
    left: f32,
    right: f32,
}

impl ZoneThresholds {
    pub fn new(left: f32, right: f32) -> Result<Self> {
        if !left.is_finite() || !right.is_finite() {
            return Err(anyhow!("zone thresholds must be finite"));
        }
        if !(0.0 < left && left < right && right < 1.0) {
            return Err(anyhow!(
                "zone thresholds must satisfy 0 < left < right < 1, got left={left} right={right}"
            ));
        }
        Ok(Self { left, right })
    }

    pub fn left(&self) -> f32 {
        self.left
    }

    pub fn right(&self) -> f32 {
        self.right
    }

    /// Classify a selected target (or its absence) into a zone.
    ///
    /// The outer zones use strict inequalities: a center exactly on a
    /// threshold lands in `Middle`.
    pub fn classify(&self, target: Option<&Target>, frame_width: u32) -> Zone {
        let Some(target) = target else {
            return Zone::Stopped;
        };
        let normalized = target.center_x / frame_width as f32;
        if normalized < self.left {
            Zone::Left
        } else if normalized > self.right {
            Zone::Right
        } else {
            Zone::Middle
        }
    }
}

impl Default for ZoneThresholds {
    /// The original deployment's boundaries: left 42.5%, right 57.5%.
    fn default() -> Self {
        Self {
            left: 0.425,
            right: 0.575,
        }
    }
}
