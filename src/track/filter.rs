//! Detection filter.
//!
//! First stage of the per-frame pass: keep only the records worth
//! tracking. A record survives when it extracts cleanly, its label is in
//! the allowed set, and its confidence strictly exceeds the floor.
//! Everything else is dropped in place; the frame is never aborted for a
//! bad record.

use std::collections::BTreeSet;

use anyhow::{anyhow, Result};

use crate::detect::{DetectionRecord, Target};

/// Which labels to track and how confident the detector must be.
#[derive(Clone, Debug)]
pub struct FilterPolicy {
    allowed_labels: BTreeSet<String>,
    min_confidence: f32,
}

impl FilterPolicy {
    /// Build a policy. The label set must be non-empty and the
    /// confidence floor must lie in (0, 1].
    pub fn new<I, S>(labels: I, min_confidence: f32) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let allowed_labels: BTreeSet<String> = labels.into_iter().map(Into::into).collect();
        if allowed_labels.is_empty() {
            return Err(anyhow!("filter policy requires at least one allowed label"));
        }
        if !min_confidence.is_finite() || min_confidence <= 0.0 || min_confidence > 1.0 {
            return Err(anyhow!(
                "min_confidence must be in (0, 1], got {min_confidence}"
            ));
        }
        Ok(Self {
            allowed_labels,
            min_confidence,
        })
    }

    pub fn allows_label(&self, label: &str) -> bool {
        self.allowed_labels.contains(label)
    }

    pub fn min_confidence(&self) -> f32 {
        self.min_confidence
    }
}

/// Filter raw records down to tracking candidates.
///
/// Pure: no side effects beyond a debug log of the drop count.
/// Confidence comparison is strict; a record exactly at the floor is
/// dropped.
pub fn filter_targets(records: &[DetectionRecord], policy: &FilterPolicy) -> Vec<Target> {
    let mut dropped_malformed = 0usize;
    let targets: Vec<Target> = records
        .iter()
        .filter_map(|record| match record.extract() {
            Some(detection) => Some(detection),
            None => {
                dropped_malformed += 1;
                None
            }
        })
        .filter(|det| policy.allows_label(&det.label) && det.confidence > policy.min_confidence())
        .map(Target::from)
        .collect();

    if dropped_malformed > 0 {
        log::debug!("dropped {dropped_malformed} malformed detection record(s)");
    }
    targets
}
