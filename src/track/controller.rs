//! Zone-transition controller and per-frame pipeline.
//!
//! The controller is the only stateful piece of the core: it remembers
//! the zone of the last dispatched command and emits a new command only
//! on a zone change. Edge-triggered dispatch keeps the actuator from
//! being flooded with identical commands at frame rate.
//!
//! The controller performs no I/O. It hands a `Command` to the caller,
//! who forwards it to the actuator sink; a failed delivery never rolls
//! `last_zone` back, so the next differing zone still triggers a fresh
//! command.

use crate::detect::{FrameBatch, Target};
use crate::track::filter::{filter_targets, FilterPolicy};
use crate::track::select::select_target;
use crate::track::zone::{Zone, ZoneThresholds};

/// Motion command for the pan actuator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    RotateCounterClockwise,
    RotateClockwise,
    Halt,
}

impl Command {
    /// Command emitted on entry to a zone.
    pub fn for_zone(zone: Zone) -> Self {
        match zone {
            Zone::Left => Command::RotateCounterClockwise,
            Zone::Right => Command::RotateClockwise,
            Zone::Middle | Zone::Stopped => Command::Halt,
        }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Command::RotateCounterClockwise => "rotate-counterclockwise",
            Command::RotateClockwise => "rotate-clockwise",
            Command::Halt => "halt",
        };
        f.pad(name)
    }
}

/// Edge-triggered zone-transition state machine.
///
/// Starts in `Stopped`. `last_zone` always reflects the most recently
/// dispatched command's zone; it is updated at most once per frame.
#[derive(Clone, Debug)]
pub struct Controller {
    last_zone: Zone,
}

impl Controller {
    pub fn new() -> Self {
        Self {
            last_zone: Zone::Stopped,
        }
    }

    pub fn last_zone(&self) -> Zone {
        self.last_zone
    }

    /// Observe this frame's classified zone.
    ///
    /// On a transition, updates `last_zone` and returns the command for
    /// the new zone. A repeated zone returns `None`: N consecutive
    /// frames in one zone dispatch exactly one command.
    pub fn observe(&mut self, new_zone: Zone) -> Option<Command> {
        if new_zone == self.last_zone {
            return None;
        }
        self.last_zone = new_zone;
        Some(Command::for_zone(new_zone))
    }

    /// Terminal command for stream teardown.
    ///
    /// Always `Halt`, regardless of `last_zone`: the actuator must never
    /// be left moving when the loop exits.
    pub fn shutdown(&self) -> Command {
        Command::Halt
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of one frame's pass through the pipeline.
#[derive(Clone, Debug)]
pub struct FrameOutcome {
    /// Zone classified this frame.
    pub zone: Zone,
    /// Command to dispatch, if the zone changed.
    pub command: Option<Command>,
    /// The selected target, for overlay/highlight by callers.
    pub target: Option<Target>,
}

/// The full per-frame pass: filter, select, classify, dispatch.
///
/// Owns the controller state; everything else is pure and recomputed
/// per frame. Deterministic: identical batches against an identical
/// prior `last_zone` produce identical outcomes.
pub struct TrackingPipeline {
    policy: FilterPolicy,
    thresholds: ZoneThresholds,
    controller: Controller,
}

impl TrackingPipeline {
    pub fn new(policy: FilterPolicy, thresholds: ZoneThresholds) -> Self {
        Self {
            policy,
            thresholds,
            controller: Controller::new(),
        }
    }

    pub fn last_zone(&self) -> Zone {
        self.controller.last_zone()
    }

    /// Process one frame's detection batch.
    pub fn process(&mut self, batch: &FrameBatch) -> FrameOutcome {
        let targets = filter_targets(&batch.records, &self.policy);
        let selected = select_target(&targets, batch.width).cloned();
        let zone = self.thresholds.classify(selected.as_ref(), batch.width);
        let command = self.controller.observe(zone);
        FrameOutcome {
            zone,
            command,
            target: selected,
        }
    }

    /// Terminal halt for stream teardown. Unconditional.
    pub fn shutdown(&self) -> Command {
        self.controller.shutdown()
    }
}
