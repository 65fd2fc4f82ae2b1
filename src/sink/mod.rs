//! Actuator sinks.
//!
//! The sink owns the physical connection; the core only hands it
//! `Command` values. Delivery failure is the sink's to report and the
//! caller's to log: the control loop never retries a stale command.

mod serial;

pub use serial::{SerialConfig, SerialSink};

use std::cell::Cell;

use anyhow::{anyhow, Result};

use crate::track::Command;

/// Command consumer for the pan actuator.
pub trait ActuatorSink {
    /// Sink identifier for logs.
    fn name(&self) -> &'static str;

    /// Deliver one command. Failure means this delivery only; the sink
    /// must stay usable for the next command.
    fn send(&mut self, command: Command) -> Result<()>;
}

/// In-memory sink that records every command it is handed.
///
/// Used by tests and the replay tool. `fail_next` injects a single
/// delivery failure to exercise the warn-and-continue path.
#[derive(Debug, Default)]
pub struct StubSink {
    sent: Vec<Command>,
    fail_next: Cell<bool>,
}

impl StubSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> &[Command] {
        &self.sent
    }

    /// Make the next `send` fail once.
    pub fn fail_next(&self) {
        self.fail_next.set(true);
    }
}

impl ActuatorSink for StubSink {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn send(&mut self, command: Command) -> Result<()> {
        if self.fail_next.take() {
            return Err(anyhow!("injected sink failure"));
        }
        self.sent.push(command);
        Ok(())
    }
}
