//! Serial actuator sink.
//!
//! Speaks the original device protocol: one byte per command over a
//! serial link (`R` counterclockwise, `L` clockwise, `S` stop). The wire
//! encoding lives here so the rest of the crate only sees `Command`.
//!
//! `stub://` port paths use a synthetic in-memory backend; real ports
//! require the `sink-serialport` feature.

use anyhow::Result;
#[cfg(feature = "sink-serialport")]
use anyhow::Context;
#[cfg(feature = "sink-serialport")]
use std::io::Write;
#[cfg(feature = "sink-serialport")]
use std::time::Duration;

use crate::sink::ActuatorSink;
use crate::track::Command;

/// One-byte wire encoding of a command, from the original device
/// firmware.
pub fn command_byte(command: Command) -> u8 {
    match command {
        Command::RotateCounterClockwise => b'R',
        Command::RotateClockwise => b'L',
        Command::Halt => b'S',
    }
}

/// Configuration for a serial sink.
#[derive(Clone, Debug)]
pub struct SerialConfig {
    /// Serial port path (e.g. "/dev/ttyUSB0"), or "stub://..." for the
    /// synthetic backend.
    pub port: String,
    /// Baud rate for real ports.
    pub baud: u32,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: "stub://actuator".to_string(),
            baud: 9600,
        }
    }
}

/// Serial command sink.
pub struct SerialSink {
    backend: SerialBackend,
}

enum SerialBackend {
    Synthetic(SyntheticSerialSink),
    #[cfg(feature = "sink-serialport")]
    Port(PortSerialSink),
}

impl SerialSink {
    pub fn open(config: SerialConfig) -> Result<Self> {
        if config.port.starts_with("stub://") {
            Ok(Self {
                backend: SerialBackend::Synthetic(SyntheticSerialSink::new(config)),
            })
        } else {
            #[cfg(feature = "sink-serialport")]
            {
                Ok(Self {
                    backend: SerialBackend::Port(PortSerialSink::open(config)?),
                })
            }
            #[cfg(not(feature = "sink-serialport"))]
            {
                anyhow::bail!("real serial ports require the sink-serialport feature")
            }
        }
    }

    /// Commands delivered so far.
    pub fn commands_sent(&self) -> u64 {
        match &self.backend {
            SerialBackend::Synthetic(sink) => sink.commands_sent,
            #[cfg(feature = "sink-serialport")]
            SerialBackend::Port(sink) => sink.commands_sent,
        }
    }
}

impl ActuatorSink for SerialSink {
    fn name(&self) -> &'static str {
        "serial"
    }

    fn send(&mut self, command: Command) -> Result<()> {
        match &mut self.backend {
            SerialBackend::Synthetic(sink) => sink.send(command),
            #[cfg(feature = "sink-serialport")]
            SerialBackend::Port(sink) => sink.send(command),
        }
    }
}

// ----------------------------------------------------------------------------
// Synthetic sink (stub://) for tests and bench runs
// ----------------------------------------------------------------------------

struct SyntheticSerialSink {
    config: SerialConfig,
    commands_sent: u64,
}

impl SyntheticSerialSink {
    fn new(config: SerialConfig) -> Self {
        log::info!("SerialSink: opened {} (synthetic)", config.port);
        Self {
            config,
            commands_sent: 0,
        }
    }

    fn send(&mut self, command: Command) -> Result<()> {
        self.commands_sent += 1;
        log::debug!(
            "SerialSink[{}]: would write 0x{:02x} ({})",
            self.config.port,
            command_byte(command),
            command
        );
        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Real serial port
// ----------------------------------------------------------------------------

#[cfg(feature = "sink-serialport")]
struct PortSerialSink {
    port: Box<dyn serialport::SerialPort>,
    commands_sent: u64,
}

#[cfg(feature = "sink-serialport")]
impl PortSerialSink {
    fn open(config: SerialConfig) -> Result<Self> {
        let port = serialport::new(&config.port, config.baud)
            .timeout(Duration::from_millis(250))
            .open()
            .with_context(|| format!("open serial port {}", config.port))?;
        log::info!("SerialSink: opened {} at {} baud", config.port, config.baud);
        Ok(Self {
            port,
            commands_sent: 0,
        })
    }

    fn send(&mut self, command: Command) -> Result<()> {
        self.port
            .write_all(&[command_byte(command)])
            .context("write command byte")?;
        self.commands_sent += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_encoding_matches_device_firmware() {
        assert_eq!(command_byte(Command::RotateCounterClockwise), b'R');
        assert_eq!(command_byte(Command::RotateClockwise), b'L');
        assert_eq!(command_byte(Command::Halt), b'S');
    }

    #[test]
    fn stub_port_opens_and_counts() {
        let mut sink = SerialSink::open(SerialConfig::default()).expect("stub port");
        sink.send(Command::Halt).unwrap();
        sink.send(Command::RotateClockwise).unwrap();
        assert_eq!(sink.commands_sent(), 2);
    }

    #[cfg(not(feature = "sink-serialport"))]
    #[test]
    fn real_port_requires_feature() {
        let config = SerialConfig {
            port: "/dev/ttyUSB0".to_string(),
            baud: 9600,
        };
        assert!(SerialSink::open(config).is_err());
    }
}
