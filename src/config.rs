use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::Path;

use crate::sink::SerialConfig;
use crate::track::{FilterPolicy, ZoneThresholds};

const DEFAULT_SOURCE: &str = "stub://walker";
const DEFAULT_SERIAL_PORT: &str = "stub://actuator";
const DEFAULT_SERIAL_BAUD: u32 = 9600;
const DEFAULT_MIN_CONFIDENCE: f32 = 0.8;
const DEFAULT_LEFT_THRESHOLD: f32 = 0.425;
const DEFAULT_RIGHT_THRESHOLD: f32 = 0.575;
const DEFAULT_TARGET_FPS: u32 = 30;
const DEFAULT_FRAME_WIDTH: u32 = 1920;
const DEFAULT_FRAME_HEIGHT: u32 = 1080;

fn default_labels() -> Vec<String> {
    vec!["person".to_string(), "dog".to_string()]
}

#[derive(Debug, Deserialize, Default)]
struct TrackdConfigFile {
    source: Option<String>,
    serial: Option<SerialConfigFile>,
    detector: Option<DetectorConfigFile>,
    tracking: Option<TrackingConfigFile>,
    frame: Option<FrameConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
struct SerialConfigFile {
    port: Option<String>,
    baud: Option<u32>,
}

#[derive(Debug, Deserialize, Default)]
struct DetectorConfigFile {
    labels: Option<Vec<String>>,
    min_confidence: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
struct TrackingConfigFile {
    left_threshold: Option<f32>,
    right_threshold: Option<f32>,
    target_fps: Option<u32>,
}

#[derive(Debug, Deserialize, Default)]
struct FrameConfigFile {
    width: Option<u32>,
    height: Option<u32>,
}

/// Daemon configuration: detection source, actuator link, and the
/// tracking thresholds.
#[derive(Debug, Clone)]
pub struct TrackdConfig {
    /// Detection source path ("stub://..." or a local JSONL log).
    pub source: String,
    pub serial: SerialConfig,
    /// Labels the filter keeps.
    pub labels: Vec<String>,
    /// Strict confidence floor, in (0, 1].
    pub min_confidence: f32,
    /// Normalized zone boundaries, 0 < left < right < 1.
    pub left_threshold: f32,
    pub right_threshold: f32,
    /// Loop pacing for live runs.
    pub target_fps: u32,
    /// Synthetic frame geometry for stub sources; replayed logs carry
    /// their own.
    pub frame_width: u32,
    pub frame_height: u32,
}

impl TrackdConfig {
    /// Load configuration: optional JSON file named by `TRACKD_CONFIG`,
    /// then env overrides, then validation. Validation failure is fatal;
    /// bad thresholds are never silently corrected.
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("TRACKD_CONFIG").ok();
        let file_cfg = match config_path.as_deref() {
            Some(path) => Some(read_config_file(Path::new(path))?),
            None => None,
        };
        let mut cfg = Self::from_file(file_cfg.unwrap_or_default());
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: TrackdConfigFile) -> Self {
        let source = file.source.unwrap_or_else(|| DEFAULT_SOURCE.to_string());
        let serial = SerialConfig {
            port: file
                .serial
                .as_ref()
                .and_then(|serial| serial.port.clone())
                .unwrap_or_else(|| DEFAULT_SERIAL_PORT.to_string()),
            baud: file
                .serial
                .as_ref()
                .and_then(|serial| serial.baud)
                .unwrap_or(DEFAULT_SERIAL_BAUD),
        };
        let labels = file
            .detector
            .as_ref()
            .and_then(|detector| detector.labels.clone())
            .unwrap_or_else(default_labels);
        let min_confidence = file
            .detector
            .as_ref()
            .and_then(|detector| detector.min_confidence)
            .unwrap_or(DEFAULT_MIN_CONFIDENCE);
        let left_threshold = file
            .tracking
            .as_ref()
            .and_then(|tracking| tracking.left_threshold)
            .unwrap_or(DEFAULT_LEFT_THRESHOLD);
        let right_threshold = file
            .tracking
            .as_ref()
            .and_then(|tracking| tracking.right_threshold)
            .unwrap_or(DEFAULT_RIGHT_THRESHOLD);
        let target_fps = file
            .tracking
            .as_ref()
            .and_then(|tracking| tracking.target_fps)
            .unwrap_or(DEFAULT_TARGET_FPS);
        let frame_width = file
            .frame
            .as_ref()
            .and_then(|frame| frame.width)
            .unwrap_or(DEFAULT_FRAME_WIDTH);
        let frame_height = file
            .frame
            .and_then(|frame| frame.height)
            .unwrap_or(DEFAULT_FRAME_HEIGHT);
        Self {
            source,
            serial,
            labels,
            min_confidence,
            left_threshold,
            right_threshold,
            target_fps,
            frame_width,
            frame_height,
        }
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(source) = std::env::var("TRACKD_SOURCE") {
            if !source.trim().is_empty() {
                self.source = source;
            }
        }
        if let Ok(port) = std::env::var("TRACKD_SERIAL_PORT") {
            if !port.trim().is_empty() {
                self.serial.port = port;
            }
        }
        if let Ok(baud) = std::env::var("TRACKD_SERIAL_BAUD") {
            self.serial.baud = baud
                .parse()
                .map_err(|_| anyhow!("TRACKD_SERIAL_BAUD must be an integer baud rate"))?;
        }
        if let Ok(labels) = std::env::var("TRACKD_LABELS") {
            let parsed = split_csv(&labels);
            if !parsed.is_empty() {
                self.labels = parsed;
            }
        }
        if let Ok(value) = std::env::var("TRACKD_MIN_CONFIDENCE") {
            self.min_confidence = parse_f32("TRACKD_MIN_CONFIDENCE", &value)?;
        }
        if let Ok(value) = std::env::var("TRACKD_LEFT_THRESHOLD") {
            self.left_threshold = parse_f32("TRACKD_LEFT_THRESHOLD", &value)?;
        }
        if let Ok(value) = std::env::var("TRACKD_RIGHT_THRESHOLD") {
            self.right_threshold = parse_f32("TRACKD_RIGHT_THRESHOLD", &value)?;
        }
        if let Ok(fps) = std::env::var("TRACKD_TARGET_FPS") {
            self.target_fps = fps
                .parse()
                .map_err(|_| anyhow!("TRACKD_TARGET_FPS must be an integer frame rate"))?;
        }
        Ok(())
    }

    fn validate(&mut self) -> Result<()> {
        // Construction of the typed policies carries the real checks.
        self.filter_policy()?;
        self.zone_thresholds()?;
        let unique: BTreeSet<&String> = self.labels.iter().collect();
        if unique.len() != self.labels.len() {
            return Err(anyhow!("detector labels must be unique"));
        }
        if self.serial.baud == 0 {
            return Err(anyhow!("serial baud rate must be greater than zero"));
        }
        if self.target_fps == 0 {
            return Err(anyhow!("target_fps must be greater than zero"));
        }
        if self.frame_width == 0 || self.frame_height == 0 {
            return Err(anyhow!("frame geometry must be non-zero"));
        }
        Ok(())
    }

    /// Typed filter policy from the configured labels and floor.
    pub fn filter_policy(&self) -> Result<FilterPolicy> {
        FilterPolicy::new(self.labels.iter().cloned(), self.min_confidence)
    }

    /// Typed zone thresholds from the configured boundaries.
    pub fn zone_thresholds(&self) -> Result<ZoneThresholds> {
        ZoneThresholds::new(self.left_threshold, self.right_threshold)
    }
}

fn read_config_file(path: &Path) -> Result<TrackdConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let cfg = serde_json::from_str(&raw)
        .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?;
    Ok(cfg)
}

fn parse_f32(name: &str, value: &str) -> Result<f32> {
    value
        .parse()
        .map_err(|_| anyhow!("{name} must be a number, got {value:?}"))
}

fn split_csv(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|entry| entry.trim())
        .filter(|entry| !entry.is_empty())
        .map(|entry| entry.to_string())
        .collect()
}
