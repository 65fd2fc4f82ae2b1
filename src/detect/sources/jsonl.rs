//! JSON-lines replay source.
//!
//! Replays a recorded detection log: one JSON object per line, each a
//! full `FrameBatch` (frame geometry plus raw records). Local files
//! only, no URL schemes. A line that fails to parse is skipped with a
//! warning; end of file is the normal end of stream.

use std::fs::File;
use std::io::{BufRead, BufReader};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::detect::record::DetectionRecord;
use crate::detect::source::{DetectionSource, FrameBatch};

/// Wire shape for one replayed frame.
#[derive(Debug, Serialize, Deserialize)]
struct FrameLine {
    width: u32,
    height: u32,
    #[serde(default)]
    detections: Vec<DetectionRecord>,
}

/// Detection log replay source.
pub struct JsonlSource {
    path: String,
    reader: BufReader<File>,
    line_no: u64,
    frame_count: u64,
}

impl JsonlSource {
    pub fn open(path: &str) -> Result<Self> {
        if !is_local_file_path(path) {
            return Err(anyhow!(
                "detection log replay only supports local paths (no URL schemes)"
            ));
        }
        let file = File::open(path).with_context(|| format!("open detection log {path}"))?;
        Ok(Self {
            path: path.to_string(),
            reader: BufReader::new(file),
            line_no: 0,
            frame_count: 0,
        })
    }
}

impl DetectionSource for JsonlSource {
    fn name(&self) -> &'static str {
        "jsonl"
    }

    fn next_batch(&mut self) -> Result<Option<FrameBatch>> {
        loop {
            let mut line = String::new();
            let read = self
                .reader
                .read_line(&mut line)
                .with_context(|| format!("read detection log {}", self.path))?;
            if read == 0 {
                return Ok(None);
            }
            self.line_no += 1;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match serde_json::from_str::<FrameLine>(trimmed) {
                // Zero geometry would make every normalized position
                // infinite downstream; such a frame is as unusable as an
                // unparseable one.
                Ok(frame) if frame.width == 0 || frame.height == 0 => {
                    log::warn!(
                        "skipping line {} in {}: zero frame geometry ({}x{})",
                        self.line_no,
                        self.path,
                        frame.width,
                        frame.height
                    );
                }
                Ok(frame) => {
                    self.frame_count += 1;
                    return Ok(Some(FrameBatch::new(
                        frame.width,
                        frame.height,
                        frame.detections,
                    )));
                }
                Err(e) => {
                    log::warn!(
                        "skipping malformed line {} in {}: {}",
                        self.line_no,
                        self.path,
                        e
                    );
                }
            }
        }
    }

    fn frames_produced(&self) -> u64 {
        self.frame_count
    }
}

fn is_local_file_path(path: &str) -> bool {
    !path.contains("://")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_log(lines: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp log");
        for line in lines {
            writeln!(file, "{line}").expect("write line");
        }
        file
    }

    #[test]
    fn replays_frames_in_order() {
        let file = write_log(&[
            r#"{"width":1000,"height":600,"detections":[{"label":"person","confidence":0.9,"bbox":{"x_min":100.0,"y_min":0.0,"x_max":300.0,"y_max":400.0}}]}"#,
            r#"{"width":1000,"height":600,"detections":[]}"#,
        ]);
        let mut source = JsonlSource::open(file.path().to_str().unwrap()).expect("open log");
        assert_eq!(source.name(), "jsonl");

        let first = source.next_batch().unwrap().expect("first frame");
        assert_eq!(first.width, 1000);
        assert_eq!(first.records.len(), 1);

        let second = source.next_batch().unwrap().expect("second frame");
        assert!(second.records.is_empty());

        assert!(source.next_batch().unwrap().is_none());
        assert_eq!(source.frames_produced(), 2);
    }

    #[test]
    fn malformed_lines_are_skipped_not_fatal() {
        let file = write_log(&[
            "this is not json",
            "",
            r#"{"width":800,"height":600,"detections":[]}"#,
        ]);
        let mut source = JsonlSource::open(file.path().to_str().unwrap()).expect("open log");

        let batch = source.next_batch().unwrap().expect("surviving frame");
        assert_eq!(batch.width, 800);
        assert!(source.next_batch().unwrap().is_none());
    }

    #[test]
    fn rejects_url_schemes() {
        assert!(JsonlSource::open("http://example.com/log.jsonl").is_err());
    }

    #[test]
    fn zero_geometry_frames_are_skipped() {
        let file = write_log(&[
            r#"{"width":0,"height":600,"detections":[{"label":"person","confidence":0.9,"bbox":{"x_min":100.0,"y_min":0.0,"x_max":300.0,"y_max":400.0}}]}"#,
            r#"{"width":1000,"height":0,"detections":[]}"#,
            r#"{"width":1000,"height":600,"detections":[]}"#,
        ]);
        let mut source = JsonlSource::open(file.path().to_str().unwrap()).expect("open log");

        let batch = source.next_batch().unwrap().expect("surviving frame");
        assert_eq!(batch.width, 1000);
        assert_eq!(batch.height, 600);
        assert!(source.next_batch().unwrap().is_none());
        assert_eq!(source.frames_produced(), 1);
    }

    #[test]
    fn missing_detections_field_defaults_to_empty() {
        let file = write_log(&[r#"{"width":640,"height":480}"#]);
        let mut source = JsonlSource::open(file.path().to_str().unwrap()).expect("open log");
        let batch = source.next_batch().unwrap().expect("frame");
        assert!(batch.records.is_empty());
    }
}
