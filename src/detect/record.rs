//! Detection records and extraction.
//!
//! Detectors are external collaborators: they may emit records with missing
//! or inconsistent fields, and a single bad record must never abort the
//! frame. `DetectionRecord` is the lenient wire shape; `Detection` is the
//! validated form the tracking core operates on. Extraction failure drops
//! the record and nothing else.

use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x_min: f32,
    pub y_min: f32,
    pub x_max: f32,
    pub y_max: f32,
}

impl BoundingBox {
    pub fn new(x_min: f32, y_min: f32, x_max: f32, y_max: f32) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    /// A box is well-formed when all coordinates are finite and the
    /// max corner is not above/left of the min corner.
    pub fn is_well_formed(&self) -> bool {
        [self.x_min, self.y_min, self.x_max, self.y_max]
            .iter()
            .all(|v| v.is_finite())
            && self.x_max >= self.x_min
            && self.y_max >= self.y_min
    }

    /// Horizontal midpoint of the box.
    pub fn center_x(&self) -> f32 {
        (self.x_min + self.x_max) / 2.0
    }
}

/// Raw per-frame detection record as emitted by a detector.
///
/// All fields are optional so that a partially-populated record
/// deserializes instead of failing the whole batch.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DetectionRecord {
    pub label: Option<String>,
    pub confidence: Option<f32>,
    pub bbox: Option<BoundingBox>,
}

impl DetectionRecord {
    /// Convenience constructor for well-formed records.
    pub fn new(label: &str, confidence: f32, bbox: BoundingBox) -> Self {
        Self {
            label: Some(label.to_string()),
            confidence: Some(confidence),
            bbox: Some(bbox),
        }
    }

    /// Validate and extract the record.
    ///
    /// Returns `None` for any malformed record: missing field, confidence
    /// outside [0,1] or non-finite, or an inverted/non-finite box.
    pub fn extract(&self) -> Option<Detection> {
        let label = self.label.as_deref()?;
        let confidence = self.confidence?;
        let bbox = self.bbox?;
        if label.is_empty() {
            return None;
        }
        if !confidence.is_finite() || !(0.0..=1.0).contains(&confidence) {
            return None;
        }
        if !bbox.is_well_formed() {
            return None;
        }
        Some(Detection {
            label: label.to_string(),
            confidence,
            bbox,
        })
    }
}

/// A validated detection.
#[derive(Clone, Debug, PartialEq)]
pub struct Detection {
    pub label: String,
    pub confidence: f32,
    pub bbox: BoundingBox,
}

/// A detection chosen as a tracking candidate, with its derived
/// horizontal center. Produced fresh each frame, never persisted.
#[derive(Clone, Debug, PartialEq)]
pub struct Target {
    pub detection: Detection,
    pub center_x: f32,
}

impl From<Detection> for Target {
    fn from(detection: Detection) -> Self {
        let center_x = detection.bbox.center_x();
        Self {
            detection,
            center_x,
        }
    }
}

impl Target {
    pub fn label(&self) -> &str {
        &self.detection.label
    }

    pub fn bbox(&self) -> &BoundingBox {
        &self.detection.bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_accepts_well_formed_record() {
        let rec = DetectionRecord::new("person", 0.9, BoundingBox::new(10.0, 20.0, 110.0, 220.0));
        let det = rec.extract().expect("well-formed record");
        assert_eq!(det.label, "person");
        assert_eq!(det.bbox.center_x(), 60.0);
    }

    #[test]
    fn extract_drops_missing_fields() {
        let no_label = DetectionRecord {
            label: None,
            confidence: Some(0.9),
            bbox: Some(BoundingBox::new(0.0, 0.0, 1.0, 1.0)),
        };
        let no_conf = DetectionRecord {
            label: Some("person".into()),
            confidence: None,
            bbox: Some(BoundingBox::new(0.0, 0.0, 1.0, 1.0)),
        };
        let no_box = DetectionRecord {
            label: Some("person".into()),
            confidence: Some(0.9),
            bbox: None,
        };
        assert!(no_label.extract().is_none());
        assert!(no_conf.extract().is_none());
        assert!(no_box.extract().is_none());
    }

    #[test]
    fn extract_drops_inverted_box() {
        let rec = DetectionRecord::new("person", 0.9, BoundingBox::new(100.0, 0.0, 10.0, 50.0));
        assert!(rec.extract().is_none());
    }

    #[test]
    fn extract_drops_out_of_range_confidence() {
        let bbox = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        assert!(DetectionRecord::new("person", 1.5, bbox).extract().is_none());
        assert!(DetectionRecord::new("person", -0.1, bbox).extract().is_none());
        assert!(DetectionRecord::new("person", f32::NAN, bbox)
            .extract()
            .is_none());
    }

    #[test]
    fn record_with_unknown_fields_still_parses() {
        let json = r#"{"label":"dog","confidence":0.85,"bbox":{"x_min":0.0,"y_min":0.0,"x_max":50.0,"y_max":40.0},"track_id":7}"#;
        let rec: DetectionRecord = serde_json::from_str(json).expect("lenient parse");
        assert!(rec.extract().is_some());
    }

    #[test]
    fn target_derives_center() {
        let det = DetectionRecord::new("dog", 0.9, BoundingBox::new(100.0, 0.0, 300.0, 80.0))
            .extract()
            .unwrap();
        let target = Target::from(det);
        assert_eq!(target.center_x, 200.0);
    }
}
