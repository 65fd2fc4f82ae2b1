//! Target selector.
//!
//! The controller steers toward exactly one target per frame: the one
//! whose horizontal center is nearest the frame center. Ties go to the
//! first candidate in input order; callers rely on that stability, so it
//! is part of the contract, not an accident of the reduction.

use crate::detect::Target;

/// Horizontal frame center, in the same real-valued arithmetic the zone
/// classifier normalizes with.
pub fn frame_center_x(frame_width: u32) -> f32 {
    frame_width as f32 / 2.0
}

/// Pick the target nearest the frame's horizontal center.
///
/// Returns `None` for an empty candidate list. For equidistant
/// candidates the first in input order wins (stable min).
pub fn select_target(targets: &[Target], frame_width: u32) -> Option<&Target> {
    let center = frame_center_x(frame_width);
    let mut best: Option<(&Target, f32)> = None;
    for target in targets {
        let distance = (target.center_x - center).abs();
        match best {
            // Strict comparison keeps the earliest minimum.
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((target, distance)),
        }
    }
    best.map(|(target, _)| target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::{BoundingBox, Detection};

    fn target(label: &str, x_min: f32, x_max: f32) -> Target {
        Target::from(Detection {
            label: label.to_string(),
            confidence: 0.9,
            bbox: BoundingBox::new(x_min, 0.0, x_max, 100.0),
        })
    }

    #[test]
    fn empty_input_selects_nothing() {
        assert!(select_target(&[], 1000).is_none());
    }

    #[test]
    fn picks_nearest_to_center() {
        let targets = vec![
            target("far", 0.0, 200.0),    // center 100
            target("near", 400.0, 560.0), // center 480
            target("mid", 700.0, 900.0),  // center 800
        ];
        let chosen = select_target(&targets, 1000).expect("one target");
        assert_eq!(chosen.label(), "near");
    }

    #[test]
    fn equidistant_tie_goes_to_first_in_input_order() {
        // Both are 100 px from the center of a 1000 px frame.
        let targets = vec![
            target("first", 300.0, 500.0),  // center 400
            target("second", 500.0, 700.0), // center 600
        ];
        let chosen = select_target(&targets, 1000).expect("one target");
        assert_eq!(chosen.label(), "first");
    }

    #[test]
    fn selection_is_from_the_input() {
        let targets = vec![target("only", 10.0, 30.0)];
        let chosen = select_target(&targets, 640).expect("one target");
        assert!(std::ptr::eq(chosen, &targets[0]));
    }
}
