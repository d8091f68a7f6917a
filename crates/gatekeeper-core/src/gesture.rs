//! Thumb gesture classification from hand landmark geometry.
//!
//! A fist (all four non-thumb fingers curled) is required before the thumb
//! is considered. Stateless: every frame is classified from scratch.

use crate::types::HandLandmarks;
use serde::Serialize;

const WRIST: usize = 0;
const THUMB_TIP: usize = 4;
/// Index, middle, ring and pinky fingertips. The knuckle each tip is
/// compared against sits two landmarks below it.
const FINGER_TIPS: [usize; 4] = [8, 12, 16, 20];
const KNUCKLE_OFFSET: usize = 2;

/// Gesture recognised in one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Gesture {
    #[default]
    NoHandDetected,
    /// Fist with the thumb above the wrist ("OK").
    FistThumbUp,
    /// Fist with the thumb below the wrist ("not OK").
    FistThumbDown,
}

impl Gesture {
    /// Display text for overlays and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoHandDetected => "not detected",
            Self::FistThumbUp => "ok",
            Self::FistThumbDown => "not ok",
        }
    }
}

/// Count the non-thumb fingers whose tip is below its knuckle on screen.
fn bent_fingers(hand: &HandLandmarks) -> usize {
    FINGER_TIPS
        .iter()
        .filter(|&&tip| hand.point(tip).y > hand.point(tip - KNUCKLE_OFFSET).y)
        .count()
}

/// Label for a single hand, or `None` when the hand produces no label
/// (open hand, or thumb tip level with the wrist).
pub fn classify_hand(hand: &HandLandmarks) -> Option<Gesture> {
    if bent_fingers(hand) != FINGER_TIPS.len() {
        return None;
    }

    let thumb_y = hand.point(THUMB_TIP).y;
    let wrist_y = hand.point(WRIST).y;

    if thumb_y < wrist_y {
        Some(Gesture::FistThumbUp)
    } else if thumb_y > wrist_y {
        Some(Gesture::FistThumbDown)
    } else {
        None
    }
}

/// Per-hand labels, in the provider's iteration order.
pub fn classify_each(hands: &[HandLandmarks]) -> Vec<Option<Gesture>> {
    hands.iter().map(classify_hand).collect()
}

/// Frame-level label: the last hand that produced a label wins; hands
/// that produce none leave the previous value in place.
pub fn classify(hands: &[HandLandmarks]) -> Gesture {
    hands
        .iter()
        .filter_map(classify_hand)
        .last()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Landmark, HAND_LANDMARK_COUNT};

    /// Build a hand with the wrist at y=0.8, knuckles at y=0.5 and the given
    /// fingertip and thumb-tip heights.
    fn hand(tip_y: [f32; 4], thumb_y: f32) -> HandLandmarks {
        let mut points = [Landmark { x: 0.5, y: 0.5, z: 0.0 }; HAND_LANDMARK_COUNT];
        points[WRIST].y = 0.8;
        points[THUMB_TIP].y = thumb_y;
        for (tip, y) in FINGER_TIPS.iter().zip(tip_y) {
            points[*tip].y = y;
        }
        HandLandmarks::new(points)
    }

    fn fist(thumb_y: f32) -> HandLandmarks {
        hand([0.6; 4], thumb_y)
    }

    fn open_hand(thumb_y: f32) -> HandLandmarks {
        hand([0.2; 4], thumb_y)
    }

    #[test]
    fn test_no_hands_is_default() {
        assert_eq!(classify(&[]), Gesture::NoHandDetected);
    }

    #[test]
    fn test_fist_thumb_up() {
        assert_eq!(classify(&[fist(0.3)]), Gesture::FistThumbUp);
    }

    #[test]
    fn test_fist_thumb_down() {
        assert_eq!(classify(&[fist(0.95)]), Gesture::FistThumbDown);
    }

    #[test]
    fn test_thumb_level_with_wrist_keeps_default() {
        assert_eq!(classify(&[fist(0.8)]), Gesture::NoHandDetected);
    }

    #[test]
    fn test_open_hand_never_labels() {
        assert_eq!(classify(&[open_hand(0.1)]), Gesture::NoHandDetected);
        assert_eq!(classify(&[open_hand(0.95)]), Gesture::NoHandDetected);
    }

    #[test]
    fn test_three_bent_fingers_is_not_a_fist() {
        let h = hand([0.6, 0.6, 0.6, 0.4], 0.3);
        assert_eq!(bent_fingers(&h), 3);
        assert_eq!(classify(&[h]), Gesture::NoHandDetected);
    }

    #[test]
    fn test_tip_level_with_knuckle_is_not_bent() {
        let h = hand([0.5, 0.6, 0.6, 0.6], 0.3);
        assert_eq!(bent_fingers(&h), 3);
    }

    #[test]
    fn test_last_labelled_hand_wins() {
        assert_eq!(classify(&[open_hand(0.3), fist(0.3)]), Gesture::FistThumbUp);
        assert_eq!(classify(&[fist(0.3), fist(0.95)]), Gesture::FistThumbDown);
    }

    #[test]
    fn test_unlabelled_last_hand_keeps_previous() {
        assert_eq!(classify(&[fist(0.95), open_hand(0.3)]), Gesture::FistThumbDown);
    }

    #[test]
    fn test_classify_each_reports_every_hand() {
        let labels = classify_each(&[open_hand(0.3), fist(0.3)]);
        assert_eq!(labels, vec![None, Some(Gesture::FistThumbUp)]);
    }
}
