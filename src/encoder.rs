// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Frame landmark encoding.
//!
//! This module flattens one frame's detection results into the fixed
//! 258-value vector consumed by downstream training:
//!
//! | Positions | Content |
//! |-----------|---------|
//! | 0–131     | 33 pose points × (x, y, z, visibility), point-major |
//! | 132–194   | first hand slot: 21 points × (x, y, z) |
//! | 195–257   | second hand slot: 21 points × (x, y, z) |
//!
//! Absent detections are zero-padded in place so offsets never shift. Hand
//! slots are assigned positionally: the first hand the detector returned
//! fills the first slot, regardless of which physical hand it is. The
//! detector's handedness labels are deliberately not consulted here.

use crate::detection::{FrameDetections, HandDetection, PoseDetection};
use crate::error::{ExtractError, Result};
use crate::landmarks::{
    FRAME_VECTOR_LEN, FrameVector, HAND_LANDMARK_COUNT, HAND_VALUE_COUNT, POSE_LANDMARK_COUNT,
};

/// Encode one frame's detections into a 258-value vector.
///
/// Pure function of its inputs: no side effects, deterministic output.
///
/// # Arguments
///
/// * `detections` - The frame's pose and hand detection results.
///
/// # Returns
///
/// A vector of exactly 258 floats laid out as described in the module docs.
///
/// # Errors
///
/// Returns [`ExtractError::ShapeMismatch`] if a present pose does not have
/// exactly 33 landmarks, a present hand does not have exactly 21, or more
/// than two hands were supplied. No partial output is produced.
pub fn encode_frame(detections: &FrameDetections) -> Result<FrameVector> {
    // Validate every block before emitting anything.
    if let Some(pose) = &detections.pose {
        check_pose_shape(pose)?;
    }
    if detections.hands.len() > 2 {
        return Err(ExtractError::ShapeMismatch(format!(
            "expected at most 2 hand detections, got {}",
            detections.hands.len()
        )));
    }
    for hand in &detections.hands {
        check_hand_shape(hand)?;
    }

    let mut values = Vec::with_capacity(FRAME_VECTOR_LEN);

    match &detections.pose {
        Some(pose) => {
            for lm in &pose.landmarks {
                values.push(lm.x);
                values.push(lm.y);
                values.push(lm.z);
                values.push(lm.visibility);
            }
        }
        None => values.resize(POSE_LANDMARK_COUNT * 4, 0.0),
    }

    for slot in 0..2 {
        match detections.hands.get(slot) {
            Some(hand) => {
                for lm in &hand.landmarks {
                    values.push(lm.x);
                    values.push(lm.y);
                    values.push(lm.z);
                }
            }
            None => values.resize(values.len() + HAND_VALUE_COUNT, 0.0),
        }
    }

    debug_assert_eq!(values.len(), FRAME_VECTOR_LEN);
    Ok(values)
}

fn check_pose_shape(pose: &PoseDetection) -> Result<()> {
    if pose.len() == POSE_LANDMARK_COUNT {
        Ok(())
    } else {
        Err(ExtractError::ShapeMismatch(format!(
            "expected {POSE_LANDMARK_COUNT} pose landmarks, got {}",
            pose.len()
        )))
    }
}

fn check_hand_shape(hand: &HandDetection) -> Result<()> {
    if hand.len() == HAND_LANDMARK_COUNT {
        Ok(())
    } else {
        Err(ExtractError::ShapeMismatch(format!(
            "expected {HAND_LANDMARK_COUNT} hand landmarks, got {}",
            hand.len()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::Handedness;
    use crate::landmarks::{HandLandmark, PoseLandmark};

    fn uniform_pose(x: f32, y: f32, z: f32, visibility: f32) -> PoseDetection {
        PoseDetection::new(vec![PoseLandmark::new(x, y, z, visibility); 33])
    }

    fn uniform_hand(x: f32, y: f32, z: f32) -> HandDetection {
        HandDetection::new(vec![HandLandmark::new(x, y, z); 21], None, 1.0)
    }

    #[test]
    fn test_output_length_always_258() {
        let cases = [
            FrameDetections::empty(),
            FrameDetections {
                pose: Some(uniform_pose(0.1, 0.2, 0.3, 0.9)),
                hands: vec![],
            },
            FrameDetections {
                pose: None,
                hands: vec![uniform_hand(0.5, 0.5, 0.0)],
            },
            FrameDetections {
                pose: Some(uniform_pose(0.1, 0.2, 0.3, 0.9)),
                hands: vec![uniform_hand(0.5, 0.5, 0.0), uniform_hand(0.6, 0.6, 0.1)],
            },
        ];

        for detections in &cases {
            let vector = encode_frame(detections).unwrap();
            assert_eq!(vector.len(), 258);
        }
    }

    #[test]
    fn test_nothing_detected_is_all_zeros() {
        let vector = encode_frame(&FrameDetections::empty()).unwrap();
        assert_eq!(vector.len(), 258);
        assert!(vector.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_pose_only() {
        let detections = FrameDetections {
            pose: Some(uniform_pose(0.1, 0.2, 0.3, 0.9)),
            hands: vec![],
        };
        let vector = encode_frame(&detections).unwrap();

        // Point-major pose values at 0..132.
        for point in 0..33 {
            let base = point * 4;
            assert!((vector[base] - 0.1).abs() < 1e-6);
            assert!((vector[base + 1] - 0.2).abs() < 1e-6);
            assert!((vector[base + 2] - 0.3).abs() < 1e-6);
            assert!((vector[base + 3] - 0.9).abs() < 1e-6);
        }
        // Hand region untouched.
        assert!(vector[132..258].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_one_hand_fills_first_slot() {
        let detections = FrameDetections {
            pose: Some(uniform_pose(0.1, 0.2, 0.3, 0.9)),
            hands: vec![uniform_hand(0.5, 0.5, 0.0)],
        };
        let vector = encode_frame(&detections).unwrap();

        assert!((vector[132] - 0.5).abs() < 1e-6);
        assert!((vector[133] - 0.5).abs() < 1e-6);
        assert!((vector[134] - 0.0).abs() < 1e-6);
        // Second slot is zeros; pose region reflects pose input independently.
        assert!(vector[195..258].iter().all(|&v| v == 0.0));
        assert!((vector[0] - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_two_hands_in_detector_order() {
        let detections = FrameDetections {
            pose: None,
            hands: vec![uniform_hand(0.25, 0.25, 0.1), uniform_hand(0.75, 0.75, 0.2)],
        };
        let vector = encode_frame(&detections).unwrap();

        assert!((vector[132] - 0.25).abs() < 1e-6);
        assert!((vector[195] - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_handedness_labels_do_not_reorder_slots() {
        // A hand labeled Right still lands in the first slot if it came first.
        let mut right_first = uniform_hand(0.9, 0.9, 0.0);
        right_first.handedness = Some(Handedness::Right);
        let mut left_second = uniform_hand(0.1, 0.1, 0.0);
        left_second.handedness = Some(Handedness::Left);

        let detections = FrameDetections {
            pose: None,
            hands: vec![right_first, left_second],
        };
        let vector = encode_frame(&detections).unwrap();
        assert!((vector[132] - 0.9).abs() < 1e-6);
        assert!((vector[195] - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_worked_example() {
        // pose = 33 × (0.1, 0.2, 0.3, 0.9), hands = one hand 21 × (0.5, 0.5, 0.0)
        let detections = FrameDetections {
            pose: Some(uniform_pose(0.1, 0.2, 0.3, 0.9)),
            hands: vec![uniform_hand(0.5, 0.5, 0.0)],
        };
        let vector = encode_frame(&detections).unwrap();

        assert_eq!(&vector[0..4], &[0.1, 0.2, 0.3, 0.9]);
        assert_eq!(&vector[128..132], &[0.1, 0.2, 0.3, 0.9]);
        assert_eq!(&vector[132..135], &[0.5, 0.5, 0.0]);
        assert_eq!(&vector[192..195], &[0.5, 0.5, 0.0]);
        assert!(vector[195..258].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_malformed_pose_is_shape_mismatch() {
        let detections = FrameDetections {
            pose: Some(PoseDetection::new(vec![PoseLandmark::default(); 30])),
            hands: vec![],
        };
        let err = encode_frame(&detections).unwrap_err();
        assert!(matches!(err, ExtractError::ShapeMismatch(_)));
    }

    #[test]
    fn test_malformed_hand_is_shape_mismatch() {
        let detections = FrameDetections {
            pose: None,
            hands: vec![HandDetection::new(vec![HandLandmark::default(); 20], None, 1.0)],
        };
        let err = encode_frame(&detections).unwrap_err();
        assert!(matches!(err, ExtractError::ShapeMismatch(_)));
    }

    #[test]
    fn test_three_hands_is_shape_mismatch() {
        let detections = FrameDetections {
            pose: None,
            hands: vec![
                uniform_hand(0.1, 0.1, 0.0),
                uniform_hand(0.2, 0.2, 0.0),
                uniform_hand(0.3, 0.3, 0.0),
            ],
        };
        let err = encode_frame(&detections).unwrap_err();
        assert!(matches!(err, ExtractError::ShapeMismatch(_)));
    }

    #[test]
    fn test_bad_second_hand_produces_no_partial_output() {
        // First hand valid, second malformed: the whole frame fails.
        let detections = FrameDetections {
            pose: Some(uniform_pose(0.1, 0.2, 0.3, 0.9)),
            hands: vec![
                uniform_hand(0.5, 0.5, 0.0),
                HandDetection::new(vec![HandLandmark::default(); 5], None, 1.0),
            ],
        };
        assert!(encode_frame(&detections).is_err());
    }
}
