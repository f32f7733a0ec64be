// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Detection result containers for one video frame.
//!
//! A [`FrameDetections`] value is what the detector hands to the encoder:
//! an optional pose landmark set plus zero or more hand landmark sets, in
//! the order the detector returned them.

use crate::landmarks::{HandLandmark, PoseLandmark};

/// Which physical hand a detection corresponds to, as labeled by the detector.
///
/// Carried for downstream consumers; the frame-vector encoding does not use
/// it (hand slots are assigned positionally).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handedness {
    /// Left hand.
    Left,
    /// Right hand.
    Right,
}

/// One detected body pose: 33 landmarks in fixed topology order.
#[derive(Debug, Clone, PartialEq)]
pub struct PoseDetection {
    /// Pose landmarks, ordered by the detector's fixed index 0..33.
    pub landmarks: Vec<PoseLandmark>,
}

impl PoseDetection {
    /// Create a pose detection from a landmark sequence.
    #[must_use]
    pub const fn new(landmarks: Vec<PoseLandmark>) -> Self {
        Self { landmarks }
    }

    /// Get the number of landmarks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    /// Check if there are no landmarks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }
}

/// One detected hand: 21 landmarks in fixed topology order.
#[derive(Debug, Clone, PartialEq)]
pub struct HandDetection {
    /// Hand landmarks, ordered by the detector's fixed index 0..21.
    pub landmarks: Vec<HandLandmark>,
    /// Handedness label, if the detector supplied one.
    pub handedness: Option<Handedness>,
    /// Detection confidence (0.0 to 1.0).
    pub score: f32,
}

impl HandDetection {
    /// Create a hand detection from a landmark sequence.
    #[must_use]
    pub const fn new(landmarks: Vec<HandLandmark>, handedness: Option<Handedness>, score: f32) -> Self {
        Self {
            landmarks,
            handedness,
            score,
        }
    }

    /// Get the number of landmarks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    /// Check if there are no landmarks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }
}

/// All detection results for one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameDetections {
    /// Body pose, if one was detected.
    pub pose: Option<PoseDetection>,
    /// Detected hands (0, 1, or 2), in detector order.
    pub hands: Vec<HandDetection>,
}

impl FrameDetections {
    /// Create an empty result (nothing detected).
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            pose: None,
            hands: Vec::new(),
        }
    }

    /// Check whether anything was detected in this frame.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pose.is_none() && self.hands.is_empty()
    }

    /// Generate a log string describing the results (e.g. "pose, 2 hands").
    #[must_use]
    pub fn verbose(&self) -> String {
        if self.is_empty() {
            return "(no detections)".to_string();
        }
        let mut parts = Vec::new();
        if self.pose.is_some() {
            parts.push("pose".to_string());
        }
        match self.hands.len() {
            0 => {}
            1 => parts.push("1 hand".to_string()),
            n => parts.push(format!("{n} hands")),
        }
        parts.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_frame() {
        let frame = FrameDetections::empty();
        assert!(frame.is_empty());
        assert_eq!(frame.verbose(), "(no detections)");
    }

    #[test]
    fn test_verbose_summary() {
        let pose = PoseDetection::new(vec![PoseLandmark::default(); 33]);
        let hand = HandDetection::new(vec![HandLandmark::default(); 21], None, 0.9);

        let frame = FrameDetections {
            pose: Some(pose),
            hands: vec![hand.clone(), hand],
        };
        assert!(!frame.is_empty());
        assert_eq!(frame.verbose(), "pose, 2 hands");
    }

    #[test]
    fn test_one_hand_no_pose() {
        let hand = HandDetection::new(vec![HandLandmark::default(); 21], Some(Handedness::Left), 0.8);
        let frame = FrameDetections {
            pose: None,
            hands: vec![hand],
        };
        assert_eq!(frame.verbose(), "1 hand");
    }
}
