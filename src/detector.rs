// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Detector trait and configuration.
//!
//! The landmark detector is an external collaborator: this crate does not
//! implement keypoint detection, it wraps a host-provided model behind the
//! [`Detector`] trait and plugs the results into the encoding pipeline.
//! [`crate::model::LandmarkModel`] is the ONNX Runtime implementation.

use image::DynamicImage;

use crate::detection::FrameDetections;
use crate::error::Result;

/// Per-frame landmark detection.
///
/// Implementations take one RGB frame and return an optional pose landmark
/// set (33 × 4) plus zero or more hand landmark sets (each 21 × 3), in
/// whatever order the underlying model reports them.
pub trait Detector {
    /// Detect pose and hand landmarks in one frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying model fails; an *absent* detection
    /// (nothing in frame above the confidence thresholds) is not an error
    /// and is reported as `None` / an empty hand list.
    fn detect(&mut self, frame: &DynamicImage) -> Result<FrameDetections>;
}

/// Configuration for landmark detection.
///
/// Thresholds are passed opaquely to the detector implementation. Uses a
/// builder pattern for convenient construction.
///
/// # Example
///
/// ```rust
/// use signpose_extract::DetectorConfig;
///
/// let config = DetectorConfig::new()
///     .with_min_detection_confidence(0.5)
///     .with_min_tracking_confidence(0.5)
///     .with_max_hands(2);
/// ```
#[derive(Debug, Clone)]
pub struct DetectorConfig {
    /// Minimum confidence for a detection to be reported (0.0 to 1.0).
    /// Detections scoring below this are treated as absent.
    pub min_detection_confidence: f32,
    /// Minimum confidence for tracking a detection across frames (0.0 to 1.0).
    pub min_tracking_confidence: f32,
    /// Maximum number of hands to report per frame.
    pub max_hands: usize,
    /// Model input tensor size (height, width).
    pub input_size: (usize, usize),
    /// Number of intra-op threads for ONNX Runtime.
    /// Setting this to `0` allows ONNX Runtime to choose the optimal number.
    pub num_threads: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            min_detection_confidence: 0.5,
            min_tracking_confidence: 0.5,
            max_hands: 2,
            input_size: (256, 256),
            num_threads: 0,
        }
    }
}

impl DetectorConfig {
    /// Create a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum detection confidence.
    ///
    /// # Arguments
    ///
    /// * `threshold` - The minimum confidence score (0.0 to 1.0).
    ///
    /// # Returns
    ///
    /// * The modified `DetectorConfig`.
    #[must_use]
    pub const fn with_min_detection_confidence(mut self, threshold: f32) -> Self {
        self.min_detection_confidence = threshold;
        self
    }

    /// Set the minimum tracking confidence.
    ///
    /// # Arguments
    ///
    /// * `threshold` - The minimum confidence score (0.0 to 1.0).
    ///
    /// # Returns
    ///
    /// * The modified `DetectorConfig`.
    #[must_use]
    pub const fn with_min_tracking_confidence(mut self, threshold: f32) -> Self {
        self.min_tracking_confidence = threshold;
        self
    }

    /// Set the maximum number of hands reported per frame.
    ///
    /// # Arguments
    ///
    /// * `max` - The maximum hand count (the encoding uses at most 2).
    ///
    /// # Returns
    ///
    /// * The modified `DetectorConfig`.
    #[must_use]
    pub const fn with_max_hands(mut self, max: usize) -> Self {
        self.max_hands = max;
        self
    }

    /// Set the model input tensor size.
    ///
    /// # Arguments
    ///
    /// * `height` - The input tensor height.
    /// * `width` - The input tensor width.
    ///
    /// # Returns
    ///
    /// * The modified `DetectorConfig`.
    #[must_use]
    pub const fn with_input_size(mut self, height: usize, width: usize) -> Self {
        self.input_size = (height, width);
        self
    }

    /// Set the number of threads for inference.
    ///
    /// # Arguments
    ///
    /// * `threads` - The number of intra-op threads. Set to `0` for auto-configuration.
    ///
    /// # Returns
    ///
    /// * The modified `DetectorConfig`.
    #[must_use]
    pub const fn with_threads(mut self, threads: usize) -> Self {
        self.num_threads = threads;
        self
    }
}
