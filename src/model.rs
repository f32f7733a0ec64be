// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! ONNX landmark model loading and per-frame detection.
//!
//! This module wraps two host-provided ONNX landmark models (body pose and
//! hands) behind the [`Detector`] trait. The models do all the detection
//! work; the wrapper resizes frames into input tensors, runs the sessions,
//! and maps the output tensors to typed landmark sets.
//!
//! Expected model outputs:
//!
//! - pose model: landmarks `(1, 33, 4)` as (x, y, z, visibility), plus a
//!   presence score `(1,)` or `(1, 1)`.
//! - hand model: landmarks `(N, 21, 3)` as (x, y, z) for N detected hands,
//!   plus scores `(N,)`, plus an optional third output `(N,)` giving the
//!   probability that each hand is a left hand.
//!
//! Both sessions are acquired once in [`LandmarkModel::load`] and released
//! when the value drops, on every exit path.

use std::path::Path;

use image::DynamicImage;
use ndarray::Array4;
#[cfg(feature = "cuda")]
use ort::execution_providers::CUDAExecutionProvider;
#[cfg(feature = "coreml")]
use ort::execution_providers::CoreMLExecutionProvider;
use ort::session::Session;
use ort::value::TensorRef;

use crate::detection::{FrameDetections, HandDetection, Handedness, PoseDetection};
use crate::detector::{Detector, DetectorConfig};
use crate::error::{ExtractError, Result};
use crate::landmarks::{HAND_LANDMARK_COUNT, HandLandmark, POSE_LANDMARK_COUNT, PoseLandmark};

/// Default pose landmark model filename.
pub const DEFAULT_POSE_MODEL: &str = "pose_landmarker.onnx";

/// Default hand landmark model filename.
pub const DEFAULT_HAND_MODEL: &str = "hand_landmarker.onnx";

/// One raw model output: flattened data plus its shape.
type RawOutput = (Vec<f32>, Vec<usize>);

/// Pose and hand landmark detector backed by ONNX Runtime.
///
/// # Example
///
/// ```no_run
/// use signpose_extract::{DetectorConfig, LandmarkModel};
///
/// let config = DetectorConfig::new().with_min_detection_confidence(0.5);
/// let model = LandmarkModel::load("pose_landmarker.onnx", "hand_landmarker.onnx", config)?;
/// # Ok::<(), signpose_extract::ExtractError>(())
/// ```
pub struct LandmarkModel {
    /// ONNX Runtime session for the pose model.
    pose_session: Session,
    /// ONNX Runtime session for the hand model.
    hand_session: Session,
    pose_input_name: String,
    pose_output_names: Vec<String>,
    hand_input_name: String,
    hand_output_names: Vec<String>,
    config: DetectorConfig,
}

impl LandmarkModel {
    /// Load the pose and hand landmark models.
    ///
    /// # Arguments
    ///
    /// * `pose_model` - Path to the pose landmark ONNX model.
    /// * `hand_model` - Path to the hand landmark ONNX model.
    /// * `config` - Detection configuration (thresholds, input size).
    ///
    /// # Errors
    ///
    /// Returns an error if either model file doesn't exist or can't be loaded.
    pub fn load<P: AsRef<Path>>(
        pose_model: P,
        hand_model: P,
        config: DetectorConfig,
    ) -> Result<Self> {
        let pose_session = Self::build_session(pose_model.as_ref(), &config)?;
        let hand_session = Self::build_session(hand_model.as_ref(), &config)?;

        let pose_input_name = Self::input_name(&pose_session);
        let pose_output_names = Self::output_names(&pose_session);
        let hand_input_name = Self::input_name(&hand_session);
        let hand_output_names = Self::output_names(&hand_session);

        if pose_output_names.len() < 2 {
            return Err(ExtractError::ModelLoadError(format!(
                "Pose model must expose landmarks and score outputs, found {}",
                pose_output_names.len()
            )));
        }
        if hand_output_names.len() < 2 {
            return Err(ExtractError::ModelLoadError(format!(
                "Hand model must expose landmarks and scores outputs, found {}",
                hand_output_names.len()
            )));
        }

        Ok(Self {
            pose_session,
            hand_session,
            pose_input_name,
            pose_output_names,
            hand_input_name,
            hand_output_names,
            config,
        })
    }

    /// Get the active configuration.
    #[must_use]
    pub const fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Create an ONNX Runtime session for one model file.
    fn build_session(path: &Path, config: &DetectorConfig) -> Result<Session> {
        if !path.exists() {
            return Err(ExtractError::ModelLoadError(format!(
                "Model file not found: {}",
                path.display()
            )));
        }

        #[allow(unused_mut)]
        let mut builder = Session::builder().map_err(|e| {
            ExtractError::ModelLoadError(format!("Failed to create session builder: {e}"))
        })?;

        #[cfg(feature = "cuda")]
        {
            builder = builder
                .with_execution_providers([CUDAExecutionProvider::default().build()])
                .map_err(|e| {
                    ExtractError::ModelLoadError(format!("Failed to register CUDA EP: {e}"))
                })?;
        }

        #[cfg(feature = "coreml")]
        {
            builder = builder
                .with_execution_providers([CoreMLExecutionProvider::default().build()])
                .map_err(|e| {
                    ExtractError::ModelLoadError(format!("Failed to register CoreML EP: {e}"))
                })?;
        }

        builder
            .with_optimization_level(ort::session::builder::GraphOptimizationLevel::Level3)
            .map_err(|e| {
                ExtractError::ModelLoadError(format!("Failed to set optimization level: {e}"))
            })?
            .with_intra_threads(config.num_threads)
            .map_err(|e| {
                ExtractError::ModelLoadError(format!("Failed to set intra-thread count: {e}"))
            })?
            .commit_from_file(path)
            .map_err(|e| ExtractError::ModelLoadError(format!("Failed to load model: {e}")))
    }

    fn input_name(session: &Session) -> String {
        session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .unwrap_or_else(|| "image".to_string())
    }

    fn output_names(session: &Session) -> Vec<String> {
        session.outputs.iter().map(|o| o.name.clone()).collect()
    }

    /// Run one session and extract every output as (data, shape).
    fn run_session(
        session: &mut Session,
        input_name: &str,
        output_names: &[String],
        input: &Array4<f32>,
    ) -> Result<Vec<RawOutput>> {
        // Ensure input is contiguous in memory (CowArray)
        let input_contiguous = input.as_standard_layout();
        let input_tensor = TensorRef::from_array_view(&input_contiguous).map_err(|e| {
            ExtractError::DetectionError(format!("Failed to create input tensor: {e}"))
        })?;

        let inputs = ort::inputs![input_name => input_tensor];
        let outputs = session
            .run(inputs)
            .map_err(|e| ExtractError::DetectionError(format!("Inference failed: {e}")))?;

        let mut raw = Vec::with_capacity(output_names.len());
        for name in output_names {
            let output = outputs
                .get(name.as_str())
                .ok_or_else(|| ExtractError::DetectionError(format!("Output '{name}' not found")))?;
            let (shape, data) = output.try_extract_tensor::<f32>().map_err(|e| {
                ExtractError::DetectionError(format!("Failed to extract output '{name}': {e}"))
            })?;
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let shape_vec: Vec<usize> = shape.iter().map(|&d| d as usize).collect();
            raw.push((data.to_vec(), shape_vec));
        }

        Ok(raw)
    }

    /// Map pose model outputs to an optional pose detection.
    fn parse_pose(&self, outputs: &[RawOutput]) -> Result<Option<PoseDetection>> {
        let (score_data, _) = &outputs[1];
        let presence = score_data.first().copied().unwrap_or(0.0);
        if presence < self.config.min_detection_confidence {
            return Ok(None);
        }

        let (data, shape) = &outputs[0];
        let count = data.len() / 4;
        if count != POSE_LANDMARK_COUNT || data.len() % 4 != 0 {
            return Err(ExtractError::ShapeMismatch(format!(
                "pose model returned {count} landmarks (shape {shape:?}), expected {POSE_LANDMARK_COUNT}"
            )));
        }

        let landmarks = data
            .chunks_exact(4)
            .map(|v| PoseLandmark::new(v[0], v[1], v[2], v[3]))
            .collect();
        Ok(Some(PoseDetection::new(landmarks)))
    }

    /// Map hand model outputs to zero or more hand detections.
    fn parse_hands(&self, outputs: &[RawOutput]) -> Result<Vec<HandDetection>> {
        let (data, shape) = &outputs[0];
        let (scores, _) = &outputs[1];
        let left_probs = outputs.get(2).map(|(d, _)| d.as_slice());

        if data.is_empty() {
            return Ok(Vec::new());
        }

        let values_per_hand = HAND_LANDMARK_COUNT * 3;
        if data.len() % values_per_hand != 0 {
            return Err(ExtractError::ShapeMismatch(format!(
                "hand model output of {} values (shape {shape:?}) is not a multiple of {values_per_hand}",
                data.len()
            )));
        }

        let mut hands = Vec::new();
        for (idx, chunk) in data.chunks_exact(values_per_hand).enumerate() {
            if hands.len() >= self.config.max_hands {
                break;
            }
            let score = scores.get(idx).copied().unwrap_or(0.0);
            if score < self.config.min_detection_confidence {
                continue;
            }

            let landmarks = chunk
                .chunks_exact(3)
                .map(|v| HandLandmark::new(v[0], v[1], v[2]))
                .collect();
            let handedness = left_probs.and_then(|p| p.get(idx)).map(|&left| {
                if left >= 0.5 {
                    Handedness::Left
                } else {
                    Handedness::Right
                }
            });
            hands.push(HandDetection::new(landmarks, handedness, score));
        }

        Ok(hands)
    }
}

impl Detector for LandmarkModel {
    fn detect(&mut self, frame: &DynamicImage) -> Result<FrameDetections> {
        let tensor = image_to_tensor(frame, self.config.input_size);

        let pose_outputs = Self::run_session(
            &mut self.pose_session,
            &self.pose_input_name,
            &self.pose_output_names,
            &tensor,
        )?;
        let hand_outputs = Self::run_session(
            &mut self.hand_session,
            &self.hand_input_name,
            &self.hand_output_names,
            &tensor,
        )?;

        Ok(FrameDetections {
            pose: self.parse_pose(&pose_outputs)?,
            hands: self.parse_hands(&hand_outputs)?,
        })
    }
}

/// Resize a frame to the model input size and normalize into an NCHW tensor.
///
/// # Returns
///
/// Array4 with shape (1, 3, H, W) and values in [0, 1].
fn image_to_tensor(image: &DynamicImage, input_size: (usize, usize)) -> Array4<f32> {
    let (h, w) = input_size;
    #[allow(clippy::cast_possible_truncation)]
    let resized = image
        .resize_exact(w as u32, h as u32, image::imageops::FilterType::Triangle)
        .to_rgb8();

    let mut tensor = Array4::zeros((1, 3, h, w));
    for (x, y, pixel) in resized.enumerate_pixels() {
        let (x, y) = (x as usize, y as usize);
        tensor[[0, 0, y, x]] = f32::from(pixel[0]) / 255.0;
        tensor[[0, 1, y, x]] = f32::from(pixel[1]) / 255.0;
        tensor[[0, 2, y, x]] = f32::from(pixel[2]) / 255.0;
    }

    tensor
}
