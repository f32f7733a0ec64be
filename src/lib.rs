// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

#![allow(clippy::multiple_crate_versions)]

//! # Sign-Language Pose Extraction Library
//!
//! Extracts body-pose and hand landmarks from video frames using external
//! ONNX landmark models and serializes the per-frame landmark vectors to
//! JSON session documents for downstream sign-language-recognition training.
//!
//! ## Features
//!
//! - **Fixed-layout encoding** - Every frame becomes exactly 258 floats:
//!   33 pose points × (x, y, z, visibility), then two hand slots of
//!   21 points × (x, y, z), zero-padded when a detection is absent
//! - **ONNX Runtime** - Host-provided pose/hand landmark models run through
//!   `ort`; the models do the detection, this crate does the plumbing
//! - **Video decoding** - Frames in temporal order via FFmpeg (`video-rs`),
//!   with frame rate and estimated frame counts from the container
//! - **Batch mode** - Process a whole directory of `.mp4`/`.avi`/`.mov`
//!   files, one JSON document per video, skipping files that fail
//! - **Self-describing output** - Every document embeds a `landmark_format`
//!   block so consumers can decode the vectors without guessing
//!
//! ## Quick Start (Library)
//!
//! ```no_run
//! use signpose_extract::{DetectorConfig, LandmarkModel, VideoLandmarkPipeline};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let model = LandmarkModel::load(
//!         "pose_landmarker.onnx",
//!         "hand_landmarker.onnx",
//!         DetectorConfig::new().with_min_detection_confidence(0.5),
//!     )?;
//!
//!     let mut pipeline = VideoLandmarkPipeline::new(model);
//!     let document = pipeline.extract_to_file("hello.mp4", "output/hello.json")?;
//!
//!     println!("Extracted {} frames at {} fps", document.total_frames, document.fps);
//!     Ok(())
//! }
//! ```
//!
//! ## CLI Usage
//!
//! ```bash
//! # Single video
//! signpose-extract extract --source hello.mp4 --output output/hello.json
//!
//! # Batch: one JSON per video in the directory
//! signpose-extract extract --source videos/ --output landmarks/
//!
//! # Sample test (falls back to test_video.mp4)
//! signpose-extract extract
//! ```
//!
//! ## Output Format
//!
//! One UTF-8 JSON document per video:
//!
//! ```json
//! {
//!   "sign_name": "hello",
//!   "fps": 30.0,
//!   "total_frames": 94,
//!   "landmarks": [[0.49, 0.21, -0.3, 0.99, ...], ...],
//!   "landmark_format": {
//!     "pose": "33 points [x, y, z, visibility]",
//!     "left_hand": "21 points [x, y, z] (starts at index 132)",
//!     "right_hand": "21 points [x, y, z] (starts at index 195)",
//!     "total_values_per_frame": 258
//!   }
//! }
//! ```
//!
//! Hand slots are positional: the first detected hand occupies the first
//! slot in detector order, with no left/right canonicalization.
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`encoder`] | The 258-value frame flattening with zero-padding |
//! | [`session`] | [`SessionDocument`] assembly and JSON persistence |
//! | [`detector`] | [`Detector`] trait and [`DetectorConfig`] |
//! | [`model`] | [`LandmarkModel`], the ONNX Runtime detector |
//! | [`source`] | Video decoding and batch discovery |
//! | [`pipeline`] | [`VideoLandmarkPipeline`], the per-video loop |
//! | [`batch`] | Directory batch processing |
//! | [`landmarks`] | Landmark types, layout constants, point indices |
//! | [`detection`] | Per-frame detection containers |
//! | [`error`] | Error types ([`ExtractError`], [`Result`]) |
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `cuda` | NVIDIA CUDA acceleration |
//! | `coreml` | Apple `CoreML` (macOS/iOS) |
//!
//! ## License
//!
//! This project is licensed under [AGPL-3.0](https://ultralytics.com/license).

// Modules
pub mod batch;
pub mod cli;
pub mod detection;
pub mod detector;
pub mod encoder;
pub mod error;
pub mod landmarks;
pub mod model;
pub mod pipeline;
pub mod session;
pub mod source;

// Re-export main types for convenience
pub use batch::BatchSummary;
pub use detection::{FrameDetections, HandDetection, Handedness, PoseDetection};
pub use detector::{Detector, DetectorConfig};
pub use encoder::encode_frame;
pub use error::{ExtractError, Result};
pub use landmarks::{FRAME_VECTOR_LEN, FrameVector, HandLandmark, PoseLandmark};
pub use model::LandmarkModel;
pub use pipeline::VideoLandmarkPipeline;
pub use session::{LandmarkFormat, SessionDocument, SessionWriter};
pub use source::{Source, VideoSource};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
