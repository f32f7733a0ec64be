// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Per-video extraction pipeline.
//!
//! [`VideoLandmarkPipeline`] drives one video at a time: decode a frame, run
//! the detector, encode the 258-value vector, append it, then move to the
//! next frame. Processing is strictly sequential so the document's
//! `landmarks` order always equals the source temporal order.

use std::path::Path;

use image::DynamicImage;

use crate::detector::Detector;
use crate::encoder::encode_frame;
use crate::error::Result;
use crate::session::{SessionDocument, SessionWriter};
use crate::source::{FrameMeta, VideoSource};
use crate::{success, verbose};

/// How often to report frame progress.
const PROGRESS_INTERVAL: usize = 30;

/// Sequential per-video landmark extraction.
///
/// # Example
///
/// ```no_run
/// use signpose_extract::{DetectorConfig, LandmarkModel, VideoLandmarkPipeline};
///
/// let model = LandmarkModel::load(
///     "pose_landmarker.onnx",
///     "hand_landmarker.onnx",
///     DetectorConfig::default(),
/// )?;
/// let mut pipeline = VideoLandmarkPipeline::new(model);
/// let document = pipeline.extract_to_file("hello.mp4", "output/hello.json")?;
/// println!("Extracted {} frames", document.total_frames);
/// # Ok::<(), signpose_extract::ExtractError>(())
/// ```
pub struct VideoLandmarkPipeline<D: Detector> {
    detector: D,
}

impl<D: Detector> VideoLandmarkPipeline<D> {
    /// Create a pipeline around a detector.
    ///
    /// The detector is held for the lifetime of the pipeline and released
    /// when the pipeline drops, including after mid-video failures.
    pub const fn new(detector: D) -> Self {
        Self { detector }
    }

    /// Consume the pipeline and return the detector.
    pub fn into_detector(self) -> D {
        self.detector
    }

    /// Run the extraction loop over an already-open frame sequence.
    ///
    /// One frame is detected and encoded before the next is consumed.
    ///
    /// # Arguments
    ///
    /// * `frames` - Frames in temporal order with per-frame metadata.
    /// * `sign_name` - Name recorded in the session document.
    /// * `fps` - Source frame rate recorded in the session document.
    ///
    /// # Errors
    ///
    /// Propagates decode, detection, and encoding errors; a failed frame
    /// fails the whole document.
    pub fn run<I>(&mut self, frames: I, sign_name: &str, fps: f32) -> Result<SessionDocument>
    where
        I: Iterator<Item = Result<(DynamicImage, FrameMeta)>>,
    {
        let mut writer = SessionWriter::new(sign_name.to_string(), fps);

        for item in frames {
            let (img, meta) = item?;
            let detections = self.detector.detect(&img)?;
            writer.push_frame(encode_frame(&detections)?);

            let done = meta.frame_idx + 1;
            if done % PROGRESS_INTERVAL == 0 {
                let total = meta
                    .total_frames
                    .map_or_else(|| "?".to_string(), |n| n.to_string());
                verbose!("   Processed {done}/{total} frames");
            }
        }

        writer.finalize()
    }

    /// Extract landmarks from a video file.
    ///
    /// The sign name is derived from the file stem.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ExtractError::SourceNotFound`] if the video is
    /// missing or unopenable, or any error from [`VideoLandmarkPipeline::run`].
    pub fn extract<P: AsRef<Path>>(&mut self, video: P) -> Result<SessionDocument> {
        let video = video.as_ref();
        let source = VideoSource::open(video)?;

        let fps = source.fps();
        let total = source
            .total_frames()
            .map_or_else(|| "?".to_string(), |n| n.to_string());
        verbose!("Processing: {}", video.display());
        verbose!("FPS: {fps}, Frames: {total}");

        let sign_name = video
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        self.run(source, &sign_name, fps)
    }

    /// Extract landmarks from a video file and write the session document.
    ///
    /// # Arguments
    ///
    /// * `video` - Path to the source video.
    /// * `output` - Path of the JSON document to write (parent directories
    ///   are created if absent).
    ///
    /// # Errors
    ///
    /// Any extraction error, or a serialization/IO error from the write.
    /// Nothing partial is persisted on failure.
    pub fn extract_to_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &mut self,
        video: P,
        output: Q,
    ) -> Result<SessionDocument> {
        let document = self.extract(video)?;
        document.write_json(output.as_ref())?;
        success!(
            "Saved {} frames to {}",
            document.total_frames,
            output.as_ref().display()
        );
        Ok(document)
    }
}
