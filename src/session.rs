// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Session document assembly and JSON persistence.
//!
//! One extraction run over one video produces one [`SessionDocument`]: the
//! sign name (source file stem), the source frame rate, and every frame's
//! encoded landmark vector in temporal order. The document is built
//! incrementally through a [`SessionWriter`] and is immutable once
//! serialized.

use std::fs;
use std::io::BufWriter;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ExtractError, Result};
use crate::landmarks::{FRAME_VECTOR_LEN, FrameVector};

/// Self-describing layout metadata embedded in every session document.
///
/// Emitted verbatim for every document so downstream consumers can decode
/// the frame vectors without guessing. The `left_hand`/`right_hand` names
/// describe the slot positions, not verified physical handedness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandmarkFormat {
    /// Pose block description.
    pub pose: String,
    /// First hand slot description.
    pub left_hand: String,
    /// Second hand slot description.
    pub right_hand: String,
    /// Total values per frame vector.
    pub total_values_per_frame: usize,
}

impl Default for LandmarkFormat {
    fn default() -> Self {
        Self {
            pose: "33 points [x, y, z, visibility]".to_string(),
            left_hand: "21 points [x, y, z] (starts at index 132)".to_string(),
            right_hand: "21 points [x, y, z] (starts at index 195)".to_string(),
            total_values_per_frame: FRAME_VECTOR_LEN,
        }
    }
}

/// One complete per-video extraction result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionDocument {
    /// Sign name, derived from the source filename with extension stripped.
    pub sign_name: String,
    /// Source video frame rate.
    pub fps: f32,
    /// Number of frame vectors; always equals `landmarks.len()`.
    pub total_frames: usize,
    /// Encoded frame vectors in source temporal order.
    pub landmarks: Vec<FrameVector>,
    /// Layout metadata, identical for every document.
    pub landmark_format: LandmarkFormat,
}

impl SessionDocument {
    /// Write this document as JSON to the given path.
    ///
    /// Parent directories are created if absent. The file is written once
    /// and not updated afterward.
    ///
    /// # Errors
    ///
    /// Returns an error if directories cannot be created, the file cannot
    /// be opened, or serialization fails.
    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| {
                ExtractError::IoError(format!(
                    "Failed to create directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        let file = fs::File::create(path)
            .map_err(|e| ExtractError::IoError(format!("Failed to create {}: {e}", path.display())))?;
        serde_json::to_writer(BufWriter::new(file), self)?;
        Ok(())
    }
}

/// Incremental builder for a [`SessionDocument`].
///
/// Frames are appended one per decoded video frame; [`SessionWriter::finalize`]
/// validates the length-258 invariant on every vector before producing the
/// document, so a malformed frame can never reach disk.
#[derive(Debug, Clone)]
pub struct SessionWriter {
    sign_name: String,
    fps: f32,
    frames: Vec<FrameVector>,
}

impl SessionWriter {
    /// Create a new writer for one video.
    ///
    /// # Arguments
    ///
    /// * `sign_name` - Name of the sign (source file stem).
    /// * `fps` - Source video frame rate.
    #[must_use]
    pub const fn new(sign_name: String, fps: f32) -> Self {
        Self {
            sign_name,
            fps,
            frames: Vec::new(),
        }
    }

    /// Derive a writer from a source video path, using the file stem as the
    /// sign name.
    #[must_use]
    pub fn for_video<P: AsRef<Path>>(video: P, fps: f32) -> Self {
        let sign_name = video
            .as_ref()
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        Self::new(sign_name, fps)
    }

    /// Append one frame vector in temporal order.
    pub fn push_frame(&mut self, frame: FrameVector) {
        self.frames.push(frame);
    }

    /// Get the number of frames accumulated so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Check if no frames have been accumulated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Validate all frames and produce the final document.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::SerializationError`] if any accumulated frame
    /// vector does not have length 258. Nothing is persisted in that case.
    pub fn finalize(self) -> Result<SessionDocument> {
        for (idx, frame) in self.frames.iter().enumerate() {
            if frame.len() != FRAME_VECTOR_LEN {
                return Err(ExtractError::SerializationError(format!(
                    "frame {idx} has {} values, expected {FRAME_VECTOR_LEN}",
                    frame.len()
                )));
            }
        }

        Ok(SessionDocument {
            sign_name: self.sign_name,
            fps: self.fps,
            total_frames: self.frames.len(),
            landmarks: self.frames,
            landmark_format: LandmarkFormat::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zero_frame() -> FrameVector {
        vec![0.0; FRAME_VECTOR_LEN]
    }

    #[test]
    fn test_finalize_counts_frames() {
        let mut writer = SessionWriter::new("hello".to_string(), 30.0);
        for _ in 0..5 {
            writer.push_frame(zero_frame());
        }
        assert_eq!(writer.len(), 5);

        let doc = writer.finalize().unwrap();
        assert_eq!(doc.sign_name, "hello");
        assert_eq!(doc.total_frames, 5);
        assert_eq!(doc.landmarks.len(), 5);
        assert!((doc.fps - 30.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_finalize_preserves_temporal_order() {
        let mut writer = SessionWriter::new("order".to_string(), 25.0);
        for i in 0..4 {
            #[allow(clippy::cast_precision_loss)]
            let mut frame = zero_frame();
            frame[0] = i as f32;
            writer.push_frame(frame);
        }

        let doc = writer.finalize().unwrap();
        for (i, frame) in doc.landmarks.iter().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let expected = i as f32;
            assert!((frame[0] - expected).abs() < f32::EPSILON);
        }
    }

    #[test]
    fn test_finalize_rejects_short_frame() {
        let mut writer = SessionWriter::new("bad".to_string(), 30.0);
        writer.push_frame(zero_frame());
        writer.push_frame(vec![0.0; 257]);

        let err = writer.finalize().unwrap_err();
        assert!(matches!(err, ExtractError::SerializationError(_)));
    }

    #[test]
    fn test_for_video_strips_extension() {
        let writer = SessionWriter::for_video("videos/bonjour.mp4", 24.0);
        let doc = writer.finalize().unwrap();
        assert_eq!(doc.sign_name, "bonjour");
        assert_eq!(doc.total_frames, 0);
    }

    #[test]
    fn test_landmark_format_is_constant() {
        let format = LandmarkFormat::default();
        assert_eq!(format.pose, "33 points [x, y, z, visibility]");
        assert_eq!(format.left_hand, "21 points [x, y, z] (starts at index 132)");
        assert_eq!(format.right_hand, "21 points [x, y, z] (starts at index 195)");
        assert_eq!(format.total_values_per_frame, 258);
    }

    #[test]
    fn test_document_json_fields() {
        let mut writer = SessionWriter::new("merci".to_string(), 30.0);
        writer.push_frame(zero_frame());
        let doc = writer.finalize().unwrap();

        let json = serde_json::to_string(&doc).unwrap();
        assert!(json.contains("\"sign_name\":\"merci\""));
        assert!(json.contains("\"total_frames\":1"));
        assert!(json.contains("\"total_values_per_frame\":258"));
        assert!(json.contains("\"left_hand\":\"21 points [x, y, z] (starts at index 132)\""));

        // Round-trips through serde unchanged.
        let parsed: SessionDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, doc);
    }
}
