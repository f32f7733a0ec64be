// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Input source handling for landmark extraction.
//!
//! This module provides video file decoding (frames in temporal order plus
//! frame rate and an estimated total frame count) and batch discovery of
//! video files in a directory.

use std::path::{Path, PathBuf};
use std::sync::Once;

use image::DynamicImage;

use crate::error::{ExtractError, Result};

/// Video file extensions recognized by batch discovery.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mov"];

static INIT: Once = Once::new();

/// Initialize global video decoding state.
///
/// Ensures `video-rs` (FFmpeg) is initialized. Safe to call multiple times.
fn init_video() {
    INIT.call_once(|| {
        if let Err(e) = video_rs::init() {
            eprintln!("Failed to initialize video-rs: {e}");
        }
    });
}

/// Represents different input sources for extraction.
#[derive(Debug, Clone)]
pub enum Source {
    /// Path to a single video file.
    Video(PathBuf),
    /// Directory containing video files.
    Directory(PathBuf),
    /// Explicit list of video paths.
    VideoList(Vec<PathBuf>),
}

impl Source {
    /// Check if this source is a single video.
    #[must_use]
    pub const fn is_video(&self) -> bool {
        matches!(self, Self::Video(_))
    }

    /// Check if this source is a directory or list (batch mode).
    #[must_use]
    pub const fn is_batch(&self) -> bool {
        matches!(self, Self::Directory(_) | Self::VideoList(_))
    }

    /// Get the path if this source has one.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Video(p) | Self::Directory(p) => Some(p),
            Self::VideoList(_) => None,
        }
    }
}

impl From<&str> for Source {
    fn from(s: &str) -> Self {
        let path = PathBuf::from(s);
        if path.is_dir() {
            return Self::Directory(path);
        }
        Self::Video(path)
    }
}

impl From<String> for Source {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<PathBuf> for Source {
    fn from(path: PathBuf) -> Self {
        Self::from(path.to_string_lossy().as_ref())
    }
}

impl From<&Path> for Source {
    fn from(path: &Path) -> Self {
        Self::from(path.to_string_lossy().as_ref())
    }
}

/// Check if a path is a recognized video file based on extension.
#[must_use]
pub fn is_video_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| {
        let ext = ext.to_string_lossy().to_lowercase();
        VIDEO_EXTENSIONS.contains(&ext.as_str())
    })
}

/// Collect video paths from a directory, sorted by name.
///
/// Only files with a recognized extension (`.mp4`, `.avi`, `.mov`) are
/// returned; other entries are ignored.
///
/// # Errors
///
/// Returns [`ExtractError::SourceNotFound`] if the path is not a directory
/// or cannot be read.
pub fn collect_videos_from_dir(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(ExtractError::SourceNotFound(format!(
            "Not a directory: {}",
            dir.display()
        )));
    }

    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
        .map_err(|e| ExtractError::SourceNotFound(format!("{}: {e}", dir.display())))?
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .filter(|path| is_video_file(path))
        .collect();

    paths.sort();
    Ok(paths)
}

/// Metadata about a decoded frame.
#[derive(Debug, Clone)]
pub struct FrameMeta {
    /// Frame index within the video (0-based).
    pub frame_idx: usize,
    /// Estimated total frames (from container duration × frame rate); the
    /// decoded count is authoritative and may differ.
    pub total_frames: Option<usize>,
    /// Source path.
    pub path: String,
    /// Frames per second.
    pub fps: f32,
}

/// An open video file yielding frames in temporal order.
///
/// The iterator terminates when the stream is exhausted or on the first
/// decode failure.
pub struct VideoSource {
    decoder: video_rs::decode::Decoder,
    path: PathBuf,
    fps: f32,
    total_frames: Option<usize>,
    current_frame: usize,
}

impl VideoSource {
    /// Open a video file for sequential decoding.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the video file.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::SourceNotFound`] if the path is missing or
    /// the container cannot be opened.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        init_video();

        let path = path.as_ref();
        if !path.exists() {
            return Err(ExtractError::SourceNotFound(path.display().to_string()));
        }

        let decoder = video_rs::decode::Decoder::new(path).map_err(|e| {
            ExtractError::SourceNotFound(format!("Cannot open {}: {e}", path.display()))
        })?;

        let fps = decoder.frame_rate();
        // Estimate total frames from container duration and frame rate.
        let total_frames = decoder.duration().ok().map(|duration| {
            let duration_seconds = duration.as_secs_f64();
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            {
                (duration_seconds * f64::from(fps)) as usize
            }
        });

        Ok(Self {
            decoder,
            path: path.to_path_buf(),
            fps,
            total_frames,
            current_frame: 0,
        })
    }

    /// Get the source frame rate.
    #[must_use]
    pub const fn fps(&self) -> f32 {
        self.fps
    }

    /// Get the estimated total frame count, if the container reports a duration.
    #[must_use]
    pub const fn total_frames(&self) -> Option<usize> {
        self.total_frames
    }

    /// Get the source path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Iterator for VideoSource {
    type Item = Result<(DynamicImage, FrameMeta)>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.decoder.decode() {
            Ok((_ts, frame)) => {
                let meta = FrameMeta {
                    frame_idx: self.current_frame,
                    total_frames: self.total_frames,
                    path: self.path.to_string_lossy().to_string(),
                    fps: self.fps,
                };
                self.current_frame += 1;

                match video_frame_to_image(&frame) {
                    Ok(img) => Some(Ok((img, meta))),
                    Err(e) => Some(Err(e)),
                }
            }
            // Decode errors terminate the sequence (EOF or a broken stream).
            Err(_e) => None,
        }
    }
}

/// Convert a `video_rs` frame (HWC ndarray) to a `DynamicImage`.
fn video_frame_to_image(arr: &video_rs::Frame) -> Result<DynamicImage> {
    let shape = arr.shape();
    let height = u32::try_from(shape[0])
        .map_err(|_| ExtractError::VideoError("Frame height exceeds u32::MAX".to_string()))?;
    let width = u32::try_from(shape[1])
        .map_err(|_| ExtractError::VideoError("Frame width exceeds u32::MAX".to_string()))?;

    let mut rgb_data = Vec::with_capacity((height * width * 3) as usize);
    for y in 0..height as usize {
        for x in 0..width as usize {
            rgb_data.push(arr[[y, x, 0]]);
            rgb_data.push(arr[[y, x, 1]]);
            rgb_data.push(arr[[y, x, 2]]);
        }
    }

    let img_buffer = image::RgbImage::from_raw(width, height, rgb_data).ok_or_else(|| {
        ExtractError::VideoError("Failed to create image from video frame".to_string())
    })?;

    Ok(DynamicImage::ImageRgb8(img_buffer))
}
