// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Batch processing of video directories.
//!
//! Discovers `.mp4`/`.avi`/`.mov` files in a directory and extracts each one
//! to its own JSON document named after the input stem. Videos are processed
//! strictly one after another; a failing video is reported and skipped, and
//! the batch continues with the next file.

use std::path::{Path, PathBuf};

use crate::detector::Detector;
use crate::error::Result;
use crate::pipeline::VideoLandmarkPipeline;
use crate::source::collect_videos_from_dir;
use crate::{error, verbose, warn};

/// Outcome of one batch run.
#[derive(Debug, Clone, Default)]
pub struct BatchSummary {
    /// Number of videos fully extracted and written.
    pub processed: usize,
    /// Number of videos that failed and were skipped.
    pub failed: usize,
    /// Paths of the documents written, in processing order.
    pub outputs: Vec<PathBuf>,
}

impl BatchSummary {
    /// Total number of videos attempted.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.processed + self.failed
    }
}

/// Extract every video in a directory to per-video JSON documents.
///
/// Output files land in `output_dir` as `<input stem>.json`; the directory
/// is created if absent.
///
/// # Arguments
///
/// * `pipeline` - The extraction pipeline to drive.
/// * `video_dir` - Directory to scan for video files.
/// * `output_dir` - Directory receiving one JSON document per input.
///
/// # Errors
///
/// Returns an error only if the video directory itself cannot be read.
/// Per-video failures are reported and counted in the summary instead.
pub fn process_directory<D: Detector>(
    pipeline: &mut VideoLandmarkPipeline<D>,
    video_dir: &Path,
    output_dir: &Path,
) -> Result<BatchSummary> {
    let videos = collect_videos_from_dir(video_dir)?;

    let mut summary = BatchSummary::default();
    if videos.is_empty() {
        warn!("No video files found in {}", video_dir.display());
        return Ok(summary);
    }

    verbose!("Found {} video(s)", videos.len());

    for video in &videos {
        let stem = video
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let output = output_dir.join(format!("{stem}.json"));

        match pipeline.extract_to_file(video, &output) {
            Ok(_) => {
                summary.processed += 1;
                summary.outputs.push(output);
            }
            Err(e) => {
                error!("Skipping {}: {e}", video.display());
                summary.failed += 1;
            }
        }
    }

    Ok(summary)
}
