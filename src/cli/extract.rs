// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

use std::path::{Path, PathBuf};
use std::process;

use crate::batch::process_directory;
use crate::cli::args::ExtractArgs;
use crate::cli::logging::set_verbose;
use crate::detector::DetectorConfig;
use crate::model::LandmarkModel;
use crate::pipeline::VideoLandmarkPipeline;
use crate::source::Source;
use crate::{VERSION, error, verbose, warn};

/// Sample video used when no source is given (mirrors the "sample test" mode).
const DEFAULT_SAMPLE_VIDEO: &str = "test_video.mp4";

/// Default output directory for extracted documents.
const DEFAULT_OUTPUT_DIR: &str = "output";

/// Run landmark extraction for the `extract` subcommand.
pub fn run_extraction(args: &ExtractArgs) {
    set_verbose(args.verbose);

    let config = DetectorConfig::new()
        .with_min_detection_confidence(args.min_detection_confidence)
        .with_min_tracking_confidence(args.min_tracking_confidence)
        .with_max_hands(args.max_hands);

    // Models are a scoped resource: loaded once here, released when the
    // pipeline drops, whichever way this function exits.
    let model = match LandmarkModel::load(&args.pose_model, &args.hand_model, config) {
        Ok(m) => m,
        Err(e) => {
            error!("Error loading models: {e}");
            process::exit(1);
        }
    };

    let source = args.source.as_ref().map_or_else(
        || {
            warn!("'source' argument is missing. Using sample video '{DEFAULT_SAMPLE_VIDEO}'.");
            Source::from(DEFAULT_SAMPLE_VIDEO)
        },
        |s| Source::from(s.as_str()),
    );

    verbose!("signpose-extract {VERSION} 🚀 Rust ONNX");
    verbose!("");

    let mut pipeline = VideoLandmarkPipeline::new(model);

    match source {
        Source::Video(path) => extract_single(&mut pipeline, &path, args.output.as_deref()),
        Source::Directory(dir) => extract_batch(&mut pipeline, &dir, args.output.as_deref()),
        Source::VideoList(paths) => {
            let output_dir = args.output.clone().unwrap_or_else(|| DEFAULT_OUTPUT_DIR.to_string());
            for path in &paths {
                extract_single_into_dir(&mut pipeline, path, Path::new(&output_dir));
            }
        }
    }
}

/// Extract one video to one document.
fn extract_single(
    pipeline: &mut VideoLandmarkPipeline<LandmarkModel>,
    video: &Path,
    output: Option<&str>,
) {
    let output = output.map_or_else(|| default_output_for(video), PathBuf::from);

    match pipeline.extract_to_file(video, &output) {
        Ok(document) => {
            verbose!("Total frames extracted: {}", document.total_frames);
        }
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    }
}

/// Extract one video into a directory, without aborting the process on failure.
fn extract_single_into_dir(
    pipeline: &mut VideoLandmarkPipeline<LandmarkModel>,
    video: &Path,
    output_dir: &Path,
) {
    let stem = video
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let output = output_dir.join(format!("{stem}.json"));
    if let Err(e) = pipeline.extract_to_file(video, &output) {
        error!("Skipping {}: {e}", video.display());
    }
}

/// Extract every video in a directory.
fn extract_batch(
    pipeline: &mut VideoLandmarkPipeline<LandmarkModel>,
    dir: &Path,
    output: Option<&str>,
) {
    let output_dir = PathBuf::from(output.unwrap_or(DEFAULT_OUTPUT_DIR));

    match process_directory(pipeline, dir, &output_dir) {
        Ok(summary) => {
            verbose!("");
            verbose!(
                "Batch complete: {} extracted, {} failed, results in {}",
                summary.processed,
                summary.failed,
                output_dir.display()
            );
        }
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    }
}

/// Default output path for a single video: `output/<stem>.json`.
fn default_output_for(video: &Path) -> PathBuf {
    let stem = video
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    Path::new(DEFAULT_OUTPUT_DIR).join(format!("{stem}.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_path() {
        let out = default_output_for(Path::new("videos/bonjour.mp4"));
        assert_eq!(out, Path::new("output/bonjour.json"));
    }

    #[test]
    fn test_default_output_no_extension() {
        let out = default_output_for(Path::new("clip"));
        assert_eq!(out, Path::new("output/clip.json"));
    }
}
