// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

use crate::model::{DEFAULT_HAND_MODEL, DEFAULT_POSE_MODEL};
use clap::{Args, Parser, Subcommand};

/// CLI arguments parser.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(after_help = r#"Extract Options:
    --source, -s <SOURCE>       Input video file or directory of videos
    --output, -o <OUTPUT>       Output JSON file (single video) or directory (batch) [default: output]
    --pose-model <MODEL>        Path to pose landmark ONNX model [default: pose_landmarker.onnx]
    --hand-model <MODEL>        Path to hand landmark ONNX model [default: hand_landmarker.onnx]
    --min-detection-confidence  Minimum detection confidence [default: 0.5]
    --min-tracking-confidence   Minimum tracking confidence [default: 0.5]
    --max-hands <N>             Maximum hands reported per frame [default: 2]
    --verbose                   Show verbose output

Examples:
    signpose-extract extract --source hello.mp4 --output output/hello.json
    signpose-extract extract --source videos/ --output landmarks/
    signpose-extract extract -s merci.mov --min-detection-confidence 0.6
    signpose-extract extract"#)]
pub struct Cli {
    #[command(subcommand)]
    /// Subcommand to execute.
    pub command: Commands,
}

/// Commands for the CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract pose and hand landmarks from a video or a directory of videos
    Extract(ExtractArgs),
}

/// Arguments for the extract command.
#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Input source (video file or directory of videos). Falls back to the
    /// sample video `test_video.mp4` when omitted.
    #[arg(short, long)]
    pub source: Option<String>,

    /// Output JSON file (single video) or directory (batch)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Path to pose landmark ONNX model
    #[arg(long, default_value = DEFAULT_POSE_MODEL)]
    pub pose_model: String,

    /// Path to hand landmark ONNX model
    #[arg(long, default_value = DEFAULT_HAND_MODEL)]
    pub hand_model: String,

    /// Minimum detection confidence
    #[arg(long, default_value_t = 0.5)]
    pub min_detection_confidence: f32,

    /// Minimum tracking confidence
    #[arg(long, default_value_t = 0.5)]
    pub min_tracking_confidence: f32,

    /// Maximum hands reported per frame
    #[arg(long, default_value_t = 2)]
    pub max_hands: usize,

    /// Show verbose output
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub verbose: bool,
}
