// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Integration tests for the landmark extraction library

use image::DynamicImage;
use signpose_extract::detection::{FrameDetections, HandDetection, PoseDetection};
use signpose_extract::source::FrameMeta;
use signpose_extract::{
    Detector, FRAME_VECTOR_LEN, HandLandmark, PoseLandmark, Result, SessionDocument,
    VideoLandmarkPipeline,
};

/// Stub detector: pose on every frame, one hand on even frames, two on odd.
struct ScriptedDetector {
    frame: usize,
}

impl Detector for ScriptedDetector {
    fn detect(&mut self, _frame: &DynamicImage) -> Result<FrameDetections> {
        #[allow(clippy::cast_precision_loss)]
        let marker = self.frame as f32 / 100.0;

        let mut pose_landmarks = vec![PoseLandmark::new(0.1, 0.2, 0.3, 0.9); 33];
        pose_landmarks[0].x = marker;

        let hand = HandDetection::new(vec![HandLandmark::new(0.5, 0.5, 0.0); 21], None, 0.95);
        let hands = if self.frame % 2 == 0 {
            vec![hand]
        } else {
            vec![hand.clone(), hand]
        };

        self.frame += 1;
        Ok(FrameDetections {
            pose: Some(PoseDetection::new(pose_landmarks)),
            hands,
        })
    }
}

fn synthetic_frames(count: usize) -> impl Iterator<Item = Result<(DynamicImage, FrameMeta)>> {
    (0..count).map(move |idx| {
        let meta = FrameMeta {
            frame_idx: idx,
            total_frames: Some(count),
            path: "synthetic.mp4".to_string(),
            fps: 30.0,
        };
        Ok((DynamicImage::new_rgb8(8, 8), meta))
    })
}

#[test]
fn test_round_trip_frame_count_and_order() {
    let mut pipeline = VideoLandmarkPipeline::new(ScriptedDetector { frame: 0 });
    let document = pipeline
        .run(synthetic_frames(10), "bonjour", 30.0)
        .unwrap();

    assert_eq!(document.sign_name, "bonjour");
    assert_eq!(document.total_frames, 10);
    assert_eq!(document.landmarks.len(), 10);

    for (idx, frame) in document.landmarks.iter().enumerate() {
        assert_eq!(frame.len(), FRAME_VECTOR_LEN);

        // Temporal order: frame idx is encoded in the first pose value.
        #[allow(clippy::cast_precision_loss)]
        let expected = idx as f32 / 100.0;
        assert!((frame[0] - expected).abs() < 1e-6);

        // First hand slot always filled, second only on odd frames.
        assert!((frame[132] - 0.5).abs() < 1e-6);
        if idx % 2 == 0 {
            assert!(frame[195..258].iter().all(|&v| v == 0.0));
        } else {
            assert!((frame[195] - 0.5).abs() < 1e-6);
        }
    }
}

#[test]
fn test_document_persists_and_reloads() {
    let mut pipeline = VideoLandmarkPipeline::new(ScriptedDetector { frame: 0 });
    let document = pipeline.run(synthetic_frames(3), "merci", 25.0).unwrap();

    // Parent directories are created on write.
    let dir = std::env::temp_dir().join("signpose_integration").join("nested");
    let path = dir.join("merci.json");
    document.write_json(&path).unwrap();

    let data = std::fs::read_to_string(&path).unwrap();
    let reloaded: SessionDocument = serde_json::from_str(&data).unwrap();

    assert_eq!(reloaded, document);
    assert_eq!(reloaded.total_frames, 3);
    assert_eq!(
        reloaded.landmark_format.pose,
        "33 points [x, y, z, visibility]"
    );
    assert_eq!(reloaded.landmark_format.total_values_per_frame, 258);

    std::fs::remove_dir_all(std::env::temp_dir().join("signpose_integration")).ok();
}

#[test]
fn test_shape_mismatch_fails_the_document() {
    struct BadDetector;

    impl Detector for BadDetector {
        fn detect(&mut self, _frame: &DynamicImage) -> Result<FrameDetections> {
            // 30 pose landmarks instead of 33.
            Ok(FrameDetections {
                pose: Some(PoseDetection::new(vec![PoseLandmark::default(); 30])),
                hands: vec![],
            })
        }
    }

    let mut pipeline = VideoLandmarkPipeline::new(BadDetector);
    let err = pipeline
        .run(synthetic_frames(1), "bad", 30.0)
        .unwrap_err();
    assert!(matches!(
        err,
        signpose_extract::ExtractError::ShapeMismatch(_)
    ));
}
