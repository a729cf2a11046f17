//! Combined detection + pose tracking for one frame at a time.

use fidmark_core::GrayImageView;
use fidmark_detect::{DetectorParams, MarkerDetector};
use fidmark_pose::{CameraIntrinsics, MarkerPose, SquarePoseEstimator};
use log::{debug, trace};
use nalgebra::Point2;

/// Errors from tracker construction.
///
/// Per-frame processing never fails; candidates that cannot be decoded or
/// posed are silently dropped.
#[derive(thiserror::Error, Debug)]
pub enum TrackerError {
    #[error(transparent)]
    Config(#[from] fidmark_detect::ConfigError),
    #[error(transparent)]
    Pose(#[from] fidmark_pose::PoseError),
}

/// Full tracker configuration: detector settings plus camera geometry.
#[derive(Clone, Debug)]
pub struct TrackerConfig {
    pub detector: DetectorParams,
    pub intrinsics: CameraIntrinsics,
    /// Physical marker side length in meters (border ring included).
    pub marker_side: f64,
}

impl TrackerConfig {
    /// Defaults for a given frame resolution, reproducing the legacy
    /// unit-focal centering and a 45 mm marker.
    pub fn for_resolution(width: usize, height: usize) -> Self {
        Self {
            detector: DetectorParams::default(),
            intrinsics: CameraIntrinsics::unit_focal(width, height),
            marker_side: 0.045,
        }
    }
}

/// A decoded marker with its camera-relative pose.
#[derive(Clone, Copy, Debug)]
pub struct TrackedMarker {
    pub detection: fidmark_detect::MarkerDetection,
    pub pose: MarkerPose,
    /// Index of the frame this marker was seen in, for downstream consumers.
    pub frame_index: u64,
}

impl TrackedMarker {
    #[inline]
    pub fn code(&self) -> u64 {
        self.detection.id.code
    }
}

/// Per-frame marker tracker.
///
/// The tracker owns no frame state: each call borrows the frame and the
/// candidate polygons and returns a fresh set of results, so stale frames can
/// simply be dropped by the caller.
pub struct MarkerTracker {
    detector: MarkerDetector,
    pose: SquarePoseEstimator,
}

impl MarkerTracker {
    /// Build a tracker, validating both detector and pose configuration.
    pub fn new(cfg: TrackerConfig) -> Result<Self, TrackerError> {
        let detector = MarkerDetector::new(cfg.detector)?;
        let pose = SquarePoseEstimator::new(cfg.intrinsics, cfg.marker_side)?;
        Ok(Self { detector, pose })
    }

    #[inline]
    pub fn detector(&self) -> &MarkerDetector {
        &self.detector
    }

    /// Detect and pose all markers among the frame's candidate polygons.
    pub fn process_frame(
        &self,
        frame: &GrayImageView<'_>,
        polygons: &[Vec<Point2<f32>>],
        frame_index: u64,
    ) -> Vec<TrackedMarker> {
        let mut out = Vec::new();
        for polygon in polygons {
            let Some(detection) = self.detector.process_candidate(frame, polygon) else {
                continue;
            };
            let pose = match self.pose.estimate(&detection.corners) {
                Ok(pose) => pose,
                Err(err) => {
                    trace!("marker {:04x} dropped: {err}", detection.id.code);
                    continue;
                }
            };
            out.push(TrackedMarker {
                detection,
                pose,
                frame_index,
            });
        }
        debug!("frame {frame_index}: {} markers tracked", out.len());
        out
    }
}
