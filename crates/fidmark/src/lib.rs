//! High-level facade crate for the `fidmark-*` workspace.
//!
//! This crate provides:
//! - stable, convenient re-exports of the underlying pipeline crates
//! - [`MarkerTracker`], which runs detection and pose estimation per frame
//! - (feature-gated) end-to-end helpers that binarize an image, extract
//!   candidate polygons with `imageproc` and run the tracker.
//!
//! ## Quickstart
//!
//! ```no_run
//! use fidmark::{MarkerTracker, TrackerConfig};
//! use fidmark::detect::{extract_candidate_polygons, gray_view};
//! use image::ImageReader;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let img = ImageReader::open("frame.png")?.decode()?.to_luma8();
//! let cfg = TrackerConfig::for_resolution(img.width() as usize, img.height() as usize);
//! let tracker = MarkerTracker::new(cfg)?;
//!
//! let polygons = extract_candidate_polygons(&img, tracker.detector().params().bin_threshold);
//! let markers = tracker.process_frame(&gray_view(&img), &polygons, 0);
//! for m in &markers {
//!     println!("marker {:04x} at {:.3} m", m.code(), m.pose.distance());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `fidmark::core`: image views, sampling, homographies, line fitting.
//! - `fidmark::decode`: rectified-patch bits and rotation-canonical ids.
//! - `fidmark::detector`: quad filtering and sub-pixel marker detection.
//! - `fidmark::pose`: camera intrinsics and the analytic square pose solve.
//! - `fidmark::detect` (feature `image`): end-to-end helpers from
//!   `image::GrayImage`.

pub use fidmark_core as core;
pub use fidmark_decode as decode;
pub use fidmark_detect as detector;
pub use fidmark_pose as pose;

pub use fidmark_decode::{MarkerId, RotationRule};
pub use fidmark_detect::{ConfigError, DetectorParams, MarkerDetection, MarkerDetector};
pub use fidmark_pose::{CameraIntrinsics, MarkerPose, PoseError, SquarePoseEstimator};

mod tracker;
pub use tracker::{MarkerTracker, TrackedMarker, TrackerConfig, TrackerError};

#[cfg(feature = "image")]
pub mod detect;
