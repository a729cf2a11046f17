//! Core types and utilities for square fiducial marker detection.
//!
//! This crate is intentionally small and purely geometric. It does *not*
//! depend on any concrete contour source or image container.

mod homography;
mod image;
mod line;
mod logger;

pub use homography::{homography_from_4pt, warp_perspective_gray, Homography};
pub use image::{sample_bilinear, sample_bilinear_checked, sample_bilinear_u8, GrayImage, GrayImageView};
pub use line::{fit_line_tls, intersect_lines, FittedLine};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;
