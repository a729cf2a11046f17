//! Bit readout and identifier decoding for rectified square markers.
//!
//! This crate operates on small rectified grids only. It expects the
//! detection pipeline to hand it an already warped and thresholded patch;
//! it does not sample images itself.

mod id;
mod patch;

pub use id::{canonicalize_code, rotate_inner_code, MarkerId, RotationRule};
pub use patch::BitPatch;
