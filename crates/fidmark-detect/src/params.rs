use fidmark_decode::RotationRule;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Configuration for the square-marker detector.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DetectorParams {
    /// Threshold used to binarize the frame before the external contour step.
    ///
    /// The detector itself only needs it for the demo tooling; it is owned by
    /// the caller and may change between frames (e.g. driven by a UI slider).
    pub bin_threshold: u8,
    /// Threshold for binarizing the rectified marker grid.
    pub id_threshold: u8,
    /// Minimum candidate bounding-box side in pixels.
    pub min_side_px: f32,
    /// Maximum candidate bounding-box side in pixels.
    pub max_side_px: f32,
    /// Candidates whose bounding box comes closer than this to the frame
    /// border are dropped; edge stripes need room around the quad.
    pub frame_margin_px: f32,
    /// Lower clamp for the edge stripe length (odd, in pixels).
    pub min_stripe_length: usize,
    /// Side length of the rectified grid in cells, border ring included.
    pub grid_size: usize,
    /// Rule resolving the 4-fold rotational ambiguity of the decoded id.
    pub rotation_rule: RotationRule,
}

impl Default for DetectorParams {
    fn default() -> Self {
        Self {
            bin_threshold: 60,
            id_threshold: 60,
            min_side_px: 85.0,
            max_side_px: 150.0,
            frame_margin_px: 10.0,
            min_stripe_length: 5,
            grid_size: 6,
            rotation_rule: RotationRule::default(),
        }
    }
}

impl DetectorParams {
    /// Validate the configuration. Called by `MarkerDetector::new`; rejected
    /// configurations never reach per-frame processing.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size < 3 {
            return Err(ConfigError::GridTooSmall(self.grid_size));
        }
        if !(self.min_side_px.is_finite()
            && self.max_side_px.is_finite()
            && self.min_side_px > 0.0
            && self.min_side_px <= self.max_side_px)
        {
            return Err(ConfigError::BadSideRange {
                min: self.min_side_px,
                max: self.max_side_px,
            });
        }
        if !(self.frame_margin_px.is_finite() && self.frame_margin_px >= 0.0) {
            return Err(ConfigError::BadFrameMargin(self.frame_margin_px));
        }
        if self.min_stripe_length < 5 || self.min_stripe_length % 2 == 0 {
            return Err(ConfigError::BadStripeLength(self.min_stripe_length));
        }
        Ok(())
    }
}
