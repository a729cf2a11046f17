//! Square fiducial marker detection.
//!
//! The detector consumes a grayscale frame plus candidate polygons from an
//! external contour step and produces decoded markers with sub-pixel corner
//! coordinates:
//!
//! 1. raw polygons are filtered down to plausible marker quads,
//! 2. each side's edge is localized with sub-pixel precision from small
//!    oriented intensity stripes,
//! 3. per-side line fits are intersected into refined corners,
//! 4. the marker interior is rectified, border-checked and decoded.
//!
//! Every rejection along the way is a normal per-candidate outcome; the only
//! fatal errors are configuration mistakes caught by
//! [`MarkerDetector::new`].

mod error;
mod params;
mod pipeline;
mod quad;
mod rectify;
mod refine;
mod result;
mod stripe;

pub use error::ConfigError;
pub use params::DetectorParams;
pub use pipeline::MarkerDetector;
pub use result::MarkerDetection;
