use fidmark_decode::MarkerId;
use nalgebra::Point2;

/// One decoded marker in a frame.
#[derive(Clone, Copy, Debug)]
pub struct MarkerDetection {
    /// Rotation-normalized identifier (16 bits at the default 6x6 grid).
    pub id: MarkerId,
    /// Refined sub-pixel corners, cyclically reordered so corner 0 is the
    /// marker's canonical top-left and the winding matches the source
    /// polygon.
    pub corners: [Point2<f32>; 4],
}

impl MarkerDetection {
    /// Convenience accessor for the identifier code.
    #[inline]
    pub fn code(&self) -> u64 {
        self.id.code
    }
}
