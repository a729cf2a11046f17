/// Fatal configuration errors, reported once at detector construction.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("rectified grid size must be at least 3, got {0}")]
    GridTooSmall(usize),
    #[error("candidate side range is empty or negative: [{min}, {max}]")]
    BadSideRange { min: f32, max: f32 },
    #[error("frame margin must be finite and non-negative, got {0}")]
    BadFrameMargin(f32),
    #[error("minimum stripe length must be odd and at least 5, got {0}")]
    BadStripeLength(usize),
}
