use thiserror::Error;

/// Errors originating from the core mapping and escape engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    #[error("degenerate viewport: {reason}")]
    DegenerateViewport { reason: String },

    #[error("invalid device size: {width}×{height}")]
    InvalidDeviceSize { width: u32, height: u32 },

    #[error("invalid max iterations: {0} (must be within 10..=200000)")]
    InvalidMaxIterations(u32),

    #[error("invalid escape radius: {0} (must be > 0.0)")]
    InvalidEscapeRadius(f64),
}
