use thiserror::Error;

/// Everything that can go wrong around the simulation core.
///
/// None of these are fatal: the frame loop recovers locally and keeps going.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum GameError {
    /// Detector failed to come up. Detection stays off for the whole session.
    #[error("pose estimator unavailable: {0}")]
    EstimatorUnavailable(String),

    /// A single estimation call failed. The previous snapshot is kept.
    #[error("pose estimation call failed: {0}")]
    EstimationCallFailed(String),

    /// Creature coordinates went non-finite and were reinitialised.
    #[error("non-finite position for {creature} ({x}, {y}), reinitialising")]
    NumericCorruption { creature: String, x: f32, y: f32 },

    /// No camera frame to estimate on. Reported to the caller, not handled here.
    #[error("no video frame source available")]
    FrameSourceUnavailable,

    #[error("invalid config: {0}")]
    Config(String),
}
