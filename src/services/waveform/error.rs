use super::SurfaceId;

/// Errors that can occur while creating a waveform player
#[derive(thiserror::Error, Debug)]
pub enum WaveformError {
    /// The surface cannot host a player (missing, detached or unnamed)
    #[error("Surface {0:?} is not available")]
    SurfaceUnavailable(SurfaceId),

    /// The backend refused to build a player
    #[error("Failed to create player: {0}")]
    CreationFailed(String),

    /// Initialisation was attempted outside a tokio runtime
    #[error("No tokio runtime available for the refresh task")]
    RuntimeUnavailable,
}
