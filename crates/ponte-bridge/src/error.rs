//! Error types for ponte-bridge.
//!
//! Decode failures never reach the real-time path; they are logged inside
//! the background task and the affected slot keeps its previous state.

use thiserror::Error;

/// Errors raised while decoding an external audio asset.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("No decoder registered for format '{0}'")]
    UnknownFormat(String),

    #[error("Failed to read asset data: {0}")]
    Io(#[from] std::io::Error),

    #[error("WAV decode failed: {0}")]
    Wav(#[from] hound::Error),

    #[error("Decode failed: {0}")]
    Codec(#[from] symphonia::core::errors::Error),

    #[error("Asset has no decodable audio track")]
    NoTrack,
}

/// Result type alias.
pub type Result<T> = core::result::Result<T, DecodeError>;
