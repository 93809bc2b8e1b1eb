use std::path::PathBuf;
use thiserror::Error;

/// Errors building the gallery of enrolled faces.
#[derive(Error, Debug)]
pub enum GalleryError {
    /// The gallery directory cannot be read or listed. Fatal at startup:
    /// an access-control system with an unreadable gallery cannot safely
    /// operate.
    #[error("cannot read gallery directory {path}: {source}")]
    DirectoryUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Errors from the external face-encoding collaborator.
#[derive(Error, Debug)]
pub enum EncoderError {
    #[error("face encoding failed: {0}")]
    EncodingFailed(String),
}

/// Errors from the camera collaborator.
#[derive(Error, Debug)]
pub enum CameraError {
    #[error("failed to open camera: {0}")]
    OpenFailed(String),
    #[error("capture failed: {0}")]
    CaptureFailed(String),
}
