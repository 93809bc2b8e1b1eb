//! Face gallery loading and camera-based face verification.
//!
//! The face-encoding algorithm and the camera are external collaborators:
//! they sit behind the [`FaceEncoder`] and [`FrameSource`] traits, with
//! scriptable mocks in [`mock`]. Real recognition/capture backends belong
//! behind the `backend-*` cargo features.

pub mod descriptor;
pub mod error;
pub mod frame;
pub mod gallery;
pub mod mock;
pub mod traits;
pub mod verifier;

pub use descriptor::Descriptor;
pub use error::{CameraError, EncoderError, GalleryError};
pub use frame::Frame;
pub use gallery::{Gallery, GalleryEntry};
pub use traits::{FaceEncoder, FaceScanner, FrameSource, PreviewAction};
pub use verifier::{FaceVerifier, ScanPolicy};
