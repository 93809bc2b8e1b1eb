//! Collaborator trait definitions.
//!
//! These traits are the seams around the pieces this system does not own:
//! the face-encoding algorithm, the camera, and (from the controller's point
//! of view) the whole verification step. Mock implementations live in
//! [`mock`](crate::mock); real backends belong behind the `backend-*`
//! cargo features.

use crate::descriptor::Descriptor;
use crate::error::{CameraError, EncoderError};
use crate::frame::Frame;
use gatehouse_link::ActuatorPort;
use image::RgbImage;

/// The external face-encoding collaborator.
pub trait FaceEncoder {
    /// Detect faces in an image and compute one descriptor per detected
    /// face, in detection order.
    ///
    /// An image with no detectable face yields an empty vector, which is
    /// not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the encoding backend itself fails.
    fn encode(&mut self, image: &RgbImage) -> Result<Vec<Descriptor>, EncoderError>;
}

/// Operator response from the preview surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewAction {
    /// Keep scanning.
    Continue,
    /// Abort the scan; treated as a denial.
    Quit,
}

/// The camera collaborator.
///
/// The device is acquired and released within one scan invocation; the
/// verifier guarantees `close` on every exit path once `open` succeeded.
pub trait FrameSource {
    /// Acquire the capture device.
    ///
    /// # Errors
    ///
    /// Returns an error if the device cannot be opened. The verifier treats
    /// this as a failed scan, not a crash.
    fn open(&mut self) -> Result<(), CameraError>;

    /// Capture one frame.
    ///
    /// `Ok(None)` is a transient capture failure: the caller may retry
    /// without consuming an attempt. A hard device fault is `Err`.
    ///
    /// # Errors
    ///
    /// Returns an error if the device fails in a non-transient way.
    fn grab(&mut self) -> Result<Option<Frame>, CameraError>;

    /// Show a frame on the operator preview, a feedback aid only.
    ///
    /// Headless sources keep the default and never quit.
    fn preview(&mut self, _frame: &Frame) -> PreviewAction {
        PreviewAction::Continue
    }

    /// Release the capture device.
    fn close(&mut self);
}

/// The verification step as the access controller sees it.
pub trait FaceScanner {
    /// Run one bounded face verification, signalling progress and the
    /// verdict on the lent actuator link. Returns whether a gallery face
    /// was matched.
    fn perform_scan(&mut self, link: &mut dyn ActuatorPort) -> bool;
}
