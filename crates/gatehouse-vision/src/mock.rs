//! Mock camera and encoder implementations for testing and development.
//!
//! These stand in for the external capture and face-encoding collaborators,
//! scripted per call the same way the hardware mocks in the link crate are.

use crate::descriptor::Descriptor;
use crate::error::{CameraError, EncoderError};
use crate::frame::Frame;
use crate::traits::{FaceEncoder, FrameSource, PreviewAction};
use image::RgbImage;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Scripted outcome for one `grab` call on a [`MockCamera`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockGrab {
    /// Deliver a frame.
    Frame,
    /// Deliver a frame, then request quit from the preview.
    FrameThenQuit,
    /// Transient capture failure (`Ok(None)`).
    Failed,
}

#[derive(Debug)]
struct CameraState {
    fail_open: bool,
    opened: bool,
    open_calls: usize,
    close_calls: usize,
    quit_pending: bool,
    script: VecDeque<MockGrab>,
    sequence: u32,
}

/// Mock camera device.
///
/// `grab` consumes a scripted outcome per call; an exhausted script keeps
/// returning transient failures, which is how a camera that never delivers
/// a frame behaves.
#[derive(Debug)]
pub struct MockCamera {
    state: Arc<Mutex<CameraState>>,
}

impl MockCamera {
    pub fn new() -> (Self, MockCameraHandle) {
        let state = Arc::new(Mutex::new(CameraState {
            fail_open: false,
            opened: false,
            open_calls: 0,
            close_calls: 0,
            quit_pending: false,
            script: VecDeque::new(),
            sequence: 0,
        }));
        (
            Self {
                state: Arc::clone(&state),
            },
            MockCameraHandle { state },
        )
    }
}

impl FrameSource for MockCamera {
    fn open(&mut self) -> Result<(), CameraError> {
        let mut state = self.state.lock().expect("camera state poisoned");
        state.open_calls += 1;
        if state.fail_open {
            return Err(CameraError::OpenFailed("scripted open failure".to_string()));
        }
        state.opened = true;
        Ok(())
    }

    fn grab(&mut self) -> Result<Option<Frame>, CameraError> {
        let mut state = self.state.lock().expect("camera state poisoned");
        if !state.opened {
            return Err(CameraError::CaptureFailed("device not open".to_string()));
        }
        match state.script.pop_front() {
            Some(outcome @ (MockGrab::Frame | MockGrab::FrameThenQuit)) => {
                if outcome == MockGrab::FrameThenQuit {
                    state.quit_pending = true;
                }
                state.sequence += 1;
                let sequence = state.sequence;
                Ok(Some(Frame::new(RgbImage::new(64, 48), sequence)))
            }
            Some(MockGrab::Failed) | None => Ok(None),
        }
    }

    fn preview(&mut self, _frame: &Frame) -> PreviewAction {
        let mut state = self.state.lock().expect("camera state poisoned");
        if state.quit_pending {
            state.quit_pending = false;
            PreviewAction::Quit
        } else {
            PreviewAction::Continue
        }
    }

    fn close(&mut self) {
        let mut state = self.state.lock().expect("camera state poisoned");
        state.opened = false;
        state.close_calls += 1;
    }
}

/// Handle for scripting and observing a [`MockCamera`].
#[derive(Debug, Clone)]
pub struct MockCameraHandle {
    state: Arc<Mutex<CameraState>>,
}

impl MockCameraHandle {
    /// Make the next `open` call fail.
    pub fn fail_open(&self) {
        self.state.lock().expect("camera state poisoned").fail_open = true;
    }

    /// Queue one grab outcome.
    pub fn push(&self, outcome: MockGrab) {
        self.state
            .lock()
            .expect("camera state poisoned")
            .script
            .push_back(outcome);
    }

    /// Queue `count` successful frame grabs.
    pub fn push_frames(&self, count: usize) {
        for _ in 0..count {
            self.push(MockGrab::Frame);
        }
    }

    #[must_use]
    pub fn open_calls(&self) -> usize {
        self.state.lock().expect("camera state poisoned").open_calls
    }

    #[must_use]
    pub fn close_calls(&self) -> usize {
        self.state.lock().expect("camera state poisoned").close_calls
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state.lock().expect("camera state poisoned").opened
    }
}

/// Mock face encoder.
///
/// Scripted responses are consumed first-in-first-out; once the script is
/// exhausted every call returns the fallback descriptor set.
#[derive(Debug, Default)]
pub struct MockEncoder {
    script: VecDeque<Result<Vec<Descriptor>, EncoderError>>,
    fallback: Vec<Descriptor>,
}

impl MockEncoder {
    /// An encoder that always reports the given descriptors.
    #[must_use]
    pub fn returning(descriptors: Vec<Descriptor>) -> Self {
        Self {
            script: VecDeque::new(),
            fallback: descriptors,
        }
    }

    /// An encoder that never detects a face.
    #[must_use]
    pub fn empty() -> Self {
        Self::returning(Vec::new())
    }

    /// Queue one response ahead of the fallback.
    pub fn push_response(&mut self, response: Result<Vec<Descriptor>, EncoderError>) {
        self.script.push_back(response);
    }
}

impl FaceEncoder for MockEncoder {
    fn encode(&mut self, _image: &RgbImage) -> Result<Vec<Descriptor>, EncoderError> {
        match self.script.pop_front() {
            Some(response) => response,
            None => Ok(self.fallback.clone()),
        }
    }
}
