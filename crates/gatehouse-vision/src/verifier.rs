//! Bounded camera-based face verification.

use crate::frame::{self, DOWNSAMPLE_FACTOR};
use crate::gallery::Gallery;
use crate::traits::{FaceEncoder, FaceScanner, FrameSource, PreviewAction};
use gatehouse_core::{ActuatorCommand, KioskConfig};
use gatehouse_link::ActuatorPort;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

/// Policy knobs for one face scan.
#[derive(Debug, Clone)]
pub struct ScanPolicy {
    /// Euclidean distance threshold for a match.
    pub threshold: f32,
    /// Capture attempts per scan.
    pub max_attempts: u32,
    /// Delay between attempts.
    pub attempt_delay: Duration,
    /// Wall-clock bound on the whole scan. Failed captures retry for free
    /// inside the attempt budget; this keeps a camera that fails every read
    /// from spinning forever.
    pub deadline: Duration,
}

impl ScanPolicy {
    #[must_use]
    pub fn from_config(config: &KioskConfig) -> Self {
        Self {
            threshold: config.face_match_threshold,
            max_attempts: config.max_face_attempts,
            attempt_delay: config.attempt_delay(),
            deadline: config.scan_deadline(),
        }
    }
}

/// Runs bounded matching attempts against the gallery, driving the camera
/// and (through the lent link) the actuator.
pub struct FaceVerifier<C, E> {
    camera: C,
    encoder: E,
    gallery: Gallery,
    policy: ScanPolicy,
}

impl<C: FrameSource, E: FaceEncoder> FaceVerifier<C, E> {
    #[must_use]
    pub fn new(camera: C, encoder: E, gallery: Gallery, policy: ScanPolicy) -> Self {
        Self {
            camera,
            encoder,
            gallery,
            policy,
        }
    }

    #[must_use]
    pub fn gallery(&self) -> &Gallery {
        &self.gallery
    }

    /// One capture-encode-compare pass over the gallery.
    ///
    /// Returns the matched label, if any. First hit wins: the first gallery
    /// entry within threshold of the first face that has any match.
    fn match_frame(&mut self, image: &image::RgbImage) -> Option<String> {
        let small = frame::downsample(image, DOWNSAMPLE_FACTOR);
        match self.encoder.encode(&small) {
            Ok(descriptors) => {
                for descriptor in &descriptors {
                    if let Some(entry) = self.gallery.first_match(descriptor, self.policy.threshold)
                    {
                        return Some(entry.label.clone());
                    }
                }
                None
            }
            Err(e) => {
                warn!(error = %e, "face encoding failed");
                None
            }
        }
    }
}

impl<C: FrameSource, E: FaceEncoder> FaceScanner for FaceVerifier<C, E> {
    fn perform_scan(&mut self, link: &mut dyn ActuatorPort) -> bool {
        info!("initiating face verification");
        link.send(ActuatorCommand::ScanInProgress);

        if let Err(e) = self.camera.open() {
            error!(error = %e, "failed to access camera");
            link.send(ActuatorCommand::AccessDenied);
            return false;
        }

        let deadline = Instant::now() + self.policy.deadline;
        let mut matched: Option<String> = None;
        let mut attempts = 0u32;

        while attempts < self.policy.max_attempts {
            if Instant::now() >= deadline {
                warn!("face scan wall-clock deadline exceeded");
                break;
            }

            let outcome = self.camera.grab();
            let frame = match outcome {
                Ok(Some(frame)) => frame,
                Ok(None) => {
                    // transient capture failure: free retry inside the deadline
                    warn!("failed to capture frame");
                    continue;
                }
                Err(e) => {
                    error!(error = %e, "camera failure during scan");
                    break;
                }
            };

            matched = self.match_frame(&frame.image);
            if let Some(name) = &matched {
                info!(name = %name, "access granted to enrolled face");
                break;
            }

            if self.camera.preview(&frame) == PreviewAction::Quit {
                info!("face scan aborted from preview");
                break;
            }

            attempts += 1;
            std::thread::sleep(self.policy.attempt_delay);
        }

        self.camera.close();

        if matched.is_some() {
            link.send(ActuatorCommand::AccessGranted);
            true
        } else {
            warn!("face verification failed");
            link.send(ActuatorCommand::AccessDenied);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::Descriptor;
    use crate::gallery::GalleryEntry;
    use crate::mock::{MockCamera, MockCameraHandle, MockEncoder, MockGrab};
    use gatehouse_link::{MockLink, MockLinkHandle};

    fn test_policy() -> ScanPolicy {
        ScanPolicy {
            threshold: 0.6,
            max_attempts: 3,
            attempt_delay: Duration::from_millis(0),
            deadline: Duration::from_millis(200),
        }
    }

    fn gallery_with(label: &str, values: Vec<f32>) -> Gallery {
        Gallery::from_entries(vec![GalleryEntry {
            label: label.to_string(),
            descriptor: Descriptor::new(values),
        }])
    }

    fn harness(
        gallery: Gallery,
        encoder: MockEncoder,
        policy: ScanPolicy,
    ) -> (
        FaceVerifier<MockCamera, MockEncoder>,
        MockCameraHandle,
        MockLink,
        MockLinkHandle,
    ) {
        let (camera, camera_handle) = MockCamera::new();
        let (link, link_handle) = MockLink::new();
        let verifier = FaceVerifier::new(camera, encoder, gallery, policy);
        (verifier, camera_handle, link, link_handle)
    }

    #[test]
    fn test_scan_grants_on_match() {
        let gallery = gallery_with("alice", vec![0.0; 4]);
        let encoder = MockEncoder::returning(vec![Descriptor::new(vec![0.1; 4])]);
        let (mut verifier, camera, mut link, wire) = harness(gallery, encoder, test_policy());
        camera.push_frames(1);

        assert!(verifier.perform_scan(&mut link));
        assert_eq!(
            wire.sent(),
            vec![
                ActuatorCommand::ScanInProgress,
                ActuatorCommand::AccessGranted,
            ]
        );
        assert_eq!(camera.close_calls(), 1);
        assert!(!camera.is_open());
    }

    #[test]
    fn test_scan_denies_after_exhausted_attempts() {
        let gallery = gallery_with("alice", vec![0.0; 4]);
        // faces found, but far outside the threshold
        let encoder = MockEncoder::returning(vec![Descriptor::new(vec![9.0; 4])]);
        let (mut verifier, camera, mut link, wire) = harness(gallery, encoder, test_policy());
        camera.push_frames(5);

        assert!(!verifier.perform_scan(&mut link));
        assert_eq!(wire.sent_count(ActuatorCommand::AccessDenied), 1);
        assert_eq!(camera.close_calls(), 1);
    }

    #[test]
    fn test_scan_matches_on_later_attempt() {
        let gallery = gallery_with("alice", vec![0.0; 4]);
        let mut encoder = MockEncoder::returning(vec![Descriptor::new(vec![0.0; 4])]);
        // first two frames: no face; third: the enrolled face (fallback)
        encoder.push_response(Ok(Vec::new()));
        encoder.push_response(Ok(Vec::new()));
        let (mut verifier, camera, mut link, wire) = harness(gallery, encoder, test_policy());
        camera.push_frames(3);

        assert!(verifier.perform_scan(&mut link));
        assert_eq!(wire.sent_count(ActuatorCommand::AccessGranted), 1);
    }

    #[test]
    fn test_scan_camera_open_failure_denies_once() {
        let gallery = gallery_with("alice", vec![0.0; 4]);
        let encoder = MockEncoder::empty();
        let (mut verifier, camera, mut link, wire) = harness(gallery, encoder, test_policy());
        camera.fail_open();

        assert!(!verifier.perform_scan(&mut link));
        assert_eq!(
            wire.sent(),
            vec![
                ActuatorCommand::ScanInProgress,
                ActuatorCommand::AccessDenied,
            ]
        );
        // never acquired, so never released
        assert_eq!(camera.close_calls(), 0);
    }

    #[test]
    fn test_scan_failed_grabs_bounded_by_deadline() {
        let gallery = gallery_with("alice", vec![0.0; 4]);
        let encoder = MockEncoder::returning(vec![Descriptor::new(vec![0.0; 4])]);
        let policy = ScanPolicy {
            deadline: Duration::from_millis(30),
            ..test_policy()
        };
        let (mut verifier, camera, mut link, wire) = harness(gallery, encoder, policy);
        // no frames scripted: every grab is a transient failure

        let started = Instant::now();
        assert!(!verifier.perform_scan(&mut link));
        assert!(started.elapsed() >= Duration::from_millis(30));
        assert_eq!(wire.sent_count(ActuatorCommand::AccessDenied), 1);
        assert_eq!(camera.close_calls(), 1);
    }

    #[test]
    fn test_scan_failed_grab_does_not_consume_attempt() {
        let gallery = gallery_with("alice", vec![0.0; 4]);
        let encoder = MockEncoder::returning(vec![Descriptor::new(vec![0.0; 4])]);
        let policy = ScanPolicy {
            max_attempts: 1,
            ..test_policy()
        };
        let (mut verifier, camera, mut link, _wire) = harness(gallery, encoder, policy);
        // two failed captures ahead of the single good frame; with one
        // attempt allowed the match still happens
        camera.push(MockGrab::Failed);
        camera.push(MockGrab::Failed);
        camera.push(MockGrab::Frame);

        assert!(verifier.perform_scan(&mut link));
    }

    #[test]
    fn test_scan_quit_from_preview_is_denial() {
        let gallery = gallery_with("alice", vec![0.0; 4]);
        let encoder = MockEncoder::empty();
        let (mut verifier, camera, mut link, wire) = harness(gallery, encoder, test_policy());
        camera.push(MockGrab::FrameThenQuit);
        camera.push_frames(4);

        assert!(!verifier.perform_scan(&mut link));
        assert_eq!(
            wire.sent(),
            vec![
                ActuatorCommand::ScanInProgress,
                ActuatorCommand::AccessDenied,
            ]
        );
        assert_eq!(camera.close_calls(), 1);
    }

    #[test]
    fn test_scan_empty_gallery_never_matches() {
        let gallery = Gallery::default();
        let encoder = MockEncoder::returning(vec![Descriptor::new(vec![0.0; 4])]);
        let (mut verifier, camera, mut link, wire) = harness(gallery, encoder, test_policy());
        camera.push_frames(3);

        assert!(!verifier.perform_scan(&mut link));
        assert_eq!(wire.sent_count(ActuatorCommand::AccessDenied), 1);
    }

    #[test]
    fn test_policy_from_config() {
        let config = KioskConfig::default();
        let policy = ScanPolicy::from_config(&config);
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.attempt_delay, Duration::from_millis(1000));
        assert_eq!(policy.deadline, Duration::from_secs(30));
        assert!((policy.threshold - 0.6).abs() < 1e-6);
    }
}
