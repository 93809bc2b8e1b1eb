//! The gallery of enrolled faces, built once at startup from a directory of
//! reference images.

use crate::descriptor::Descriptor;
use crate::error::GalleryError;
use crate::traits::FaceEncoder;
use gatehouse_core::constants::GALLERY_IMAGE_EXTENSIONS;
use std::path::Path;
use tracing::{debug, info, warn};

/// One enrolled face: identity label and reference descriptor.
///
/// Immutable once loaded; there is no enrollment flow at runtime.
#[derive(Debug, Clone)]
pub struct GalleryEntry {
    /// Identity label, taken from the reference image's file stem.
    pub label: String,
    pub descriptor: Descriptor,
}

/// The enrolled set of known faces.
#[derive(Debug, Clone, Default)]
pub struct Gallery {
    entries: Vec<GalleryEntry>,
}

impl Gallery {
    /// Build the gallery from a directory of reference images.
    ///
    /// Every regular file with an accepted image extension is decoded and
    /// passed to the encoder; the first descriptor becomes the entry, the
    /// file stem its label. Files yielding no descriptor, files that fail
    /// to decode, and per-file encoder failures are skipped with a warning.
    /// Entry order is directory listing order.
    ///
    /// # Errors
    ///
    /// Returns `GalleryError::DirectoryUnreadable` if the directory itself
    /// cannot be read or listed; the caller treats that as fatal.
    pub fn load<E: FaceEncoder>(dir: &Path, encoder: &mut E) -> Result<Self, GalleryError> {
        let listing = std::fs::read_dir(dir).map_err(|e| GalleryError::DirectoryUnreadable {
            path: dir.to_path_buf(),
            source: e,
        })?;

        let mut entries = Vec::new();
        for dir_entry in listing {
            let path = match dir_entry {
                Ok(entry) => entry.path(),
                Err(e) => {
                    warn!(error = %e, "skipping unreadable directory entry");
                    continue;
                }
            };
            if !path.is_file() || !has_accepted_extension(&path) {
                continue;
            }

            let image = match image::open(&path) {
                Ok(image) => image.to_rgb8(),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping undecodable image");
                    continue;
                }
            };

            let label = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();

            match encoder.encode(&image) {
                Ok(descriptors) => match descriptors.into_iter().next() {
                    Some(descriptor) => {
                        debug!(label, "loaded gallery face");
                        entries.push(GalleryEntry { label, descriptor });
                    }
                    None => warn!(path = %path.display(), "no faces found in image"),
                },
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "face encoding failed, skipping image");
                }
            }
        }

        if entries.is_empty() {
            warn!(dir = %dir.display(), "gallery is empty; every scan will fail to match");
        } else {
            info!(count = entries.len(), "loaded known faces");
        }

        Ok(Gallery { entries })
    }

    /// Build a gallery directly from entries (test and tooling path).
    #[must_use]
    pub fn from_entries(entries: Vec<GalleryEntry>) -> Self {
        Gallery { entries }
    }

    /// Enrolled entries, in load order.
    #[must_use]
    pub fn entries(&self) -> &[GalleryEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First enrolled entry within `threshold` distance of `probe`.
    ///
    /// First hit wins, in load order; there is no best-of ranking.
    #[must_use]
    pub fn first_match(&self, probe: &Descriptor, threshold: f32) -> Option<&GalleryEntry> {
        self.entries
            .iter()
            .find(|entry| entry.descriptor.matches(probe, threshold))
    }
}

fn has_accepted_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            GALLERY_IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockEncoder;
    use image::RgbImage;
    use rstest::rstest;
    use std::path::PathBuf;

    fn write_png(dir: &Path, name: &str) {
        RgbImage::new(8, 8).save(dir.join(name)).unwrap();
    }

    #[rstest]
    #[case("alice.jpg", true)]
    #[case("alice.JPEG", true)]
    #[case("alice.PNG", true)]
    #[case("alice.gif", false)]
    #[case("alice.txt", false)]
    #[case("alice", false)]
    fn test_accepted_extensions(#[case] name: &str, #[case] expected: bool) {
        assert_eq!(has_accepted_extension(&PathBuf::from(name)), expected);
    }

    #[test]
    fn test_load_labels_are_file_stems() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "alice.png");
        write_png(dir.path(), "bob.png");

        let mut encoder = MockEncoder::returning(vec![Descriptor::new(vec![0.0; 4])]);
        let gallery = Gallery::load(dir.path(), &mut encoder).unwrap();

        let mut labels: Vec<&str> = gallery.entries().iter().map(|e| e.label.as_str()).collect();
        labels.sort_unstable();
        assert_eq!(labels, vec!["alice", "bob"]);
    }

    #[test]
    fn test_load_is_idempotent_and_order_preserving() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["carol.png", "dave.png", "erin.png"] {
            write_png(dir.path(), name);
        }

        let mut encoder = MockEncoder::returning(vec![Descriptor::new(vec![0.5; 4])]);
        let first = Gallery::load(dir.path(), &mut encoder).unwrap();
        let second = Gallery::load(dir.path(), &mut encoder).unwrap();

        let labels = |g: &Gallery| -> Vec<String> {
            g.entries().iter().map(|e| e.label.clone()).collect()
        };
        assert_eq!(first.len(), 3);
        assert_eq!(labels(&first), labels(&second));
    }

    #[test]
    fn test_load_skips_files_without_faces() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "nobody.png");

        let mut encoder = MockEncoder::empty();
        let gallery = Gallery::load(dir.path(), &mut encoder).unwrap();
        assert!(gallery.is_empty());
    }

    #[test]
    fn test_load_skips_non_image_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"not an image").unwrap();
        write_png(dir.path(), "alice.png");

        let mut encoder = MockEncoder::returning(vec![Descriptor::new(vec![0.0; 4])]);
        let gallery = Gallery::load(dir.path(), &mut encoder).unwrap();
        assert_eq!(gallery.len(), 1);
    }

    #[test]
    fn test_load_skips_undecodable_image() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("corrupt.png"), b"\x89PNG but not really").unwrap();

        let mut encoder = MockEncoder::returning(vec![Descriptor::new(vec![0.0; 4])]);
        let gallery = Gallery::load(dir.path(), &mut encoder).unwrap();
        assert!(gallery.is_empty());
    }

    #[test]
    fn test_load_missing_directory_is_fatal() {
        let mut encoder = MockEncoder::empty();
        let result = Gallery::load(Path::new("/nonexistent/known_faces"), &mut encoder);
        assert!(matches!(
            result,
            Err(GalleryError::DirectoryUnreadable { .. })
        ));
    }

    #[test]
    fn test_first_match_takes_first_in_order() {
        let probe = Descriptor::new(vec![0.0, 0.0]);
        let gallery = Gallery::from_entries(vec![
            GalleryEntry {
                label: "far".to_string(),
                descriptor: Descriptor::new(vec![5.0, 0.0]),
            },
            GalleryEntry {
                label: "near".to_string(),
                descriptor: Descriptor::new(vec![0.1, 0.0]),
            },
            GalleryEntry {
                label: "nearer".to_string(),
                descriptor: Descriptor::new(vec![0.0, 0.0]),
            },
        ]);

        // "near" wins despite "nearer" being a better match
        let hit = gallery.first_match(&probe, 0.6).unwrap();
        assert_eq!(hit.label, "near");
    }

    #[test]
    fn test_first_match_none_outside_threshold() {
        let probe = Descriptor::new(vec![0.0, 0.0]);
        let gallery = Gallery::from_entries(vec![GalleryEntry {
            label: "far".to_string(),
            descriptor: Descriptor::new(vec![5.0, 0.0]),
        }]);
        assert!(gallery.first_match(&probe, 0.6).is_none());
    }
}
