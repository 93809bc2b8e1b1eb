use serde::{Deserialize, Serialize};

/// Face descriptor: a fixed-size numeric feature vector produced by the
/// external face-encoding collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Descriptor {
    pub values: Vec<f32>,
}

impl Descriptor {
    #[must_use]
    pub fn new(values: Vec<f32>) -> Self {
        Self { values }
    }

    /// Compute Euclidean distance to another descriptor.
    #[must_use]
    pub fn euclidean_distance(&self, other: &Descriptor) -> f32 {
        self.values
            .iter()
            .zip(other.values.iter())
            .map(|(a, b)| (a - b).powi(2))
            .sum::<f32>()
            .sqrt()
    }

    /// Whether this descriptor is within `threshold` distance of `other`.
    #[must_use]
    pub fn matches(&self, other: &Descriptor, threshold: f32) -> bool {
        self.euclidean_distance(other) <= threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_identical() {
        let a = Descriptor::new(vec![1.0, 0.0, 0.5]);
        let b = Descriptor::new(vec![1.0, 0.0, 0.5]);
        assert!(a.euclidean_distance(&b).abs() < 1e-6);
    }

    #[test]
    fn test_distance_unit_apart() {
        let a = Descriptor::new(vec![0.0, 0.0]);
        let b = Descriptor::new(vec![0.0, 1.0]);
        assert!((a.euclidean_distance(&b) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = Descriptor::new(vec![0.3, -0.2, 0.7]);
        let b = Descriptor::new(vec![-0.1, 0.4, 0.2]);
        assert!((a.euclidean_distance(&b) - b.euclidean_distance(&a)).abs() < 1e-6);
    }

    #[test]
    fn test_matches_threshold() {
        let a = Descriptor::new(vec![0.0, 0.0]);
        let near = Descriptor::new(vec![0.3, 0.0]);
        let far = Descriptor::new(vec![2.0, 0.0]);
        assert!(a.matches(&near, 0.6));
        assert!(!a.matches(&far, 0.6));
    }
}
