//! Dense real-valued vectors.
//!
//! The workhorse ground type: elemental vectors are sparse ternary patterns
//! (`seed_length` entries of alternating sign at pseudorandom positions),
//! semantic vectors are ordinary dense float accumulations. All arithmetic
//! is plain component-wise `f32`.

use rand::rngs::StdRng;
use rand::seq::index::sample;

/// Epsilon below which a norm is treated as zero.
const EPSILON: f32 = 1e-10;

/// A dense vector of `f32` components.
#[derive(Debug, Clone, PartialEq)]
pub struct RealVector {
    components: Vec<f32>,
}

impl RealVector {
    /// Creates a zero vector.
    #[must_use]
    pub fn zero(dimension: usize) -> Self {
        Self {
            components: vec![0.0; dimension],
        }
    }

    /// Creates a vector from raw components.
    #[must_use]
    pub fn from_components(components: Vec<f32>) -> Self {
        Self { components }
    }

    /// Generates a sparse elemental pattern: `seed_length` distinct
    /// positions drawn from `rng`, filled with alternating +1/-1 so the
    /// entries sum to at most one.
    ///
    /// Callers guarantee `seed_length <= dimension`.
    #[must_use]
    pub fn elemental(dimension: usize, seed_length: usize, rng: &mut StdRng) -> Self {
        let mut components = vec![0.0; dimension];
        let positions = sample(rng, dimension, seed_length);
        for (i, position) in positions.iter().enumerate() {
            components[position] = if i % 2 == 0 { 1.0 } else { -1.0 };
        }
        Self { components }
    }

    /// Number of components.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.components.len()
    }

    /// Read-only view of the components.
    #[must_use]
    pub fn components(&self) -> &[f32] {
        &self.components
    }

    /// True if every component is exactly zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.components.iter().all(|&c| c == 0.0)
    }

    /// Number of non-zero components.
    #[must_use]
    pub fn nonzero_count(&self) -> usize {
        self.components.iter().filter(|&&c| c != 0.0).count()
    }

    /// Adds `weight * other` component-wise.
    pub fn superpose(&mut self, other: &RealVector, weight: f32) {
        debug_assert_eq!(
            self.components.len(),
            other.components.len(),
            "Vectors must have same dimension"
        );
        for (target, &source) in self.components.iter_mut().zip(other.components.iter()) {
            *target += weight * source;
        }
    }

    /// Returns a copy with component `i` moved to `(i + shift) mod dimension`.
    #[must_use]
    pub fn rotate(&self, shift: i64) -> RealVector {
        let dimension = self.components.len();
        if dimension == 0 {
            return self.clone();
        }
        let mut rotated = vec![0.0; dimension];
        for (i, &value) in self.components.iter().enumerate() {
            let target = (i as i64 + shift).rem_euclid(dimension as i64) as usize;
            rotated[target] = value;
        }
        Self {
            components: rotated,
        }
    }

    /// Rescales to unit length in place.
    ///
    /// A vector with near-zero norm is left unchanged rather than divided
    /// into NaN territory.
    pub fn normalize(&mut self) {
        let norm: f32 = self.components.iter().map(|c| c * c).sum::<f32>().sqrt();
        if norm > EPSILON {
            for component in self.components.iter_mut() {
                *component /= norm;
            }
        }
    }

    /// Cosine similarity in `[-1, 1]`; zero if either vector is zero.
    #[must_use]
    pub fn similarity(&self, other: &RealVector) -> f32 {
        debug_assert_eq!(
            self.components.len(),
            other.components.len(),
            "Vectors must have same dimension"
        );
        let dot: f32 = self
            .components
            .iter()
            .zip(other.components.iter())
            .map(|(a, b)| a * b)
            .sum();
        let norm_a: f32 = self.components.iter().map(|c| c * c).sum::<f32>().sqrt();
        let norm_b: f32 = other.components.iter().map(|c| c * c).sum::<f32>().sqrt();
        if norm_a <= EPSILON || norm_b <= EPSILON {
            0.0
        } else {
            dot / (norm_a * norm_b)
        }
    }
}
