//! Complex-valued vectors, stored as interleaved re/im `f32` pairs.
//!
//! Component `i` lives at slots `2i` (real part) and `2i + 1` (imaginary
//! part). Rotation moves whole pairs, so permutation encoding behaves the
//! same as for the real ground type.

use rand::rngs::StdRng;
use rand::seq::index::sample;

const EPSILON: f32 = 1e-10;

/// A vector of complex components.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexVector {
    /// Interleaved re/im pairs; length is twice the dimension.
    components: Vec<f32>,
}

impl ComplexVector {
    /// Creates a zero vector of `dimension` complex components.
    #[must_use]
    pub fn zero(dimension: usize) -> Self {
        Self {
            components: vec![0.0; dimension * 2],
        }
    }

    /// Creates a vector from interleaved re/im components.
    ///
    /// # Panics
    /// Panics if the slice length is odd.
    #[must_use]
    pub fn from_components(components: Vec<f32>) -> Self {
        assert!(
            components.len() % 2 == 0,
            "interleaved complex storage needs an even component count"
        );
        Self { components }
    }

    /// Generates a sparse elemental pattern: `seed_length` distinct
    /// positions with real part +1 or -1, imaginary part zero.
    #[must_use]
    pub fn elemental(dimension: usize, seed_length: usize, rng: &mut StdRng) -> Self {
        let mut components = vec![0.0; dimension * 2];
        let positions = sample(rng, dimension, seed_length);
        for (i, position) in positions.iter().enumerate() {
            components[position * 2] = if i % 2 == 0 { 1.0 } else { -1.0 };
        }
        Self { components }
    }

    #[must_use]
    pub fn dimension(&self) -> usize {
        self.components.len() / 2
    }

    /// Read-only view of the interleaved components.
    #[must_use]
    pub fn components(&self) -> &[f32] {
        &self.components
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.components.iter().all(|&c| c == 0.0)
    }

    /// Number of components whose real or imaginary part is non-zero.
    #[must_use]
    pub fn nonzero_count(&self) -> usize {
        self.components
            .chunks_exact(2)
            .filter(|pair| pair[0] != 0.0 || pair[1] != 0.0)
            .count()
    }

    /// Adds `weight * other` component-wise (both parts).
    pub fn superpose(&mut self, other: &ComplexVector, weight: f32) {
        debug_assert_eq!(
            self.components.len(),
            other.components.len(),
            "Vectors must have same dimension"
        );
        for (target, &source) in self.components.iter_mut().zip(other.components.iter()) {
            *target += weight * source;
        }
    }

    /// Returns a copy with complex component `i` moved to
    /// `(i + shift) mod dimension`; re/im pairs move together.
    #[must_use]
    pub fn rotate(&self, shift: i64) -> ComplexVector {
        let dimension = self.dimension();
        if dimension == 0 {
            return self.clone();
        }
        let mut rotated = vec![0.0; dimension * 2];
        for i in 0..dimension {
            let target = (i as i64 + shift).rem_euclid(dimension as i64) as usize;
            rotated[target * 2] = self.components[i * 2];
            rotated[target * 2 + 1] = self.components[i * 2 + 1];
        }
        Self {
            components: rotated,
        }
    }

    /// Rescales to unit magnitude in place; a zero vector is left unchanged.
    pub fn normalize(&mut self) {
        let norm: f32 = self.components.iter().map(|c| c * c).sum::<f32>().sqrt();
        if norm > EPSILON {
            for component in self.components.iter_mut() {
                *component /= norm;
            }
        }
    }

    /// Real part of the Hermitian inner product, scaled by both magnitudes.
    #[must_use]
    pub fn similarity(&self, other: &ComplexVector) -> f32 {
        debug_assert_eq!(
            self.components.len(),
            other.components.len(),
            "Vectors must have same dimension"
        );
        // Re(sum a_i * conj(b_i)) = sum re_a*re_b + im_a*im_b
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
