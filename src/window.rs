//! Sliding-window contribution encoding.
//!
//! For a neighbor at signed offset `o` from a focus occurrence (`o =
//! neighbor position - focus position`), the encoder computes what gets
//! superposed into the focus term's semantic vector. The policy is chosen
//! once per run and applied branch-free per pair:
//!
//! - `basic`: the neighbor's elemental vector, weighted; blind to offset.
//! - `directional`: distance-decayed, with a single-step rotation by the
//!   offset's sign, so left and right context occupy disjoint positions of
//!   the same vector.
//! - `permutation`: the elemental vector rotated by the full offset,
//!   encoding exact relative position up to the cycle length.
//! - `permutation_basic`: the sum of the basic and permutation encodings.
//!
//! An asymmetric window is expressed by a truncated left radius: offsets
//! left of it are outside the window even when their magnitude fits the
//! symmetric radius.

use crate::config::WindowConfig;
use crate::error::{BuildError, BuildResult};
use crate::vector::Vector;
use serde::{Deserialize, Serialize};

/// Positional encoding applied to neighbor contributions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncodingMethod {
    /// Flat co-occurrence; offset is ignored.
    #[default]
    Basic,
    /// HAL-style: distance-decayed and direction-sensitive.
    Directional,
    /// Cyclic rotation by the signed offset.
    Permutation,
    /// Basic plus permutation, capturing both signals.
    PermutationBasic,
    /// Gradient-trained embeddings. Recognized so configurations parse,
    /// but handled by a separate trainer with its own loop; this engine
    /// rejects it.
    Embeddings,
}

/// Distance-decay function used by the directional encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceDecay {
    /// `(radius + 1 - d) / radius`: adjacent neighbors weigh 1.0, the
    /// farthest in-window neighbor weighs `1 / radius`.
    #[default]
    Linear,
    /// `1 / d`.
    Reciprocal,
    /// No decay.
    Flat,
}

/// Per-run window policy: membership test plus contribution encoding.
#[derive(Debug, Clone)]
pub struct WindowEncoder {
    method: EncodingMethod,
    decay: DistanceDecay,
    radius: i64,
    left_limit: i64,
}

impl WindowEncoder {
    /// Builds the encoder for a run.
    ///
    /// Fails on the `embeddings` method: that path manages its own
    /// training and never goes through window encoding.
    pub fn new(config: &WindowConfig) -> BuildResult<Self> {
        if config.encoding == EncodingMethod::Embeddings {
            return Err(BuildError::config(
                "the embeddings encoding is handled by a separate trainer, not the window encoder",
            ));
        }
        let radius = config.radius as i64;
        Ok(Self {
            method: config.encoding,
            decay: config.decay,
            radius,
            left_limit: config
                .truncated_left_radius
                .map(|left| left as i64)
                .unwrap_or(radius),
        })
    }

    /// The symmetric window radius, for early scan cut-off.
    #[must_use]
    pub fn radius(&self) -> i64 {
        self.radius
    }

    /// Whether a neighbor at signed `offset` is inside the window.
    #[must_use]
    pub fn in_window(&self, offset: i64) -> bool {
        offset != 0 && offset <= self.radius && offset >= -self.left_limit
    }

    /// Superposes the encoded contribution of one neighbor occurrence into
    /// `target`.
    ///
    /// Callers only pass offsets accepted by [`WindowEncoder::in_window`].
    pub fn accumulate(&self, target: &mut Vector, offset: i64, elemental: &Vector, weight: f32) {
        debug_assert!(self.in_window(offset), "offset {offset} outside window");
        match self.method {
            EncodingMethod::Basic => target.superpose(elemental, weight),
            EncodingMethod::Directional => {
                let decayed = weight * self.decay_weight(offset.abs());
                target.superpose(&elemental.rotate(offset.signum()), decayed);
            }
            EncodingMethod::Permutation => target.superpose(&elemental.rotate(offset), weight),
            EncodingMethod::PermutationBasic => {
                target.superpose(elemental, weight);
                target.superpose(&elemental.rotate(offset), weight);
            }
            EncodingMethod::Embeddings => unreachable!("rejected in WindowEncoder::new"),
        }
    }

    fn decay_weight(&self, distance: i64) -> f32 {
        match self.decay {
            DistanceDecay::Linear => (self.radius - distance + 1) as f32 / self.radius as f32,
            DistanceDecay::Reciprocal => 1.0 / distance as f32,
            DistanceDecay::Flat => 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::{RealVector, VectorKind};

    fn config(encoding: EncodingMethod, radius: usize) -> WindowConfig {
        WindowConfig {
            radius,
            truncated_left_radius: None,
            encoding,
            decay: DistanceDecay::Linear,
        }
    }

    fn elemental() -> Vector {
        Vector::Real(RealVector::from_components(vec![1.0, -1.0, 0.0, 0.0]))
    }

    fn contribution(encoder: &WindowEncoder, offset: i64, weight: f32) -> Vector {
        let mut target = Vector::zero(VectorKind::Real, 4);
        encoder.accumulate(&mut target, offset, &elemental(), weight);
        target
    }

    #[test]
    fn test_basic_is_symmetric_in_offset_sign() {
        let encoder = WindowEncoder::new(&config(EncodingMethod::Basic, 3)).unwrap();
        assert_eq!(
            contribution(&encoder, 2, 0.5),
            contribution(&encoder, -2, 0.5)
        );
    }

    #[test]
    fn test_permutation_rotates_by_offset() {
        let encoder = WindowEncoder::new(&config(EncodingMethod::Permutation, 3)).unwrap();
        let expected = {
            let mut v = Vector::zero(VectorKind::Real, 4);
            v.superpose(&elemental().rotate(2), 1.0);
            v
        };
        assert_eq!(contribution(&encoder, 2, 1.0), expected);
        // opposite offsets land in different positions
        assert_ne!(contribution(&encoder, 1, 1.0), contribution(&encoder, -1, 1.0));
    }

    #[test]
    fn test_permutation_basic_is_the_sum_of_both() {
        let both = WindowEncoder::new(&config(EncodingMethod::PermutationBasic, 3)).unwrap();
        let basic = WindowEncoder::new(&config(EncodingMethod::Basic, 3)).unwrap();
        let permutation = WindowEncoder::new(&config(EncodingMethod::Permutation, 3)).unwrap();

        let mut expected = contribution(&basic, -1, 2.0);
        expected.merge(&contribution(&permutation, -1, 2.0));
        assert_eq!(contribution(&both, -1, 2.0), expected);
    }

    #[test]
    fn test_directional_separates_left_from_right() {
        let encoder = WindowEncoder::new(&config(EncodingMethod::Directional, 3)).unwrap();
        let left = contribution(&encoder, -1, 1.0);
        let right = contribution(&encoder, 1, 1.0);
        assert_ne!(left, right);
        // one-step rotations regardless of distance
        let far_left = contribution(&encoder, -3, 1.0);
        let Vector::Real(far) = &far_left else {
            panic!("expected real vector");
        };
        let Vector::Real(near) = &left else {
            panic!("expected real vector");
        };
        // same positions, smaller magnitude
        for (f, n) in far.components().iter().zip(near.components()) {
            assert_eq!(f.abs() > 0.0, n.abs() > 0.0);
        }
    }

    #[test]
    fn test_directional_decay_is_monotone() {
        let encoder = WindowEncoder::new(&config(EncodingMethod::Directional, 4)).unwrap();
        let weights: Vec<f32> = (1..=4).map(|d| encoder.decay_weight(d)).collect();
        assert_eq!(weights[0], 1.0);
        for pair in weights.windows(2) {
            assert!(pair[0] >= pair[1]);
        }
        assert_eq!(weights[3], 0.25);
    }

    #[test]
    fn test_window_membership() {
        let encoder = WindowEncoder::new(&config(EncodingMethod::Basic, 2)).unwrap();
        assert!(!encoder.in_window(0));
        assert!(encoder.in_window(1));
        assert!(encoder.in_window(-2));
        assert!(!encoder.in_window(3));
        assert!(!encoder.in_window(-3));
    }

    #[test]
    fn test_truncated_left_radius_excludes_far_left() {
        let mut cfg = config(EncodingMethod::Basic, 3);
        cfg.truncated_left_radius = Some(1);
        let encoder = WindowEncoder::new(&cfg).unwrap();
        assert!(encoder.in_window(-1));
        assert!(!encoder.in_window(-2));
        assert!(encoder.in_window(3));

        // a zero left radius makes the window right-only
        cfg.truncated_left_radius = Some(0);
        let encoder = WindowEncoder::new(&cfg).unwrap();
        assert!(!encoder.in_window(-1));
        assert!(encoder.in_window(1));
    }

    #[test]
    fn test_embeddings_method_rejected() {
        let err = WindowEncoder::new(&config(EncodingMethod::Embeddings, 3)).unwrap_err();
        assert_eq!(err.status_code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_zero_radius_window_is_empty() {
        let encoder = WindowEncoder::new(&config(EncodingMethod::Basic, 0)).unwrap();
        for offset in -2i64..=2 {
            assert!(!encoder.in_window(offset));
        }
    }
}
