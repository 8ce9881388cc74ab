//! Core types for the numeric vector model.
//!
//! This module provides the closed tagged variant over the three ground
//! types (real, complex, binary) plus validated newtypes and error types
//! following the project's strict type safety guidelines. The variant is
//! selected once per run; every vector participating in a run shares the
//! same kind and dimension.

use crate::vector::binary::BinaryVector;
use crate::vector::complex::ComplexVector;
use crate::vector::real::RealVector;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Numeric ground type of a vector run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VectorKind {
    /// Dense single-precision floating point components
    #[default]
    Real,
    /// Interleaved re/im floating point pairs
    Complex,
    /// One bit per component, accumulated by majority vote
    Binary,
}

impl std::fmt::Display for VectorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Real => "real",
            Self::Complex => "complex",
            Self::Binary => "binary",
        };
        write!(f, "{name}")
    }
}

/// Type-safe wrapper for vector dimensions.
///
/// Ensures runtime validation of vector dimensions to prevent dimension
/// mismatches during operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VectorDimension(usize);

impl VectorDimension {
    /// Creates a new `VectorDimension` with validation.
    ///
    /// Returns an error if the dimension is zero.
    pub fn new(dim: usize) -> Result<Self, VectorError> {
        if dim == 0 {
            return Err(VectorError::InvalidDimension {
                dimension: 0,
                reason: "Vector dimension cannot be zero",
            });
        }
        Ok(Self(dim))
    }

    /// Returns the underlying dimension value.
    #[must_use]
    pub const fn get(&self) -> usize {
        self.0
    }
}

/// Type-safe wrapper for elemental seed lengths.
///
/// A seed length is only meaningful relative to a dimension: an elemental
/// vector cannot carry more non-zero entries than it has components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedLength(usize);

impl SeedLength {
    /// Creates a new `SeedLength`, validated against the run dimension.
    pub fn new(seed_length: usize, dimension: VectorDimension) -> Result<Self, VectorError> {
        if seed_length == 0 || seed_length > dimension.get() {
            return Err(VectorError::InvalidSeedLength {
                seed_length,
                dimension: dimension.get(),
            });
        }
        Ok(Self(seed_length))
    }

    /// Returns the underlying seed length value.
    #[must_use]
    pub const fn get(&self) -> usize {
        self.0
    }
}

/// Errors that can occur during vector operations.
///
/// All error messages include actionable suggestions for resolution.
#[derive(Error, Debug)]
pub enum VectorError {
    #[error(
        "Vector dimension mismatch: expected {expected}, got {actual}\nSuggestion: Ensure all vectors in a run are built with the same configured dimension"
    )]
    DimensionMismatch { expected: usize, actual: usize },

    #[error(
        "Vector type mismatch: expected {expected}, got {actual}\nSuggestion: Ensure all vectors in a run share the configured vector type"
    )]
    KindMismatch {
        expected: VectorKind,
        actual: VectorKind,
    },

    #[error("Invalid vector dimension: {dimension}\nReason: {reason}")]
    InvalidDimension {
        dimension: usize,
        reason: &'static str,
    },

    #[error(
        "Invalid seed length {seed_length} for dimension {dimension}\nSuggestion: Use a seed length between 1 and the configured dimension"
    )]
    InvalidSeedLength {
        seed_length: usize,
        dimension: usize,
    },
}

/// A vector of one of the three ground types.
///
/// Operations between two vectors require the same kind and dimension;
/// every constructor in this crate derives both from the run configuration,
/// so a mismatch is a caller bug and is checked with `debug_assert!` rather
/// than a per-call `Result`.
#[derive(Debug, Clone, PartialEq)]
pub enum Vector {
    Real(RealVector),
    Complex(ComplexVector),
    Binary(BinaryVector),
}

impl Vector {
    /// Creates a zero vector of the given kind and dimension.
    #[must_use]
    pub fn zero(kind: VectorKind, dimension: usize) -> Self {
        match kind {
            VectorKind::Real => Self::Real(RealVector::zero(dimension)),
            VectorKind::Complex => Self::Complex(ComplexVector::zero(dimension)),
            VectorKind::Binary => Self::Binary(BinaryVector::zero(dimension)),
        }
    }

    /// The ground type of this vector.
    #[must_use]
    pub fn kind(&self) -> VectorKind {
        match self {
            Self::Real(_) => VectorKind::Real,
            Self::Complex(_) => VectorKind::Complex,
            Self::Binary(_) => VectorKind::Binary,
        }
    }

    /// Number of components.
    #[must_use]
    pub fn dimension(&self) -> usize {
        match self {
            Self::Real(v) => v.dimension(),
            Self::Complex(v) => v.dimension(),
            Self::Binary(v) => v.dimension(),
        }
    }

    /// True if no component carries any signal.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        match self {
            Self::Real(v) => v.is_zero(),
            Self::Complex(v) => v.is_zero(),
            Self::Binary(v) => v.is_zero(),
        }
    }

    /// Number of non-zero (or set) components.
    #[must_use]
    pub fn nonzero_count(&self) -> usize {
        match self {
            Self::Real(v) => v.nonzero_count(),
            Self::Complex(v) => v.nonzero_count(),
            Self::Binary(v) => v.nonzero_count(),
        }
    }

    /// Adds `weight` copies of `other` into this vector.
    ///
    /// For real and complex vectors this is scaled component addition; for
    /// binary vectors it records `weight` votes per component in the
    /// pending tally, resolved later by [`Vector::normalize`].
    pub fn superpose(&mut self, other: &Vector, weight: f32) {
        match (self, other) {
            (Self::Real(a), Self::Real(b)) => a.superpose(b, weight),
            (Self::Complex(a), Self::Complex(b)) => a.superpose(b, weight),
            (Self::Binary(a), Self::Binary(b)) => a.superpose(b, weight),
            (a, b) => debug_assert!(
                false,
                "superpose across vector kinds: {} vs {}",
                a.kind(),
                b.kind()
            ),
        }
    }

    /// Merges another partial accumulation into this one.
    ///
    /// Associative and commutative (modulo floating-point rounding order),
    /// so parallel partial sums can be combined in any interleaving. Unlike
    /// [`Vector::superpose`], a binary merge adds voting tallies rather
    /// than casting new votes.
    pub fn merge(&mut self, other: &Vector) {
        match (self, other) {
            (Self::Real(a), Self::Real(b)) => a.superpose(b, 1.0),
            (Self::Complex(a), Self::Complex(b)) => a.superpose(b, 1.0),
            (Self::Binary(a), Self::Binary(b)) => a.merge(b),
            (a, b) => debug_assert!(
                false,
                "merge across vector kinds: {} vs {}",
                a.kind(),
                b.kind()
            ),
        }
    }

    /// Returns a copy with every component cyclically shifted by `shift`
    /// positions: component `i` moves to `(i + shift) mod dimension`.
    ///
    /// `rotate(rotate(v, s), -s) == v` for every shift.
    #[must_use]
    pub fn rotate(&self, shift: i64) -> Vector {
        match self {
            Self::Real(v) => Self::Real(v.rotate(shift)),
            Self::Complex(v) => Self::Complex(v.rotate(shift)),
            Self::Binary(v) => Self::Binary(v.rotate(shift)),
        }
    }

    /// Rescales to unit length in place; a zero vector is left unchanged.
    ///
    /// For binary vectors this resolves the pending voting tally to a bit
    /// pattern by per-component majority.
    pub fn normalize(&mut self) {
        match self {
            Self::Real(v) => v.normalize(),
            Self::Complex(v) => v.normalize(),
            Self::Binary(v) => v.normalize(),
        }
    }

    /// Similarity in `[-1, 1]` between two vectors of the same kind.
    #[must_use]
    pub fn similarity(&self, other: &Vector) -> f32 {
        match (self, other) {
            (Self::Real(a), Self::Real(b)) => a.similarity(b),
            (Self::Complex(a), Self::Complex(b)) => a.similarity(b),
            (Self::Binary(a), Self::Binary(b)) => a.similarity(b),
            (a, b) => {
                debug_assert!(
                    false,
                    "similarity across vector kinds: {} vs {}",
                    a.kind(),
                    b.kind()
                );
                0.0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_kind_display() {
        assert_eq!(VectorKind::Real.to_string(), "real");
        assert_eq!(VectorKind::Complex.to_string(), "complex");
        assert_eq!(VectorKind::Binary.to_string(), "binary");
    }

    #[test]
    fn test_vector_dimension_validation() {
        assert!(VectorDimension::new(0).is_err());
        let dim = VectorDimension::new(512).unwrap();
        assert_eq!(dim.get(), 512);
    }

    #[test]
    fn test_seed_length_validation() {
        let dim = VectorDimension::new(100).unwrap();
        assert!(SeedLength::new(0, dim).is_err());
        assert!(SeedLength::new(101, dim).is_err());
        assert_eq!(SeedLength::new(100, dim).unwrap().get(), 100);
    }

    #[test]
    fn test_zero_vectors_report_zero() {
        for kind in [VectorKind::Real, VectorKind::Complex, VectorKind::Binary] {
            let v = Vector::zero(kind, 64);
            assert_eq!(v.kind(), kind);
            assert_eq!(v.dimension(), 64);
            assert!(v.is_zero());
            assert_eq!(v.nonzero_count(), 0);
        }
    }

    #[test]
    fn test_rotate_round_trip_all_kinds() {
        let mut real = vec![0.0; 16];
        real[3] = 1.0;
        real[7] = -1.0;
        let mut complex = vec![0.0; 32];
        complex[6] = 1.0;
        complex[15] = -1.0;
        let vectors = [
            Vector::Real(RealVector::from_components(real)),
            Vector::Complex(ComplexVector::from_components(complex)),
            Vector::Binary(BinaryVector::from_set_bits(16, &[3, 7, 15])),
        ];
        for v in vectors {
            for shift in [-17i64, -1, 0, 1, 5, 16, 33] {
                assert_eq!(v.rotate(shift).rotate(-shift), v, "shift {shift}");
            }
        }
    }
}
