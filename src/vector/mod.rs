//! Numeric vector model for Random Indexing.
//!
//! Three ground types share one closed tagged variant: real, complex, and
//! binary vectors with {superpose, merge, rotate, normalize, similarity}
//! implemented per variant. The variant is chosen once from the run
//! configuration; mixing kinds or dimensions inside a run is a caller bug.
//!
//! # Architecture
//! Elemental (seed) vectors are sparse pseudorandom patterns generated per
//! ground type; semantic vectors accumulate weighted, possibly rotated
//! copies of elemental vectors. Binary vectors defer accumulation to a
//! per-component voting tally resolved by majority at normalization time,
//! which keeps parallel accumulation order-independent.

mod binary;
mod complex;
mod real;
mod types;

pub use binary::BinaryVector;
pub use complex::ComplexVector;
pub use real::RealVector;
pub use types::{SeedLength, Vector, VectorDimension, VectorError, VectorKind};
