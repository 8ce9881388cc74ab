//! Random Indexing term-vector construction.
//!
//! Builds high-dimensional distributional term vectors from the positional
//! postings of a text index: sparse random elemental vectors, windowed
//! co-occurrence accumulation under several positional encodings (flat,
//! HAL-style directional, permutation), and an iterative retraining loop
//! that feeds each cycle's output back as the next cycle's seeds.
//!
//! ```no_run
//! use randex::{MemoryTextIndex, Settings, TrainingCycleController};
//!
//! let mut index = MemoryTextIndex::new();
//! index.add_text("colorless green ideas sleep furiously");
//!
//! let settings = Settings::default();
//! let trained = TrainingCycleController::new(&settings, &index).run()?;
//! for (term, vector) in trained.vectors.iter() {
//!     println!("{term}: {} non-zero components", vector.nonzero_count());
//! }
//! # Ok::<(), randex::BuildError>(())
//! ```

pub mod accumulator;
pub mod config;
pub mod elemental;
pub mod error;
pub mod index;
pub mod store;
pub mod training;
pub mod vector;
pub mod window;

// Explicit exports for better API clarity
pub use accumulator::CooccurrenceAccumulator;
pub use config::Settings;
pub use elemental::ElementalVectorFactory;
pub use error::{BuildError, BuildResult, ErrorContext};
pub use index::{
    IndexAccessError, MemoryTextIndex, Posting, TantivyTextIndex, TermStats, TermWeighting,
    TextIndex,
};
pub use store::VectorStore;
pub use training::{RunSummary, TrainedTermVectors, TrainingCycleController, VectorWriter};
pub use vector::{Vector, VectorError, VectorKind};
pub use window::{DistanceDecay, EncodingMethod, WindowEncoder};
