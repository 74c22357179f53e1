//! Cellflow - a reactive notebook over a dependency graph of cells.
//!
//! A [`Notebook`] wires four cells onto a [`DependencyGraph`]:
//! the `sample_size` input, a synthetic `dataset`, its `statistics` and a
//! textual `report`. Setting the input recomputes exactly the cells that
//! depend on it, in dependency order, and commits the results only when the
//! whole pass succeeds.
//!
//! # Serialization
//!
//! Cell values are serialized with postcard. This means:
//! - Stored types must implement `Serialize`
//! - Loaded types must implement `DeserializeOwned`
//! - Reading a value as a different type than it was stored with is an error

#[macro_use]
mod macros;

pub mod config;
pub mod dataset;
pub mod errors;
pub mod graph;
pub mod notebook;
pub mod random;
pub mod report;
pub mod stats;
pub mod value;

pub use config::Config;
pub use dataset::{DataPoint, Dataset};
pub use errors::{DataError, Error, GraphError, Result, ValueError};
pub use graph::{CellStatus, DependencyGraph, PassReport};
pub use notebook::{Notebook, Snapshot};
pub use random::{FastRandSource, RandomSource, SharedSource};
pub use report::{CorrelationStrength, Report, SampleSize};
pub use serde;
pub use stats::{Correlation, LineFit, Statistics};
pub use value::{Inputs, StoredValue};
