//! Training-data generation for the obstacle-avoidance task.
//!
//! Draws state samples uniformly from a configurable union of axis-aligned
//! hyper-rectangular domains, labels each point with static safe/unsafe
//! region predicates, and exposes deterministic train/validation partitions
//! with fixed-size batch iteration for an external training loop.

pub mod dataset;
pub mod domains;
pub mod masks;

pub use dataset::{LabeledSample, SampleSet};
pub use domains::{SampleDomain, SamplerConfig, flight_envelope, origin_neighborhood};
pub use masks::{is_safe, is_unsafe};
