//! Labeled sample generation and train/validation partitioning.

use nalgebra::DVector;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use wayfarer_core::error::ConfigError;

use crate::domains::SamplerConfig;
use crate::masks;

// ---------------------------------------------------------------------------
// LabeledSample
// ---------------------------------------------------------------------------

/// One sampled state with its region labels.
///
/// The flags are not complementary: a point in the buffer zone between the
/// loose and tight hazard bounds carries `false` for both. They are never
/// both true.
#[derive(Clone, Debug, PartialEq)]
pub struct LabeledSample {
    /// The sampled state.
    pub state: DVector<f64>,
    /// Inside the safe region.
    pub safe_flag: bool,
    /// Inside the unsafe region.
    pub unsafe_flag: bool,
}

// ---------------------------------------------------------------------------
// SampleSet
// ---------------------------------------------------------------------------

/// A generated dataset, partitioned by index into validation and training.
///
/// Draws are independent and uniform, so no shuffle is needed before the
/// split: the first `floor(split * total)` samples of the concatenated
/// sequence form the validation partition, the rest train.
#[derive(Clone, Debug)]
pub struct SampleSet {
    samples: Vec<LabeledSample>,
    split_point: usize,
    batch_size: usize,
}

impl SampleSet {
    /// Draw `config.n_samples` points from every configured domain (in
    /// domain order), label them, and split.
    pub fn generate(config: &SamplerConfig, n_dims: usize) -> Result<Self, ConfigError> {
        config.validate(n_dims)?;

        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let total = config.domains.len() * config.n_samples;
        let mut samples = Vec::with_capacity(total);

        for domain in &config.domains {
            for _ in 0..config.n_samples {
                let state = DVector::from_iterator(
                    n_dims,
                    domain
                        .bounds()
                        .iter()
                        .map(|&(min, max)| rng.gen_range(min..=max)),
                );
                let safe_flag = masks::is_safe(&state);
                let unsafe_flag = masks::is_unsafe(&state);
                samples.push(LabeledSample {
                    state,
                    safe_flag,
                    unsafe_flag,
                });
            }
        }

        #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let split_point = (config.split * total as f64).floor() as usize;

        debug!(total, split_point, "generated labeled sample set");

        Ok(Self {
            samples,
            split_point,
            batch_size: config.batch_size,
        })
    }

    /// Total number of samples across both partitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// The training partition.
    #[must_use]
    pub fn train(&self) -> &[LabeledSample] {
        &self.samples[self.split_point..]
    }

    /// The validation partition.
    #[must_use]
    pub fn validation(&self) -> &[LabeledSample] {
        &self.samples[..self.split_point]
    }

    /// Iterate the training partition in `batch_size` chunks (the final
    /// chunk may be short).
    pub fn train_batches(&self) -> impl Iterator<Item = &[LabeledSample]> {
        self.train().chunks(self.batch_size)
    }

    /// Iterate the validation partition in `batch_size` chunks.
    pub fn validation_batches(&self) -> impl Iterator<Item = &[LabeledSample]> {
        self.validation().chunks(self.batch_size)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
