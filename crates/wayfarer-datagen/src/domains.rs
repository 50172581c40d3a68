//! Sampling domains and sampler configuration.

use std::f64::consts::PI;

use nalgebra::DVector;
use serde::{Deserialize, Serialize};

use wayfarer_core::error::ConfigError;

// ---------------------------------------------------------------------------
// SampleDomain
// ---------------------------------------------------------------------------

/// One axis-aligned hyper-rectangular sampling domain: a (min, max)
/// interval per state dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleDomain {
    bounds: Vec<(f64, f64)>,
}

impl SampleDomain {
    /// Validate and wrap per-dimension bounds.
    pub fn new(bounds: Vec<(f64, f64)>) -> Result<Self, ConfigError> {
        if bounds.is_empty() {
            return Err(ConfigError::EmptyDomain);
        }
        for (dim, &(min, max)) in bounds.iter().enumerate() {
            if !min.is_finite() || !max.is_finite() {
                return Err(ConfigError::NonFiniteBounds { dim });
            }
            if min > max {
                return Err(ConfigError::InvalidBounds { dim, min, max });
            }
        }
        Ok(Self { bounds })
    }

    /// Number of dimensions this domain covers.
    #[must_use]
    pub fn n_dims(&self) -> usize {
        self.bounds.len()
    }

    /// Per-dimension (min, max) intervals.
    #[must_use]
    pub fn bounds(&self) -> &[(f64, f64)] {
        &self.bounds
    }

    /// Whether `x` lies within every dimension's interval (inclusive).
    #[must_use]
    pub fn contains(&self, x: &DVector<f64>) -> bool {
        x.len() == self.bounds.len()
            && self
                .bounds
                .iter()
                .zip(x.iter())
                .all(|(&(min, max), &v)| v >= min && v <= max)
    }
}

// ---------------------------------------------------------------------------
// Default domains
// ---------------------------------------------------------------------------

/// Wide flight envelope: +-4 m in position, full heading range, +-10 m/s
/// rates, full roll range.
#[must_use]
pub fn flight_envelope() -> SampleDomain {
    SampleDomain::new(vec![
        (-4.0, 4.0),
        (-4.0, 4.0),
        (-PI, PI),
        (-10.0, 10.0),
        (-10.0, 10.0),
        (-PI, PI),
    ])
    .expect("static bounds are valid")
}

/// Small box around the hover origin, so training sees the goal region
/// densely even though it is a tiny fraction of the envelope.
#[must_use]
pub fn origin_neighborhood() -> SampleDomain {
    SampleDomain::new(vec![
        (-0.5, 0.5),
        (-0.5, 0.5),
        (-0.4 * PI, 0.4 * PI),
        (-1.0, 1.0),
        (-1.0, 1.0),
        (-PI, PI),
    ])
    .expect("static bounds are valid")
}

// ---------------------------------------------------------------------------
// Serde default functions
// ---------------------------------------------------------------------------

const fn default_n_samples() -> usize {
    10_000
}
const fn default_split() -> f64 {
    0.1
}
const fn default_batch_size() -> usize {
    64
}
const fn default_seed() -> u64 {
    0
}
fn default_domains() -> Vec<SampleDomain> {
    vec![flight_envelope(), origin_neighborhood()]
}

// ---------------------------------------------------------------------------
// SamplerConfig
// ---------------------------------------------------------------------------

/// Configuration for labeled sample generation.
///
/// `n_samples` points are drawn from *each* domain, so the total sample
/// count is `domains.len() * n_samples`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplerConfig {
    /// Points drawn per domain.
    #[serde(default = "default_n_samples")]
    pub n_samples: usize,

    /// Fraction of the full sequence reserved for validation (default 0.1).
    #[serde(default = "default_split")]
    pub split: f64,

    /// Batch size for train/validation iteration (default 64).
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// RNG seed; identical seeds reproduce identical datasets.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Domains to sample from.
    #[serde(default = "default_domains")]
    pub domains: Vec<SampleDomain>,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            n_samples: default_n_samples(),
            split: default_split(),
            batch_size: default_batch_size(),
            seed: default_seed(),
            domains: default_domains(),
        }
    }
}

impl SamplerConfig {
    /// Reject configurations that cannot produce a dataset for an
    /// `n_dims`-dimensional state. Dimension-count mismatches are fatal
    /// here, at construction, never at sampling time.
    ///
    /// The region predicates read the (px, pz) position prefix, so states
    /// with fewer than two dimensions are rejected outright.
    pub fn validate(&self, n_dims: usize) -> Result<(), ConfigError> {
        if n_dims < 2 {
            return Err(ConfigError::InvalidValue {
                field: "n_dims".into(),
                message: format!("{n_dims} (labeling needs the px/pz prefix)"),
            });
        }
        if !(0.0..=1.0).contains(&self.split) {
            return Err(ConfigError::InvalidSplit(self.split));
        }
        if self.n_samples == 0 {
            return Err(ConfigError::InvalidValue {
                field: "n_samples".into(),
                message: "must be at least 1".into(),
            });
        }
        if self.batch_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "batch_size".into(),
                message: "must be at least 1".into(),
            });
        }
        for (domain_index, domain) in self.domains.iter().enumerate() {
            if domain.n_dims() != n_dims {
                return Err(ConfigError::DimensionMismatch {
                    domain_index,
                    expected: n_dims,
                    actual: domain.n_dims(),
                });
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_inverted_bounds() {
        let err = SampleDomain::new(vec![(1.0, -1.0)]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBounds { dim: 0, .. }));
    }

    #[test]
    fn rejects_non_finite_bounds() {
        let err = SampleDomain::new(vec![(0.0, f64::INFINITY)]).unwrap_err();
        assert!(matches!(err, ConfigError::NonFiniteBounds { dim: 0 }));
    }

    #[test]
    fn rejects_empty_domain() {
        assert!(matches!(
            SampleDomain::new(Vec::new()),
            Err(ConfigError::EmptyDomain)
        ));
    }

    #[test]
    fn dimension_mismatch_is_fatal_at_validation() {
        let config = SamplerConfig {
            domains: vec![SampleDomain::new(vec![(0.0, 1.0); 4]).unwrap()],
            ..SamplerConfig::default()
        };
        let err = config.validate(6).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::DimensionMismatch {
                domain_index: 0,
                expected: 6,
                actual: 4,
            }
        ));
    }

    #[test]
    fn default_domains_cover_six_dims() {
        let config = SamplerConfig::default();
        assert_eq!(config.domains.len(), 2);
        assert!(config.validate(6).is_ok());
    }

    #[test]
    fn states_without_position_prefix_rejected() {
        // The predicates read px and pz; a 1-dim state can never be labeled.
        let config = SamplerConfig {
            domains: vec![SampleDomain::new(vec![(0.0, 1.0)]).unwrap()],
            ..SamplerConfig::default()
        };
        assert!(matches!(
            config.validate(1),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn split_outside_unit_interval_rejected() {
        let config = SamplerConfig {
            split: 1.5,
            ..SamplerConfig::default()
        };
        assert!(matches!(
            config.validate(6),
            Err(ConfigError::InvalidSplit(_))
        ));
    }

    #[test]
    fn containment_is_inclusive() {
        let domain = SampleDomain::new(vec![(0.0, 1.0), (-2.0, 2.0)]).unwrap();
        assert!(domain.contains(&DVector::from_vec(vec![0.0, 2.0])));
        assert!(!domain.contains(&DVector::from_vec(vec![1.1, 0.0])));
    }

    #[test]
    fn config_round_trips_through_toml() {
        let config = SamplerConfig::default();
        let text = toml::to_string(&config).unwrap();
        let back: SamplerConfig = wayfarer_core::from_toml_str(&text).unwrap();
        assert_eq!(back, config);
    }
}
