//! Configuration and solution types for the MPC pipeline.

use nalgebra::{Matrix2, Vector2};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Serde default functions
// ---------------------------------------------------------------------------

const fn default_margin_obstacle() -> f64 {
    1.25
}
const fn default_margin_target() -> f64 {
    0.75
}
const fn default_trace_penalty() -> f64 {
    100.0
}
const fn default_speed_gain() -> f64 {
    2.0
}
const fn default_max_solver_iters() -> u32 {
    200
}
const fn default_solver_tol() -> f64 {
    1e-8
}

// ---------------------------------------------------------------------------
// MpcConfig
// ---------------------------------------------------------------------------

/// Obstacle-aware MPC configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MpcConfig {
    /// Every sensed point p must satisfy p^T P p >= this margin, keeping the
    /// fitted ellipsoid clear of obstacles (default: 1.25).
    #[serde(default = "default_margin_obstacle")]
    pub margin_obstacle: f64,

    /// The target point must satisfy x^T P x <= this margin, i.e. lie in a
    /// shrunk copy of the fitted ellipsoid (default: 0.75).
    #[serde(default = "default_margin_target")]
    pub margin_target: f64,

    /// Weight on tr(P) in the fit objective. Keeps the fit bounded when few
    /// points constrain it (default: 100).
    #[serde(default = "default_trace_penalty")]
    pub trace_penalty: f64,

    /// Gain applied to control component 0 before clamping (default: 2).
    #[serde(default = "default_speed_gain")]
    pub speed_gain: f64,

    /// Maximum interior-point iterations per solve.
    #[serde(default = "default_max_solver_iters")]
    pub max_solver_iters: u32,

    /// Gap/feasibility tolerance for both solves.
    #[serde(default = "default_solver_tol")]
    pub solver_tol: f64,
}

impl Default for MpcConfig {
    fn default() -> Self {
        Self {
            margin_obstacle: default_margin_obstacle(),
            margin_target: default_margin_target(),
            trace_penalty: default_trace_penalty(),
            speed_gain: default_speed_gain(),
            max_solver_iters: default_max_solver_iters(),
            solver_tol: default_solver_tol(),
        }
    }
}

// ---------------------------------------------------------------------------
// Solution types
// ---------------------------------------------------------------------------

/// Result of the Stage-1 free-space ellipsoid fit.
///
/// The free region is the body-frame set `{v : v^T P v <= 1}`. When
/// `converged` is false, `p` is zero and must not be used.
#[derive(Clone, Debug)]
pub struct EllipsoidFit {
    /// Fitted quadratic form (symmetric PSD).
    pub p: Matrix2<f64>,
    /// Whether the solver certified the fit.
    pub converged: bool,
    /// Solve time in microseconds.
    pub solve_time_us: u64,
}

impl EllipsoidFit {
    pub(crate) const fn failed(solve_time_us: u64) -> Self {
        Self {
            p: Matrix2::new(0.0, 0.0, 0.0, 0.0),
            converged: false,
            solve_time_us,
        }
    }

    /// Evaluate the quadratic form v^T P v.
    #[must_use]
    pub fn quadratic_form(&self, v: &Vector2<f64>) -> f64 {
        v.dot(&(self.p * v))
    }
}

/// Result of the Stage-2 target-point solve, in the body frame.
#[derive(Clone, Debug)]
pub struct TargetPoint {
    /// Selected steering target in the body frame.
    pub local: Vector2<f64>,
    /// Whether the solver certified the point.
    pub converged: bool,
    /// Solve time in microseconds.
    pub solve_time_us: u64,
}

impl TargetPoint {
    pub(crate) const fn failed(solve_time_us: u64) -> Self {
        Self {
            local: Vector2::new(0.0, 0.0),
            converged: false,
            solve_time_us,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
