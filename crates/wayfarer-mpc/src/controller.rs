//! Per-tick batch controller: perception in, clamped commands out.

use nalgebra::DVector;
use rayon::prelude::*;
use tracing::debug;

use wayfarer_core::traits::ObservableSystem;
use wayfarer_core::types::{ObservationSet, heading, heading_rotation, planar_position};

use crate::ellipsoid::fit_free_space_ellipsoid;
use crate::target::solve_target_point;
use crate::types::MpcConfig;

// ---------------------------------------------------------------------------
// ObsMpcController
// ---------------------------------------------------------------------------

/// Obstacle-aware MPC policy over a black-box dynamics collaborator.
///
/// Memoryless: every call recomputes everything from the given states and
/// fresh observations; nothing persists between ticks.
pub struct ObsMpcController<S: ObservableSystem> {
    system: S,
    config: MpcConfig,
}

impl<S: ObservableSystem> ObsMpcController<S> {
    /// Create a controller over `system`.
    pub const fn new(system: S, config: MpcConfig) -> Self {
        Self { system, config }
    }

    /// Access the configuration.
    pub const fn config(&self) -> &MpcConfig {
        &self.config
    }

    /// Access the underlying dynamics collaborator.
    pub const fn system(&self) -> &S {
        &self.system
    }

    /// Compute one control command per batch element.
    ///
    /// Batch elements are independent and dispatched to the rayon pool;
    /// results land in the slot matching their batch position. An element
    /// whose Stage-1 or Stage-2 solve fails keeps a zero command — the
    /// speed gain and actuator clamp still run afterwards, so a skipped
    /// element ends at exactly `clamp(scale(0))`.
    #[must_use]
    pub fn compute_control(&self, states: &[DVector<f64>]) -> Vec<DVector<f64>> {
        let n_controls = self.system.n_controls();
        let mut commands: Vec<DVector<f64>> = states
            .par_iter()
            .enumerate()
            .map(|(idx, x)| {
                self.control_for(idx, x)
                    .unwrap_or_else(|| DVector::zeros(n_controls))
            })
            .collect();

        let limits = self.system.control_limits();
        for u in &mut commands {
            if !u.is_empty() {
                u[0] *= self.config.speed_gain;
            }
            *u = limits.clamp(u);
        }

        commands
    }

    /// Full pipeline for one batch element; `None` skips the element.
    fn control_for(&self, idx: usize, x: &DVector<f64>) -> Option<DVector<f64>> {
        let obs = self.system.get_observations(x);

        let fit = fit_free_space_ellipsoid(&obs, &self.config);
        if !fit.converged {
            debug!(batch_idx = idx, "ellipsoid fit did not converge; skipping element");
            return None;
        }

        let theta = heading(x);
        let target = solve_target_point(&fit.p, planar_position(x), theta, &self.config);
        if !target.converged {
            debug!(batch_idx = idx, "target solve did not converge; skipping element");
            return None;
        }

        // Shift the origin onto the target: the nominal controller steers
        // toward the origin, so a state placed at minus the target steers
        // toward the target. Heading and rate states pass through.
        let target_global = heading_rotation(theta) * target.local;
        let mut shifted = x.clone();
        shifted[0] = -target_global.x;
        shifted[1] = -target_global.y;

        Some(self.system.u_nominal(&shifted))
    }

    /// Debug passthrough to the collaborator's approximate lookahead.
    pub fn lookahead(
        &self,
        x: &DVector<f64>,
        o: &ObservationSet,
        u: &DVector<f64>,
        dt: f64,
    ) -> (DVector<f64>, ObservationSet) {
        self.system.approximate_lookahead(x, o, u, dt)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
