//! Collaborator traits supplied by the surrounding system.

use nalgebra::DVector;

use crate::types::{ControlLimits, ObservationSet};

// ---------------------------------------------------------------------------
// ObservableSystem
// ---------------------------------------------------------------------------

/// A dynamics model with range-type perception and a baseline controller.
///
/// This is the black-box interface the MPC policy is written against: it
/// produces local-frame obstacle observations for a state, supplies a
/// nominal stabilizing control law (which steers the state toward the
/// origin), and reports actuator saturation bounds.
///
/// `Send + Sync` so controllers can dispatch per-batch-element work to a
/// worker pool.
pub trait ObservableSystem: Send + Sync {
    /// Dimensionality of the state vector.
    fn n_dims(&self) -> usize;

    /// Dimensionality of the control vector.
    fn n_controls(&self) -> usize;

    /// Sense obstacle points around `x`, reported in the body frame.
    fn get_observations(&self, x: &DVector<f64>) -> ObservationSet;

    /// Baseline stabilizing control law driving the state toward the origin.
    fn u_nominal(&self, x: &DVector<f64>) -> DVector<f64>;

    /// Component-wise actuator saturation bounds.
    fn control_limits(&self) -> ControlLimits;

    /// One-step approximate rollout of state and observations under `u`.
    ///
    /// Part of the public contract but only consumed by debug tooling; the
    /// control computation itself never calls this.
    fn approximate_lookahead(
        &self,
        x: &DVector<f64>,
        o: &ObservationSet,
        u: &DVector<f64>,
        dt: f64,
    ) -> (DVector<f64>, ObservationSet);
}
