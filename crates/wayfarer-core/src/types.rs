//! Shared state, observation, and control types.
//!
//! State vectors are plain `DVector<f64>`s whose first three components are
//! the planar pose (px, pz, theta); everything after the pose is
//! velocity/attitude-rate state that the geometry here never touches but the
//! nominal controller consumes.

use nalgebra::{DVector, Matrix2, Matrix2xX, Vector2};

/// Number of pose components at the front of every state vector: (px, pz, theta).
pub const POSE_DIMS: usize = 3;

/// Planar position (px, pz) of a state.
#[must_use]
pub fn planar_position(x: &DVector<f64>) -> Vector2<f64> {
    debug_assert!(x.len() >= POSE_DIMS, "state must carry a full pose prefix");
    Vector2::new(x[0], x[1])
}

/// Heading angle theta of a state, in radians.
#[must_use]
pub fn heading(x: &DVector<f64>) -> f64 {
    debug_assert!(x.len() >= POSE_DIMS, "state must carry a full pose prefix");
    x[2]
}

/// Rotation matrix R(theta) mapping body-frame vectors to the world frame.
#[must_use]
pub fn heading_rotation(theta: f64) -> Matrix2<f64> {
    let (s, c) = theta.sin_cos();
    Matrix2::new(c, -s, s, c)
}

// ---------------------------------------------------------------------------
// ObservationSet
// ---------------------------------------------------------------------------

/// A set of sensed obstacle points in the robot's body frame.
///
/// Stored column-major as a 2 x K matrix: K range returns, each an (x, y)
/// point. A set may be empty (no returns this tick).
#[derive(Clone, Debug, PartialEq)]
pub struct ObservationSet {
    points: Matrix2xX<f64>,
}

impl ObservationSet {
    /// Wrap a 2 x K point matrix.
    #[must_use]
    pub const fn new(points: Matrix2xX<f64>) -> Self {
        Self { points }
    }

    /// Build from a slice of 2D points.
    #[must_use]
    pub fn from_points(points: &[Vector2<f64>]) -> Self {
        if points.is_empty() {
            return Self::empty();
        }
        Self {
            points: Matrix2xX::from_columns(points),
        }
    }

    /// A set with no returns.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            points: Matrix2xX::zeros(0),
        }
    }

    /// Number of sensed points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.ncols()
    }

    /// Whether the set contains no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.ncols() == 0
    }

    /// The i-th sensed point.
    #[must_use]
    pub fn point(&self, i: usize) -> Vector2<f64> {
        Vector2::new(self.points[(0, i)], self.points[(1, i)])
    }

    /// Iterate over all sensed points.
    pub fn iter(&self) -> impl Iterator<Item = Vector2<f64>> + '_ {
        (0..self.len()).map(|i| self.point(i))
    }

    /// The raw 2 x K point matrix.
    #[must_use]
    pub const fn points(&self) -> &Matrix2xX<f64> {
        &self.points
    }
}

// ---------------------------------------------------------------------------
// ControlLimits
// ---------------------------------------------------------------------------

/// Component-wise actuator saturation bounds.
#[derive(Clone, Debug, PartialEq)]
pub struct ControlLimits {
    /// Lower bound per control component.
    pub lower: DVector<f64>,
    /// Upper bound per control component.
    pub upper: DVector<f64>,
}

impl ControlLimits {
    /// Create limits from lower/upper bound vectors of equal length.
    #[must_use]
    pub fn new(lower: DVector<f64>, upper: DVector<f64>) -> Self {
        debug_assert_eq!(lower.len(), upper.len(), "bound lengths must match");
        Self { lower, upper }
    }

    /// Symmetric limits `[-magnitude, magnitude]` for every component.
    #[must_use]
    pub fn symmetric(magnitude: f64, n_controls: usize) -> Self {
        Self {
            lower: DVector::from_element(n_controls, -magnitude),
            upper: DVector::from_element(n_controls, magnitude),
        }
    }

    /// Clamp each component of `u` into its `[lower, upper]` interval.
    #[must_use]
    pub fn clamp(&self, u: &DVector<f64>) -> DVector<f64> {
        DVector::from_fn(u.len(), |i, _| u[i].clamp(self.lower[i], self.upper[i]))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn rotation_is_orthonormal() {
        let r = heading_rotation(0.73);
        let rtr = r.transpose() * r;
        assert_relative_eq!(rtr[(0, 0)], 1.0, epsilon = 1e-12);
        assert_relative_eq!(rtr[(1, 1)], 1.0, epsilon = 1e-12);
        assert_relative_eq!(rtr[(0, 1)], 0.0, epsilon = 1e-12);
        assert_relative_eq!(r.determinant(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn rotation_at_zero_is_identity() {
        let r = heading_rotation(0.0);
        assert_relative_eq!(r[(0, 0)], 1.0);
        assert_relative_eq!(r[(0, 1)], 0.0);
    }

    #[test]
    fn observation_set_round_trip() {
        let pts = [Vector2::new(1.0, 2.0), Vector2::new(-3.0, 0.5)];
        let obs = ObservationSet::from_points(&pts);
        assert_eq!(obs.len(), 2);
        assert!(!obs.is_empty());
        assert_relative_eq!(obs.point(1).x, -3.0);
        let collected: Vec<_> = obs.iter().collect();
        assert_eq!(collected, pts.to_vec());
    }

    #[test]
    fn empty_observation_set() {
        let obs = ObservationSet::from_points(&[]);
        assert!(obs.is_empty());
        assert_eq!(obs.len(), 0);
    }

    #[test]
    fn clamp_respects_bounds() {
        let limits = ControlLimits::new(
            DVector::from_vec(vec![0.1, -1.0]),
            DVector::from_vec(vec![2.0, 1.0]),
        );
        let u = DVector::from_vec(vec![-5.0, 0.3]);
        let clamped = limits.clamp(&u);
        assert_relative_eq!(clamped[0], 0.1);
        assert_relative_eq!(clamped[1], 0.3);
    }

    #[test]
    fn pose_accessors() {
        let x = DVector::from_vec(vec![1.5, -0.5, 0.3, 9.0, 9.0, 9.0]);
        assert_relative_eq!(planar_position(&x).x, 1.5);
        assert_relative_eq!(planar_position(&x).y, -0.5);
        assert_relative_eq!(heading(&x), 0.3);
    }
}
