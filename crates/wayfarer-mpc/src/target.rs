//! Stage 2: target-point selection inside the fitted ellipsoid.
//!
//! Given the Stage-1 quadratic form `P` (now fixed data), picks the
//! body-frame point whose world-frame image is closest to the global
//! origin, subject to staying inside a shrunk copy of the free-space
//! ellipsoid:
//!
//! ```text
//! minimize  || pos + R(theta) x ||^2
//! s.t.      x^T P x <= margin_target
//! ```
//!
//! Since R is orthogonal the objective is `x^T x + 2 (R^T pos)^T x` up to a
//! constant, and the ellipsoid constraint becomes the second-order-cone row
//! `(sqrt(margin_target), L^T x) in SOC(3)` with `P = L L^T` (Cholesky). A
//! Cholesky failure means the fit was numerically degenerate and is treated
//! like any other non-converged solve.

use std::time::Instant;

use clarabel::solver::{
    DefaultSettingsBuilder, DefaultSolver, IPSolver, SolverStatus,
    SupportedConeT::SecondOrderConeT,
};
use nalgebra::{DMatrix, Matrix2, Vector2, linalg::Cholesky};
use tracing::debug;

use wayfarer_core::heading_rotation;

use crate::conic::{dense_to_csc, dense_to_csc_upper, elapsed_us};
use crate::types::{MpcConfig, TargetPoint};

/// Solve for the steering target inside the shrunk free-space ellipsoid.
#[must_use]
pub fn solve_target_point(
    p_opt: &Matrix2<f64>,
    position: Vector2<f64>,
    heading: f64,
    config: &MpcConfig,
) -> TargetPoint {
    let start = Instant::now();

    let Some(chol) = Cholesky::new(*p_opt) else {
        debug!("ellipsoid matrix not positive definite; skipping target solve");
        return TargetPoint::failed(elapsed_us(start));
    };
    let l = chol.l();

    let rot = heading_rotation(heading);

    // Clarabel minimizes (1/2) x^T P x + q^T x.
    let p_obj = DMatrix::identity(2, 2) * 2.0;
    let q_vec = rot.transpose() * position * 2.0;
    let q = vec![q_vec.x, q_vec.y];

    // SOC rows: s = (sqrt(margin_target), L^T x)
    let mut a = DMatrix::zeros(3, 2);
    let mut b = vec![0.0; 3];
    b[0] = config.margin_target.sqrt();
    for i in 0..2 {
        for j in 0..2 {
            a[(1 + i, j)] = -l[(j, i)];
        }
    }

    let cones = [SecondOrderConeT(3)];

    let settings = DefaultSettingsBuilder::default()
        .max_iter(config.max_solver_iters)
        .verbose(false)
        .tol_gap_abs(config.solver_tol)
        .tol_gap_rel(config.solver_tol)
        .tol_feas(config.solver_tol)
        .build()
        .expect("valid solver settings");

    let p_csc = dense_to_csc_upper(&p_obj);
    let a_csc = dense_to_csc(&a);

    match DefaultSolver::new(&p_csc, &q, &a_csc, &b, &cones, settings) {
        Ok(mut solver) => {
            solver.solve();
            let sol = &solver.solution;
            let converged = matches!(
                sol.status,
                SolverStatus::Solved | SolverStatus::AlmostSolved
            );
            if converged {
                TargetPoint {
                    local: Vector2::new(sol.x[0], sol.x[1]),
                    converged: true,
                    solve_time_us: elapsed_us(start),
                }
            } else {
                debug!(status = ?sol.status, "target-point solve not optimal");
                TargetPoint::failed(elapsed_us(start))
            }
        }
        Err(e) => {
            debug!(error = ?e, "target-point solve setup failed");
            TargetPoint::failed(elapsed_us(start))
        }
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
    fn target_stays_inside_shrunk_ellipsoid() {
        let config = MpcConfig::default();
        let p = Matrix2::identity();
        // Origin far outside the unit ellipsoid: the constraint binds.
        let target = solve_target_point(&p, Vector2::new(5.0, 0.0), 0.0, &config);
        assert!(target.converged);

        let form = target.local.dot(&(p * target.local));
        assert!(form <= config.margin_target + 1e-3, "containment violated: {form}");

        // Boundary point on the side facing the origin.
        assert_relative_eq!(target.local.x, -config.margin_target.sqrt(), epsilon = 1e-4);
        assert_relative_eq!(target.local.y, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn unconstrained_target_cancels_position() {
        // A huge free region lets the target place the world-frame image
        // exactly on the origin: R x = -pos.
        let config = MpcConfig::default();
        let p = Matrix2::identity() * 0.01;
        let pos = Vector2::new(2.0, 1.0);
        let theta = 0.7;
        let target = solve_target_point(&p, pos, theta, &config);
        assert!(target.converged);

        let global = heading_rotation(theta) * target.local;
        assert_relative_eq!(global.x, -pos.x, epsilon = 1e-4);
        assert_relative_eq!(global.y, -pos.y, epsilon = 1e-4);
    }

    #[test]
    fn rotation_steers_through_body_frame() {
        // With heading pi/2 the body-frame target must be the rotated
        // image of the straight-line direction.
        let config = MpcConfig::default();
        let p = Matrix2::identity() * 0.01;
        let pos = Vector2::new(3.0, 0.0);
        let theta = std::f64::consts::FRAC_PI_2;
        let target = solve_target_point(&p, pos, theta, &config);
        assert!(target.converged);

        // Need R(pi/2) local = (-3, 0), so local = R^T (-3, 0) = (0, 3).
        assert_relative_eq!(target.local.x, 0.0, epsilon = 1e-4);
        assert_relative_eq!(target.local.y, 3.0, epsilon = 1e-4);
    }

    #[test]
    fn degenerate_ellipsoid_is_skipped() {
        let config = MpcConfig::default();
        let p = Matrix2::new(0.0, 0.0, 0.0, 0.0);
        let target = solve_target_point(&p, Vector2::new(1.0, 1.0), 0.0, &config);
        assert!(!target.converged);
    }
}
