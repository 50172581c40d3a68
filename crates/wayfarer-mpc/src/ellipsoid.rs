//! Stage 1: maximum-volume free-space ellipsoid fit.
//!
//! Fits a symmetric PSD quadratic form P whose 1-sublevel set
//! `{v : v^T P v <= 1}` under-approximates the obstacle-free region in the
//! body frame: every sensed point p must satisfy
//! `p^T P p >= margin_obstacle`. The objective
//! `maximize logdet(P) - trace_penalty * tr(P)` is the standard
//! maximum-volume-inscribed-ellipsoid relaxation; the trace penalty keeps
//! the fit bounded when few points pin it down.
//!
//! # Conic formulation
//!
//! Clarabel has no log-det atom, so the program is rewritten over
//! `z = (p11, p21, p22, w, t)`:
//!
//! - `(p11 + p22, p11 - p22, 2 p21, 2 w) in SOC(4)`, equivalent to
//!   `p11 p22 >= p21^2 + w^2`, so `w <= sqrt(det P)`. Together with the
//!   nonnegative trace implied by the cone's first entry this also forces
//!   P PSD, so no explicit semidefinite cone is needed for the 2x2 case.
//! - `(t, 1, w) in K_exp`, i.e. `t <= log w`, so `2 t <= logdet(P)` with
//!   equality at the optimum.
//! - One nonnegative-cone row per sensed point.
//! - Objective: minimize `trace_penalty * (p11 + p22) - 2 t`.

use std::time::Instant;

use clarabel::solver::{
    DefaultSettingsBuilder, DefaultSolver, IPSolver, SolverStatus,
    SupportedConeT::{ExponentialConeT, NonnegativeConeT, SecondOrderConeT},
};
use nalgebra::{DMatrix, Matrix2};
use tracing::debug;

use wayfarer_core::ObservationSet;

use crate::conic::{dense_to_csc, dense_to_csc_upper, elapsed_us};
use crate::types::{EllipsoidFit, MpcConfig};

/// Decision vector layout: (p11, p21, p22, w, t).
const N_VARS: usize = 5;

/// Fit the largest ellipsoid excluding every sensed point with margin.
///
/// An empty observation set is legal: the constraint set reduces to
/// PSD-only and the optimum lands near `P = I / trace_penalty`.
/// Non-convergence yields `converged = false` with a zero matrix.
#[must_use]
pub fn fit_free_space_ellipsoid(points: &ObservationSet, config: &MpcConfig) -> EllipsoidFit {
    let start = Instant::now();
    let k = points.len();

    // Zero quadratic cost; the objective is linear in z.
    let p_obj = DMatrix::zeros(N_VARS, N_VARS);
    let q = vec![config.trace_penalty, 0.0, config.trace_penalty, 0.0, -2.0];

    // k margin rows, 4 SOC rows, 3 exponential-cone rows.
    let n_rows = k + 4 + 3;
    let mut a = DMatrix::zeros(n_rows, N_VARS);
    let mut b = vec![0.0; n_rows];

    // Margin rows: p^T P p >= margin  <=>  -(px^2 p11 + 2 px py p21 + py^2 p22) <= -margin
    for (i, p) in points.iter().enumerate() {
        a[(i, 0)] = -p.x * p.x;
        a[(i, 1)] = -2.0 * p.x * p.y;
        a[(i, 2)] = -p.y * p.y;
        b[i] = -config.margin_obstacle;
    }

    // SOC rows: s = (p11 + p22, p11 - p22, 2 p21, 2 w)
    let r = k;
    a[(r, 0)] = -1.0;
    a[(r, 2)] = -1.0;
    a[(r + 1, 0)] = -1.0;
    a[(r + 1, 2)] = 1.0;
    a[(r + 2, 1)] = -2.0;
    a[(r + 3, 3)] = -2.0;

    // Exponential-cone rows: s = (t, 1, w)
    a[(r + 4, 4)] = -1.0;
    b[r + 5] = 1.0;
    a[(r + 6, 3)] = -1.0;

    let mut cones = Vec::with_capacity(3);
    if k > 0 {
        cones.push(NonnegativeConeT(k));
    }
    cones.push(SecondOrderConeT(4));
    cones.push(ExponentialConeT());

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
                EllipsoidFit {
                    p: Matrix2::new(sol.x[0], sol.x[1], sol.x[1], sol.x[2]),
                    converged: true,
                    solve_time_us: elapsed_us(start),
                }
            } else {
                debug!(status = ?sol.status, n_points = k, "ellipsoid fit not optimal");
                EllipsoidFit::failed(elapsed_us(start))
            }
        }
        Err(e) => {
            debug!(error = ?e, n_points = k, "ellipsoid fit setup failed");
            EllipsoidFit::failed(elapsed_us(start))
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
    use nalgebra::Vector2;

    fn unit_square_ahead() -> ObservationSet {
        ObservationSet::from_points(&[
            Vector2::new(1.5, 0.5),
            Vector2::new(1.5, -0.5),
            Vector2::new(2.5, 0.5),
            Vector2::new(2.5, -0.5),
        ])
    }

    #[test]
    fn fit_excludes_observed_points_with_margin() {
        let config = MpcConfig::default();
        let fit = fit_free_space_ellipsoid(&unit_square_ahead(), &config);
        assert!(fit.converged, "fit must converge for well-separated points");

        for p in unit_square_ahead().iter() {
            let val = fit.quadratic_form(&p);
            assert!(
                val >= config.margin_obstacle - 1e-3,
                "point {p:?} violates margin: {val}"
            );
        }
    }

    #[test]
    fn fit_is_positive_semidefinite() {
        let fit = fit_free_space_ellipsoid(&unit_square_ahead(), &MpcConfig::default());
        assert!(fit.converged);

        let eigen = fit.p.symmetric_eigen();
        for ev in eigen.eigenvalues.iter() {
            assert!(*ev >= -1e-6, "eigenvalue {ev} is negative");
        }
        // Non-degenerate: both axes have finite extent.
        assert!(fit.p.determinant() > 1e-8);
    }

    #[test]
    fn unconstrained_fit_bounded_by_trace_penalty() {
        let config = MpcConfig::default();
        let fit = fit_free_space_ellipsoid(&ObservationSet::empty(), &config);
        assert!(fit.converged, "PSD-only problem must converge");

        // With no margin rows the optimum of logdet(P) - c tr(P) is P = I/c.
        let expected = 1.0 / config.trace_penalty;
        assert_relative_eq!(fit.p[(0, 0)], expected, epsilon = 1e-3);
        assert_relative_eq!(fit.p[(1, 1)], expected, epsilon = 1e-3);
        assert!(fit.p[(0, 1)].abs() < 1e-3);
    }

    #[test]
    fn point_at_sensor_origin_is_infeasible() {
        // 0 >= margin can never hold, so the solve must report failure
        // rather than panic or return garbage.
        let points = ObservationSet::from_points(&[Vector2::new(0.0, 0.0)]);
        let fit = fit_free_space_ellipsoid(&points, &MpcConfig::default());
        assert!(!fit.converged);
        assert_relative_eq!(fit.p[(0, 0)], 0.0);
    }

    #[test]
    fn single_point_fit_converges() {
        let points = ObservationSet::from_points(&[Vector2::new(0.0, 1.0)]);
        let config = MpcConfig::default();
        let fit = fit_free_space_ellipsoid(&points, &config);
        assert!(fit.converged);
        let val = fit.quadratic_form(&Vector2::new(0.0, 1.0));
        assert!(val >= config.margin_obstacle - 1e-3);
    }
}
