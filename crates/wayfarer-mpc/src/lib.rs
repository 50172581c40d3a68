//! Obstacle-aware MPC policy for range-sensing robots.
//!
//! Implements a per-timestep perception-to-control pipeline for a robot with
//! lidar-like sensing in an unknown planar environment:
//!
//! 1. **Free-space ellipsoid fit** — fits the maximum-volume ellipsoid
//!    (1-sublevel set of a quadratic form) that excludes every sensed
//!    obstacle point with margin, via a log-det conic program
//! 2. **Target-point selection** — picks the point inside a shrunk copy of
//!    that ellipsoid whose world-frame image is closest to the origin
//! 3. **Origin shift** — rewrites the state so the target becomes the
//!    origin and hands off to the collaborator's nominal controller
//!
//! Both solves go through Clarabel (pure Rust interior-point). A
//! non-converged solve skips that batch element for the tick: its command
//! stays zero (before the speed gain and actuator clamp), and the next tick
//! retries from scratch with fresh observations. The policy is memoryless.

pub mod controller;
mod conic;
pub mod ellipsoid;
pub mod target;
pub mod types;

pub use controller::ObsMpcController;
pub use ellipsoid::fit_free_space_ellipsoid;
pub use target::solve_target_point;
pub use types::{EllipsoidFit, MpcConfig, TargetPoint};
