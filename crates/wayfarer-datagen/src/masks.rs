//! Static safe/unsafe region predicates for the obstacle scene.
//!
//! The scene has a floor, a ground-level block obstacle to the left, an
//! airborne block obstacle to the right, and an outer norm bound. Each
//! hazard carries two bounds: a loose one that the safe region must stay
//! clear of, and a tighter one nested inside it that marks definitely
//! unsafe states. The gap between them is a buffer zone where a point is
//! neither safe nor unsafe; no point can ever be both.
//!
//! Both predicates read the (px, pz) position prefix, so states must have
//! at least two dimensions; `SamplerConfig::validate` enforces this before
//! any sampling happens.

use nalgebra::DVector;

// ---------------------------------------------------------------------------
// Scene constants
// ---------------------------------------------------------------------------

const SAFE_FLOOR_Z: f64 = -0.1;
const UNSAFE_FLOOR_Z: f64 = -0.3;
const SAFE_NORM: f64 = 4.5;
const UNSAFE_NORM: f64 = 5.0;

/// Axis-aligned box in the (x, z) plane.
#[derive(Clone, Copy, Debug)]
struct Box2 {
    min_x: f64,
    max_x: f64,
    min_z: f64,
    max_z: f64,
}

impl Box2 {
    /// Strict interior containment, used by the safe predicate: points on
    /// the loose boundary still count as safe.
    const fn contains_open(&self, x: f64, z: f64) -> bool {
        x > self.min_x && x < self.max_x && z > self.min_z && z < self.max_z
    }

    /// Closed containment, used by the unsafe predicate.
    const fn contains_closed(&self, x: f64, z: f64) -> bool {
        x >= self.min_x && x <= self.max_x && z >= self.min_z && z <= self.max_z
    }
}

const GROUND_OBSTACLE_LOOSE: Box2 = Box2 {
    min_x: -1.1,
    max_x: -0.4,
    min_z: -0.5,
    max_z: 0.6,
};
const GROUND_OBSTACLE_TIGHT: Box2 = Box2 {
    min_x: -1.0,
    max_x: -0.5,
    min_z: -0.4,
    max_z: 0.5,
};
const AIR_OBSTACLE_LOOSE: Box2 = Box2 {
    min_x: -0.1,
    max_x: 1.1,
    min_z: 0.7,
    max_z: 1.5,
};
const AIR_OBSTACLE_TIGHT: Box2 = Box2 {
    min_x: 0.0,
    max_x: 1.0,
    min_z: 0.8,
    max_z: 1.4,
};

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

/// True iff the state is inside the safe region: above the safe floor,
/// clear of both loose obstacle boxes, and within the norm bound.
#[must_use]
pub fn is_safe(x: &DVector<f64>) -> bool {
    let (px, pz) = (x[0], x[1]);
    pz >= SAFE_FLOOR_Z
        && !GROUND_OBSTACLE_LOOSE.contains_open(px, pz)
        && !AIR_OBSTACLE_LOOSE.contains_open(px, pz)
        && x.norm() <= SAFE_NORM
}

/// True iff the state is inside the unsafe region: below the unsafe floor,
/// inside either tight obstacle box, or past the outer norm bound.
#[must_use]
pub fn is_unsafe(x: &DVector<f64>) -> bool {
    let (px, pz) = (x[0], x[1]);
    pz <= UNSAFE_FLOOR_Z
        || GROUND_OBSTACLE_TIGHT.contains_closed(px, pz)
        || AIR_OBSTACLE_TIGHT.contains_closed(px, pz)
        || x.norm() >= UNSAFE_NORM
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
