// wayfarer-core: Types, traits, config, and errors for the Wayfarer obstacle-avoidance stack.

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use config::{from_toml_str, load_toml};
pub use error::ConfigError;
pub use traits::ObservableSystem;
pub use types::{ControlLimits, ObservationSet, POSE_DIMS, heading, heading_rotation, planar_position};
