//! TOML-backed configuration loading.
//!
//! Configuration structs live next to the components they configure
//! (`MpcConfig` in `wayfarer-mpc`, `SamplerConfig` in `wayfarer-datagen`);
//! this module holds the loading helpers all of them share.

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::ConfigError;

/// Parse any deserializable config from a TOML string.
pub fn from_toml_str<T: DeserializeOwned>(text: &str) -> Result<T, ConfigError> {
    Ok(toml::from_str(text)?)
}

/// Load any deserializable config from a TOML file.
pub fn load_toml<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let text = std::fs::read_to_string(path)?;
    from_toml_str(&text)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
