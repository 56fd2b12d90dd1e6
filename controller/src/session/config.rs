use anyhow::Context;
use harborcore::prelude::DEFAULT_RADIUS_KM;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Explicit per-session configuration: the three data-provider endpoints and
/// the buffer radius. Replaces the module-global endpoints and token of the
/// original deployment.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionConfig {
    pub ports_url: String,
    pub samples_url: String,
    pub visits_url: String,
    #[serde(default = "default_radius_km")]
    pub radius_km: f64,
}

fn default_radius_km() -> f64 {
    DEFAULT_RADIUS_KM
}

impl SessionConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading session config {}", path_ref.display()))?;
        let config: SessionConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing session config {}", path_ref.display()))?;
        Ok(config)
    }

    /// Derives the provider's endpoint layout from a base URL.
    pub fn from_base_url(base_url: &str, radius_km: f64) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            ports_url: format!("{}/geoports", base),
            samples_url: format!("{}/geodata", base),
            visits_url: format!("{}/frequency", base),
            radius_km,
        }
    }
}
