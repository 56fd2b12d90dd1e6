use crate::geodata::PortFeature;
use crate::geometry::BufferPolygon;
use serde::{Deserialize, Serialize};

/// Buffer radius used by the reference deployment, in kilometers.
pub const DEFAULT_RADIUS_KM: f64 = 50.0;

/// Vertex count for generated buffer rings.
pub const DEFAULT_BUFFER_STEPS: usize = 64;

/// Shared configuration for a density preprocessing pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DensityConfig {
    pub radius_km: f64,
    pub buffer_steps: usize,
}

impl Default for DensityConfig {
    fn default() -> Self {
        Self {
            radius_km: DEFAULT_RADIUS_KM,
            buffer_steps: DEFAULT_BUFFER_STEPS,
        }
    }
}

impl DensityConfig {
    pub fn with_radius_km(radius_km: f64) -> Self {
        Self {
            radius_km,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> GeoResult<()> {
        if !self.radius_km.is_finite() || self.radius_km <= 0.0 {
            return Err(GeoError::InvalidRadius(self.radius_km));
        }
        Ok(())
    }
}

/// Output produced by a preprocessing pass. Ports carry their density
/// annotation; `buffers[i]` belongs to `ports[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityOutput {
    pub ports: Vec<PortFeature>,
    pub buffers: Vec<BufferPolygon>,
}

/// Common error type for parsing and geometry operations.
#[derive(thiserror::Error, Debug)]
pub enum GeoError {
    #[error("invalid payload: {0}")]
    Parse(String),
    #[error("invalid coordinate ({lng}, {lat}): {reason}")]
    InvalidCoordinate { lng: f64, lat: f64, reason: String },
    #[error("invalid radius: {0} km")]
    InvalidRadius(f64),
}

pub type GeoResult<T> = Result<T, GeoError>;
