use crate::prelude::{GeoError, GeoResult};
use geojson::{GeoJson, Value};
use serde::{Deserialize, Serialize};
use serde_json::Map;

/// A WGS84 coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

impl LngLat {
    pub fn new(lng: f64, lat: f64) -> GeoResult<Self> {
        let coord = Self { lng, lat };
        coord.validate()?;
        Ok(coord)
    }

    pub fn validate(&self) -> GeoResult<()> {
        let reason = if !self.lng.is_finite() || !self.lat.is_finite() {
            Some("coordinate is not finite")
        } else if self.lat.abs() > 90.0 {
            Some("latitude out of range")
        } else if self.lng.abs() > 180.0 {
            Some("longitude out of range")
        } else {
            None
        };
        match reason {
            Some(reason) => Err(GeoError::InvalidCoordinate {
                lng: self.lng,
                lat: self.lat,
                reason: reason.to_string(),
            }),
            None => Ok(()),
        }
    }
}

/// A named facility point. `density` is absent until the preprocessor runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortFeature {
    pub name: String,
    pub coord: LngLat,
    pub properties: Map<String, serde_json::Value>,
    pub density: Option<u32>,
}

impl PortFeature {
    /// Returns a copy annotated with the computed density. The property map
    /// is carried over unchanged.
    pub fn with_density(&self, density: u32) -> Self {
        Self {
            density: Some(density),
            ..self.clone()
        }
    }
}

/// An observed vessel-position point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleFeature {
    pub name: Option<String>,
    pub coord: LngLat,
    pub properties: Map<String, serde_json::Value>,
}

/// Parses a GeoJSON FeatureCollection of named port points.
pub fn parse_ports(raw: &str) -> GeoResult<Vec<PortFeature>> {
    point_features(raw)?
        .into_iter()
        .map(|(coord, properties)| {
            let name = properties
                .get("name")
                .and_then(|value| value.as_str())
                .ok_or_else(|| GeoError::Parse("port feature missing name property".to_string()))?
                .to_string();
            Ok(PortFeature {
                name,
                coord,
                properties,
                density: None,
            })
        })
        .collect()
}

/// Parses a GeoJSON FeatureCollection of sample points. Names are optional.
pub fn parse_samples(raw: &str) -> GeoResult<Vec<SampleFeature>> {
    Ok(point_features(raw)?
        .into_iter()
        .map(|(coord, properties)| {
            let name = properties
                .get("name")
                .and_then(|value| value.as_str())
                .map(str::to_string);
            SampleFeature {
                name,
                coord,
                properties,
            }
        })
        .collect())
}

fn point_features(raw: &str) -> GeoResult<Vec<(LngLat, Map<String, serde_json::Value>)>> {
    let geojson: GeoJson = raw
        .parse()
        .map_err(|err: geojson::Error| GeoError::Parse(err.to_string()))?;
    let collection = match geojson {
        GeoJson::FeatureCollection(collection) => collection,
        _ => {
            return Err(GeoError::Parse(
                "expected a GeoJSON FeatureCollection".to_string(),
            ))
        }
    };

    let mut features = Vec::with_capacity(collection.features.len());
    for feature in collection.features {
        let geometry = feature
            .geometry
            .ok_or_else(|| GeoError::Parse("feature missing geometry".to_string()))?;
        let position = match geometry.value {
            Value::Point(position) => position,
            _ => return Err(GeoError::Parse("expected Point geometry".to_string())),
        };
        if position.len() < 2 {
            return Err(GeoError::Parse("point position too short".to_string()));
        }
        let coord = LngLat::new(position[0], position[1])?;
        features.push((coord, feature.properties.unwrap_or_default()));
    }
    Ok(features)
}
