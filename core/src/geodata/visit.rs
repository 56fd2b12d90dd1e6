use crate::prelude::{GeoError, GeoResult};
use serde::{Deserialize, Serialize};

/// One vessel's visit history: port names in chronological order, repeat
/// visits kept as duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitRecord {
    pub name: String,
    pub ports: Vec<String>,
}

/// Parses the visit-frequency payload, a JSON array of `{name, ports}`.
pub fn parse_visits(raw: &str) -> GeoResult<Vec<VisitRecord>> {
    serde_json::from_str(raw).map_err(|err| GeoError::Parse(err.to_string()))
}
