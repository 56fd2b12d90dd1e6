use harborcore::geodata::VisitRecord;
use serde::{Deserialize, Serialize};

/// Session state published to the host UI's side panel.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PanelModel {
    pub status: String,
    pub ships: Vec<VisitRecord>,
    pub port_count: usize,
    pub sample_count: usize,
    pub max_density: u32,
}
