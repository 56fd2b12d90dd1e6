use crate::render::backend::{
    InteractionEvent, LayerSpec, RenderBackend, RenderError, SourceData, SubscriptionId,
};
use harborcore::geodata::LngLat;

/// Headless render backend. Records every registration so the offline driver
/// can summarize a session and tests can assert on the registered state.
#[derive(Default)]
pub struct RecordingBackend {
    sources: Vec<(String, SourceData)>,
    layers: Vec<LayerSpec>,
    subscriptions: Vec<(SubscriptionId, String, InteractionEvent)>,
    label: Option<(String, LngLat)>,
    next_id: u64,
    destroyed: bool,
    #[cfg(test)]
    reject_layer: Option<String>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn layers(&self) -> &[LayerSpec] {
        &self.layers
    }

    pub fn source(&self, id: &str) -> Option<&SourceData> {
        self.sources
            .iter()
            .find(|(source_id, _)| source_id == id)
            .map(|(_, data)| data)
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn label(&self) -> Option<&(String, LngLat)> {
        self.label.as_ref()
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    #[cfg(test)]
    pub fn reject_layer(&mut self, id: &str) {
        self.reject_layer = Some(id.to_string());
    }
}

impl RenderBackend for RecordingBackend {
    fn add_source(&mut self, id: &str, data: SourceData) -> Result<(), RenderError> {
        if self.sources.iter().any(|(source_id, _)| source_id == id) {
            return Err(RenderError(format!("duplicate source {}", id)));
        }
        self.sources.push((id.to_string(), data));
        Ok(())
    }

    fn add_layer(&mut self, spec: LayerSpec) -> Result<(), RenderError> {
        #[cfg(test)]
        if self.reject_layer.as_deref() == Some(spec.id.as_str()) {
            return Err(RenderError(format!("layer {} rejected", spec.id)));
        }
        if !self.sources.iter().any(|(id, _)| *id == spec.source) {
            return Err(RenderError(format!("unknown source {}", spec.source)));
        }
        self.layers.push(spec);
        Ok(())
    }

    fn remove_layer(&mut self, id: &str) {
        self.layers.retain(|layer| layer.id != id);
    }

    fn remove_source(&mut self, id: &str) {
        self.sources.retain(|(source_id, _)| source_id != id);
    }

    fn subscribe(&mut self, layer_id: &str, event: InteractionEvent) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.subscriptions.push((id, layer_id.to_string(), event));
        id
    }

    fn unsubscribe(&mut self, id: SubscriptionId) {
        self.subscriptions.retain(|(existing, _, _)| *existing != id);
    }

    fn show_label(&mut self, text: &str, anchor: LngLat) {
        self.label = Some((text.to_string(), anchor));
    }

    fn remove_label(&mut self) {
        self.label = None;
    }

    fn destroy(&mut self) {
        self.sources.clear();
        self.layers.clear();
        self.subscriptions.clear();
        self.label = None;
        self.destroyed = true;
    }
}
