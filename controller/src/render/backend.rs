use harborcore::geodata::{LngLat, PortFeature, SampleFeature};
use harborcore::geometry::BufferPolygon;
use harborcore::style::{DensityRamp, Rgb};

/// Rejection raised by a rendering environment for a source or layer.
#[derive(thiserror::Error, Debug)]
#[error("{0}")]
pub struct RenderError(pub String);

/// Opaque handle for one registered interaction callback. Collected by the
/// session controller and released together at teardown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Interaction kinds the controller subscribes to on marker layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractionEvent {
    Hover,
    Leave,
    Click,
}

/// Pointer activity delivered by the host environment's event queue.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerEvent {
    Enter {
        layer: String,
        feature: usize,
        cursor: LngLat,
    },
    Leave {
        layer: String,
    },
    Click {
        layer: String,
        feature: usize,
        cursor: LngLat,
    },
}

/// Typed payload for a named vector source.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceData {
    Ports(Vec<PortFeature>),
    Samples(Vec<SampleFeature>),
    Buffers(Vec<BufferPolygon>),
}

/// Paint rule for a circle layer.
#[derive(Debug, Clone, PartialEq)]
pub enum CirclePaint {
    Fixed(Rgb),
    /// Color interpolated from the ramp keyed on each feature's density.
    Ramp(DensityRamp),
}

#[derive(Debug, Clone, PartialEq)]
pub enum LayerKind {
    Circle { radius: f32, paint: CirclePaint },
    /// Buffer diagnostics; registered without a visible paint rule.
    Fill { visible: bool },
}

/// A styled layer over a named source.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerSpec {
    pub id: String,
    pub source: String,
    pub minzoom: f32,
    pub maxzoom: f32,
    pub kind: LayerKind,
}

/// Capability set the session controller needs from a map rendering
/// environment. Tile rendering, pan/zoom, and DOM presentation stay on the
/// other side of this seam.
pub trait RenderBackend {
    fn add_source(&mut self, id: &str, data: SourceData) -> Result<(), RenderError>;
    fn add_layer(&mut self, spec: LayerSpec) -> Result<(), RenderError>;
    fn remove_layer(&mut self, id: &str);
    fn remove_source(&mut self, id: &str);
    fn subscribe(&mut self, layer_id: &str, event: InteractionEvent) -> SubscriptionId;
    fn unsubscribe(&mut self, id: SubscriptionId);
    fn show_label(&mut self, text: &str, anchor: LngLat);
    fn remove_label(&mut self);
    fn destroy(&mut self);
}
