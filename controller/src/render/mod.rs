pub mod backend;
pub mod popup;
pub mod recording;

pub use backend::{
    CirclePaint, InteractionEvent, LayerKind, LayerSpec, PointerEvent, RenderBackend, RenderError,
    SourceData, SubscriptionId,
};
pub use popup::wrap_toward_cursor;
pub use recording::RecordingBackend;
