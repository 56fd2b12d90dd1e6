pub mod bridge;
pub mod model;

pub use bridge::PanelBridge;
pub use model::PanelModel;
