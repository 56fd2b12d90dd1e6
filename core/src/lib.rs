//! Geospatial preprocessing core for the HarborLens map platform.
//!
//! The modules cover the typed port/sample feature model, geodesic buffer
//! construction, per-port density annotation, and the paint ramp shared with
//! the session controller.

pub mod geodata;
pub mod geometry;
pub mod prelude;
pub mod style;

pub use prelude::{DensityConfig, DensityOutput, GeoError, GeoResult};
