pub mod buffer;
pub mod density;
pub mod grid;

pub use buffer::{geodesic_buffer, BufferPolygon};
pub use density::{compute_density, compute_density_pruned};
pub use grid::SampleGrid;
