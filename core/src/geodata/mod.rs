pub mod feature;
pub mod visit;

pub use feature::{parse_ports, parse_samples, LngLat, PortFeature, SampleFeature};
pub use visit::{parse_visits, VisitRecord};
