pub mod ramp;

pub use ramp::{DensityRamp, Rgb};
