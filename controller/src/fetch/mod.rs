pub mod client;

pub use client::{DataClient, RawBundle};
