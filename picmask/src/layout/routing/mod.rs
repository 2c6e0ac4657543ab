//! Waveguide routing.

pub mod waveguide;

pub use waveguide::{PathSegment, Waveguide};
