//! Parametric optical parts anchored at ports.

pub mod code;
pub mod coupler;
pub mod mzi;
pub mod resonator;
pub mod spiral;

pub use code::QrCode;
pub use coupler::GratingCoupler;
pub use mzi::Mzi;
pub use resonator::RingResonator;
pub use spiral::Spiral;
