//! A port-chained routing and composition engine for photonic
//! integrated-circuit test-structure masks.
//!
//! Optical parts (grating couplers, ring resonators, interferometers,
//! spirals) are anchored at directed connection points ([`layout::port::Port`]s)
//! and threaded together with waveguide paths
//! ([`layout::routing::Waveguide`]), preserving geometric continuity from
//! part to part. Finished geometry accumulates in layered
//! [`layout::cell::Cell`]s owned by a [`design::Design`].

pub mod deps;
pub mod design;
pub mod error;
pub mod layout;
pub mod parts;
pub mod tech;
pub mod validation;

pub(crate) mod log;

#[cfg(test)]
pub(crate) mod tests;
