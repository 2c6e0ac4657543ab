//! Process technology data: layer assignments and routing defaults.

use std::path::Path;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use crate::error::{with_err_context, ErrorContext, Result};
use crate::layout::layers::{LayerId, Layers};
use crate::parts::coupler::GratingCouplerParams;

/// Technology parameters for one mask run.
///
/// Collects the layer assignments and routing defaults a design is generated
/// against. Values can be loaded from a TOML file; fields absent from the
/// file fall back to the CORNERSTONE defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tech {
    /// The base draw layer for waveguides and part outlines.
    pub waveguide_layer: LayerId,
    /// The fine-structure layer for grating teeth.
    pub grating_layer: LayerId,
    /// The layer for text annotations.
    pub text_layer: LayerId,
    /// The layer for the design frame.
    pub frame_layer: LayerId,
    /// Default centerline radius for waveguide bends, in microns.
    pub bend_radius: f64,
    /// Fiber array pitch between paired grating couplers, in microns.
    pub grating_pitch: f64,
    /// Default grating coupler shape parameters.
    pub coupler: GratingCouplerParams,
}

lazy_static! {
    /// The CORNERSTONE silicon photonics technology defaults.
    pub static ref CORNERSTONE: Tech = Tech::default();
}

impl Default for Tech {
    fn default() -> Self {
        Self {
            waveguide_layer: LayerId(3),
            grating_layer: LayerId(4),
            text_layer: LayerId(4),
            frame_layer: LayerId(99),
            bend_radius: 10.0,
            grating_pitch: 127.0,
            coupler: GratingCouplerParams::default(),
        }
    }
}

impl Tech {
    /// Loads technology parameters from a TOML file at `path`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = with_err_context(std::fs::read_to_string(path), || {
            ErrorContext::ReadFile(path.to_path_buf())
        })?;
        let tech = with_err_context(toml::from_str(&contents), || {
            ErrorContext::ReadFile(path.to_path_buf())
        })?;
        Ok(tech)
    }

    /// Builds a named layer registry over this technology's layers.
    pub fn layers(&self) -> Layers {
        let mut layers = Layers::new();
        layers.add("waveguide", self.waveguide_layer);
        layers.add("grating", self.grating_layer);
        layers.add("text", self.text_layer);
        layers.add("frame", self.frame_layer);
        layers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_cornerstone() {
        let tech = CORNERSTONE.clone();
        assert_eq!(tech.waveguide_layer, LayerId(3));
        assert_eq!(tech.grating_layer, LayerId(4));
        assert_eq!(tech.frame_layer, LayerId(99));
        assert_eq!(tech.bend_radius, 10.0);
        assert_eq!(tech.grating_pitch, 127.0);
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let tech: Tech = toml::from_str(
            r#"
            waveguide_layer = 1
            bend_radius = 25.0
            "#,
        )
        .unwrap();
        assert_eq!(tech.waveguide_layer, LayerId(1));
        assert_eq!(tech.bend_radius, 25.0);
        // Unlisted fields keep their defaults.
        assert_eq!(tech.grating_layer, LayerId(4));
        assert_eq!(tech.grating_pitch, 127.0);
    }

    #[test]
    fn layer_registry_is_populated() {
        let layers = Tech::default().layers();
        assert_eq!(layers.get_key("waveguide"), Some(LayerId(3)));
        assert_eq!(layers.get_key("grating"), Some(LayerId(4)));
    }
}
