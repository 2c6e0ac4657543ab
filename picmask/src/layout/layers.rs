//! Utilities and types for managing mask layers.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::deps::arcstr::ArcStr;
use crate::error::{ErrorSource, Result};

/// A GDS layer number.
///
/// Layer identity on a photonic mask is the small integer itself; the same
/// number always refers to the same physical fabrication layer.
#[derive(
    Debug, Default, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct LayerId(pub i16);

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i16> for LayerId {
    fn from(value: i16) -> Self {
        Self(value)
    }
}

/// A manager for the layers of one mask run.
///
/// Keeps track of active layers and indexes them by name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Layers {
    names: HashMap<ArcStr, LayerId>,
}

impl Layers {
    /// Creates an empty [`Layers`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a named layer to the manager.
    ///
    /// Layer names should be unique; re-adding a name rebinds it.
    pub fn add(&mut self, name: impl Into<ArcStr>, id: LayerId) {
        self.names.insert(name.into(), id);
    }

    /// Gets the [`LayerId`] bound to layer name `name`.
    pub fn get_key(&self, name: &str) -> Option<LayerId> {
        self.names.get(name).copied()
    }

    /// Gets the name bound to `id`.
    pub fn get_name(&self, id: LayerId) -> Result<&ArcStr> {
        self.names
            .iter()
            .find(|(_, v)| **v == id)
            .map(|(k, _)| k)
            .ok_or_else(|| ErrorSource::LayerNotFound(format!("{id}")).into())
    }

    /// Returns a [`Vec`] consisting of all layer names in the manager.
    pub fn get_layer_names(&self) -> Vec<&ArcStr> {
        self.names.keys().collect()
    }
}
