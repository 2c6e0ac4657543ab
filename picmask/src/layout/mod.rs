//! Layout primitives: ports, cells, layers, routing, and validation.

use self::cell::Group;
use self::layers::LayerId;
use crate::error::Result;

pub mod cell;
pub mod layers;
pub mod port;
pub mod routing;
pub mod validation;

/// Renders an object into a [`Group`] of layer-tagged geometry.
///
/// `layer` is the layer requested at registration time. Single-layer items
/// (raw shapes, waveguides) place their geometry there; parts that span
/// several fabrication layers tag their own geometry and ignore it.
pub trait Draw {
    fn draw(&self, layer: LayerId) -> Result<Group>;
}

impl<T> Draw for &T
where
    T: Draw,
{
    fn draw(&self, layer: LayerId) -> Result<Group> {
        T::draw(*self, layer)
    }
}
