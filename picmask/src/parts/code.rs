//! 2D barcode rendering.

use itertools::Itertools;
use picgeom::{Point, Rect};
use serde::{Deserialize, Serialize};

use crate::error::{ErrorSource, Result};
use crate::layout::cell::Group;
use crate::layout::layers::LayerId;
use crate::layout::Draw;

/// A QR code rendered as one square per dark module.
///
/// Symbol encoding is the business of an external barcode library; this
/// part consumes a precomputed module matrix and turns it into mask
/// geometry. Modules are stored row-major, top row first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QrCode {
    origin: Point,
    modules: Vec<bool>,
    size: usize,
    box_size: f64,
}

impl QrCode {
    /// Creates a QR code part at `origin` (lower-left corner).
    ///
    /// `modules` must hold exactly `size * size` entries. `box_size` is the
    /// side length of one module square, in microns.
    pub fn new(
        origin: impl Into<Point>,
        modules: Vec<bool>,
        size: usize,
        box_size: f64,
    ) -> Result<Self> {
        let box_size = ErrorSource::expect_positive("box_size", box_size)?;
        if modules.len() != size * size {
            return Err(ErrorSource::Internal(format!(
                "module matrix holds {} entries, expected {}",
                modules.len(),
                size * size
            ))
            .into());
        }
        Ok(Self {
            origin: origin.into(),
            modules,
            size,
            box_size,
        })
    }

    /// The side length of the whole symbol, in microns.
    pub fn side(&self) -> f64 {
        self.size as f64 * self.box_size
    }
}

impl Draw for QrCode {
    fn draw(&self, layer: LayerId) -> Result<Group> {
        let mut group = Group::new();
        for (row, col) in (0..self.size).cartesian_product(0..self.size) {
            if self.modules[row * self.size + col] {
                let lower_left = self.origin
                    + Point::new(
                        col as f64 * self.box_size,
                        // Top row first: row zero sits at the top edge.
                        (self.size - 1 - row) as f64 * self.box_size,
                    );
                group.add_group(
                    Rect::with_dims(lower_left, self.box_size, self.box_size).draw(layer)?,
                );
            }
        }
        Ok(group)
    }
}
