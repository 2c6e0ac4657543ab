//! Cells: named, layered aggregations of mask geometry.

use picgeom::bbox::{Bbox, BoundBox};
use picgeom::{Point, Polygon, Rect, Shape};
use serde::{Deserialize, Serialize};

use super::layers::LayerId;
use super::Draw;
use crate::deps::arcstr::ArcStr;
use crate::error::{ErrorSource, Result};

/// A single layer-tagged shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Element {
    /// The layer the shape is drawn on.
    pub layer: LayerId,
    /// The shape itself.
    pub inner: Shape,
}

impl Element {
    /// Creates a new [`Element`].
    pub fn new(layer: LayerId, shape: impl Into<Shape>) -> Self {
        Self {
            layer,
            inner: shape.into(),
        }
    }

    /// Consumes this element, returning its shape.
    pub fn into_inner(self) -> Shape {
        self.inner
    }
}

impl BoundBox for Element {
    fn bbox(&self) -> Bbox {
        self.inner.bbox()
    }
}

/// A text annotation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextElement {
    /// The string value.
    pub string: ArcStr,
    /// The location to draw the text.
    pub loc: Point,
    /// The layer the text is drawn on.
    pub layer: LayerId,
}

/// A group of layout [`Element`]s and [`TextElement`]s.
///
/// [`Draw`] implementations produce groups, which cells absorb.
#[derive(Debug, Clone, Default)]
pub struct Group {
    elems: Vec<Element>,
    annotations: Vec<TextElement>,
}

impl Group {
    /// Creates a new, empty [`Group`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a single [`Element`] to this group.
    #[inline]
    pub fn add_element(&mut self, elem: impl Into<Element>) {
        self.elems.push(elem.into());
    }

    /// Adds all elements in the given iterator to this group.
    #[inline]
    pub fn extend_elements(&mut self, elems: impl IntoIterator<Item = Element>) {
        self.elems.extend(elems);
    }

    /// Adds a single [`TextElement`] to this group.
    #[inline]
    pub fn add_annotation(&mut self, text: impl Into<TextElement>) {
        self.annotations.push(text.into());
    }

    /// Returns an iterator over the elements in this group.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.elems.iter()
    }

    /// Returns an iterator over the text annotations in this group.
    pub fn annotations(&self) -> impl Iterator<Item = &TextElement> {
        self.annotations.iter()
    }

    /// Absorbs all contents of `other`.
    pub fn add_group(&mut self, other: Group) {
        self.elems.extend(other.elems);
        self.annotations.extend(other.annotations);
    }
}

impl BoundBox for Group {
    fn bbox(&self) -> Bbox {
        let mut bbox = Bbox::empty();
        for elem in self.elements() {
            bbox = bbox.union(elem.bbox());
        }
        bbox
    }
}

impl From<Element> for Group {
    fn from(value: Element) -> Self {
        Self {
            elems: vec![value],
            ..Default::default()
        }
    }
}

/// A named cell: layered geometry plus registered subcells.
///
/// Layer membership is additive; shapes are appended to their layer group
/// and never silently dropped. Subcell names must be unique within a cell.
#[derive(Debug, Clone, Default)]
pub struct Cell {
    name: ArcStr,
    elems: Vec<Element>,
    annotations: Vec<TextElement>,
    cells: Vec<Cell>,
}

impl Cell {
    /// Creates a new, empty [`Cell`] named `name`.
    pub fn new(name: impl Into<ArcStr>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Returns the name of the cell.
    #[inline]
    pub fn name(&self) -> &ArcStr {
        &self.name
    }

    /// Draws `item` and appends its geometry to the group for `layer`.
    ///
    /// Accepts anything [`Draw`]: raw shapes, waveguides, or whole parts.
    /// Items spanning several fabrication layers contribute to their own
    /// layers regardless of `layer`.
    pub fn add_to_layer(&mut self, layer: LayerId, item: &dyn Draw) -> Result<()> {
        let group = item.draw(layer)?;
        self.add_group(group);
        Ok(())
    }

    /// Draws each of `items` onto `layer` in order.
    pub fn add_all_to_layer(&mut self, layer: LayerId, items: &[&dyn Draw]) -> Result<()> {
        for item in items {
            self.add_to_layer(layer, *item)?;
        }
        Ok(())
    }

    /// Absorbs all contents of a [`Group`].
    pub fn add_group(&mut self, group: Group) {
        self.elems.extend(group.elems);
        self.annotations.extend(group.annotations);
    }

    /// Adds a single [`Element`] to the cell.
    pub fn add_element(&mut self, elem: impl Into<Element>) {
        self.elems.push(elem.into());
    }

    /// Adds a text annotation to the cell.
    pub fn add_annotation(&mut self, text: impl Into<TextElement>) {
        self.annotations.push(text.into());
    }

    /// Registers `cell` as a subcell.
    ///
    /// Fails with [`ErrorSource::DuplicateName`] if a subcell of the same
    /// name is already registered.
    pub fn add_cell(&mut self, cell: Cell) -> Result<()> {
        if self.cells.iter().any(|c| c.name == cell.name) {
            return Err(ErrorSource::DuplicateName(cell.name).into());
        }
        self.cells.push(cell);
        Ok(())
    }

    /// Retrieves the subcell named `name`, if any.
    pub fn cell(&self, name: &str) -> Option<&Cell> {
        self.cells.iter().find(|c| c.name.as_str() == name)
    }

    /// Returns an iterator over the registered subcells.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Returns an iterator over the [`Element`]s directly in this cell.
    pub fn elems(&self) -> impl Iterator<Item = &Element> {
        self.elems.iter()
    }

    /// Returns an iterator over this cell's elements on `layer`.
    pub fn elems_on(&self, layer: LayerId) -> impl Iterator<Item = &Element> {
        self.elems.iter().filter(move |e| e.layer == layer)
    }

    /// Returns an iterator over the text annotations in this cell.
    pub fn annotations(&self) -> impl Iterator<Item = &TextElement> {
        self.annotations.iter()
    }
}

impl BoundBox for Cell {
    fn bbox(&self) -> Bbox {
        let mut bbox = Bbox::empty();
        for elem in self.elems() {
            bbox = bbox.union(elem.bbox());
        }
        for cell in self.cells() {
            bbox = bbox.union(cell.bbox());
        }
        bbox
    }
}

impl Draw for Shape {
    fn draw(&self, layer: LayerId) -> Result<Group> {
        Ok(Element::new(layer, self.clone()).into())
    }
}

impl Draw for Polygon {
    fn draw(&self, layer: LayerId) -> Result<Group> {
        Ok(Element::new(layer, Shape::Polygon(self.clone())).into())
    }
}

impl Draw for Rect {
    fn draw(&self, layer: LayerId) -> Result<Group> {
        Ok(Element::new(layer, Shape::Rect(*self)).into())
    }
}
