//! Transformation types and traits.

use serde::{Deserialize, Serialize};

use super::{Point, Polygon, Rect};

/// A 2x2 rotation-matrix and two-entry translation vector,
/// used for relative movement of [`Point`]s and [`super::Shape`]s.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transformation {
    /// The transformation matrix represented in row-major order.
    pub a: [[f64; 2]; 2],
    /// The x-y translation applied after the transformation.
    pub b: [f64; 2],
}

impl Transformation {
    /// Returns the identity transform, leaving any transformed object unmodified.
    pub fn identity() -> Self {
        Self {
            a: [[1.0, 0.0], [0.0, 1.0]],
            b: [0.0, 0.0],
        }
    }

    /// Returns a translation by `(x, y)`.
    pub fn translate(x: f64, y: f64) -> Self {
        Self {
            a: [[1.0, 0.0], [0.0, 1.0]],
            b: [x, y],
        }
    }

    /// Returns a rotation by `angle` radians about the origin.
    pub fn rotate(angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self {
            a: [[cos, -sin], [sin, cos]],
            b: [0.0, 0.0],
        }
    }

    /// Returns a rotation by `angle` radians about `center`.
    pub fn rotate_about(center: Point, angle: f64) -> Self {
        Self::cascade(
            Transformation::translate(center.x, center.y),
            Self::cascade(
                Transformation::rotate(angle),
                Transformation::translate(-center.x, -center.y),
            ),
        )
    }

    /// Creates a transform placing a local frame at `loc` rotated by `angle`.
    pub fn with_loc_and_angle(loc: Point, angle: f64) -> Self {
        Self::cascade(
            Transformation::translate(loc.x, loc.y),
            Transformation::rotate(angle),
        )
    }

    /// Creates a new [`Transformation`] that is the cascade of `parent` and `child`.
    ///
    /// "Parents" and "children" refer to typical layout-instance hierarchies,
    /// in which each level of instance has a nested set of transformations
    /// relative to its top-level parent.
    ///
    /// Note this operation *is not* commutative.
    pub fn cascade(parent: Transformation, child: Transformation) -> Transformation {
        // The result-transform's origin is the parent's origin,
        // plus the parent-transformed child's origin.
        let mut b = matvec(&parent.a, &child.b);
        b[0] += parent.b[0];
        b[1] += parent.b[1];
        // And the cascade-matrix is the product of the parent's and child's.
        let a = matmul(&parent.a, &child.a);
        Self { a, b }
    }

    /// Applies the transformation to `pt`, returning a new point.
    pub fn apply(&self, pt: Point) -> Point {
        let xf = matvec(&self.a, &[pt.x, pt.y]);
        Point::new(xf[0] + self.b[0], xf[1] + self.b[1])
    }
}

impl Default for Transformation {
    fn default() -> Self {
        Self::identity()
    }
}

/// Multiplies a 2x2 matrix by a 2-entry vector.
fn matvec(a: &[[f64; 2]; 2], b: &[f64; 2]) -> [f64; 2] {
    [
        a[0][0] * b[0] + a[0][1] * b[1],
        a[1][0] * b[0] + a[1][1] * b[1],
    ]
}

/// Multiplies two 2x2 matrices.
fn matmul(a: &[[f64; 2]; 2], b: &[[f64; 2]; 2]) -> [[f64; 2]; 2] {
    [
        [
            a[0][0] * b[0][0] + a[0][1] * b[1][0],
            a[0][0] * b[0][1] + a[0][1] * b[1][1],
        ],
        [
            a[1][0] * b[0][0] + a[1][1] * b[1][0],
            a[1][0] * b[0][1] + a[1][1] * b[1][1],
        ],
    ]
}

/// A trait for in-place translation by a [`Point`] offset.
pub trait Translate {
    fn translate(&mut self, p: Point);
}

impl Translate for Point {
    fn translate(&mut self, p: Point) {
        self.x += p.x;
        self.y += p.y;
    }
}

/// A trait for applying a [`Transformation`], producing a new value.
pub trait Transform {
    fn transform(&self, trans: Transformation) -> Self;
}

impl Transform for Point {
    fn transform(&self, trans: Transformation) -> Self {
        trans.apply(*self)
    }
}

impl Transform for Polygon {
    fn transform(&self, trans: Transformation) -> Self {
        Self {
            points: self.points.iter().map(|p| trans.apply(*p)).collect(),
        }
    }
}

impl Transform for Rect {
    /// Transforms the rectangle's corners and re-normalizes.
    ///
    /// Only meaningful for transformations that preserve axis alignment;
    /// use [`super::Shape::transform`] for general rotations.
    fn transform(&self, trans: Transformation) -> Self {
        Self::new(trans.apply(self.p0), trans.apply(self.p1))
    }
}
