//! Core geometric types for real-valued photonic mask layouts.
//!
//! All coordinates are in microns; all angles are in radians.

use std::f64::consts::{PI, TAU};

use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};

use self::bbox::{Bbox, BoundBox};
use self::transform::{Transform, Transformation, Translate};

pub mod bbox;
pub mod transform;

/// Tolerance used for approximate floating-point comparisons of coordinates.
pub const EPSILON: f64 = 1e-9;

/// Normalizes an angle in radians into the half-open interval `(-PI, PI]`.
pub fn normalize_angle(angle: f64) -> f64 {
    let mut a = angle % TAU;
    if a > PI {
        a -= TAU;
    } else if a <= -PI {
        a += TAU;
    }
    a
}

/// Rounds `x` to nine decimal places.
///
/// Mask coordinates are compared at nanometer precision; anything beyond the
/// ninth decimal is floating-point noise.
pub fn round9(x: f64) -> f64 {
    (x * 1e9).round() / 1e9
}

/// A point in two-dimensional layout-space.
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Creates a new [`Point`] from (x,y) coordinates.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns the origin, (0, 0).
    #[inline]
    pub fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Returns the unit vector pointing along `angle`.
    pub fn from_angle(angle: f64) -> Self {
        Self {
            x: angle.cos(),
            y: angle.sin(),
        }
    }

    /// Creates a new [`Point`] shifted by `p`.
    #[inline]
    pub fn translated(&self, p: Point) -> Self {
        let mut pt = *self;
        pt.translate(p);
        pt
    }

    /// Returns the Euclidean distance to `other`.
    pub fn distance(&self, other: Point) -> f64 {
        (*self - other).norm()
    }

    /// Returns the Euclidean length of this point treated as a vector.
    pub fn norm(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Rotates this point by `angle` about `center`, returning a new point.
    pub fn rotated_about(&self, center: Point, angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        let d = *self - center;
        Self {
            x: center.x + cos * d.x - sin * d.y,
            y: center.y + sin * d.x + cos * d.y,
        }
    }

    /// Returns `true` if both coordinates of `self` and `other` differ by
    /// less than `tol`.
    pub fn approx_eq(&self, other: Point, tol: f64) -> bool {
        (self.x - other.x).abs() < tol && (self.y - other.y).abs() < tol
    }
}

impl std::ops::Add<Point> for Point {
    type Output = Self;
    fn add(self, rhs: Point) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::AddAssign<Point> for Point {
    fn add_assign(&mut self, rhs: Point) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl std::ops::Sub<Point> for Point {
    type Output = Self;
    fn sub(self, rhs: Point) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::SubAssign<Point> for Point {
    fn sub_assign(&mut self, rhs: Point) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl std::ops::Mul<f64> for Point {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self::Output {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl std::ops::Neg for Point {
    type Output = Self;
    fn neg(self) -> Self::Output {
        Self::new(-self.x, -self.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from(value: (f64, f64)) -> Self {
        Self {
            x: value.0,
            y: value.1,
        }
    }
}

/// An axis-aligned rectangle, specified by lower-left and upper-right corners.
#[derive(Debug, Default, Copy, Clone, Serialize, Deserialize, PartialEq)]
pub struct Rect {
    /// The lower-left corner.
    pub p0: Point,
    /// The upper-right corner.
    pub p1: Point,
}

impl Rect {
    /// Creates a new rectangle.
    pub fn new(p0: Point, p1: Point) -> Self {
        Self {
            p0: Point::new(p0.x.min(p1.x), p0.y.min(p1.y)),
            p1: Point::new(p0.x.max(p1.x), p0.y.max(p1.y)),
        }
    }

    /// Creates a rectangle from its lower-left corner and side lengths.
    pub fn with_dims(p0: Point, w: f64, h: f64) -> Self {
        Self::new(p0, Point::new(p0.x + w, p0.y + h))
    }

    /// Returns the width of the rectangle in the x-direction.
    #[inline]
    pub fn width(&self) -> f64 {
        self.p1.x - self.p0.x
    }

    /// Returns the height of the rectangle in the y-direction.
    #[inline]
    pub fn height(&self) -> f64 {
        self.p1.y - self.p0.y
    }

    /// Returns the center point of the rectangle.
    pub fn center(&self) -> Point {
        Point::new((self.p0.x + self.p1.x) / 2.0, (self.p0.y + self.p1.y) / 2.0)
    }

    /// Returns the four corners in counter-clockwise order starting at `p0`.
    pub fn corners(&self) -> [Point; 4] {
        [
            self.p0,
            Point::new(self.p1.x, self.p0.y),
            self.p1,
            Point::new(self.p0.x, self.p1.y),
        ]
    }
}

impl Translate for Rect {
    fn translate(&mut self, p: Point) {
        self.p0.translate(p);
        self.p1.translate(p);
    }
}

/// A closed n-sided polygon with an arbitrary number of vertices.
///
/// Closure from the last point back to the first is implied;
/// the initial point need not be repeated at the end.
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
pub struct Polygon {
    pub points: Vec<Point>,
}

impl Polygon {
    /// Creates a new [`Polygon`] from a list of vertices.
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Approximates a circle of radius `radius` about `center` with `n` vertices.
    pub fn circle(center: Point, radius: f64, n: usize) -> Self {
        let points = (0..n)
            .map(|i| {
                let phi = TAU * i as f64 / n as f64;
                center + Point::from_angle(phi) * radius
            })
            .collect();
        Self { points }
    }

    /// Approximates an annulus (circular ring) between `inner` and `outer`
    /// radii about `center`.
    ///
    /// The polygon walks the outer circle counter-clockwise and the inner
    /// circle clockwise, closing through a seam at angle zero.
    pub fn annulus(center: Point, inner: f64, outer: f64, n: usize) -> Self {
        Self::annular_sector(center, inner, outer, 0.0, TAU, n)
    }

    /// Approximates an annular sector between `inner` and `outer` radii,
    /// sweeping `sweep` radians from `start` about `center`.
    ///
    /// A negative `sweep` walks clockwise. `n` is the number of vertices on
    /// each arc.
    pub fn annular_sector(
        center: Point,
        inner: f64,
        outer: f64,
        start: f64,
        sweep: f64,
        n: usize,
    ) -> Self {
        let n = n.max(2);
        let arc = |radius: f64, i: usize| {
            let phi = start + sweep * i as f64 / (n - 1) as f64;
            center + Point::from_angle(phi) * radius
        };
        let mut points = Vec::with_capacity(2 * n);
        for i in 0..n {
            points.push(arc(outer, i));
        }
        for i in (0..n).rev() {
            points.push(arc(inner, i));
        }
        Self { points }
    }

    /// Builds a strip of the given `width` centered on a polyline.
    ///
    /// Each vertex is offset along the average normal of its adjacent
    /// segments. The centerline must contain at least two points.
    pub fn strip(centerline: &[Point], width: f64) -> Self {
        debug_assert!(centerline.len() >= 2);
        let half = width / 2.0;
        let normal_of = |a: Point, b: Point| {
            let d = b - a;
            let len = d.norm();
            Point::new(-d.y / len, d.x / len)
        };
        let n = centerline.len();
        let mut left = Vec::with_capacity(n);
        let mut right = Vec::with_capacity(n);
        for i in 0..n {
            let normal = if i == 0 {
                normal_of(centerline[0], centerline[1])
            } else if i == n - 1 {
                normal_of(centerline[n - 2], centerline[n - 1])
            } else {
                let n0 = normal_of(centerline[i - 1], centerline[i]);
                let n1 = normal_of(centerline[i], centerline[i + 1]);
                let sum = n0 + n1;
                let len = sum.norm();
                if len < EPSILON {
                    n1
                } else {
                    Point::new(sum.x / len, sum.y / len)
                }
            };
            left.push(centerline[i] + normal * half);
            right.push(centerline[i] + normal * -half);
        }
        right.reverse();
        left.extend(right);
        Self { points: left }
    }

    /// Returns `true` if the [`Polygon`] contains [`Point`] `pt`.
    ///
    /// Boundary points may fall on either side; callers needing inclusive
    /// containment should expand the polygon by a tolerance first.
    pub fn contains(&self, pt: Point) -> bool {
        // Even-odd ray casting along +x.
        let mut inside = false;
        let n = self.points.len();
        for i in 0..n {
            let a = self.points[i];
            let b = self.points[(i + 1) % n];
            if (a.y > pt.y) != (b.y > pt.y) {
                let x = a.x + (pt.y - a.y) / (b.y - a.y) * (b.x - a.x);
                if pt.x < x {
                    inside = !inside;
                }
            }
        }
        inside
    }

    /// Returns the signed area of the polygon (positive for counter-clockwise
    /// winding).
    pub fn area(&self) -> f64 {
        let n = self.points.len();
        let mut acc = 0.0;
        for i in 0..n {
            let a = self.points[i];
            let b = self.points[(i + 1) % n];
            acc += a.x * b.y - b.x * a.y;
        }
        acc / 2.0
    }
}

impl Translate for Polygon {
    fn translate(&mut self, p: Point) {
        for pt in self.points.iter_mut() {
            pt.translate(p);
        }
    }
}

/// Computes the convex hull of `points` via the monotone-chain algorithm.
///
/// The hull is returned in counter-clockwise order. Inputs with fewer than
/// three points yield a degenerate polygon over the inputs themselves.
pub fn convex_hull(points: &[Point]) -> Polygon {
    let mut pts: Vec<Point> = points.to_vec();
    pts.sort_by(|a, b| {
        a.x.partial_cmp(&b.x)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.y.partial_cmp(&b.y).unwrap_or(std::cmp::Ordering::Equal))
    });
    pts.dedup_by(|a, b| a.approx_eq(*b, EPSILON));
    if pts.len() < 3 {
        return Polygon::new(pts);
    }
    let cross = |o: Point, a: Point, b: Point| -> f64 {
        (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
    };
    let mut lower: Vec<Point> = Vec::with_capacity(pts.len());
    for &p in pts.iter() {
        while lower.len() >= 2 && cross(lower[lower.len() - 2], lower[lower.len() - 1], p) <= 0.0 {
            lower.pop();
        }
        lower.push(p);
    }
    let mut upper: Vec<Point> = Vec::with_capacity(pts.len());
    for &p in pts.iter().rev() {
        while upper.len() >= 2 && cross(upper[upper.len() - 2], upper[upper.len() - 1], p) <= 0.0 {
            upper.pop();
        }
        upper.push(p);
    }
    // Each chain ends where the other begins.
    lower.pop();
    upper.pop();
    lower.extend(upper);
    Polygon::new(lower)
}

/// An enumeration of closed renderable shapes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[enum_dispatch(ShapeTrait)]
pub enum Shape {
    Rect(Rect),
    Polygon(Polygon),
}

/// Common shape operations, dispatched from the [`Shape`] enum to its
/// variants by [mod@enum_dispatch].
#[enum_dispatch]
pub trait ShapeTrait {
    /// Converts the shape to a [`Polygon`], the most general of shapes.
    fn to_poly(&self) -> Polygon;
}

impl ShapeTrait for Rect {
    fn to_poly(&self) -> Polygon {
        Polygon::new(self.corners().to_vec())
    }
}

impl ShapeTrait for Polygon {
    fn to_poly(&self) -> Polygon {
        self.clone()
    }
}

impl Translate for Shape {
    fn translate(&mut self, p: Point) {
        match self {
            Self::Rect(s) => s.translate(p),
            Self::Polygon(s) => s.translate(p),
        }
    }
}

impl Transform for Shape {
    fn transform(&self, trans: Transformation) -> Self {
        // A rotated rectangle is no longer axis-aligned; transforming always
        // yields the polygon form.
        Self::Polygon(self.to_poly().transform(trans))
    }
}

impl BoundBox for Shape {
    fn bbox(&self) -> Bbox {
        match self {
            Shape::Rect(r) => r.bbox(),
            Shape::Polygon(p) => p.points.bbox(),
        }
    }
}

impl BoundBox for Rect {
    fn bbox(&self) -> Bbox {
        Bbox::new(self.p0, self.p1)
    }
}

impl BoundBox for Polygon {
    fn bbox(&self) -> Bbox {
        self.points.bbox()
    }
}
