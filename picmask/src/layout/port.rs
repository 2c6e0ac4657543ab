//! Directed connection points for chaining optical geometry.

use std::f64::consts::PI;

use picgeom::{normalize_angle, Point};
use serde::{Deserialize, Serialize};

use crate::error::{ErrorSource, Result};

/// A directed connection point: a position, a heading, and a waveguide width.
///
/// Ports are immutable. Every operation that changes position or heading
/// returns a new [`Port`]; no port is ever mutated in place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Port {
    origin: Point,
    angle: f64,
    width: f64,
}

impl Port {
    /// Creates a new [`Port`] at `origin` with heading `angle` (radians) and
    /// the given waveguide `width`.
    ///
    /// The heading is normalized into `(-PI, PI]`. Fails with
    /// [`ErrorSource::InvalidParameter`] unless `width` is finite and
    /// strictly positive.
    pub fn new(origin: impl Into<Point>, angle: f64, width: f64) -> Result<Self> {
        let width = ErrorSource::expect_positive("width", width)?;
        Ok(Self {
            origin: origin.into(),
            angle: normalize_angle(angle),
            width,
        })
    }

    /// The port's position.
    #[inline]
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// The port's x-coordinate.
    #[inline]
    pub fn x(&self) -> f64 {
        self.origin.x
    }

    /// The port's y-coordinate.
    #[inline]
    pub fn y(&self) -> f64 {
        self.origin.y
    }

    /// The port's heading in radians, normalized into `(-PI, PI]`.
    #[inline]
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// The waveguide width carried by the port.
    #[inline]
    pub fn width(&self) -> f64 {
        self.width
    }

    /// The unit vector pointing along the port's heading.
    #[inline]
    pub fn direction(&self) -> Point {
        Point::from_angle(self.angle)
    }

    /// Returns a new [`Port`] at the same origin and width with the heading
    /// rotated by half a turn: the same endpoint, walked the other way.
    pub fn reversed(&self) -> Self {
        Self {
            angle: normalize_angle(self.angle + PI),
            ..*self
        }
    }

    /// Returns a new [`Port`] moved by `distance` along the heading.
    pub fn translated(&self, distance: f64) -> Self {
        Self {
            origin: self.origin + self.direction() * distance,
            ..*self
        }
    }

    /// Returns a new [`Port`] with the heading replaced by `angle`
    /// (normalized).
    pub fn with_angle(&self, angle: f64) -> Self {
        Self {
            angle: normalize_angle(angle),
            ..*self
        }
    }

    /// Returns a new [`Port`] with the width replaced by `width`.
    pub fn with_width(&self, width: f64) -> Result<Self> {
        let width = ErrorSource::expect_positive("width", width)?;
        Ok(Self { width, ..*self })
    }
}

#[cfg(test)]
mod tests {
    use float_eq::assert_float_eq;

    use super::*;
    use crate::error::ErrorSource;

    #[test]
    fn rejects_non_positive_width() {
        for bad in [0.0, -0.5, f64::NAN, f64::INFINITY] {
            let err = Port::new((0.0, 0.0), 0.0, bad).unwrap_err();
            assert!(matches!(
                err.source(),
                ErrorSource::InvalidParameter { name: "width", .. }
            ));
        }
    }

    #[test]
    fn angle_is_normalized_at_construction() {
        let port = Port::new((0.0, 0.0), 3.0 * PI, 0.5).unwrap();
        assert_float_eq!(port.angle(), PI, abs <= 1e-12);
    }

    #[test]
    fn reversed_flips_heading_and_keeps_origin() {
        let port = Port::new((2.0, -1.0), PI / 4.0, 0.5).unwrap();
        let rev = port.reversed();
        assert_eq!(rev.origin(), port.origin());
        assert_eq!(rev.width(), port.width());
        assert_float_eq!(rev.angle(), PI / 4.0 - PI, abs <= 1e-12);
        // Reversing twice returns the original heading.
        assert_float_eq!(rev.reversed().angle(), port.angle(), abs <= 1e-12);
    }

    #[test]
    fn translated_moves_along_heading() {
        let port = Port::new((1.0, 1.0), PI / 2.0, 0.5).unwrap();
        let moved = port.translated(3.0);
        assert!(moved.origin().approx_eq(picgeom::Point::new(1.0, 4.0), 1e-12));
        assert_float_eq!(moved.angle(), port.angle(), abs <= 0.0);
    }
}
