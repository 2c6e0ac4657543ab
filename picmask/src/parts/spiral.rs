//! Length-extending waveguide spirals.

use std::f64::consts::TAU;

use derive_builder::Builder;
use picgeom::{Point, Polygon};
use serde::{Deserialize, Serialize};

use crate::error::{ErrorSource, Result};
use crate::layout::cell::Group;
use crate::layout::layers::LayerId;
use crate::layout::port::Port;
use crate::layout::Draw;

/// Samples per winding when tessellating the spiral centerline.
const SAMPLES_PER_TURN: usize = 64;

/// Shape parameters for a double-wound spiral.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
pub struct SpiralParams {
    /// Number of windings per arm.
    pub num: u32,
    /// Radial spacing between adjacent windings, in microns.
    pub gap: f64,
    /// Radius of the central clearance, in microns.
    pub inner_gap: f64,
}

/// A double-wound Archimedean spiral packing waveguide length into a
/// compact footprint.
///
/// The two arms wind from opposite sides into the center and join there,
/// so the input and output ports sit on a common line through the spiral
/// center, `2 * (inner_gap + num * gap)` apart, both facing along the
/// anchor heading.
#[derive(Debug, Clone)]
pub struct Spiral {
    anchor: Port,
    num: u32,
    gap: f64,
    inner_gap: f64,
}

impl Spiral {
    /// Creates a spiral anchored at `port`.
    ///
    /// Fails unless `num` is at least one and `gap` and `inner_gap` are
    /// strictly positive.
    pub fn make_at_port(port: Port, params: &SpiralParams) -> Result<Self> {
        if params.num == 0 {
            return Err(ErrorSource::InvalidParameter {
                name: "num",
                value: 0.0,
            }
            .into());
        }
        let gap = ErrorSource::expect_positive("gap", params.gap)?;
        let inner_gap = ErrorSource::expect_positive("inner_gap", params.inner_gap)?;
        Ok(Self {
            anchor: port,
            num: params.num,
            gap,
            inner_gap,
        })
    }

    /// The outer radius of the spiral.
    pub fn outer_radius(&self) -> f64 {
        self.inner_gap + self.num as f64 * self.gap
    }

    /// The center of the spiral.
    pub fn center(&self) -> Point {
        self.anchor.origin() + self.anchor.direction() * self.outer_radius()
    }

    /// The entry point of the spiral, facing back along the anchor heading.
    #[inline]
    pub fn in_port(&self) -> Port {
        self.anchor.reversed()
    }

    /// The exit point on the far side of the spiral, facing along the
    /// anchor heading.
    pub fn out_port(&self) -> Port {
        self.anchor.translated(2.0 * self.outer_radius())
    }

    /// The tessellated centerline of the full path, input to output.
    fn centerline(&self) -> Vec<Point> {
        let center = self.center();
        let base = self.anchor.angle() + std::f64::consts::PI;
        let sweep = self.num as f64 * TAU;
        let samples = (self.num as usize * SAMPLES_PER_TURN).max(SAMPLES_PER_TURN);
        // One arm winds from the anchor down to the central clearance.
        let arm: Vec<Point> = (0..=samples)
            .map(|i| {
                let theta = sweep * i as f64 / samples as f64;
                let r = self.outer_radius() - self.gap * theta / TAU;
                center + Point::from_angle(base + theta) * r
            })
            .collect();
        // The second arm is the first reflected through the center, walked
        // outward, joining the first through the middle.
        let mut points = arm.clone();
        points.push(center);
        points.extend(arm.iter().rev().map(|&p| center * 2.0 - p));
        points
    }

    /// The approximate centerline length of the spiral path.
    pub fn length(&self) -> f64 {
        let pts = self.centerline();
        pts.windows(2).map(|w| w[0].distance(w[1])).sum()
    }
}

impl Draw for Spiral {
    fn draw(&self, layer: LayerId) -> Result<Group> {
        Polygon::strip(&self.centerline(), self.anchor.width()).draw(layer)
    }
}

#[cfg(test)]
mod tests {
    use float_eq::assert_float_eq;
    use picgeom::bbox::BoundBox;

    use super::*;

    fn params(num: u32) -> SpiralParams {
        SpiralParamsBuilder::default()
            .num(num)
            .gap(10.0)
            .inner_gap(50.0)
            .build()
            .unwrap()
    }

    #[test]
    fn ports_straddle_the_center() {
        let port = Port::new((0.0, -1000.0), 0.0, 0.5).unwrap();
        let spiral = Spiral::make_at_port(port, &params(5)).unwrap();
        // outer radius = 50 + 5 * 10 = 100
        assert_float_eq!(spiral.outer_radius(), 100.0, abs <= 0.0);
        assert!(spiral.center().approx_eq(Point::new(100.0, -1000.0), 1e-9));
        let out = spiral.out_port();
        assert!(out.origin().approx_eq(Point::new(200.0, -1000.0), 1e-9));
        assert_float_eq!(out.angle(), 0.0, abs <= 0.0);
        assert_float_eq!(spiral.in_port().angle(), std::f64::consts::PI, abs <= 0.0);
    }

    #[test]
    fn more_windings_pack_more_length() {
        let port = Port::new((0.0, 0.0), 0.0, 0.5).unwrap();
        let five = Spiral::make_at_port(port, &params(5)).unwrap();
        let ten = Spiral::make_at_port(port, &params(10)).unwrap();
        assert!(ten.length() > five.length());
        // Each arm is at least num windings of the innermost circumference.
        assert!(five.length() > 2.0 * 5.0 * TAU * 50.0);
    }

    #[test]
    fn footprint_is_bounded_by_the_outer_radius() {
        let port = Port::new((0.0, 0.0), 0.0, 0.5).unwrap();
        let spiral = Spiral::make_at_port(port, &params(5)).unwrap();
        let bbox = spiral.draw(LayerId(3)).unwrap().bbox();
        let reach = spiral.outer_radius() + port.width();
        assert!(bbox.p0.x >= -reach);
        assert!(bbox.p1.x <= 2.0 * spiral.outer_radius() + reach);
        assert!(bbox.p1.y - bbox.p0.y <= 2.0 * reach);
    }

    #[test]
    fn zero_windings_are_rejected() {
        let port = Port::new((0.0, 0.0), 0.0, 0.5).unwrap();
        let err = Spiral::make_at_port(
            port,
            &SpiralParamsBuilder::default()
                .num(0u32)
                .gap(10.0)
                .inner_gap(50.0)
                .build()
                .unwrap(),
        )
        .unwrap_err();
        assert!(matches!(
            err.source(),
            ErrorSource::InvalidParameter { name: "num", .. }
        ));
    }
}
