//! Ring resonators.

use std::f64::consts::{FRAC_PI_2, TAU};

use derive_builder::Builder;
use picgeom::{Point, Polygon};
use serde::{Deserialize, Serialize};

use crate::error::{ErrorSource, Result};
use crate::layout::cell::Group;
use crate::layout::layers::LayerId;
use crate::layout::port::Port;
use crate::layout::Draw;

/// Vertices used to approximate the ring.
const RING_VERTICES: usize = 128;

/// Shape parameters for a ring resonator.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
pub struct RingResonatorParams {
    /// Coupling gap between the bus waveguide edge and the ring edge, in
    /// microns. The sign selects the side: positive places the ring to the
    /// left of the bus heading, negative to the right.
    pub gap: f64,
    /// Centerline radius of the ring, in microns.
    pub radius: f64,
}

/// A ring resonator evanescently coupled to a bus waveguide.
///
/// The ring sits beside the anchor port; the bus itself is not part of the
/// resonator, so the through port is the anchor port unchanged and routing
/// continues from where it left off.
#[derive(Debug, Clone)]
pub struct RingResonator {
    port: Port,
    gap: f64,
    radius: f64,
}

impl RingResonator {
    /// Creates a ring resonator coupled to the bus at `port`.
    ///
    /// The ring waveguide inherits the port's width. Fails if `radius` is
    /// not strictly positive or `gap` is not finite.
    pub fn make_at_port(port: Port, params: &RingResonatorParams) -> Result<Self> {
        let radius = ErrorSource::expect_positive("radius", params.radius)?;
        if !params.gap.is_finite() {
            return Err(ErrorSource::InvalidParameter {
                name: "gap",
                value: params.gap,
            }
            .into());
        }
        Ok(Self {
            port,
            gap: params.gap,
            radius,
        })
    }

    /// The entry point of the bus, facing back along the anchor heading.
    #[inline]
    pub fn in_port(&self) -> Port {
        self.port.reversed()
    }

    /// The through port: the anchor port, unchanged.
    #[inline]
    pub fn out_port(&self) -> Port {
        self.port
    }

    /// The center of the ring.
    pub fn center(&self) -> Point {
        let side = if self.gap >= 0.0 {
            FRAC_PI_2
        } else {
            -FRAC_PI_2
        };
        let offset = self.port.width() + self.gap.abs() + self.radius;
        self.port.origin() + Point::from_angle(self.port.angle() + side) * offset
    }

    /// The circumference of the ring centerline.
    pub fn circumference(&self) -> f64 {
        TAU * self.radius
    }
}

impl Draw for RingResonator {
    fn draw(&self, layer: LayerId) -> Result<Group> {
        let half = self.port.width() / 2.0;
        let ring = Polygon::annulus(
            self.center(),
            self.radius - half,
            self.radius + half,
            RING_VERTICES,
        );
        ring.draw(layer)
    }
}

#[cfg(test)]
mod tests {
    use picgeom::bbox::BoundBox;

    use super::*;

    #[test]
    fn through_port_continues_the_bus() {
        let port = Port::new((5.0, 0.0), 0.0, 0.5).unwrap();
        let params = RingResonatorParamsBuilder::default()
            .gap(1.0)
            .radius(50.0)
            .build()
            .unwrap();
        let ring = RingResonator::make_at_port(port, &params).unwrap();
        assert_eq!(ring.out_port(), port);
        assert_eq!(ring.in_port(), port.reversed());
    }

    #[test]
    fn positive_gap_places_ring_on_the_left() {
        let port = Port::new((0.0, 0.0), 0.0, 0.5).unwrap();
        let params = RingResonatorParamsBuilder::default()
            .gap(1.0)
            .radius(50.0)
            .build()
            .unwrap();
        let ring = RingResonator::make_at_port(port, &params).unwrap();
        // offset = width + gap + radius above the bus centerline
        assert!(ring.center().approx_eq(Point::new(0.0, 51.5), 1e-9));

        let flipped = RingResonator::make_at_port(
            port,
            &RingResonatorParamsBuilder::default()
                .gap(-1.0)
                .radius(50.0)
                .build()
                .unwrap(),
        )
        .unwrap();
        assert!(flipped.center().approx_eq(Point::new(0.0, -51.5), 1e-9));
    }

    #[test]
    fn drawn_ring_stays_clear_of_the_bus() {
        let port = Port::new((0.0, 0.0), 0.0, 0.5).unwrap();
        let params = RingResonatorParamsBuilder::default()
            .gap(1.0)
            .radius(50.0)
            .build()
            .unwrap();
        let ring = RingResonator::make_at_port(port, &params).unwrap();
        let group = ring.draw(LayerId(3)).unwrap();
        let bbox = group.bbox();
        // The lowest ring edge sits one gap above the bus edge. Tessellation
        // only pulls vertices inward, never past the true circle.
        assert!(bbox.p0.y >= 0.25 + 1.0 - 1e-9);
        assert!(bbox.p0.y <= 0.25 + 1.0 + 0.05);
    }

    #[test]
    fn non_positive_radius_is_rejected() {
        let port = Port::new((0.0, 0.0), 0.0, 0.5).unwrap();
        let params = RingResonatorParamsBuilder::default()
            .gap(1.0)
            .radius(0.0)
            .build()
            .unwrap();
        let err = RingResonator::make_at_port(port, &params).unwrap_err();
        assert!(matches!(
            err.source(),
            ErrorSource::InvalidParameter { name: "radius", .. }
        ));
    }
}
