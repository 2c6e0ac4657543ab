//! Mach-Zehnder interferometers built from MMI splitters.

use std::f64::consts::FRAC_PI_2;

use derive_builder::Builder;
use picgeom::transform::{Transform, Transformation};
use picgeom::{Point, Rect, Shape};
use serde::{Deserialize, Serialize};

use crate::error::{ErrorContext, ErrorSource, Result};
use crate::layout::cell::Group;
use crate::layout::layers::LayerId;
use crate::layout::port::Port;
use crate::layout::routing::Waveguide;
use crate::layout::Draw;

/// Shape parameters for an MMI-based Mach-Zehnder interferometer.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
pub struct MziParams {
    /// Length of each MMI splitter body, in microns.
    pub splitter_length: f64,
    /// Width of each MMI splitter body, in microns.
    pub splitter_width: f64,
    /// Centerline radius of the arm bends, in microns.
    pub bend_radius: f64,
    /// Straight vertical run of the upper arm, in microns.
    pub upper_vertical_length: f64,
    /// Straight vertical run of the lower arm, in microns.
    pub lower_vertical_length: f64,
    /// Straight horizontal run of both arms, in microns.
    pub horizontal_length: f64,
}

/// A two-arm interferometer: an MMI splitter, two routed arms, and an MMI
/// combiner.
///
/// The arm vertical lengths set the path imbalance; they do not affect the
/// position of the output port, which always sits
/// `2 * splitter_length + 4 * bend_radius + horizontal_length` beyond the
/// anchor along its heading.
#[derive(Debug, Clone)]
pub struct Mzi {
    anchor: Port,
    params: MziParams,
    splitters: [Shape; 2],
    arms: [Waveguide; 2],
}

impl Mzi {
    /// Creates an interferometer whose input coincides with `port`.
    ///
    /// The arm waveguides inherit the port's width.
    pub fn make_at_port(port: Port, params: &MziParams) -> Result<Self> {
        Self::build(port, params).map_err(|e| {
            e.with_context(ErrorContext::GenPart {
                name: crate::deps::arcstr::literal!("mzi"),
                kind: "interferometer",
            })
        })
    }

    fn build(port: Port, params: &MziParams) -> Result<Self> {
        let length = ErrorSource::expect_positive("splitter_length", params.splitter_length)?;
        let width = ErrorSource::expect_positive("splitter_width", params.splitter_width)?;
        let radius = ErrorSource::expect_positive("bend_radius", params.bend_radius)?;
        let upper =
            ErrorSource::expect_non_negative("upper_vertical_length", params.upper_vertical_length)?;
        let lower =
            ErrorSource::expect_non_negative("lower_vertical_length", params.lower_vertical_length)?;
        let horizontal =
            ErrorSource::expect_non_negative("horizontal_length", params.horizontal_length)?;

        // MMI bodies, laid out in the anchor's local frame and rotated into
        // place.
        let to_global = Transformation::with_loc_and_angle(port.origin(), port.angle());
        let arm_span = 4.0 * radius + horizontal;
        let splitter_at = |x0: f64| {
            Shape::Rect(Rect::new(
                Point::new(x0, -width / 2.0),
                Point::new(x0 + length, width / 2.0),
            ))
            .transform(to_global)
        };
        let splitters = [splitter_at(0.0), splitter_at(length + arm_span)];

        // Each arm starts at an MMI output, a quarter of the body width off
        // the axis, and rejoins the combiner at the same offset.
        let arm_offset = width / 4.0;
        let arm_start = |side: f64| -> Result<Port> {
            let perp = Point::from_angle(port.angle() + side * FRAC_PI_2);
            Port::new(
                port.translated(length).origin() + perp * arm_offset,
                port.angle(),
                port.width(),
            )
        };
        let arm = |side: f64, vertical: f64| -> Result<Waveguide> {
            let mut wg = Waveguide::make_at_port(arm_start(side)?);
            wg.add_bend(side * FRAC_PI_2, radius)?
                .add_straight(vertical)?
                .add_bend(-side * FRAC_PI_2, radius)?
                .add_straight(horizontal)?
                .add_bend(-side * FRAC_PI_2, radius)?
                .add_straight(vertical)?
                .add_bend(side * FRAC_PI_2, radius)?;
            Ok(wg)
        };
        let arms = [arm(1.0, upper)?, arm(-1.0, lower)?];

        Ok(Self {
            anchor: port,
            params: params.clone(),
            splitters,
            arms,
        })
    }

    /// The entry point of the device, facing back along the anchor heading.
    #[inline]
    pub fn in_port(&self) -> Port {
        self.anchor.reversed()
    }

    /// The output port on the far side of the combiner.
    pub fn out_port(&self) -> Port {
        let span = 2.0 * self.params.splitter_length
            + 4.0 * self.params.bend_radius
            + self.params.horizontal_length;
        self.anchor.translated(span)
    }

    /// The optical path length difference between the two arms.
    pub fn imbalance(&self) -> f64 {
        self.arms[0].length() - self.arms[1].length()
    }
}

impl Draw for Mzi {
    fn draw(&self, layer: LayerId) -> Result<Group> {
        let mut group = Group::new();
        for splitter in &self.splitters {
            group.add_group(splitter.draw(layer)?);
        }
        for arm in &self.arms {
            group.add_group(arm.draw(layer)?);
        }
        Ok(group)
    }
}
