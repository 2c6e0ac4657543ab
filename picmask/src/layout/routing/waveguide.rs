//! A port-chained waveguide path builder.

use std::f64::consts::TAU;

use picgeom::{normalize_angle, Point, Polygon};
use serde::{Deserialize, Serialize};

use crate::error::{ErrorSource, Result};
use crate::layout::cell::Group;
use crate::layout::layers::LayerId;
use crate::layout::port::Port;
use crate::layout::Draw;

/// Vertices per full turn when tessellating bend arcs.
const ARC_VERTICES_PER_TURN: f64 = 64.0;

/// One segment of a waveguide path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PathSegment {
    /// A straight run of the given length along the current heading.
    Straight { length: f64 },
    /// A circular arc of the given signed sweep angle and centerline radius.
    ///
    /// Positive angles turn left (counter-clockwise), negative angles turn
    /// right.
    Bend { angle: f64, radius: f64 },
}

impl PathSegment {
    /// The arc length contributed by this segment.
    pub fn length(&self) -> f64 {
        match *self {
            PathSegment::Straight { length } => length,
            PathSegment::Bend { angle, radius } => angle.abs() * radius,
        }
    }
}

/// A waveguide path built by chaining straight and bend segments from a
/// starting [`Port`].
///
/// The builder tracks the running end of the path as a port, so the next
/// segment always begins exactly where the previous one ended. Once a path
/// is sealed its end has been handed to downstream geometry and further
/// extension fails with [`ErrorSource::PathSealed`].
#[derive(Debug, Clone)]
pub struct Waveguide {
    start: Port,
    current: Port,
    segments: Vec<PathSegment>,
    sealed: bool,
}

impl Waveguide {
    /// Starts a new waveguide at `port`, inheriting its position, heading,
    /// and width.
    pub fn make_at_port(port: Port) -> Self {
        Self {
            start: port,
            current: port,
            segments: Vec::new(),
            sealed: false,
        }
    }

    fn check_open(&self) -> Result<()> {
        if self.sealed {
            Err(ErrorSource::PathSealed.into())
        } else {
            Ok(())
        }
    }

    /// Appends a straight segment of the given `length` along the current
    /// heading.
    ///
    /// A zero length is permitted and leaves the end port unchanged. Fails
    /// on negative or non-finite lengths and on sealed paths.
    pub fn add_straight(&mut self, length: f64) -> Result<&mut Self> {
        self.check_open()?;
        let length = ErrorSource::expect_non_negative("length", length)?;
        self.current = self.current.translated(length);
        self.segments.push(PathSegment::Straight { length });
        Ok(self)
    }

    /// Appends a circular bend sweeping `angle` radians at the given
    /// centerline `radius`.
    ///
    /// Positive angles turn left, negative angles turn right. The end port
    /// is carried along the arc and its heading rotated by `angle`. Fails
    /// on non-positive or non-finite radii and on sealed paths.
    pub fn add_bend(&mut self, angle: f64, radius: f64) -> Result<&mut Self> {
        self.check_open()?;
        let radius = ErrorSource::expect_positive("radius", radius)?;
        if !angle.is_finite() {
            return Err(ErrorSource::InvalidParameter {
                name: "angle",
                value: angle,
            }
            .into());
        }
        let center = bend_center(&self.current, angle, radius);
        let origin = self.current.origin().rotated_about(center, angle);
        self.current = Port::new(
            origin,
            normalize_angle(self.current.angle() + angle),
            self.current.width(),
        )?;
        self.segments.push(PathSegment::Bend { angle, radius });
        Ok(self)
    }

    /// The port at the running end of the path: where the next segment
    /// would begin, and where downstream geometry attaches.
    #[inline]
    pub fn current_port(&self) -> Port {
        self.current
    }

    /// The input port of the path: the starting port with its heading
    /// reversed, facing back along the first segment.
    #[inline]
    pub fn in_port(&self) -> Port {
        self.start.reversed()
    }

    /// Seals the path against further extension and returns its end port.
    pub fn seal(&mut self) -> Port {
        self.sealed = true;
        self.current
    }

    /// Returns `true` if this path has been sealed.
    #[inline]
    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// The total centerline length of the path.
    pub fn length(&self) -> f64 {
        self.segments.iter().map(PathSegment::length).sum()
    }

    /// The segments of the path in the order they were added.
    #[inline]
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }
}

/// The center of the arc a bend of `angle` at `radius` sweeps from `port`.
///
/// The center sits one radius to the left of the heading for left turns and
/// one radius to the right for right turns.
fn bend_center(port: &Port, angle: f64, radius: f64) -> Point {
    let side = if angle >= 0.0 {
        std::f64::consts::FRAC_PI_2
    } else {
        -std::f64::consts::FRAC_PI_2
    };
    port.origin() + Point::from_angle(port.angle() + side) * radius
}

impl Draw for Waveguide {
    fn draw(&self, layer: LayerId) -> Result<Group> {
        let mut group = Group::new();
        let mut cursor = self.start;
        for segment in &self.segments {
            match *segment {
                PathSegment::Straight { length } => {
                    if length > 0.0 {
                        let end = cursor.translated(length);
                        let strip = Polygon::strip(
                            &[cursor.origin(), end.origin()],
                            cursor.width(),
                        );
                        group.add_group(strip.draw(layer)?);
                        cursor = end;
                    }
                }
                PathSegment::Bend { angle, radius } => {
                    let center = bend_center(&cursor, angle, radius);
                    let seam = cursor.origin() - center;
                    let start = seam.y.atan2(seam.x);
                    let n = ((angle.abs() / TAU * ARC_VERTICES_PER_TURN).ceil() as usize).max(8);
                    let half = cursor.width() / 2.0;
                    let sector =
                        Polygon::annular_sector(center, radius - half, radius + half, start, angle, n);
                    group.add_group(sector.draw(layer)?);
                    cursor = Port::new(
                        cursor.origin().rotated_about(center, angle),
                        normalize_angle(cursor.angle() + angle),
                        cursor.width(),
                    )?;
                }
            }
        }
        Ok(group)
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::{FRAC_PI_2, PI};

    use float_eq::assert_float_eq;
    use picgeom::bbox::BoundBox;
    use picgeom::Point;

    use super::*;
    use crate::error::ErrorSource;

    fn port(x: f64, y: f64, angle: f64) -> Port {
        Port::new((x, y), angle, 0.5).unwrap()
    }

    #[test]
    fn straight_then_quarter_bend() {
        let mut wg = Waveguide::make_at_port(port(0.0, 0.0, 0.0));
        wg.add_straight(100.0)
            .unwrap()
            .add_bend(FRAC_PI_2, 10.0)
            .unwrap();
        let end = wg.current_port();
        assert!(end.origin().approx_eq(Point::new(110.0, 10.0), 1e-9));
        assert_float_eq!(end.angle(), FRAC_PI_2, abs <= 1e-12);
        assert_float_eq!(wg.length(), 100.0 + FRAC_PI_2 * 10.0, abs <= 1e-12);
    }

    #[test]
    fn u_turn_round_trip_returns_to_start() {
        // straight, half-turn, straight, half-turn lands back on the start.
        let start = port(3.0, -2.0, 0.7);
        let mut wg = Waveguide::make_at_port(start);
        wg.add_straight(40.0)
            .unwrap()
            .add_bend(PI, 10.0)
            .unwrap()
            .add_straight(40.0)
            .unwrap()
            .add_bend(PI, 10.0)
            .unwrap();
        let end = wg.current_port();
        assert!(end.origin().approx_eq(start.origin(), 1e-9));
        assert_float_eq!(end.angle(), start.angle(), abs <= 1e-9);
    }

    #[test]
    fn right_bend_turns_clockwise() {
        let mut wg = Waveguide::make_at_port(port(0.0, 0.0, 0.0));
        wg.add_bend(-FRAC_PI_2, 10.0).unwrap();
        let end = wg.current_port();
        assert!(end.origin().approx_eq(Point::new(10.0, -10.0), 1e-9));
        assert_float_eq!(end.angle(), -FRAC_PI_2, abs <= 1e-12);
    }

    #[test]
    fn zero_length_straight_is_allowed() {
        let start = port(1.0, 1.0, 0.3);
        let mut wg = Waveguide::make_at_port(start);
        wg.add_straight(0.0).unwrap();
        assert_eq!(wg.segments().len(), 1);
        assert!(wg.current_port().origin().approx_eq(start.origin(), 1e-12));
    }

    #[test]
    fn invalid_segment_parameters_are_rejected() {
        let mut wg = Waveguide::make_at_port(port(0.0, 0.0, 0.0));
        assert!(matches!(
            wg.add_straight(-1.0).unwrap_err().source(),
            ErrorSource::InvalidParameter { name: "length", .. }
        ));
        assert!(matches!(
            wg.add_bend(FRAC_PI_2, 0.0).unwrap_err().source(),
            ErrorSource::InvalidParameter { name: "radius", .. }
        ));
        // A failed append leaves the path untouched.
        assert!(wg.segments().is_empty());
    }

    #[test]
    fn sealed_path_rejects_extension() {
        let mut wg = Waveguide::make_at_port(port(0.0, 0.0, 0.0));
        wg.add_straight(5.0).unwrap();
        let end = wg.seal();
        assert!(end.origin().approx_eq(Point::new(5.0, 0.0), 1e-12));
        assert!(matches!(
            wg.add_straight(1.0).unwrap_err().source(),
            ErrorSource::PathSealed
        ));
        assert!(matches!(
            wg.add_bend(0.1, 10.0).unwrap_err().source(),
            ErrorSource::PathSealed
        ));
        assert_eq!(wg.segments().len(), 1);
    }

    #[test]
    fn in_port_faces_back_along_path() {
        let start = port(0.0, 0.0, 0.0);
        let wg = Waveguide::make_at_port(start);
        let inp = wg.in_port();
        assert_eq!(inp.origin(), start.origin());
        assert_float_eq!(inp.angle(), PI, abs <= 1e-12);
    }

    #[test]
    fn draw_covers_the_path_extent() {
        let mut wg = Waveguide::make_at_port(port(0.0, 0.0, 0.0));
        wg.add_straight(100.0)
            .unwrap()
            .add_bend(FRAC_PI_2, 10.0)
            .unwrap();
        let group = wg.draw(LayerId(3)).unwrap();
        assert_eq!(group.elements().count(), 2);
        let bbox = group.bbox();
        // The strip spans from the start to the outer edge of the bend.
        assert_float_eq!(bbox.p0.x, 0.0, abs <= 1e-9);
        assert_float_eq!(bbox.p0.y, -0.25, abs <= 1e-9);
        assert!(bbox.p1.x <= 110.25 + 1e-9);
        assert!(bbox.p1.y <= 10.0 + 1e-9);
    }

    #[test]
    fn empty_path_draws_nothing() {
        let wg = Waveguide::make_at_port(port(0.0, 0.0, 0.0));
        let group = wg.draw(LayerId(3)).unwrap();
        assert_eq!(group.elements().count(), 0);
        assert_float_eq!(wg.length(), 0.0, abs <= 0.0);
    }
}
