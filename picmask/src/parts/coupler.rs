//! Fiber grating couplers.

use std::f64::consts::FRAC_PI_2;
use std::f64::consts::PI;

use derive_builder::Builder;
use picgeom::{convex_hull, round9, Point, Polygon};
use serde::{Deserialize, Serialize};

use crate::deps::arcstr::ArcStr;
use crate::design::Design;
use crate::error::{ErrorContext, ErrorSource, Result};
use crate::layout::cell::{Cell, Group};
use crate::layout::layers::LayerId;
use crate::layout::port::Port;
use crate::layout::Draw;

/// Vertices per tooth arc.
const TOOTH_ARC_VERTICES: usize = 16;

/// Shape parameters for a linear grating coupler.
///
/// `width` and `angle` are optional: when the coupler is created at an
/// existing port they are inherited from that port unless explicitly set.
/// When created at a bare origin, unset values fall back to the defaults
/// below.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
pub struct GratingCouplerParams {
    /// The waveguide width at the coupler port, in microns.
    #[builder(default, setter(strip_option))]
    pub width: Option<f64>,
    /// The heading of the coupler port, in radians.
    #[builder(default, setter(strip_option))]
    pub angle: Option<f64>,
    /// The full opening angle of the taper fan, in radians.
    #[builder(default = "1.0_f64.to_radians()")]
    pub full_opening_angle: f64,
    /// The number of grating teeth.
    #[builder(default = "60")]
    pub n_gratings: usize,
    /// The grating period, in microns.
    #[builder(default = "0.67")]
    pub grating_period: f64,
    /// The grating fill factor, as a fraction of the period.
    #[builder(default = "0.5")]
    pub grating_ff: f64,
    /// The length of the taper from the port to the first tooth, in microns.
    #[builder(default = "700.0")]
    pub taper_length: f64,
}

impl Default for GratingCouplerParams {
    fn default() -> Self {
        Self {
            width: None,
            angle: None,
            full_opening_angle: 1.0_f64.to_radians(),
            n_gratings: 60,
            grating_period: 0.67,
            grating_ff: 0.5,
            taper_length: 700.0,
        }
    }
}

impl GratingCouplerParams {
    fn validate(&self) -> Result<()> {
        if !(self.full_opening_angle.is_finite()
            && self.full_opening_angle > 0.0
            && self.full_opening_angle < PI)
        {
            return Err(ErrorSource::InvalidParameter {
                name: "full_opening_angle",
                value: self.full_opening_angle,
            }
            .into());
        }
        if self.n_gratings == 0 {
            return Err(ErrorSource::InvalidParameter {
                name: "n_gratings",
                value: 0.0,
            }
            .into());
        }
        ErrorSource::expect_positive("grating_period", self.grating_period)?;
        if !(self.grating_ff.is_finite() && self.grating_ff > 0.0 && self.grating_ff < 1.0) {
            return Err(ErrorSource::InvalidParameter {
                name: "grating_ff",
                value: self.grating_ff,
            }
            .into());
        }
        ErrorSource::expect_positive("taper_length", self.taper_length)?;
        Ok(())
    }
}

/// A linear grating coupler with a long adiabatic taper.
///
/// The coupler produces two geometric groups from one logical part: a
/// coarse convex-hull outline on the waveguide layer and the fine tooth
/// pattern on the grating layer. Each instantiation embeds a fresh unique
/// identifier from the owning [`Design`] in its name, so two couplers at
/// identical parameters and origin still have distinct identities.
#[derive(Debug, Clone)]
pub struct GratingCoupler {
    name: ArcStr,
    cell: Cell,
    port: Port,
}

impl GratingCoupler {
    /// The default port width when created at a bare origin.
    pub const DEFAULT_WIDTH: f64 = 0.5;

    /// Creates a coupler at an explicit `origin`.
    ///
    /// Unset `width` and `angle` parameters fall back to
    /// [`Self::DEFAULT_WIDTH`] and a heading of pi/2 (teeth fanning
    /// downward).
    pub fn create(
        design: &mut Design,
        origin: impl Into<Point>,
        params: &GratingCouplerParams,
    ) -> Result<Self> {
        let origin = origin.into();
        let width = params.width.unwrap_or(Self::DEFAULT_WIDTH);
        let angle = params.angle.unwrap_or(FRAC_PI_2);
        Self::build(design, origin, angle, width, params)
    }

    /// Creates a coupler whose port coincides with `port`.
    ///
    /// `width` and `angle` are inherited from `port` unless explicitly set
    /// in `params`.
    pub fn create_at_port(
        design: &mut Design,
        port: Port,
        params: &GratingCouplerParams,
    ) -> Result<Self> {
        let width = params.width.unwrap_or_else(|| port.width());
        let angle = params.angle.unwrap_or_else(|| port.angle());
        Self::build(design, port.origin(), angle, width, params)
    }

    fn build(
        design: &mut Design,
        origin: Point,
        angle: f64,
        width: f64,
        params: &GratingCouplerParams,
    ) -> Result<Self> {
        let waveguide_layer = design.tech().waveguide_layer;
        let grating_layer = design.tech().grating_layer;
        let base = format!(
            "GC_period_{}_coords_{}_{}",
            params.grating_period,
            round9(origin.x),
            round9(origin.y)
        );

        let ctx = || ErrorContext::GenPart {
            name: base.clone().into(),
            kind: "grating coupler",
        };
        params.validate().map_err(|e| e.with_context(ctx()))?;
        let port = Port::new(origin, angle, width).map_err(|e| e.with_context(ctx()))?;

        // The counter moves exactly once per coupler actually created.
        let name = design.alloc_name(base);

        let teeth = Self::teeth(origin, angle, params);
        let outline = Self::outline(origin, angle, params, &teeth);

        let mut cell = Cell::new(name.clone());
        cell.add_to_layer(waveguide_layer, &outline)?;
        for tooth in &teeth {
            cell.add_to_layer(grating_layer, tooth)?;
        }

        Ok(Self { name, cell, port })
    }

    /// The fine tooth pattern: one annular sector per grating period,
    /// fanning away from the port heading.
    fn teeth(origin: Point, angle: f64, params: &GratingCouplerParams) -> Vec<Polygon> {
        let fan_dir = angle + PI;
        let start = fan_dir - params.full_opening_angle / 2.0;
        (0..params.n_gratings)
            .map(|i| {
                let inner = params.taper_length + i as f64 * params.grating_period;
                let outer = inner + params.grating_ff * params.grating_period;
                Polygon::annular_sector(
                    origin,
                    inner,
                    outer,
                    start,
                    params.full_opening_angle,
                    TOOTH_ARC_VERTICES,
                )
            })
            .collect()
    }

    /// The coarse outline: the convex hull of the taper fan and all teeth.
    fn outline(
        origin: Point,
        angle: f64,
        params: &GratingCouplerParams,
        teeth: &[Polygon],
    ) -> Polygon {
        let fan_dir = angle + PI;
        let start = fan_dir - params.full_opening_angle / 2.0;
        let mut points = vec![origin];
        for i in 0..TOOTH_ARC_VERTICES {
            let phi = start
                + params.full_opening_angle * i as f64 / (TOOTH_ARC_VERTICES - 1) as f64;
            points.push(origin + Point::from_angle(phi) * params.taper_length);
        }
        for tooth in teeth {
            points.extend_from_slice(&tooth.points);
        }
        convex_hull(&points)
    }

    /// The unique name of this coupler instance.
    #[inline]
    pub fn name(&self) -> &ArcStr {
        &self.name
    }

    /// The coupler's port: the point where a waveguide continues from the
    /// taper tip, facing away from the teeth.
    #[inline]
    pub fn port(&self) -> Port {
        self.port
    }

    /// The cell holding the coupler's layered geometry.
    #[inline]
    pub fn cell(&self) -> &Cell {
        &self.cell
    }

    /// Consumes the coupler, returning its cell for registration.
    pub fn into_cell(self) -> Cell {
        self.cell
    }
}

impl Draw for GratingCoupler {
    /// Couplers span two fabrication layers; the geometry keeps its own
    /// layer tags and the requested layer is ignored.
    fn draw(&self, _layer: LayerId) -> Result<Group> {
        let mut group = Group::new();
        group.extend_elements(self.cell.elems().cloned());
        Ok(group)
    }
}
