//! End-to-end composition tests: parts chained through ports and waveguides
//! into a registered design.

use std::f64::consts::{FRAC_PI_2, PI};

use float_eq::assert_float_eq;

use crate::design::Design;
use crate::error::ErrorSource;
use crate::layout::port::Port;
use crate::layout::routing::Waveguide;
use crate::layout::validation::check_coupler_alignment;
use crate::parts::coupler::{GratingCoupler, GratingCouplerParams};
use crate::parts::mzi::MziParamsBuilder;
use crate::parts::resonator::{RingResonator, RingResonatorParamsBuilder};
use crate::parts::spiral::{Spiral, SpiralParamsBuilder};
use crate::parts::Mzi;
use crate::tech::Tech;

#[test]
fn grating_loopback_lands_on_the_fiber_pitch() {
    let mut design = Design::new("loopback", Tech::default());
    let tech = design.tech().clone();
    let params = GratingCouplerParams::default();

    let left = GratingCoupler::create(&mut design, (0.0, 0.0), &params).unwrap();

    // Route up, across, and back down so the second coupler lands one
    // fiber pitch away on the same y-line.
    let mut wg = Waveguide::make_at_port(left.port());
    wg.add_straight(100.0)
        .unwrap()
        .add_bend(-FRAC_PI_2, tech.bend_radius)
        .unwrap()
        .add_straight(tech.grating_pitch - 2.0 * tech.bend_radius)
        .unwrap()
        .add_bend(-FRAC_PI_2, tech.bend_radius)
        .unwrap()
        .add_straight(100.0)
        .unwrap();

    let right = GratingCoupler::create_at_port(&mut design, wg.current_port(), &params).unwrap();
    assert!(right
        .port()
        .origin()
        .approx_eq(picgeom::Point::new(127.0, 0.0), 1e-9));

    let wg_layer = tech.waveguide_layer;
    design.top_mut().add_to_layer(wg_layer, &wg).unwrap();
    design.top_mut().add_cell(left.cell().clone()).unwrap();
    design.top_mut().add_cell(right.cell().clone()).unwrap();

    let out = check_coupler_alignment(&left.port(), &right.port(), tech.grating_pitch);
    assert!(!out.has_warnings());
    assert_float_eq!(out.data().y_diff, 0.0, abs <= 0.0);
    assert_eq!(design.top().cells().count(), 2);
}

#[test]
fn misaligned_loopback_reports_correctable_deltas() {
    let mut design = Design::new("misaligned", Tech::default());
    let params = GratingCouplerParams::default();
    let a = GratingCoupler::create(&mut design, (0.0, 0.0), &params).unwrap();
    let b = GratingCoupler::create(&mut design, (127.0, 1.0), &params).unwrap();

    let out = check_coupler_alignment(&a.port(), &b.port(), 127.0);
    assert!(out.has_warnings());
    // Deltas are first-minus-second: adding them to the second coupler
    // moves it back onto the first coupler's y-line.
    let corrected = picgeom::Point::new(b.port().x(), b.port().y() + out.data().y_diff);
    assert!(corrected.approx_eq(picgeom::Point::new(127.0, 0.0), 1e-9));
}

#[test]
fn spiral_and_resonator_chain_preserves_continuity() {
    let tech = Tech::default();
    let anchor = Port::new((0.0, -1000.0), 0.0, 0.5).unwrap();

    let spiral = Spiral::make_at_port(
        anchor,
        &SpiralParamsBuilder::default()
            .num(5u32)
            .gap(10.0)
            .inner_gap(50.0)
            .build()
            .unwrap(),
    )
    .unwrap();

    let mut wg = Waveguide::make_at_port(spiral.out_port());
    wg.add_straight(100.0)
        .unwrap()
        .add_bend(FRAC_PI_2, tech.bend_radius)
        .unwrap();

    let ring = RingResonator::make_at_port(
        wg.current_port(),
        &RingResonatorParamsBuilder::default()
            .gap(1.0)
            .radius(50.0)
            .build()
            .unwrap(),
    )
    .unwrap();

    // The resonator passes the bus through untouched.
    assert_eq!(ring.out_port(), wg.current_port());
    // The whole chain hangs off the spiral's far side.
    assert!(wg
        .in_port()
        .origin()
        .approx_eq(picgeom::Point::new(200.0, -1000.0), 1e-9));
    assert_float_eq!(wg.in_port().angle(), PI, abs <= 1e-12);
}

#[test]
fn mzi_between_two_waveguides_routes_end_to_end() {
    let tech = Tech::default();
    let mut wg_in = Waveguide::make_at_port(Port::new((3500.0, -500.0), FRAC_PI_2, 0.5).unwrap());
    wg_in
        .add_bend(-FRAC_PI_2, tech.bend_radius)
        .unwrap()
        .add_straight(71.5)
        .unwrap();

    let mzi = Mzi::make_at_port(
        wg_in.current_port(),
        &MziParamsBuilder::default()
            .splitter_length(33.0)
            .splitter_width(7.0)
            .bend_radius(30.0)
            .upper_vertical_length(10.0)
            .lower_vertical_length(10.0)
            .horizontal_length(25.0)
            .build()
            .unwrap(),
    )
    .unwrap();

    let mut wg_out = Waveguide::make_at_port(mzi.out_port());
    wg_out
        .add_straight(71.5)
        .unwrap()
        .add_bend(-FRAC_PI_2, tech.bend_radius)
        .unwrap();

    // in-bend lands heading east at (3510, -490); the device spans 211.
    let expected_x = 3510.0 + 71.5 + 211.0 + 71.5 + tech.bend_radius;
    let end = wg_out.current_port();
    assert!(end
        .origin()
        .approx_eq(picgeom::Point::new(expected_x, -490.0 - tech.bend_radius), 1e-9));
    assert_float_eq!(end.angle(), -FRAC_PI_2, abs <= 1e-12);
}

#[test]
fn anchoring_a_part_seals_the_feeding_path() {
    let mut design = Design::new("sealed", Tech::default());
    let params = GratingCouplerParams::default();
    let start = GratingCoupler::create(&mut design, (0.0, 0.0), &params).unwrap();

    let mut wg = Waveguide::make_at_port(start.port());
    wg.add_straight(50.0).unwrap();
    let end = wg.seal();
    let _terminal = GratingCoupler::create_at_port(&mut design, end, &params).unwrap();

    let err = wg.add_straight(1.0).unwrap_err();
    assert!(matches!(err.source(), ErrorSource::PathSealed));
}

#[test]
fn duplicate_registration_is_caught() {
    let mut design = Design::new("dups", Tech::default());
    let params = GratingCouplerParams::default();
    let coupler = GratingCoupler::create(&mut design, (0.0, 0.0), &params).unwrap();

    design.top_mut().add_cell(coupler.cell().clone()).unwrap();
    let err = design.top_mut().add_cell(coupler.into_cell()).unwrap_err();
    assert!(matches!(err.source(), ErrorSource::DuplicateName(_)));
}
