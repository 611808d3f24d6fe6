use tfkit_core::{
    ColorControlPoint, OpacityControlPoint, OpacityCurve, PlotTransform, Range, RangeController,
    RangeHandle, TransferFunction, TransferFunctionError, remap, remap_in_place, reverse,
    set_transparency,
};

const EPSILON: f64 = 1e-9;

fn blue_to_red() -> TransferFunction {
    let mut ctf = TransferFunction::new();
    ctf.add_rgb_point(0.0, 0.0, 0.0, 1.0);
    ctf.add_rgb_point(255.0, 1.0, 0.0, 0.0);
    ctf
}

/// Irregularly spaced five-point curve with shaped segments and opacity.
fn sample_curve() -> TransferFunction {
    TransferFunction::from_points(vec![
        ColorControlPoint::new(-20.0, [0.0, 0.0, 0.0]),
        ColorControlPoint::new(-5.0, [0.2, 0.1, 0.9]).with_shape(0.3, 0.4),
        ColorControlPoint::new(12.5, [0.5, 0.5, 0.5]),
        ColorControlPoint::new(40.0, [0.9, 0.6, 0.1]).with_shape(0.7, 1.0),
        ColorControlPoint::new(80.0, [1.0, 1.0, 1.0]),
    ])
    .with_opacity(OpacityCurve::from_points(vec![
        OpacityControlPoint::new(-20.0, 0.1),
        OpacityControlPoint::new(30.0, 0.4),
        OpacityControlPoint::new(80.0, 0.8),
    ]))
}

fn positions(ctf: &TransferFunction) -> Vec<f64> {
    ctf.points().iter().map(|p| p.position).collect()
}

fn opacities(ctf: &TransferFunction) -> Vec<f64> {
    ctf.opacity()
        .map(|o| o.points().iter().map(|p| p.opacity).collect())
        .unwrap_or_default()
}

fn assert_close_all(actual: &[f64], expected: &[f64], tol: f64) {
    assert_eq!(actual.len(), expected.len());
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        let diff = (a - e).abs();
        assert!(
            diff <= tol,
            "index {i} mismatch: got {a}, expected {e}, diff {diff} > {tol}"
        );
    }
}

#[test]
fn remap_preserves_point_count() {
    for (a, b) in [(0.0, 1.0), (-3.0, 3.0), (10.0, -10.0), (5.0, 5.0)] {
        let mut src = sample_curve();
        let mut dst = TransferFunction::new();
        let source_range = src.range();
        remap(&mut src, &mut dst, source_range, a, b).unwrap();
        assert_eq!(dst.size(), src.size(), "target [{a}, {b}]");
        assert_eq!(
            dst.opacity().map(OpacityCurve::size),
            src.opacity().map(OpacityCurve::size)
        );
    }
}

#[test]
fn remap_preserves_normalized_positions() {
    let mut src = sample_curve();
    let mut dst = TransferFunction::new();
    let source_range = src.range();
    let (a, b) = (-1.0, 4.0);
    remap(&mut src, &mut dst, source_range, a, b).unwrap();

    for (before, after) in src.points().iter().zip(dst.points()) {
        let expected = source_range.normalize(before.position).unwrap();
        let actual = (after.position - a) / (b - a);
        assert!((expected - actual).abs() < EPSILON);
        assert_eq!(before.color, after.color);
        assert_eq!(before.midpoint, after.midpoint);
        assert_eq!(before.sharpness, after.sharpness);
    }
}

#[test]
fn remap_in_place_round_trip_restores_positions() {
    let mut ctf = sample_curve();
    let original = positions(&ctf);
    let original_opacity: Vec<f64> = ctf
        .opacity()
        .unwrap()
        .points()
        .iter()
        .map(|p| p.position)
        .collect();
    let Range { min, max } = ctf.range();

    remap_in_place(&mut ctf, 0.25, 0.75).unwrap();
    remap_in_place(&mut ctf, min, max).unwrap();

    assert_close_all(&positions(&ctf), &original, 1e-9);
    let restored_opacity: Vec<f64> = ctf
        .opacity()
        .unwrap()
        .points()
        .iter()
        .map(|p| p.position)
        .collect();
    assert_close_all(&restored_opacity, &original_opacity, 1e-9);
}

#[test]
fn remap_concrete_unit_interval() {
    let mut src = blue_to_red();
    let mut dst = TransferFunction::new();
    remap(&mut src, &mut dst, Range::new(0.0, 255.0), 0.0, 1.0).unwrap();
    assert_eq!(dst.points()[0].position, 0.0);
    assert_eq!(dst.points()[1].position, 1.0);
    assert_eq!(dst.points()[0].color, [0.0, 0.0, 1.0]);
    assert_eq!(dst.points()[1].color, [1.0, 0.0, 0.0]);
}

#[test]
fn remap_degenerate_source_range_is_an_error() {
    let mut src = blue_to_red();
    let mut dst = TransferFunction::new();
    let err = remap(&mut src, &mut dst, Range::new(255.0, 255.0), 0.0, 1.0).unwrap_err();
    assert!(matches!(
        err,
        TransferFunctionError::DegenerateRange { lo, hi } if lo == 255.0 && hi == 255.0
    ));
    assert!(dst.is_empty());
}

#[test]
fn remap_inverted_target_keeps_index_order() {
    let mut src = blue_to_red();
    let mut dst = TransferFunction::new();
    remap(&mut src, &mut dst, Range::new(0.0, 255.0), 1.0, 0.0).unwrap();
    // Index order is kept, so positions descend.
    assert_eq!(positions(&dst), vec![1.0, 0.0]);
    assert_eq!(dst.range(), Range::new(0.0, 1.0));
    // As a function of position the colors are mirrored.
    assert_eq!(dst.map_value(0.0)[0], 1.0);
    assert_eq!(dst.map_value(1.0)[2], 1.0);
}

#[test]
fn reverse_is_an_involution() {
    let mut ctf = sample_curve();
    let original = positions(&ctf);
    reverse(&mut ctf);
    reverse(&mut ctf);
    assert_eq!(positions(&ctf), original);
}

#[test]
fn reverse_swaps_positions_but_not_colors() {
    let original = sample_curve();
    let mut ctf = original.clone();
    reverse(&mut ctf);
    let n = ctf.size();
    for i in 0..n {
        assert_eq!(ctf.points()[i].color, original.points()[i].color);
        assert_eq!(ctf.points()[i].position, original.points()[n - 1 - i].position);
    }
}

#[test]
fn reverse_concrete_two_points() {
    let mut ctf = blue_to_red();
    reverse(&mut ctf);
    assert_eq!(ctf.points()[0].position, 255.0);
    assert_eq!(ctf.points()[0].color, [0.0, 0.0, 1.0]);
    assert_eq!(ctf.points()[1].position, 0.0);
    assert_eq!(ctf.points()[1].color, [1.0, 0.0, 0.0]);
}

#[test]
fn reverse_empty_and_single_point_are_unchanged() {
    let mut empty = TransferFunction::new();
    reverse(&mut empty);
    assert!(empty.is_empty());

    let mut single = TransferFunction::new();
    single.add_rgb_point(7.0, 0.1, 0.2, 0.3);
    reverse(&mut single);
    assert_eq!(single.points()[0], ColorControlPoint::new(7.0, [0.1, 0.2, 0.3]));
}

#[test]
fn transparency_result_is_always_clamped() {
    for factor in [0.0, 1e-9, 0.3, 1.0, 1.7, 50.0, f64::MAX] {
        let mut ctf = sample_curve();
        set_transparency(&mut ctf, factor);
        for a in opacities(&ctf) {
            assert!((1e-6..=1.0).contains(&a), "factor {factor}: opacity {a}");
        }
    }
}

#[test]
fn transparency_concrete_zero_factor() {
    let mut ctf = blue_to_red().with_opacity(OpacityCurve::ramp(0.0, 1.0, 1.0, 0.5));
    set_transparency(&mut ctf, 0.0);
    let points = ctf.opacity().unwrap().points().to_vec();
    assert_eq!(points[0].position, 0.0);
    assert_eq!(points[0].opacity, 1e-6);
    assert_eq!(points[1].position, 1.0);
    assert_eq!(points[1].opacity, 1e-6);
}

#[test]
fn transparency_composes_when_unclamped() {
    let mut twice = sample_curve();
    set_transparency(&mut twice, 0.5);
    set_transparency(&mut twice, 0.8);

    let mut once = sample_curve();
    set_transparency(&mut once, 0.5 * 0.8);

    assert_close_all(&opacities(&twice), &opacities(&once), 1e-12);
}

#[test]
fn transparency_diverges_once_clamped() {
    // 0.8 × 2.0 hits the ceiling, so halving afterwards gives 0.5, not 0.8.
    let mut twice = sample_curve();
    set_transparency(&mut twice, 2.0);
    set_transparency(&mut twice, 0.5);

    let mut once = sample_curve();
    set_transparency(&mut once, 2.0 * 0.5);

    let last_twice = *opacities(&twice).last().unwrap();
    let last_once = *opacities(&once).last().unwrap();
    assert!((last_twice - 0.5).abs() < EPSILON);
    assert!((last_once - 0.8).abs() < EPSILON);
}

#[test]
fn drag_protocol_retimes_curve_to_window() {
    let mut ctf = blue_to_red().with_opacity(OpacityCurve::ramp(0.0, 0.0, 255.0, 1.0));
    let mut controller = RangeController::default();
    controller.attach_function(Some(&ctf));
    let transform = PlotTransform::new(controller.data_range(), 0.0, 255.0).unwrap();

    assert_eq!(controller.press(254.0, &transform), RangeHandle::Max);
    controller.drag_to(200.0, &transform, Some(&mut ctf)).unwrap();
    controller.release();

    assert_eq!(controller.current_range(), Range::new(0.0, 200.0));
    assert_close_all(&positions(&ctf), &[0.0, 200.0], EPSILON);
    let opacity_positions: Vec<f64> = ctf
        .opacity()
        .unwrap()
        .points()
        .iter()
        .map(|p| p.position)
        .collect();
    assert_close_all(&opacity_positions, &[0.0, 200.0], EPSILON);
    assert!(!ctf.is_stale());
    assert_eq!(controller.moving(), RangeHandle::None);
}
