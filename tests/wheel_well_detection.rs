//! End-to-end tests on synthetic edge frames
//!
//! The car frame is a drawn side view with two wheel arches; the other frames
//! cover blank, tiny and line-free inputs.

mod common;

use common::synthetic_car::{
    ARCH_CENTERS, ARCH_RADIUS, ROCKER_Y, car_edge_frame, to_rgba, vertical_stripes_rgba,
};
use wheel_well::{
    ConfidenceLevel, DetectionOptions, DetectionWorkspace, EdgeMap, detect, detect_horizontal_lines,
    detect_semi_circles, detect_wheel_wells, detect_with_workspace,
};

const WIDTH: usize = 640;
const HEIGHT: usize = 480;

fn car_rgba() -> Vec<u8> {
    to_rgba(&car_edge_frame())
}

#[test]
fn test_horizontal_lines_on_car_frame() {
    let rgba = car_rgba();
    let edges = EdgeMap::from_rgba(&rgba, WIDTH, HEIGHT).unwrap();
    let lines = detect_horizontal_lines(&edges, &DetectionOptions::default());

    assert!(lines.len() >= 2, "expected several lines, got {:?}", lines);
    for pair in lines.windows(2) {
        assert!(pair[0].length >= pair[1].length);
    }
    for line in &lines {
        assert!(line.y as f32 > HEIGHT as f32 / 3.0);
        assert_eq!(line.length, line.end_x - line.start_x);
        assert!(line.start_x <= line.end_x);
    }
    // Ground line spans the whole frame
    assert_eq!(lines[0].y, 400);
    assert_eq!(lines[0].length, 639);
}

#[test]
fn test_min_line_length_option() {
    let rgba = car_rgba();
    let edges = EdgeMap::from_rgba(&rgba, WIDTH, HEIGHT).unwrap();
    let opts = DetectionOptions::default().with_min_line_length(100);
    let lines = detect_horizontal_lines(&edges, &opts);

    assert!(!lines.is_empty());
    assert!(lines.iter().all(|l| l.length >= 100));
}

#[test]
fn test_semi_circles_on_car_frame() {
    let rgba = car_rgba();
    let edges = EdgeMap::from_rgba(&rgba, WIDTH, HEIGHT).unwrap();

    let circles = detect_semi_circles(&edges, &DetectionOptions::default());
    assert!(!circles.is_empty());
    for c in &circles {
        assert!(c.score > 0.0 && c.score <= 1.0);
        assert!(c.radius >= 20.0 && c.radius <= 120.0);
    }

    let min_opts = DetectionOptions::default().with_min_radius(30.0);
    let circles = detect_semi_circles(&edges, &min_opts);
    assert!(!circles.is_empty());
    assert!(circles.iter().all(|c| c.radius >= 30.0));

    let max_opts = DetectionOptions::default().with_max_radius(80.0);
    let circles = detect_semi_circles(&edges, &max_opts);
    assert!(!circles.is_empty());
    assert!(circles.iter().all(|c| c.radius <= 80.0));
}

#[test]
fn test_wheel_wells_on_car_frame() {
    let rgba = car_rgba();
    let result = detect(&rgba, WIDTH, HEIGHT).unwrap();

    assert!(
        result.confidence > 0.5,
        "confidence too low: {:.3}",
        result.confidence
    );
    assert_ne!(result.confidence_level(), ConfidenceLevel::ProbablyNotATire);
    assert!(!result.horizontal_lines.is_empty());
    assert!(
        (1..=4).contains(&result.wheel_wells.len()),
        "unexpected wheel wells: {:?}",
        result.wheel_wells
    );

    for well in &result.wheel_wells {
        assert!((well.y - well.line_y as f32).abs() < well.radius * 1.5);
        assert!((0.0..=1.0).contains(&well.score));
    }
}

#[test]
fn test_wheel_well_spacing_is_realistic() {
    let rgba = car_rgba();
    let result = detect(&rgba, WIDTH, HEIGHT).unwrap();

    assert!(result.wheel_wells.len() >= 2);
    let mut sorted = result.wheel_wells.clone();
    sorted.sort_by(|a, b| a.x.total_cmp(&b.x));
    for pair in sorted.windows(2) {
        let spacing = pair[1].x - pair[0].x;
        assert!(spacing > 50.0, "wells too close: {:?}", pair);
        assert!(spacing < WIDTH as f32 * 0.8, "wells too far apart: {:?}", pair);
    }
}

#[test]
fn test_wheel_wells_land_on_drawn_arches() {
    let rgba = car_rgba();
    let result = detect(&rgba, WIDTH, HEIGHT).unwrap();
    assert_eq!(
        result.wheel_wells.len(),
        ARCH_CENTERS.len(),
        "{:?}",
        result.wheel_wells
    );

    for &(ax, ay) in &ARCH_CENTERS {
        let found = result.wheel_wells.iter().any(|w| {
            (w.x - ax).abs() <= 2.0
                && (w.y - ay).abs() <= 2.0
                && (w.radius - ARCH_RADIUS).abs() <= 3.0
                && w.line_y == ROCKER_Y
        });
        assert!(
            found,
            "no wheel well on the arch at ({}, {}): {:?}",
            ax, ay, result.wheel_wells
        );
    }
}

#[test]
fn test_tires_do_not_replace_arches() {
    let rgba = car_rgba();
    let edges = EdgeMap::from_rgba(&rgba, WIDTH, HEIGHT).unwrap();
    let circles = detect_semi_circles(&edges, &DetectionOptions::default());

    // The tires are concentric with the arches, 10px lower and 10px smaller
    for &(ax, ay) in &ARCH_CENTERS {
        let tire_like = circles.iter().any(|c| {
            (c.center_x - ax).abs() <= 3.0
                && (c.center_y - (ay + 10.0)).abs() <= 3.0
                && (c.radius - 40.0).abs() <= 3.0
        });
        assert!(!tire_like, "tire reported as an arc: {:?}", circles);
    }
}

#[test]
fn test_luma_and_rgba_agree() {
    let gray = car_edge_frame();
    let rgba = to_rgba(&gray);
    let opts = DetectionOptions::default();

    let from_luma = detect_wheel_wells(
        &EdgeMap::from_luma(gray.as_raw(), WIDTH, HEIGHT).unwrap(),
        &opts,
    );
    let from_rgba = detect_wheel_wells(
        &EdgeMap::from_rgba(&rgba, WIDTH, HEIGHT).unwrap(),
        &opts,
    );
    assert_eq!(from_luma, from_rgba);
}

#[test]
fn test_detection_is_idempotent() {
    let rgba = car_rgba();
    let first = detect(&rgba, WIDTH, HEIGHT).unwrap();
    let second = detect(&rgba, WIDTH, HEIGHT).unwrap();
    assert_eq!(first, second);

    let mut workspace = DetectionWorkspace::new();
    let edges = EdgeMap::from_rgba(&rgba, WIDTH, HEIGHT).unwrap();
    let pooled =
        detect_with_workspace(&edges, &DetectionOptions::default(), &mut workspace).unwrap();
    assert_eq!(first, pooled);
}

#[test]
fn test_empty_image() {
    let empty = vec![0u8; WIDTH * HEIGHT * 4];
    let result = detect(&empty, WIDTH, HEIGHT).unwrap();

    assert_eq!(result.confidence, 0.0);
    assert!(result.wheel_wells.is_empty());
}

#[test]
fn test_very_small_image() {
    let small = vec![0u8; 10 * 10 * 4];
    let result = detect(&small, 10, 10).unwrap();
    assert!(result.confidence.is_finite());
    assert_eq!(result.confidence, 0.0);

    let busy = vec![255u8; 10 * 10 * 4];
    let result = detect(&busy, 10, 10).unwrap();
    assert!((0.0..=1.0).contains(&result.confidence));
}

#[test]
fn test_no_horizontal_lines() {
    let stripes = vertical_stripes_rgba(WIDTH, HEIGHT, 10);
    let result = detect(&stripes, WIDTH, HEIGHT).unwrap();

    assert!(result.horizontal_lines.is_empty());
    assert!(result.confidence < 0.3);
}

#[test]
fn test_result_round_trips_as_json() {
    let rgba = car_rgba();
    let result = detect(&rgba, WIDTH, HEIGHT).unwrap();
    let json = serde_json::to_string(&result).unwrap();
    assert!(json.contains("\"wheelWells\""));
    assert!(json.contains("\"horizontalLines\""));
}

#[cfg(not(debug_assertions))]
#[test]
fn test_detection_time_budget() {
    let rgba = car_rgba();
    // Warm up the rayon pool before timing
    let _ = detect(&rgba, WIDTH, HEIGHT).unwrap();

    let start = std::time::Instant::now();
    let _ = detect(&rgba, WIDTH, HEIGHT).unwrap();
    let elapsed = start.elapsed();
    assert!(
        elapsed.as_millis() < 100,
        "detection took {:?} on a 640x480 frame",
        elapsed
    );
}
