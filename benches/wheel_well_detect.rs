use criterion::{Criterion, black_box, criterion_group, criterion_main};
use wheel_well::{
    DetectionOptions, DetectionWorkspace, EdgeMap, detect, detect_horizontal_lines,
    detect_semi_circles, detect_with_workspace,
};

#[allow(dead_code)]
#[path = "../tests/common/synthetic_car.rs"]
mod synthetic_car;

fn bench_detect_blank(c: &mut Criterion) {
    let image = vec![0u8; 640 * 480 * 4];
    c.bench_function("detect_640x480_blank", |b| {
        b.iter(|| detect(black_box(&image), black_box(640), black_box(480)))
    });
}

fn bench_detect_car(c: &mut Criterion) {
    let image = synthetic_car::to_rgba(&synthetic_car::car_edge_frame());
    c.bench_function("detect_640x480_car", |b| {
        b.iter(|| detect(black_box(&image), black_box(640), black_box(480)))
    });
}

fn bench_detect_car_with_workspace(c: &mut Criterion) {
    let image = synthetic_car::to_rgba(&synthetic_car::car_edge_frame());
    let edges = EdgeMap::from_rgba(&image, 640, 480).unwrap();
    let options = DetectionOptions::default();
    let mut workspace = DetectionWorkspace::with_capacity(640, 480);
    c.bench_function("detect_640x480_car_with_workspace", |b| {
        b.iter(|| detect_with_workspace(black_box(&edges), &options, black_box(&mut workspace)))
    });
}

fn bench_stages(c: &mut Criterion) {
    let image = synthetic_car::to_rgba(&synthetic_car::car_edge_frame());
    let edges = EdgeMap::from_rgba(&image, 640, 480).unwrap();
    let options = DetectionOptions::default();

    let mut group = c.benchmark_group("stages_640x480_car");
    group.bench_function("horizontal_lines", |b| {
        b.iter(|| detect_horizontal_lines(black_box(&edges), &options))
    });
    group.bench_function("semi_circles", |b| {
        b.iter(|| detect_semi_circles(black_box(&edges), &options))
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_detect_blank,
    bench_detect_car,
    bench_detect_car_with_workspace,
    bench_stages
);
criterion_main!(benches);
