use image::{GrayImage, Luma};
use std::f32::consts::PI;

const EDGE: Luma<u8> = Luma([255]);

/// Where the synthetic car's wheel arches were drawn
pub const ARCH_CENTERS: [(f32, f32); 2] = [(160.0, 340.0), (480.0, 340.0)];
/// Radius of both drawn arches
pub const ARCH_RADIUS: f32 = 50.0;
/// Row of the rocker line the arches rest on
pub const ROCKER_Y: i32 = 340;

fn put(img: &mut GrayImage, x: i32, y: i32) {
    if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
        img.put_pixel(x as u32, y as u32, EDGE);
    }
}

fn hline(img: &mut GrayImage, y: i32, x0: i32, x1: i32) {
    for x in x0..=x1 {
        put(img, x, y);
    }
}

fn vline(img: &mut GrayImage, x: i32, y0: i32, y1: i32) {
    for y in y0..=y1 {
        put(img, x, y);
    }
}

/// Arc from `theta0` to `theta1` (radians, y pointing up on screen)
fn arc(img: &mut GrayImage, cx: f32, cy: f32, r: f32, theta0: f32, theta1: f32) {
    let steps = (r * 16.0) as usize;
    for i in 0..=steps {
        let t = theta0 + (theta1 - theta0) * i as f32 / steps as f32;
        put(
            img,
            (cx + r * t.cos()).round() as i32,
            (cy - r * t.sin()).round() as i32,
        );
    }
}

/// Sparse deterministic speckle noise (simple LCG)
fn speckle(img: &mut GrayImage, count: usize, seed: u64) {
    let mut state = seed;
    let (w, h) = (img.width() as u64, img.height() as u64);
    for _ in 0..count {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let x = (state >> 33) % w;
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let y = (state >> 33) % h;
        img.put_pixel(x as u32, y as u32, EDGE);
    }
}

/// Edge map of a side-view car, 640x480 single channel.
///
/// Body outline with two wheel-arch cutouts interrupting the rocker line at
/// y=340, tires and hubcaps inside the arches, a ground line, and light noise.
pub fn car_edge_frame() -> GrayImage {
    let mut img = GrayImage::new(640, 480);

    // Roof and windows (upper third, ignored by the search band)
    hline(&mut img, 60, 240, 410);
    arc(&mut img, 325.0, 150.0, 100.0, 0.3, PI - 0.3);
    vline(&mut img, 325, 60, 150);

    // Belt line and bumpers
    hline(&mut img, 200, 60, 580);
    vline(&mut img, 40, 230, 340);
    vline(&mut img, 600, 230, 340);
    hline(&mut img, 230, 40, 60);
    hline(&mut img, 230, 580, 600);

    // Door seams
    vline(&mut img, 250, 205, 335);
    vline(&mut img, 400, 205, 335);

    // Rocker line broken by the wheel arches
    let r = ARCH_RADIUS as i32;
    let (front_x, _) = ARCH_CENTERS[0];
    let (rear_x, _) = ARCH_CENTERS[1];
    hline(&mut img, ROCKER_Y, 40, front_x as i32 - r);
    hline(&mut img, ROCKER_Y, front_x as i32 + r, rear_x as i32 - r);
    hline(&mut img, ROCKER_Y, rear_x as i32 + r, 600);

    for &(cx, cy) in &ARCH_CENTERS {
        arc(&mut img, cx, cy, ARCH_RADIUS, 0.0, PI);
        // Tire and hubcap
        arc(&mut img, cx, cy + 10.0, 40.0, 0.0, 2.0 * PI);
        arc(&mut img, cx, cy + 10.0, 14.0, 0.0, 2.0 * PI);
    }

    // Ground
    hline(&mut img, 400, 0, 639);

    speckle(&mut img, 600, 0x5eed);
    img
}

/// Expand a single-channel frame to RGBA the way a canvas readback would
pub fn to_rgba(gray: &GrayImage) -> Vec<u8> {
    gray.pixels()
        .flat_map(|p| {
            let v = p.0[0];
            [v, v, v, 255]
        })
        .collect()
}

/// Full-height vertical edge stripes every `spacing` pixels, RGBA
pub fn vertical_stripes_rgba(width: usize, height: usize, spacing: usize) -> Vec<u8> {
    let mut data = vec![0u8; width * height * 4];
    for x in (0..width).step_by(spacing) {
        for y in 0..height {
            let idx = (y * width + x) * 4;
            data[idx..idx + 4].copy_from_slice(&[255, 255, 255, 255]);
        }
    }
    data
}
