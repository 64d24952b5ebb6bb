use crate::error::DetectResult;
use crate::models::{DetectionResult, EdgeMap, HorizontalLine, PixelLayout, WheelWell};
use crate::utils::binarization::edge_mask;
use image::imageops::FilterType;
use image::{GenericImageView, Rgb, RgbImage};
use std::env;
use std::path::Path;

fn max_dim_from_env() -> Option<u32> {
    match env::var("WW_MAX_DIM") {
        Ok(value) => match value.trim().parse::<u32>() {
            Ok(0) => None,
            Ok(v) => Some(v),
            Err(_) => None,
        },
        Err(_) => None,
    }
}

/// Load an edge-map image as single-channel bytes along with its dimensions.
///
/// Color images are converted to luma. When `WW_MAX_DIM` is set, larger
/// images are downscaled (nearest neighbour, so edges stay binary).
pub fn load_edge_luma<P: AsRef<Path>>(path: P) -> DetectResult<(Vec<u8>, usize, usize)> {
    let img = image::open(path)?;
    let luma = match max_dim_from_env() {
        Some(max_dim) if img.dimensions().0.max(img.dimensions().1) > max_dim => {
            img.resize(max_dim, max_dim, FilterType::Nearest).to_luma8()
        }
        _ => img.to_luma8(),
    };
    let (width, height) = luma.dimensions();
    Ok((luma.into_raw(), width as usize, height as usize))
}

/// Summary statistics for an edge map.
#[derive(Debug, Clone, Copy)]
pub struct EdgeStats {
    /// Layout of the source buffer.
    pub layout: PixelLayout,
    /// Count of edge pixels.
    pub edge_pixels: usize,
    /// Total pixels in the map.
    pub total_pixels: usize,
    /// Ratio of edge pixels to total pixels.
    pub edge_ratio: f64,
}

/// Count edge pixels at the given threshold.
pub fn edge_stats(edges: &EdgeMap<'_>, threshold: u8) -> EdgeStats {
    let edge_pixels = edges.edge_count(threshold);
    let total = edges.width() * edges.height();
    let ratio = if total == 0 {
        0.0
    } else {
        edge_pixels as f64 / total as f64
    };
    EdgeStats {
        layout: edges.layout(),
        edge_pixels,
        total_pixels: total,
        edge_ratio: ratio,
    }
}

const LINE_COLOR: Rgb<u8> = Rgb([0, 160, 255]);
const ARC_COLOR: Rgb<u8> = Rgb([255, 64, 64]);
const CENTER_COLOR: Rgb<u8> = Rgb([255, 220, 0]);

/// Render the edge map with lines and wheel wells drawn on top.
pub fn render_overlay(edges: &EdgeMap<'_>, threshold: u8, result: &DetectionResult) -> RgbImage {
    let width = edges.width() as u32;
    let height = edges.height() as u32;
    let mask = edge_mask(edges, threshold);
    let mut canvas = RgbImage::from_fn(width, height, |x, y| {
        if mask.get(x as usize, y as usize) {
            Rgb([110, 110, 110])
        } else {
            Rgb([0, 0, 0])
        }
    });

    for line in &result.horizontal_lines {
        draw_line(&mut canvas, line);
    }
    for well in &result.wheel_wells {
        draw_well(&mut canvas, well);
    }
    canvas
}

fn put(canvas: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < canvas.width() && (y as u32) < canvas.height() {
        canvas.put_pixel(x as u32, y as u32, color);
    }
}

fn draw_line(canvas: &mut RgbImage, line: &HorizontalLine) {
    for x in line.start_x..=line.end_x {
        put(canvas, x as i64, line.y as i64, LINE_COLOR);
    }
}

fn draw_well(canvas: &mut RgbImage, well: &WheelWell) {
    let steps = (well.radius * 8.0).max(16.0) as usize;
    let center = well.center();
    for i in 0..=steps {
        let p = center.on_upper_arc(well.radius, std::f32::consts::PI * i as f32 / steps as f32);
        put(canvas, p.x.round() as i64, p.y.round() as i64, ARC_COLOR);
    }
    for d in -3i64..=3 {
        put(canvas, center.x as i64 + d, center.y as i64, CENTER_COLOR);
        put(canvas, center.x as i64, center.y as i64 + d, CENTER_COLOR);
    }
}
