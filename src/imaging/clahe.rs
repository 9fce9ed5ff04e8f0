//! Contrast-limited adaptive histogram equalization on a single 8-bit plane.
//!
//! The plane is split into a grid of tiles. Each tile gets its own
//! equalization lookup table built from a clipped histogram (the clipped
//! excess is spread back over all bins), and every output pixel blends the
//! tables of its four nearest tile centres bilinearly.
//!
//! When the plane does not divide evenly into tiles it is extended on the
//! right and bottom with reflect-101 borders before the histograms are
//! built; only the original area is written back.

use super::calculations::reflect_101;
use image::GrayImage;
use rayon::prelude::*;

const BINS: usize = 256;

/// Equalization parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClaheParams {
    /// Histogram clip limit, relative to a uniform distribution of the tile.
    pub clip_limit: f64,
    /// Tile grid as (columns, rows).
    pub tiles: (u32, u32),
}

impl Default for ClaheParams {
    fn default() -> Self {
        Self {
            clip_limit: 3.0,
            tiles: (8, 8),
        }
    }
}

/// Tile geometry for one plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Layout {
    width: usize,
    height: usize,
    tiles_x: usize,
    tiles_y: usize,
    tile_w: usize,
    tile_h: usize,
}

impl Layout {
    fn new(width: usize, height: usize, (tiles_x, tiles_y): (u32, u32)) -> Self {
        let tiles_x = tiles_x.max(1) as usize;
        let tiles_y = tiles_y.max(1) as usize;
        let (padded_w, padded_h) = if width % tiles_x == 0 && height % tiles_y == 0 {
            (width, height)
        } else {
            // Both axes are extended once either is uneven
            (
                width + tiles_x - width % tiles_x,
                height + tiles_y - height % tiles_y,
            )
        };
        Self {
            width,
            height,
            tiles_x,
            tiles_y,
            tile_w: padded_w / tiles_x,
            tile_h: padded_h / tiles_y,
        }
    }

    fn tile_area(&self) -> usize {
        self.tile_w * self.tile_h
    }
}

/// Equalize `plane` and return the result; dimensions are preserved.
pub fn equalize(plane: &GrayImage, params: &ClaheParams) -> GrayImage {
    let (width, height) = (plane.width() as usize, plane.height() as usize);
    if width == 0 || height == 0 {
        return plane.clone();
    }

    let layout = Layout::new(width, height, params.tiles);
    let clip = clip_limit(params.clip_limit, layout.tile_area());
    let src = plane.as_raw();

    let luts: Vec<[u8; BINS]> = (0..layout.tiles_x * layout.tiles_y)
        .into_par_iter()
        .map(|tile| {
            let (tx, ty) = (tile % layout.tiles_x, tile / layout.tiles_x);
            let mut hist = tile_histogram(src, &layout, tx, ty);
            if let Some(limit) = clip {
                clip_histogram(&mut hist, limit);
            }
            cumulative_lut(&hist, layout.tile_area())
        })
        .collect();

    let mut out = GrayImage::new(plane.width(), plane.height());
    let dst: &mut [u8] = &mut out;
    dst.par_chunks_exact_mut(width)
        .enumerate()
        .for_each(|(y, row)| interpolate_row(src, row, y, &layout, &luts));
    out
}

/// Absolute per-bin clip count, or `None` when clipping is disabled.
fn clip_limit(relative: f64, tile_area: usize) -> Option<u32> {
    if relative > 0.0 {
        Some(((relative * tile_area as f64 / BINS as f64) as u32).max(1))
    } else {
        None
    }
}

fn tile_histogram(src: &[u8], layout: &Layout, tx: usize, ty: usize) -> [u32; BINS] {
    let mut hist = [0u32; BINS];
    for py in ty * layout.tile_h..(ty + 1) * layout.tile_h {
        let row = reflect_101(py as i64, layout.height) * layout.width;
        for px in tx * layout.tile_w..(tx + 1) * layout.tile_w {
            let v = src[row + reflect_101(px as i64, layout.width)];
            hist[v as usize] += 1;
        }
    }
    hist
}

/// Cap every bin at `limit` and hand the excess back evenly; the remainder
/// goes one count at a time to bins spread across the range.
fn clip_histogram(hist: &mut [u32; BINS], limit: u32) {
    let mut clipped = 0u32;
    for bin in hist.iter_mut() {
        if *bin > limit {
            clipped += *bin - limit;
            *bin = limit;
        }
    }

    let batch = clipped / BINS as u32;
    let mut residual = clipped - batch * BINS as u32;
    for bin in hist.iter_mut() {
        *bin += batch;
    }

    if residual > 0 {
        let step = (BINS / residual as usize).max(1);
        for bin in hist.iter_mut().step_by(step) {
            if residual == 0 {
                break;
            }
            *bin += 1;
            residual -= 1;
        }
    }
}

fn cumulative_lut(hist: &[u32; BINS], tile_area: usize) -> [u8; BINS] {
    let scale = 255.0 / tile_area as f32;
    let mut lut = [0u8; BINS];
    let mut sum = 0u32;
    for (out, &count) in lut.iter_mut().zip(hist) {
        sum += count;
        *out = (sum as f32 * scale).round().clamp(0.0, 255.0) as u8;
    }
    lut
}

/// Neighbouring tile indices and the blend weight of the second one.
fn neighbours(pos: usize, tile_size: usize, tiles: usize) -> (usize, usize, f32) {
    let f = pos as f32 / tile_size as f32 - 0.5;
    let first = f.floor();
    let weight = f - first;
    let first = first as i64;
    let lo = first.max(0) as usize;
    let hi = ((first + 1).max(0) as usize).min(tiles - 1);
    (lo, hi, weight)
}

fn interpolate_row(src: &[u8], row: &mut [u8], y: usize, layout: &Layout, luts: &[[u8; BINS]]) {
    let (ty1, ty2, ya) = neighbours(y, layout.tile_h, layout.tiles_y);
    let lut = |tx: usize, ty: usize| &luts[ty * layout.tiles_x + tx];

    for (x, out) in row.iter_mut().enumerate() {
        let v = src[y * layout.width + x] as usize;
        let (tx1, tx2, xa) = neighbours(x, layout.tile_w, layout.tiles_x);

        let top = lut(tx1, ty1)[v] as f32 * (1.0 - xa) + lut(tx2, ty1)[v] as f32 * xa;
        let bottom = lut(tx1, ty2)[v] as f32 * (1.0 - xa) + lut(tx2, ty2)[v] as f32 * xa;
        let res = top * (1.0 - ya) + bottom * ya;
        *out = res.round().clamp(0.0, 255.0) as u8;
    }
}
