// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The per-cell coloring function.
//!
//! A point `z` on the complex plane belongs to the filled Julia set of
//! `c` if repeatedly applying `z = z * z + c` never carries it away
//! from the origin.  We iterate at most `MAX_ITERATIONS` times, and
//! while doing so accumulate `exp(-|z|)`; points that escape are
//! colored by turning that accumulated value into a hue.  Points that
//! never escape are black.
//!
//! Colors are packed, opaque `0xAARRGGBB` values.

use num::Complex;

use crate::planes::{Pixel, PlaneMapper};

/// Iterations before a point is declared a member of the set.
pub const MAX_ITERATIONS: u32 = 100;

/// Distance from the origin beyond which a point has escaped.
pub const THRESHOLD: f64 = 2.0;

/// Opaque black, the color of members of the set.
pub const BLACK: u32 = 0xff00_0000;

/// Anything that can color a cell of the grid.  Implementations must be
/// pure: the engine calls them from many threads at once and in no
/// particular order, and expects the same answer for the same cell no
/// matter which worker asks.
pub trait Kernel: Sync {
    /// The color of the cell at `row`, `column`.
    fn color(&self, row: usize, column: usize) -> u32;
}

impl<F> Kernel for F
where
    F: Fn(usize, usize) -> u32 + Sync,
{
    fn color(&self, row: usize, column: usize) -> u32 {
        self(row, column)
    }
}

/// Colors the cells of a grid by the Julia set of `c`.
#[derive(Debug, Clone)]
pub struct JuliaKernel {
    plane: PlaneMapper,
    c: Complex<f64>,
}

impl JuliaKernel {
    /// Takes the plane the grid is mapped onto and the Julia constant
    /// `c = a + bi`.
    pub fn new(plane: PlaneMapper, c: Complex<f64>) -> Self {
        JuliaKernel { plane, c }
    }
}

impl Kernel for JuliaKernel {
    fn color(&self, row: usize, column: usize) -> u32 {
        julia_color(self.plane.pixel_to_point(&Pixel(column, row)), self.c)
    }
}

/// The color of `point` under the Julia map for `c`.
pub fn julia_color(point: Complex<f64>, c: Complex<f64>) -> u32 {
    let (mut x, mut y) = (point.re, point.im);
    let mut accumulated: f32 = 0.0;
    let mut distance = (x * x + y * y).sqrt();
    let mut i = 0;

    while distance < THRESHOLD && i < MAX_ITERATIONS {
        i += 1;
        let next_x = x * x - y * y + c.re;
        y = 2.0 * x * y + c.im;
        x = next_x;
        distance = (x * x + y * y).sqrt();
        accumulated = (f64::from(accumulated) + (-distance).exp()) as f32;
    }

    if distance < THRESHOLD {
        return BLACK;
    }
    // The hue is allowed to run past 1.0; hsb_to_rgb wraps it.
    let hue = 0.5 + 10.0 * accumulated / MAX_ITERATIONS as f32;
    hsb_to_rgb(hue, 1.0, 1.0)
}

/// Converts a hue, saturation, brightness triple into a packed opaque
/// RGB value.  Only the fractional part of the hue is used.  The
/// arithmetic is single precision throughout so that images are
/// reproducible bit for bit.
pub fn hsb_to_rgb(hue: f32, saturation: f32, brightness: f32) -> u32 {
    let channel = |v: f32| (v * 255.0 + 0.5) as u32;
    let (r, g, b) = if saturation == 0.0 {
        let v = channel(brightness);
        (v, v, v)
    } else {
        let h = (hue - hue.floor()) * 6.0;
        let f = h - h.floor();
        let p = brightness * (1.0 - saturation);
        let q = brightness * (1.0 - saturation * f);
        let t = brightness * (1.0 - saturation * (1.0 - f));
        match h as u32 {
            0 => (channel(brightness), channel(t), channel(p)),
            1 => (channel(q), channel(brightness), channel(p)),
            2 => (channel(p), channel(brightness), channel(t)),
            3 => (channel(p), channel(q), channel(brightness)),
            4 => (channel(t), channel(p), channel(brightness)),
            5 => (channel(brightness), channel(p), channel(q)),
            // (hue - floor(hue)) * 6 can round up to exactly 6.
            _ => (0, 0, 0),
        }
    };
    BLACK | (r << 16) | (g << 8) | b
}
