// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the PlaneMapper struct, which describes a relationship
//! between a square grid on the integral plane with an origin at the
//! upper left, and a rectangle on the real plane centered on an
//! arbitrary point.  Integral rows grow downward, while the imaginary
//! axis grows upward, so the mapping flips the vertical axis.
use num::Complex;

/// Horizontal center of the default view.
pub const CENTER_X: f64 = 0.0;
/// Vertical center of the default view.
pub const CENTER_Y: f64 = 0.0;
/// Width of the default view on the real plane.
pub const WIDTH: f64 = 3.25;
/// Height of the default view on the real plane.
pub const HEIGHT: f64 = 3.25;

/// Describes the column, row of a cell in the grid.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub usize, pub usize);

/// Maps cells of a `size` x `size` grid onto a window of the complex
/// plane.
#[derive(Debug, Clone)]
pub struct PlaneMapper {
    /// The number of rows and columns of the integral grid.
    pub size: usize,
    /// The center of the window on the complex plane.
    pub center: Complex<f64>,
    // Width and height of the window on the complex plane.
    extent: (f64, f64),
}

impl PlaneMapper {
    /// Constructor.  Takes the grid size, the center of the window
    /// and its width and height.
    pub fn new(size: usize, center: Complex<f64>, width: f64, height: f64) -> Result<Self, String> {
        if size == 0 {
            return Err("The grid must contain at least one cell.".to_string());
        }
        if !(width > 0.0 && height > 0.0) {
            return Err("The complex window must have a positive width and height.".to_string());
        }
        Ok(PlaneMapper {
            size,
            center,
            extent: (width, height),
        })
    }

    /// The window used by the command line tool: 3.25 units wide and
    /// tall, centered on the origin.
    pub fn standard(size: usize) -> Result<Self, String> {
        PlaneMapper::new(size, Complex::new(CENTER_X, CENTER_Y), WIDTH, HEIGHT)
    }

    /// The total number of cells in the integral grid.
    pub fn len(&self) -> usize {
        self.size * self.size
    }

    /// Always false; a mapper can't be built over an empty grid.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Given a pixel on the integral grid, map it onto the window of
    /// the complex plane.
    pub fn pixel_to_point(&self, pixel: &Pixel) -> Complex<f64> {
        let (width, height) = self.extent;
        let size = self.size as f64;
        Complex::new(
            width / size * (pixel.0 as f64) + self.center.re - width / 2.0,
            -height / size * (pixel.1 as f64) + self.center.im + height / 2.0,
        )
    }
}
