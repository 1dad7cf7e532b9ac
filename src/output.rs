// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Writes a finished render to disk as a square RGB image.  Files
//! ending in `.ppm` or `.pnm` are written as binary pixmaps; everything
//! else is written as PNG.

use std::fs::File;
use std::path::Path;

use image::png::PNGEncoder;
use image::pnm::PNMEncoder;
use image::pnm::{PNMSubtype, SampleEncoding};
use image::ColorType;

use crate::engine::Render;
use crate::errors::JuliaError;

/// The file the command line tool writes when not told otherwise.
pub const DEFAULT_OUTPUT: &str = "julia.png";

fn is_pixmap(path: &Path) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => ext.eq_ignore_ascii_case("ppm") || ext.eq_ignore_ascii_case("pnm"),
        None => false,
    }
}

/// Encodes `render` into `path`, choosing the format by extension.
pub fn write_image(path: &Path, render: &Render) -> Result<(), JuliaError> {
    let failed = |reason: String| JuliaError::Output {
        path: path.display().to_string(),
        reason,
    };
    let output = File::create(path).map_err(|e| failed(e.to_string()))?;
    let pixels = render.to_rgb_bytes();
    let side = render.size as u32;
    if is_pixmap(path) {
        let mut encoder =
            PNMEncoder::new(output).with_subtype(PNMSubtype::Pixmap(SampleEncoding::Binary));
        encoder
            .encode(&pixels[..], side, side, ColorType::RGB(8))
            .map_err(|e| failed(e.to_string()))
    } else {
        PNGEncoder::new(output)
            .encode(&pixels, side, side, ColorType::RGB(8))
            .map_err(|e| failed(e.to_string()))
    }
}
