#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Julia set renderer
//!
//! A Julia set is the set of points on the complex plane that stay
//! bounded when repeatedly squared and offset by a fixed constant `c`.
//! Each pixel of the image is colored independently of every other, by
//! how quickly (if ever) its point runs away from the origin.
//!
//! Since no pixel depends on any other, the grid can be split among
//! worker threads any way we like.  This crate offers six ways to do
//! it, three fixed ahead of time and three where the workers claim
//! work as they go, and guarantees that every one of them computes each
//! pixel exactly once and produces the same image.

extern crate crossbeam;
#[macro_use]
extern crate failure;
extern crate image;
extern crate itertools;
#[macro_use]
extern crate log;
extern crate num;
extern crate num_cpus;

pub mod config;
pub mod engine;
pub mod errors;
pub mod grid;
pub mod kernel;
pub mod output;
pub mod partition;
pub mod planes;

pub use config::RunConfig;
pub use engine::{Engine, Render};
pub use errors::JuliaError;
pub use kernel::{JuliaKernel, Kernel};
pub use partition::Partition;

use planes::PlaneMapper;

/// Renders the Julia set described by `config` over the standard
/// window, centered on the origin.
pub fn render(config: &RunConfig) -> Result<Render, JuliaError> {
    let plane = PlaneMapper::standard(config.size).map_err(|_| {
        JuliaError::out_of_range("size", config.size, config::MIN_SIZE, config::MAX_SIZE)
    })?;
    let kernel = JuliaKernel::new(plane, config.c());
    let engine = Engine::new(config.threads, config.partition)?;
    info!(
        "Running with {} threads on {} CPU cores.",
        config.threads,
        num_cpus::get()
    );
    let render = engine.run(config.size, &kernel)?;
    info!("Drawing took {} seconds", render.elapsed.as_secs_f64());
    Ok(render)
}
