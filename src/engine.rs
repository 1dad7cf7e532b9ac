// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The engine: owns the grid for the length of a run, starts one worker
//! per thread, hands each its share of the grid, and waits for all of
//! them before handing the finished grid back.
//!
//! Workers are scoped threads, so the grid, the kernel and the claim
//! counter are lent to them by reference and nothing outlives the run.

use std::time::{Duration, Instant};

use itertools::iproduct;

use crate::errors::JuliaError;
use crate::grid::GridBuffer;
use crate::kernel::Kernel;
use crate::partition::{Assignment, ClaimCounter, Partition};

/// A finished grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Render {
    /// Row-major packed `0xAARRGGBB` colors, `size * size` of them.
    pub pixels: Vec<u32>,
    /// Rows and columns.
    pub size: usize,
    /// Time spent computing, from dispatch to the last join.
    pub elapsed: Duration,
}

impl Render {
    /// The color at `row`, `column`.
    pub fn pixel(&self, row: usize, column: usize) -> u32 {
        self.pixels[row * self.size + column]
    }

    /// The pixels as packed 8-bit RGB triples, alpha dropped.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 3);
        for &p in &self.pixels {
            bytes.extend_from_slice(&[(p >> 16) as u8, (p >> 8) as u8, p as u8]);
        }
        bytes
    }
}

/// Runs grids through a kernel on a fixed number of worker threads
/// using one partition strategy.
#[derive(Debug, Clone)]
pub struct Engine {
    threads: usize,
    partition: Partition,
}

impl Engine {
    /// Needs at least one thread.  With exactly one, the partition is
    /// ignored and the grid is computed in row-major order on the
    /// calling thread.
    pub fn new(threads: usize, partition: Partition) -> Result<Self, JuliaError> {
        if threads == 0 {
            return Err(JuliaError::NoWorkers);
        }
        Ok(Engine { threads, partition })
    }

    /// Worker thread count.
    pub fn threads(&self) -> usize {
        self.threads
    }

    /// The partition strategy.
    pub fn partition(&self) -> Partition {
        self.partition
    }

    /// Colors every cell of a `size` x `size` grid.  The result is the
    /// same whatever the thread count or strategy, provided the kernel is
    /// pure.  Fails, and returns no pixels, if any worker dies or any cell
    /// is left uncomputed.
    pub fn run<K: Kernel>(&self, size: usize, kernel: &K) -> Result<Render, JuliaError> {
        debug!("engine idle: {}x{} grid, {} threads", size, size, self.threads);
        let grid = GridBuffer::new(size);

        let start = Instant::now();
        let computed = if self.threads == 1 {
            run_sequential(&grid, kernel)
        } else {
            debug!("engine dispatching: partition {}", self.partition);
            self.run_parallel(&grid, kernel)?
        };
        let elapsed = start.elapsed();

        check_complete(computed, size)?;
        debug!("engine done in {:?}", elapsed);
        Ok(Render {
            pixels: grid.into_pixels(),
            size,
            elapsed,
        })
    }

    /// Returns the number of cells the workers computed between them.
    fn run_parallel<K: Kernel>(&self, grid: &GridBuffer, kernel: &K) -> Result<usize, JuliaError> {
        let counter = ClaimCounter::new();
        let size = grid.size();
        let threads = self.threads;
        let partition = self.partition;

        let joined = crossbeam::scope(|spawner| {
            let handles: Vec<_> = (0..threads)
                .map(|worker| {
                    let assignment = partition.assignment(worker, threads, size, &counter);
                    spawner.spawn(move |_| compute(assignment, grid, kernel))
                })
                .collect();

            debug!("engine waiting for {} workers", threads);
            let mut computed = 0;
            let mut fault = None;
            for (worker, handle) in handles.into_iter().enumerate() {
                match handle.join() {
                    Ok(cells) => {
                        debug!("worker {} computed {} cells", worker, cells);
                        computed += cells;
                    }
                    Err(_) => {
                        error!("worker {} panicked", worker);
                        fault = fault.or(Some(JuliaError::WorkerFault(worker)));
                    }
                }
            }
            match fault {
                Some(fault) => Err(fault),
                None => Ok(computed),
            }
        });

        joined.unwrap_or(Err(JuliaError::Incomplete))
    }
}

/// A run is only finished when every cell of the grid was computed.
fn check_complete(computed: usize, size: usize) -> Result<(), JuliaError> {
    if computed == size * size {
        Ok(())
    } else {
        error!("only {} of {} cells were computed", computed, size * size);
        Err(JuliaError::Incomplete)
    }
}

fn run_sequential<K: Kernel>(grid: &GridBuffer, kernel: &K) -> usize {
    let size = grid.size();
    for (row, column) in iproduct!(0..size, 0..size) {
        grid.set(row * size + column, kernel.color(row, column));
    }
    size * size
}

/// The body of one worker: compute every batch it is handed.
fn compute<K: Kernel>(assignment: Assignment, grid: &GridBuffer, kernel: &K) -> usize {
    let size = grid.size();
    let mut cells = 0;
    for batch in assignment {
        for index in batch {
            grid.set(index, kernel.color(index / size, index % size));
            cells += 1;
        }
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // A kernel whose output identifies the cell.
    fn identity(row: usize, column: usize) -> u32 {
        0xff00_0000 | ((row as u32) << 12) | column as u32
    }

    // Counts how many times each cell is computed.
    struct Tally {
        size: usize,
        hits: Vec<AtomicUsize>,
    }

    impl Tally {
        fn new(size: usize) -> Self {
            Tally {
                size,
                hits: (0..size * size).map(|_| AtomicUsize::new(0)).collect(),
            }
        }

        fn counts(&self) -> Vec<usize> {
            self.hits.iter().map(|h| h.load(Ordering::SeqCst)).collect()
        }
    }

    impl Kernel for Tally {
        fn color(&self, row: usize, column: usize) -> u32 {
            self.hits[row * self.size + column].fetch_add(1, Ordering::SeqCst);
            identity(row, column)
        }
    }

    #[test]
    fn zero_threads_is_rejected() {
        assert_eq!(
            Engine::new(0, Partition::RowStride).unwrap_err(),
            JuliaError::NoWorkers
        );
    }

    #[test]
    fn single_thread_fills_row_major() {
        let engine = Engine::new(1, Partition::PixelClaim).unwrap();
        let render = engine.run(3, &identity).unwrap();
        let expected: Vec<u32> = iproduct!(0..3, 0..3).map(|(r, c)| identity(r, c)).collect();
        assert_eq!(render.pixels, expected);
        assert_eq!(render.size, 3);
    }

    #[test]
    fn every_strategy_computes_each_cell_once() {
        for &p in Partition::ALL.iter() {
            for &(size, threads) in &[(1, 2), (5, 4), (9, 3), (17, 8), (3, 7)] {
                let tally = Tally::new(size);
                let engine = Engine::new(threads, p).unwrap();
                let render = engine.run(size, &tally).unwrap();
                assert!(tally.counts().iter().all(|&n| n == 1), "{} {}x{}", p, size, threads);
                assert_eq!(render.pixel(size - 1, size - 1), identity(size - 1, size - 1));
            }
        }
    }

    #[test]
    fn strategies_agree_with_the_sequential_path() {
        let expected = Engine::new(1, Partition::RowStride)
            .unwrap()
            .run(33, &identity)
            .unwrap()
            .pixels;
        for &p in Partition::ALL.iter() {
            for threads in 2..6 {
                let render = Engine::new(threads, p).unwrap().run(33, &identity).unwrap();
                assert_eq!(render.pixels, expected, "{} with {} threads", p, threads);
            }
        }
    }

    #[test]
    fn pixel_claims_survive_contention() {
        for _ in 0..200 {
            let tally = Tally::new(5);
            Engine::new(4, Partition::PixelClaim)
                .unwrap()
                .run(5, &tally)
                .unwrap();
            assert_eq!(tally.counts(), vec![1; 25]);
        }
    }

    #[test]
    fn engines_can_be_reused() {
        let engine = Engine::new(3, Partition::BlockClaim).unwrap();
        let first = engine.run(10, &identity).unwrap();
        let second = engine.run(10, &identity).unwrap();
        assert_eq!(first.pixels, second.pixels);
    }

    #[test]
    fn a_panicking_worker_fails_the_run() {
        let engine = Engine::new(2, Partition::RowStride).unwrap();
        let faulty = |row: usize, column: usize| {
            if row == 1 {
                panic!("bad cell");
            }
            identity(row, column)
        };
        assert_eq!(engine.run(4, &faulty), Err(JuliaError::WorkerFault(1)));
    }

    #[test]
    fn zero_colors_are_stored_like_any_other() {
        let black = |_: usize, _: usize| 0u32;
        let sequential = Engine::new(1, Partition::RowStride).unwrap().run(2, &black);
        assert_eq!(sequential.map(|r| r.pixels), Ok(vec![0; 4]));
        for &p in Partition::ALL.iter() {
            let parallel = Engine::new(2, p).unwrap().run(3, &black);
            assert_eq!(parallel.map(|r| r.pixels), Ok(vec![0; 9]), "{}", p);
        }
    }

    #[test]
    fn short_cell_counts_are_incomplete() {
        assert_eq!(check_complete(16, 4), Ok(()));
        assert_eq!(check_complete(15, 4), Err(JuliaError::Incomplete));
        assert_eq!(check_complete(0, 1), Err(JuliaError::Incomplete));
    }

    #[test]
    fn rgb_bytes_drop_alpha() {
        let render = Render {
            pixels: vec![0xff12_3456, 0xff00_0000],
            size: 1,
            elapsed: Duration::from_secs(0),
        };
        assert_eq!(render.to_rgb_bytes(), vec![0x12, 0x34, 0x56, 0, 0, 0]);
    }
}
