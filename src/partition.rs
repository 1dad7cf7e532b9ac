// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Partitioning strategies: how the cells of an `S` x `S` grid are
//! divided up among `T` workers.
//!
//! Every strategy hands a worker a lazy sequence of batches, each batch
//! being a contiguous range of linear cell indices (`row * S + column`).
//! Rows, blocks of rows, and single pixels are all contiguous in a
//! row-major grid, so a range describes every unit of work we need.
//!
//! The static strategies compute their sequence from the worker's id
//! alone.  The dynamic strategies compete for units by claiming them
//! from a shared `ClaimCounter`; whoever gets a number owns that unit.
//! Across all workers of a run, every strategy produces each index in
//! `0..S*S` exactly once.

use std::cmp::min;
use std::fmt;
use std::ops::Range;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::errors::JuliaError;

/// The number of rows in a block, for both block strategies.
pub const BLOCK_ROWS: usize = 4;

/// One of the six ways of splitting the grid among workers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Partition {
    /// Worker `w` computes rows `w, w+T, w+2T, ...`
    RowStride,
    /// Worker `w` computes 4-row blocks `w, w+T, w+2T, ...`
    BlockStride,
    /// Worker `w` computes cells `w, w+T, w+2T, ...` of the flattened grid.
    PixelStride,
    /// Workers claim one row at a time from the shared counter.
    RowClaim,
    /// Workers claim one cell at a time from the shared counter.
    PixelClaim,
    /// Workers claim one 4-row block at a time from the shared counter.
    BlockClaim,
}

impl Partition {
    /// All strategies, in model-number order.
    pub const ALL: [Partition; 6] = [
        Partition::RowStride,
        Partition::BlockStride,
        Partition::PixelStride,
        Partition::RowClaim,
        Partition::PixelClaim,
        Partition::BlockClaim,
    ];

    /// Looks up a strategy by its model number, 1 through 6.
    pub fn from_model(model: usize) -> Option<Partition> {
        if model >= 1 && model <= Partition::ALL.len() {
            Some(Partition::ALL[model - 1])
        } else {
            None
        }
    }

    /// The model number of this strategy.
    pub fn model(self) -> usize {
        match self {
            Partition::RowStride => 1,
            Partition::BlockStride => 2,
            Partition::PixelStride => 3,
            Partition::RowClaim => 4,
            Partition::PixelClaim => 5,
            Partition::BlockClaim => 6,
        }
    }

    /// The name accepted on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Partition::RowStride => "row-stride",
            Partition::BlockStride => "block-stride",
            Partition::PixelStride => "pixel-stride",
            Partition::RowClaim => "row-claim",
            Partition::PixelClaim => "pixel-claim",
            Partition::BlockClaim => "block-claim",
        }
    }

    /// True for the strategies that claim work from a shared counter.
    pub fn is_dynamic(self) -> bool {
        match self {
            Partition::RowClaim | Partition::PixelClaim | Partition::BlockClaim => true,
            _ => false,
        }
    }

    /// The work for worker `worker` of `threads`, over a `size` x `size`
    /// grid.  The dynamic strategies claim from `counter`, which must be
    /// shared by every worker of the run and by nothing else; the static
    /// ones ignore it.
    pub fn assignment(
        self,
        worker: usize,
        threads: usize,
        size: usize,
        counter: &ClaimCounter,
    ) -> Assignment<'_> {
        assert!(threads > 0 && worker < threads, "worker {} of {}", worker, threads);
        let cursor = match self {
            Partition::RowStride | Partition::PixelStride => worker,
            Partition::BlockStride => worker * BLOCK_ROWS,
            _ => 0,
        };
        Assignment {
            partition: self,
            threads,
            size,
            cursor,
            counter,
            exhausted: false,
        }
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({})", self.model(), self.name())
    }
}

impl FromStr for Partition {
    type Err = JuliaError;

    /// Accepts either the model number or the name of a strategy.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let found = match usize::from_str(s) {
            Ok(model) => Partition::from_model(model),
            Err(_) => Partition::ALL
                .iter()
                .cloned()
                .find(|p| p.name().eq_ignore_ascii_case(s)),
        };
        found.ok_or_else(|| JuliaError::UnknownPartition(s.to_string()))
    }
}

/// The shared counter the dynamic strategies claim work from.  It only
/// ever moves forward, and only through `claim`.  Make a fresh one for
/// every run.
#[derive(Debug, Default)]
pub struct ClaimCounter(AtomicUsize);

impl ClaimCounter {
    /// A counter whose first claim returns 0.
    pub fn new() -> Self {
        ClaimCounter(AtomicUsize::new(0))
    }

    /// Atomically advances the counter by `step` and returns the value it
    /// had before.  No two claims ever return the same value.
    pub fn claim(&self, step: usize) -> usize {
        // Only the uniqueness of the returned values matters; the join at
        // the end of the run orders everything else.
        self.0.fetch_add(step, Ordering::Relaxed)
    }

    /// The next value `claim` would hand out.
    pub fn peek(&self) -> usize {
        self.0.load(Ordering::Relaxed)
    }
}

/// The lazily produced work of a single worker.  Each item is a batch
/// of linear cell indices, to be computed in full before the next batch
/// is requested.
#[derive(Debug)]
pub struct Assignment<'a> {
    partition: Partition,
    threads: usize,
    size: usize,
    // Next row, block start row, or cell for the static strategies.
    cursor: usize,
    counter: &'a ClaimCounter,
    exhausted: bool,
}

impl<'a> Assignment<'a> {
    /// Rows `first..first + count`, clipped to the grid, as cell indices.
    fn rows(&self, first: usize, count: usize) -> Range<usize> {
        let last = min(first + count, self.size);
        first * self.size..last * self.size
    }

    /// Produces the next batch of cells, or `None` when this worker has
    /// nothing left to do.
    pub fn next_batch(&mut self) -> Option<Range<usize>> {
        if self.exhausted {
            return None;
        }
        let cells = self.size * self.size;
        let batch = match self.partition {
            Partition::RowStride => {
                let row = self.cursor;
                self.cursor += self.threads;
                if row < self.size {
                    Some(self.rows(row, 1))
                } else {
                    None
                }
            }
            Partition::BlockStride => {
                let first = self.cursor;
                self.cursor += self.threads * BLOCK_ROWS;
                if first < self.size {
                    Some(self.rows(first, BLOCK_ROWS))
                } else {
                    None
                }
            }
            Partition::PixelStride => {
                let cell = self.cursor;
                self.cursor += self.threads;
                if cell < cells {
                    Some(cell..cell + 1)
                } else {
                    None
                }
            }
            Partition::RowClaim => {
                let row = self.counter.claim(1);
                if row < self.size {
                    Some(self.rows(row, 1))
                } else {
                    None
                }
            }
            Partition::PixelClaim => {
                let cell = self.counter.claim(1);
                if cell < cells {
                    Some(cell..cell + 1)
                } else {
                    None
                }
            }
            Partition::BlockClaim => {
                let first = self.counter.claim(BLOCK_ROWS);
                if first < self.size {
                    Some(self.rows(first, BLOCK_ROWS))
                } else {
                    None
                }
            }
        };
        self.exhausted = batch.is_none();
        batch
    }
}

impl<'a> Iterator for Assignment<'a> {
    type Item = Range<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_batch()
    }
}

impl<'a> std::iter::FusedIterator for Assignment<'a> {}
