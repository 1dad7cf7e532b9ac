// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The output buffer every worker writes into.
//!
//! Slots are atomics so that the buffer can be shared by plain
//! reference across threads without a lock.  The partition guarantees
//! that each slot has exactly one writer, so relaxed stores suffice.
//! The buffer never looks at the colors it holds; whether every slot
//! was written is for the engine to decide from its workers' counts.

use std::sync::atomic::{AtomicU32, Ordering};

#[cfg(debug_assertions)]
use std::sync::atomic::AtomicBool;

/// A flat, row-major `size` x `size` buffer of colors.
#[derive(Debug)]
pub struct GridBuffer {
    size: usize,
    slots: Vec<AtomicU32>,
    #[cfg(debug_assertions)]
    written: Vec<AtomicBool>,
}

impl GridBuffer {
    /// A buffer of `size * size` slots.
    pub fn new(size: usize) -> Self {
        let cells = size * size;
        GridBuffer {
            size,
            slots: (0..cells).map(|_| AtomicU32::new(0)).collect(),
            #[cfg(debug_assertions)]
            written: (0..cells).map(|_| AtomicBool::new(false)).collect(),
        }
    }

    /// The number of rows and columns.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True if the grid has no slots.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Writes `color` into slot `index`.  Each slot may be written once;
    /// debug builds panic on a second write.
    pub fn set(&self, index: usize, color: u32) {
        #[cfg(debug_assertions)]
        {
            let again = self.written[index].swap(true, Ordering::Relaxed);
            assert!(!again, "slot {} written twice", index);
        }
        self.slots[index].store(color, Ordering::Relaxed);
    }

    /// The pixels, in row-major order.
    pub fn into_pixels(self) -> Vec<u32> {
        self.slots.into_iter().map(AtomicU32::into_inner).collect()
    }
}
