// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Everything that can stop a render.  Configuration problems are
//! caught before any worker is started; the remaining variants mean
//! the run is incomplete and no image should be written from it.

/// The error type for every fallible operation in this crate.
#[derive(Debug, Fail, PartialEq)]
pub enum JuliaError {
    /// A parameter was parsed but falls outside its permitted range.
    #[fail(
        display = "Value, {}, given for {} is not in the range [{}, {}]",
        value, name, min, max
    )]
    OutOfRange {
        /// Parameter name.
        name: &'static str,
        /// The offending value, as given.
        value: String,
        /// Lowest permitted value.
        min: String,
        /// Highest permitted value.
        max: String,
    },

    /// A parameter could not be parsed at all.
    #[fail(display = "Value, {}, given for {} is not a number", value, name)]
    NotANumber {
        /// Parameter name.
        name: &'static str,
        /// The offending value, as given.
        value: String,
    },

    /// The partition model is neither a number from 1 to 6 nor a known name.
    #[fail(display = "Unknown partition model: {}", _0)]
    UnknownPartition(String),

    /// An engine needs at least one worker.
    #[fail(display = "At least one worker thread is required")]
    NoWorkers,

    /// A worker panicked during its computation.
    #[fail(display = "Worker {} failed during computation", _0)]
    WorkerFault(usize),

    /// Waiting for the workers ended before every cell was computed.
    #[fail(display = "Execution was interrupted before every cell was computed")]
    Incomplete,

    /// The finished image could not be written.
    #[fail(display = "Could not write {}: {}", path, reason)]
    Output {
        /// Destination file.
        path: String,
        /// What the encoder or file system reported.
        reason: String,
    },
}

impl JuliaError {
    pub(crate) fn out_of_range<T: ToString>(name: &'static str, value: T, min: T, max: T) -> Self {
        JuliaError::OutOfRange {
            name,
            value: value.to_string(),
            min: min.to_string(),
            max: max.to_string(),
        }
    }
}
