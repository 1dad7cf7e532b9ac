// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The parameters of a single render, and the ranges they must fall in.

use std::str::FromStr;

use num::Complex;

use crate::errors::JuliaError;
use crate::partition::Partition;

/// Lowest accepted real part of the Julia constant.
pub const MIN_A: f64 = -1.0;
/// Highest accepted real part of the Julia constant.
pub const MAX_A: f64 = 1.0;
/// Lowest accepted imaginary part of the Julia constant.
pub const MIN_B: f64 = -1.0;
/// Highest accepted imaginary part of the Julia constant.
pub const MAX_B: f64 = 1.0;
/// Smallest grid edge.
pub const MIN_SIZE: usize = 1;
/// Largest grid edge.
pub const MAX_SIZE: usize = 16384;
/// Fewest worker threads.
pub const MIN_THREADS: usize = 1;
/// First partition model number.
pub const MIN_MODEL: usize = 1;
/// Last partition model number.
pub const MAX_MODEL: usize = 6;

/// Most worker threads: one per logical CPU.
pub fn max_threads() -> usize {
    num_cpus::get()
}

/// Checks that `value` lies in `[min, max]`.  NaN never does.
pub fn check_range<T>(name: &'static str, value: T, min: T, max: T) -> Result<T, JuliaError>
where
    T: PartialOrd + ToString,
{
    if value >= min && value <= max {
        Ok(value)
    } else {
        Err(JuliaError::out_of_range(name, value, min, max))
    }
}

/// Parses `s` and checks that it lies in `[min, max]`.
pub fn parse_in_range<T>(s: &str, name: &'static str, min: T, max: T) -> Result<T, JuliaError>
where
    T: FromStr + PartialOrd + ToString,
{
    match T::from_str(s.trim()) {
        Ok(value) => check_range(name, value, min, max),
        Err(_) => Err(JuliaError::NotANumber {
            name,
            value: s.to_string(),
        }),
    }
}

/// A validated set of render parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    /// Real part of the Julia constant.
    pub a: f64,
    /// Imaginary part of the Julia constant.
    pub b: f64,
    /// Rows and columns of the output grid.
    pub size: usize,
    /// Worker threads.
    pub threads: usize,
    /// How the grid is divided among the workers.
    pub partition: Partition,
}

impl RunConfig {
    /// Rejects any parameter outside its range before anything else
    /// happens.
    pub fn new(
        a: f64,
        b: f64,
        size: usize,
        threads: usize,
        partition: Partition,
    ) -> Result<Self, JuliaError> {
        Ok(RunConfig {
            a: check_range("a", a, MIN_A, MAX_A)?,
            b: check_range("b", b, MIN_B, MAX_B)?,
            size: check_range("size", size, MIN_SIZE, MAX_SIZE)?,
            threads: check_range("threads", threads, MIN_THREADS, max_threads())?,
            partition,
        })
    }

    /// The Julia constant `a + bi`.
    pub fn c(&self) -> Complex<f64> {
        Complex::new(self.a, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_the_classic_parameters() {
        let config = RunConfig::new(-0.8, 0.156, 256, 1, Partition::RowStride).unwrap();
        assert_eq!(config.c(), Complex::new(-0.8, 0.156));
    }

    #[test]
    fn bounds_are_inclusive() {
        assert!(RunConfig::new(-1.0, 1.0, 1, 1, Partition::BlockClaim).is_ok());
        assert!(RunConfig::new(1.0, -1.0, MAX_SIZE, max_threads(), Partition::PixelStride).is_ok());
    }

    #[test]
    fn rejects_out_of_range_values() {
        let err = RunConfig::new(1.5, 0.0, 10, 1, Partition::RowStride).unwrap_err();
        assert_eq!(
            err,
            JuliaError::OutOfRange {
                name: "a",
                value: "1.5".to_string(),
                min: "-1".to_string(),
                max: "1".to_string(),
            }
        );
        assert!(RunConfig::new(0.0, -1.01, 10, 1, Partition::RowStride).is_err());
        assert!(RunConfig::new(0.0, 0.0, 0, 1, Partition::RowStride).is_err());
        assert!(RunConfig::new(0.0, 0.0, MAX_SIZE + 1, 1, Partition::RowStride).is_err());
        assert!(RunConfig::new(0.0, 0.0, 10, 0, Partition::RowStride).is_err());
        assert!(RunConfig::new(0.0, 0.0, 10, max_threads() + 1, Partition::RowStride).is_err());
    }

    #[test]
    fn rejects_nan() {
        assert!(RunConfig::new(std::f64::NAN, 0.0, 10, 1, Partition::RowStride).is_err());
    }

    #[test]
    fn parses_in_range() {
        assert_eq!(parse_in_range("42", "size", 1usize, 100), Ok(42));
        assert_eq!(parse_in_range(" -0.5 ", "a", -1.0, 1.0), Ok(-0.5));
        assert_eq!(
            parse_in_range::<usize>("many", "threads", 1, 4),
            Err(JuliaError::NotANumber {
                name: "threads",
                value: "many".to_string(),
            })
        );
        assert!(parse_in_range("-3", "size", 1i64, 100).is_err());
    }
}
