//! Exact offline segmentation under a penalized least-squares objective.

use crate::cost::SegmentCost;
use crate::error::{validate_series, Error, Result};

#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

/// Exact dynamic-programming solver for piecewise-constant-mean
/// segmentation.
///
/// The objective is the summed [`SegmentCost`] of every segment plus a
/// fixed `penalty` per additional breakpoint; larger penalties yield
/// fewer breakpoints. Every candidate split point is examined, so the
/// solver is O(n^2) in the number of observations and deliberately stays
/// that way: the pruned variants trade exact tie-breaking for speed and
/// would return different breakpoint sets on flat stretches.
///
/// # Example
/// ```rust
/// use regimes::Segmenter;
///
/// let mut series = vec![0.0; 30];
/// series.extend(vec![10.0; 30]);
///
/// let segmenter = Segmenter::new(5.0, 10)?;
/// assert_eq!(segmenter.segment(&series)?, vec![30]);
/// # Ok::<(), regimes::Error>(())
/// ```
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct Segmenter {
    penalty: f64,
    min_size: usize,
}

impl Segmenter {
    /// Create a solver with the given breakpoint penalty and minimum
    /// segment length.
    ///
    /// # Errors
    /// * [`Error::InvalidPenalty`] unless `penalty` is finite and `>= 0`.
    /// * [`Error::MinSizeTooSmall`] unless `min_size >= 2`; a segment of
    ///   one point carries no usable mean.
    pub fn new(penalty: f64, min_size: usize) -> Result<Self> {
        if !penalty.is_finite() || penalty < 0.0 {
            return Err(Error::InvalidPenalty { penalty });
        }
        if min_size < 2 {
            return Err(Error::MinSizeTooSmall { min_size });
        }
        Ok(Self { penalty, min_size })
    }

    /// The per-breakpoint penalty.
    #[must_use]
    pub fn penalty(&self) -> f64 {
        self.penalty
    }

    /// The minimum observations per segment.
    #[must_use]
    pub fn min_size(&self) -> usize {
        self.min_size
    }

    /// Optimal interior breakpoints for `series`, sorted ascending.
    ///
    /// Each returned index is the first observation of a new segment;
    /// indices `0` and `series.len()` are never reported. A series
    /// shorter than `2 * min_size` cannot be split and yields an empty
    /// set, which is a valid result rather than an error.
    ///
    /// # Errors
    /// [`Error::EmptySeries`] or [`Error::NonFinite`] when the input
    /// fails validation.
    pub fn segment(&self, series: &[f64]) -> Result<Vec<usize>> {
        validate_series(series)?;
        let n = series.len();
        if n < 2 * self.min_size {
            return Ok(Vec::new());
        }

        let cost = SegmentCost::new(series);

        // best_cost[e] is the optimal objective for the prefix of length
        // e; the -penalty sentinel cancels the charge on the first
        // segment so only interior cuts pay.
        let mut best_cost = vec![f64::INFINITY; n + 1];
        best_cost[0] = -self.penalty;
        let mut prev = vec![0_usize; n + 1];

        for end in self.min_size..=n {
            let mut best = f64::INFINITY;
            let mut best_start = 0_usize;
            for start in 0..=(end - self.min_size) {
                let candidate =
                    best_cost[start] + cost.cost(start, end) + self.penalty;
                // Strict comparison keeps the earliest start on ties.
                if candidate < best {
                    best = candidate;
                    best_start = start;
                }
            }
            best_cost[end] = best;
            prev[end] = best_start;
        }

        let mut breakpoints = Vec::new();
        let mut idx = n;
        while idx > 0 {
            let start = prev[idx];
            if start == 0 && best_cost[idx] == f64::INFINITY {
                break;
            }
            if start == 0 && idx < n && idx < self.min_size {
                break;
            }
            if start == idx {
                break;
            }
            if idx != n {
                breakpoints.push(idx);
            }
            idx = start;
        }

        breakpoints.sort_unstable();
        Ok(breakpoints)
    }
}
