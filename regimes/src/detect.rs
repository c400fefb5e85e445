//! Breakpoint summarization and the combined detection entry point.

use crate::bocpd::Bocpd;
use crate::cost::SegmentCost;
use crate::error::Result;
use crate::offline::Segmenter;

#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

/// Everything one detection run produces.
///
/// Shape invariants, for a series of length `n` with `k` breakpoints:
/// `segment_means.len() == k + 1`, `deltas.len() == k`,
/// `score_series.len() == n` with `|delta|` at each breakpoint index and
/// zero elsewhere, and `bocpd_probabilities` (when requested) holds one
/// entry in `[0, 1]` per observation.
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct ChangePointResult {
    /// Indices where a new constant-mean segment starts, ascending.
    pub breakpoints: Vec<usize>,
    /// Differences between consecutive segment means.
    pub deltas: Vec<f64>,
    /// Mean of each segment, in order.
    pub segment_means: Vec<f64>,
    /// Per-observation anomaly signal: `|delta|` at breakpoints, else zero.
    pub score_series: Vec<f64>,
    /// Streaming change probabilities, present when BOCPD was requested.
    pub bocpd_probabilities: Option<Vec<f64>>,
}

/// Offline segmentation, optional breakpoint capping, per-segment
/// summaries, and an optional online probability series in one call.
///
/// # Example
/// ```rust
/// use regimes::ChangePointDetector;
///
/// let mut series = vec![1.0; 30];
/// series.extend(vec![4.0; 30]);
///
/// let detector = ChangePointDetector::new(5.0, 10)?;
/// let result = detector.scores(&series)?;
///
/// assert_eq!(result.breakpoints, vec![30]);
/// assert_eq!(result.segment_means, vec![1.0, 4.0]);
/// assert_eq!(result.deltas, vec![3.0]);
/// assert_eq!(result.score_series[30], 3.0);
/// # Ok::<(), regimes::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct ChangePointDetector {
    segmenter: Segmenter,
    max_breaks: Option<usize>,
    bocpd: Option<Bocpd>,
}

impl Default for ChangePointDetector {
    fn default() -> Self {
        Self {
            segmenter: Segmenter::new(8.0, 10)
                .expect("default parameters are valid"),
            max_breaks: None,
            bocpd: None,
        }
    }
}

impl ChangePointDetector {
    /// Create a detector with the given segmentation parameters.
    ///
    /// # Errors
    /// Same parameter validation as [`Segmenter::new`].
    pub fn new(penalty: f64, min_size: usize) -> Result<Self> {
        Ok(Self {
            segmenter: Segmenter::new(penalty, min_size)?,
            max_breaks: None,
            bocpd: None,
        })
    }

    /// Cap the reported breakpoints, keeping the largest `|delta|` ones.
    #[must_use]
    pub fn with_max_breaks(self, max_breaks: usize) -> Self {
        Self {
            max_breaks: Some(max_breaks),
            ..self
        }
    }

    /// Also run the online Bayesian detector and merge its probability
    /// series into the result.
    #[must_use]
    pub fn with_bocpd(self, bocpd: Bocpd) -> Self {
        Self {
            bocpd: Some(bocpd),
            ..self
        }
    }

    /// Detect change points in `series` and bundle the summaries.
    ///
    /// # Errors
    /// Validation failures from the segmenter or the online detector;
    /// never a partial result.
    pub fn scores(&self, series: &[f64]) -> Result<ChangePointResult> {
        let mut breakpoints = self.segmenter.segment(series)?;

        let cost = SegmentCost::new(series);
        if let Some(max_breaks) = self.max_breaks {
            if breakpoints.len() > max_breaks {
                breakpoints = select_largest_deltas(&cost, &breakpoints, max_breaks);
            }
        }

        let segment_means = segment_means(&cost, &breakpoints);
        let deltas = segment_deltas(&segment_means);
        let score_series = score_series(cost.len(), &breakpoints, &deltas);

        let bocpd_probabilities = match &self.bocpd {
            Some(bocpd) => Some(bocpd.change_probabilities(series)?),
            None => None,
        };

        Ok(ChangePointResult {
            breakpoints,
            deltas,
            segment_means,
            score_series,
            bocpd_probabilities,
        })
    }
}

/// Mean of every segment induced by `breakpoints`, in order.
fn segment_means(cost: &SegmentCost, breakpoints: &[usize]) -> Vec<f64> {
    let mut means = Vec::with_capacity(breakpoints.len() + 1);
    let mut start = 0;
    for &bp in breakpoints {
        means.push(cost.mean(start, bp));
        start = bp;
    }
    means.push(cost.mean(start, cost.len()));
    means
}

/// Differences between consecutive segment means.
fn segment_deltas(segment_means: &[f64]) -> Vec<f64> {
    segment_means.windows(2).map(|pair| pair[1] - pair[0]).collect()
}

/// Zero-filled score vector with `|delta|` at each breakpoint index.
fn score_series(n: usize, breakpoints: &[usize], deltas: &[f64]) -> Vec<f64> {
    let mut scores = vec![0.0; n];
    for (&bp, &delta) in breakpoints.iter().zip(deltas) {
        if bp < n {
            scores[bp] = delta.abs();
        }
    }
    scores
}

/// Keep the `max_breaks` breakpoints with the largest inter-segment mean
/// deltas, re-sorted ascending.
///
/// The magnitude sort is stable, so equal-magnitude deltas keep their
/// original breakpoint order.
fn select_largest_deltas(
    cost: &SegmentCost,
    breakpoints: &[usize],
    max_breaks: usize,
) -> Vec<usize> {
    if max_breaks == 0 {
        return Vec::new();
    }
    let means = segment_means(cost, breakpoints);
    let deltas = segment_deltas(&means);

    let mut ranked: Vec<(usize, f64)> = breakpoints
        .iter()
        .copied()
        .zip(deltas.iter().map(|d| d.abs()))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    let mut kept: Vec<usize> =
        ranked.into_iter().take(max_breaks).map(|(bp, _)| bp).collect();
    kept.sort_unstable();
    kept
}
