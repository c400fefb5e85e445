//! Input validation errors.

use thiserror::Error;

/// Alias for results produced by this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by input validation, before any computation starts.
///
/// Invalid parameters are never clamped and partial results are never
/// returned; callers get either a fully populated result or one of these.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The input series contains no observations.
    #[error("series must contain at least one observation")]
    EmptySeries,
    /// The input series contains a NaN or infinite observation.
    #[error("series contains a non-finite value {value} at index {index}")]
    NonFinite {
        /// Position of the offending observation.
        index: usize,
        /// The offending observation.
        value: f64,
    },
    /// Fewer than two observations per segment cannot carry a mean.
    #[error("min_size must be >= 2 to fit a segment mean, got {min_size}")]
    MinSizeTooSmall {
        /// The rejected minimum segment length.
        min_size: usize,
    },
    /// The breakpoint penalty must be a finite, non-negative number.
    #[error("penalty must be finite and >= 0, got {penalty}")]
    InvalidPenalty {
        /// The rejected penalty.
        penalty: f64,
    },
    /// The hazard timescale must exceed 1 so that `1/lambda` is a probability.
    #[error("hazard lambda must be finite and > 1, got {hazard_lambda}")]
    InvalidHazard {
        /// The rejected hazard timescale.
        hazard_lambda: f64,
    },
}

/// Reject empty series and non-finite observations up front.
pub(crate) fn validate_series(series: &[f64]) -> Result<()> {
    if series.is_empty() {
        return Err(Error::EmptySeries);
    }
    if let Some((index, &value)) =
        series.iter().enumerate().find(|(_, x)| !x.is_finite())
    {
        return Err(Error::NonFinite { index, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_series_is_rejected() {
        assert_eq!(validate_series(&[]), Err(Error::EmptySeries));
    }

    #[test]
    fn non_finite_values_are_rejected_with_position() {
        let series = [1.0, 2.0, f64::NAN, 4.0];
        match validate_series(&series) {
            Err(Error::NonFinite { index, value }) => {
                assert_eq!(index, 2);
                assert!(value.is_nan());
            }
            other => panic!("expected NonFinite, got {other:?}"),
        }

        let series = [1.0, f64::INFINITY];
        assert!(matches!(
            validate_series(&series),
            Err(Error::NonFinite { index: 1, .. })
        ));
    }

    #[test]
    fn finite_series_passes() {
        assert_eq!(validate_series(&[0.0, -1.5, 3.25]), Ok(()));
    }

    #[test]
    fn messages_are_descriptive() {
        assert_eq!(
            Error::MinSizeTooSmall { min_size: 1 }.to_string(),
            "min_size must be >= 2 to fit a segment mean, got 1"
        );
        assert_eq!(
            Error::InvalidHazard { hazard_lambda: 1.0 }.to_string(),
            "hazard lambda must be finite and > 1, got 1"
        );
    }
}
