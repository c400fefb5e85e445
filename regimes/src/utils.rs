//! Numerically stable log-space reductions.
//!
//! The run-length recursion combines probabilities that underflow `f64`
//! long before a change point shows up, so all combination happens on
//! log-probabilities with `-inf` standing in for zero mass.

/// Stable `ln(exp(a) + exp(b))` for two log-probabilities.
///
/// `-inf` acts as the additive identity, so accumulating into an
/// uninitialized `-inf` slot behaves like plain assignment.
///
/// # Example
/// ```rust
/// use regimes::utils::log_sum_exp;
///
/// let log_half = 0.5_f64.ln();
/// assert!((log_sum_exp(log_half, log_half)).abs() < 1e-12);
/// assert_eq!(log_sum_exp(f64::NEG_INFINITY, log_half), log_half);
/// ```
#[must_use]
pub fn log_sum_exp(a: f64, b: f64) -> f64 {
    if a == f64::NEG_INFINITY {
        return b;
    }
    if b == f64::NEG_INFINITY {
        return a;
    }
    if a > b {
        a + (b - a).exp().ln_1p()
    } else {
        b + (a - b).exp().ln_1p()
    }
}

/// Stable `ln(sum(exp(values)))` over a slice of log-probabilities.
///
/// Non-finite entries are ignored both when locating the max shift and
/// when summing, so a slice holding only `-inf` (or nothing at all)
/// reduces to `-inf` instead of producing NaN.
#[must_use]
pub fn log_sum_exp_slice(values: &[f64]) -> f64 {
    let max = values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(f64::NEG_INFINITY, f64::max);
    if max == f64::NEG_INFINITY {
        return f64::NEG_INFINITY;
    }
    let sum: f64 = values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .map(|v| (v - max).exp())
        .sum();
    max + sum.ln()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive(values: &[f64]) -> f64 {
        values.iter().map(|v| v.exp()).sum::<f64>().ln()
    }

    #[test]
    fn two_arg_matches_naive() {
        assert::close(log_sum_exp(-1.5, -2.5), naive(&[-1.5, -2.5]), 1e-12);
        assert::close(log_sum_exp(-2.5, -1.5), naive(&[-1.5, -2.5]), 1e-12);
        assert::close(log_sum_exp(0.0, 0.0), 2.0_f64.ln(), 1e-12);
    }

    #[test]
    fn two_arg_neg_inf_identity() {
        assert_eq!(log_sum_exp(f64::NEG_INFINITY, -3.0), -3.0);
        assert_eq!(log_sum_exp(-3.0, f64::NEG_INFINITY), -3.0);
        assert_eq!(
            log_sum_exp(f64::NEG_INFINITY, f64::NEG_INFINITY),
            f64::NEG_INFINITY
        );
    }

    #[test]
    fn two_arg_survives_large_magnitudes() {
        // Naive exp would overflow; the shifted form must not.
        let out = log_sum_exp(1000.0, 1000.0);
        assert::close(out, 1000.0 + 2.0_f64.ln(), 1e-12);
        let out = log_sum_exp(-1000.0, -1000.0);
        assert::close(out, -1000.0 + 2.0_f64.ln(), 1e-12);
    }

    #[test]
    fn slice_matches_naive() {
        let values = [-0.5, -1.0, -4.0, -2.2];
        assert::close(log_sum_exp_slice(&values), naive(&values), 1e-12);
    }

    #[test]
    fn slice_ignores_non_finite_entries() {
        let values = [f64::NEG_INFINITY, -1.0, f64::NAN, -2.0];
        assert::close(log_sum_exp_slice(&values), naive(&[-1.0, -2.0]), 1e-12);
    }

    #[test]
    fn slice_all_neg_inf_is_neg_inf() {
        assert_eq!(
            log_sum_exp_slice(&[f64::NEG_INFINITY, f64::NEG_INFINITY]),
            f64::NEG_INFINITY
        );
        assert_eq!(log_sum_exp_slice(&[]), f64::NEG_INFINITY);
    }

    #[test]
    fn slice_agrees_with_two_arg_fold() {
        let values = [-3.0, -0.25, -7.5];
        let folded = values
            .iter()
            .fold(f64::NEG_INFINITY, |acc, &v| log_sum_exp(acc, v));
        assert::close(log_sum_exp_slice(&values), folded, 1e-12);
    }
}
