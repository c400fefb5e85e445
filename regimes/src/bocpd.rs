//! Online Bayesian change point detection.
//!
//! This code is derived from
//! "Bayesian Online Changepoint Detection"; Ryan Adams, David `MacKay`; arXiv:0710.3742
//! Which can be found [here](https://arxiv.org/pdf/0710.3742.pdf).

use crate::error::{validate_series, Error, Result};
use crate::utils::{log_sum_exp, log_sum_exp_slice};
use rv::dist::NormalGamma;
use special::Gamma;
use std::f64::consts::PI;

#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

/// Online Bayesian change point detection over a univariate series.
///
/// For each observation the detector reports the posterior mass assigned
/// to "a new regime starts here", obtained from a run-length posterior
/// under a Normal-Gamma conjugate model and a constant hazard `1/lambda`.
/// The recursion runs entirely in log-space; the run-length window can be
/// truncated to bound the per-step cost.
///
/// # Example
/// ```rust
/// use regimes::Bocpd;
/// use rv::dist::NormalGamma;
///
/// let mut series = vec![0.0; 50];
/// series.extend(vec![8.0; 50]);
///
/// let detector = Bocpd::new(
///     100.0,
///     NormalGamma::new(0.0, 0.1, 1.0, 1.0).unwrap(),
/// )?;
/// let probs = detector.change_probabilities(&series)?;
///
/// assert_eq!(probs.len(), series.len());
/// assert!(probs.iter().all(|&p| (0.0..=1.0).contains(&p)));
/// # Ok::<(), regimes::Error>(())
/// ```
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[derive(Clone, Debug)]
pub struct Bocpd {
    /// Constant hazard `1/lambda`: the prior probability of a change at
    /// any step, independent of the current run length.
    hazard: f64,
    prior: NormalGamma,
    max_run_length: Option<usize>,
}

impl Bocpd {
    /// Create a detector with the given hazard timescale and prior.
    ///
    /// # Parameters
    /// * `hazard_lambda` - Geometric timescale of the change process;
    ///   `1/hazard_lambda` is the per-step change probability, so the
    ///   value must exceed 1.
    /// * `prior` - Normal-Gamma hyperparameters `(m, r, s, v)` for the
    ///   per-run-length predictive model.
    ///
    /// # Errors
    /// [`Error::InvalidHazard`] unless `hazard_lambda` is finite and `> 1`.
    pub fn new(hazard_lambda: f64, prior: NormalGamma) -> Result<Self> {
        if !hazard_lambda.is_finite() || hazard_lambda <= 1.0 {
            return Err(Error::InvalidHazard { hazard_lambda });
        }
        Ok(Self {
            hazard: hazard_lambda.recip(),
            prior,
            max_run_length: None,
        })
    }

    /// Truncate the tracked run lengths to bound each step's cost.
    ///
    /// Without a window the detector tracks every run length up to the
    /// series length, making a full pass O(n^2); a window of `w` makes
    /// it O(n * w). Mass that would outgrow the window is dropped and
    /// the posterior renormalized.
    #[must_use]
    pub fn with_max_run_length(self, max_run_length: usize) -> Self {
        Self {
            max_run_length: Some(max_run_length),
            ..self
        }
    }

    /// Probability, per observation, that a new regime starts there.
    ///
    /// Entries lie in `[0, 1]` but do not sum to 1 across the series;
    /// each is the change point mass of its own step, not a distribution
    /// over time.
    ///
    /// # Errors
    /// [`Error::EmptySeries`] or [`Error::NonFinite`] when the input
    /// fails validation.
    pub fn change_probabilities(&self, series: &[f64]) -> Result<Vec<f64>> {
        validate_series(series)?;
        let truncation = self
            .max_run_length
            .unwrap_or(series.len())
            .clamp(1, series.len());

        let mut state = RunLengthState::new(
            Nig::from_prior(&self.prior),
            self.hazard,
            truncation,
        );
        Ok(series.iter().map(|&x| state.advance(x)).collect())
    }
}

/// Normal-Gamma sufficient description of one run length's posterior.
#[derive(Clone, Copy, Debug)]
struct Nig {
    mean: f64,
    kappa: f64,
    alpha: f64,
    beta: f64,
}

impl Nig {
    fn from_prior(prior: &NormalGamma) -> Self {
        Self {
            mean: prior.m(),
            kappa: prior.r(),
            alpha: prior.s(),
            beta: prior.v(),
        }
    }

    /// Student-t posterior predictive log-density of `x`.
    fn ln_pred(&self, x: f64) -> f64 {
        let scale =
            ((self.beta * (self.kappa + 1.0)) / (self.alpha * self.kappa)).sqrt();
        let dof = 2.0 * self.alpha;
        student_t_ln_pdf(x - self.mean, dof, scale)
    }

    /// Conjugate update after observing `x`.
    fn observe(&self, x: f64) -> Self {
        let kappa = self.kappa + 1.0;
        let mean = (self.kappa * self.mean + x) / kappa;
        let alpha = self.alpha + 0.5;
        let diff = x - self.mean;
        let beta = self.beta + (self.kappa * (diff * diff)) / (2.0 * kappa);
        Self {
            mean,
            kappa,
            alpha,
            beta,
        }
    }
}

/// Log-density of a zero-centered, scaled Student-t distribution.
fn student_t_ln_pdf(x: f64, dof: f64, scale: f64) -> f64 {
    let coef = (0.5 * (dof + 1.0)).ln_gamma().0
        - (0.5 * dof).ln_gamma().0
        - 0.5 * (dof * PI).ln()
        - scale.ln();
    let inner = 1.0 + (x / scale) * (x / scale) / dof;
    coef - 0.5 * (dof + 1.0) * inner.ln()
}

/// One pass of the run-length recursion.
///
/// `log_r[r]` carries the log-probability of run length `r` after the
/// last observed step; `stats[r]` the matching posterior parameters.
/// Run length 0 always restarts from the prior. The slot at the
/// truncation bound holds mass that will neither grow nor contribute to
/// the next step's change sum; renormalization discards it.
struct RunLengthState {
    log_r: Vec<f64>,
    stats: Vec<Nig>,
    prior: Nig,
    truncation: usize,
    log_hazard: f64,
    log_one_minus_hazard: f64,
    t: usize,
}

impl RunLengthState {
    fn new(prior: Nig, hazard: f64, truncation: usize) -> Self {
        let mut log_r = vec![f64::NEG_INFINITY; truncation + 1];
        // The stream opens with a change point by definition.
        log_r[0] = 0.0;
        Self {
            log_r,
            stats: vec![prior; truncation + 1],
            prior,
            truncation,
            log_hazard: hazard.ln(),
            log_one_minus_hazard: (-hazard).ln_1p(),
            t: 0,
        }
    }

    /// Fold in one observation and return its change point probability.
    fn advance(&mut self, x: f64) -> f64 {
        self.t += 1;
        let limit = self.t.min(self.truncation);

        let preds: Vec<f64> =
            self.stats[..limit].iter().map(|s| s.ln_pred(x)).collect();

        // Growth: run r survives the step and becomes run r + 1.
        let mut next = vec![f64::NEG_INFINITY; self.truncation + 1];
        for r in 0..limit {
            let growth =
                self.log_r[r] + preds[r] + self.log_one_minus_hazard;
            next[r + 1] = log_sum_exp(next[r + 1], growth);
        }

        // Change: every live run can end here; the pooled mass is both
        // the reported probability and the seed of run length 0.
        let change_terms: Vec<f64> = (0..limit)
            .map(|r| self.log_r[r] + preds[r] + self.log_hazard)
            .collect();
        let log_cp = log_sum_exp_slice(&change_terms);
        next[0] = log_cp;

        let normalizer = log_sum_exp_slice(&next[..=limit]);
        for value in &mut next[..=limit] {
            *value -= normalizer;
        }

        let mut stats = vec![self.prior; self.truncation + 1];
        for r in 0..limit {
            stats[r + 1] = self.stats[r].observe(x);
        }

        self.log_r = next;
        self.stats = stats;
        log_cp.exp()
    }

    /// Normalized run-length distribution after the last step.
    #[cfg(test)]
    fn posterior(&self) -> Vec<f64> {
        let live = self.t.min(self.truncation);
        self.log_r[..=live].iter().map(|lr| lr.exp()).collect()
    }
}
