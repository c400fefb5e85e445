//! This library provides Change Point Detection (CPD) tools for
//! univariate time series:
//!  * Exact offline segmentation under a penalized least-squares
//!    objective as [`Segmenter`]
//!  * Online Bayesian CPD as [`Bocpd`]
//!  * A combined entry point bundling breakpoints, segment summaries,
//!    and streaming probabilities as [`ChangePointDetector`]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]

#[cfg(test)]
pub mod generators;

mod bocpd;
pub use bocpd::*;

mod cost;
pub use cost::*;

mod detect;
pub use detect::*;

mod error;
pub use self::error::*;

mod offline;
pub use offline::*;

pub mod utils;

pub use rv;
