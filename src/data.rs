use chrono::NaiveDateTime;
use serde::Serialize;

use crate::error::{Result, TrendlineError};

/// Single price observation. Only the position in the series matters for
/// fitting; the timestamp is carried for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bar {
    pub timestamp: Option<NaiveDateTime>,
    pub high: f64,
    pub low: f64,
}

impl Bar {
    pub fn new(high: f64, low: f64) -> Self {
        Self {
            timestamp: None,
            high,
            low,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendlineParams {
    pub num_chunks: usize,
    pub residual_percentile: f64,
}

impl Default for TrendlineParams {
    fn default() -> Self {
        Self {
            num_chunks: 3,
            residual_percentile: 5.0,
        }
    }
}

impl TrendlineParams {
    pub fn new(num_chunks: usize, residual_percentile: f64) -> Self {
        Self {
            num_chunks,
            residual_percentile,
        }
    }

    /// Checks that do not depend on the series length.
    pub fn validate(&self) -> Result<()> {
        if self.num_chunks < 1 {
            return Err(TrendlineError::InvalidParameter(
                "num_chunks must be at least 1".to_string(),
            ));
        }
        if !(0.0..=50.0).contains(&self.residual_percentile) {
            return Err(TrendlineError::InvalidParameter(format!(
                "residual_percentile must lie in [0, 50], got {}",
                self.residual_percentile
            )));
        }
        Ok(())
    }
}

/// Straight line `y = gradient * x + intercept` over bar positions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearFit {
    pub gradient: f64,
    pub intercept: f64,
}

impl LinearFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.gradient * x + self.intercept
    }
}

/// Fitted support (lows) and resistance (highs) lines. `start`/`end` are the
/// line values at the first and last bar position of the input series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Trendline {
    pub support_line_gradient: f64,
    pub support_line_start: f64,
    pub support_line_end: f64,
    pub resistance_line_gradient: f64,
    pub resistance_line_start: f64,
    pub resistance_line_end: f64,
}

impl Trendline {
    pub fn from_fits(support: LinearFit, resistance: LinearFit, len: usize) -> Self {
        let last = len.saturating_sub(1) as f64;
        Self {
            support_line_gradient: support.gradient,
            support_line_start: support.predict(0.0),
            support_line_end: support.predict(last),
            resistance_line_gradient: resistance.gradient,
            resistance_line_start: resistance.predict(0.0),
            resistance_line_end: resistance.predict(last),
        }
    }

    pub fn support_line(&self) -> LinearFit {
        LinearFit {
            gradient: self.support_line_gradient,
            intercept: self.support_line_start,
        }
    }

    pub fn resistance_line(&self) -> LinearFit {
        LinearFit {
            gradient: self.resistance_line_gradient,
            intercept: self.resistance_line_start,
        }
    }
}

/// Everything computed on the way to a [`Trendline`].
#[derive(Debug, Clone, Serialize)]
pub struct TrendlineAnalysis {
    pub trendline: Trendline,
    pub baseline: LinearFit,
    pub residual_std_dev: f64,
    pub chunks: Vec<std::ops::Range<usize>>,
    pub support_candidates: Vec<usize>,
    pub resistance_candidates: Vec<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_params() {
        let params = TrendlineParams::default();
        assert_eq!(params.num_chunks, 3);
        assert_eq!(params.residual_percentile, 5.0);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_params() {
        assert!(TrendlineParams::new(0, 5.0).validate().is_err());
        assert!(TrendlineParams::new(3, -0.1).validate().is_err());
        assert!(TrendlineParams::new(3, 50.5).validate().is_err());
        assert!(TrendlineParams::new(3, f64::NAN).validate().is_err());
        assert!(TrendlineParams::new(3, 0.0).validate().is_ok());
        assert!(TrendlineParams::new(3, 50.0).validate().is_ok());
    }

    #[test]
    fn line_accessors_round_trip_through_start() {
        let support = LinearFit {
            gradient: -0.5,
            intercept: 9.5,
        };
        let resistance = LinearFit {
            gradient: 0.5,
            intercept: 20.0,
        };
        let trendline = Trendline::from_fits(support, resistance, 9);
        assert_eq!(trendline.support_line_end, 5.5);
        assert_eq!(trendline.resistance_line_end, 24.0);
        assert_eq!(trendline.support_line(), support);
        assert_eq!(trendline.resistance_line(), resistance);
    }
}
