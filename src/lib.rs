//! Support and resistance trendlines for price series.
//!
//! A baseline least-squares line is fitted through the lows, the residuals
//! are split into chunks, and the most extreme residuals of each chunk feed
//! a second pair of fits: one through the lows (support) and one through the
//! highs (resistance).

pub mod analysis;
pub mod data;
pub mod error;

pub use analysis::{analyze_series, calculate_trendline_single, calculate_trendlines_multiple};
pub use data::{Bar, LinearFit, Trendline, TrendlineAnalysis, TrendlineParams};
pub use error::{Result, TrendlineError};
