use std::path::PathBuf;

use clap::{ArgAction, Parser};
use trendlines::TrendlineParams;

/// Command-line configuration for the trendline estimator.
#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct AppConfig {
    /// CSV files with High/Low columns; each file stem names an asset.
    #[arg(value_name = "FILE", required = true, num_args = 1..)]
    pub inputs: Vec<PathBuf>,

    /// Number of contiguous chunks the baseline residuals are split into.
    #[arg(long, default_value_t = 3)]
    pub num_chunks: usize,

    /// Percentile (0-50) selecting extreme residuals in each chunk.
    #[arg(long, default_value_t = 5.0)]
    pub residual_percentile: f64,

    /// Emit JSON instead of a table.
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Log per-chunk details.
    #[arg(short, long, action = ArgAction::SetTrue)]
    pub verbose: bool,
}

impl AppConfig {
    pub fn params(&self) -> TrendlineParams {
        TrendlineParams::new(self.num_chunks, self.residual_percentile)
    }
}
