pub mod chunks;
pub mod percentile;
pub mod regression;
pub mod trendline;

pub use chunks::chunk_ranges;
pub use percentile::percentile;
pub use regression::{fit_linear, fit_positions};
pub use trendline::{
    analyze_series, calculate_trendline_single, calculate_trendlines_multiple, chunk_cutoffs,
    select_candidates,
};
