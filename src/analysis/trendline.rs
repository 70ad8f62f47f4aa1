use std::collections::BTreeMap;
use std::fmt::Display;
use std::ops::Range;

use log::debug;
use statrs::statistics::Statistics;

use crate::analysis::chunks::chunk_ranges;
use crate::analysis::percentile::{percentile_of_sorted, sorted_values};
use crate::analysis::regression::{fit_linear, fit_positions};
use crate::data::{Bar, LinearFit, Trendline, TrendlineAnalysis, TrendlineParams};
use crate::error::{Result, TrendlineError};

/// Support and resistance lines for one series.
pub fn calculate_trendline_single(bars: &[Bar], params: &TrendlineParams) -> Result<Trendline> {
    analyze_series(bars, params).map(|analysis| analysis.trendline)
}

/// Runs [`calculate_trendline_single`] for every asset in key order. The first
/// failure aborts the batch and names the asset.
pub fn calculate_trendlines_multiple<K, S>(
    series: &BTreeMap<K, S>,
    params: &TrendlineParams,
) -> Result<BTreeMap<K, Trendline>>
where
    K: Ord + Clone + Display,
    S: AsRef<[Bar]>,
{
    let mut trendlines = BTreeMap::new();
    for (asset, bars) in series {
        let trendline = calculate_trendline_single(bars.as_ref(), params)
            .map_err(|err| err.for_asset(asset.to_string()))?;
        trendlines.insert(asset.clone(), trendline);
    }
    Ok(trendlines)
}

/// Full single-series computation:
///
/// 1. OLS of lows on bar position over the whole series (the baseline).
/// 2. Residuals of the lows against the baseline, split into contiguous chunks.
/// 3. In each chunk, residuals at or below the `p`-th percentile become
///    support candidates and those at or above the `100 - p`-th percentile
///    become resistance candidates.
/// 4. Lows at the support candidates and highs at the resistance candidates
///    are each fitted with a second OLS.
pub fn analyze_series(bars: &[Bar], params: &TrendlineParams) -> Result<TrendlineAnalysis> {
    params.validate()?;
    validate_bars(bars)?;
    if bars.len() < 2 {
        return Err(TrendlineError::InsufficientData(format!(
            "need at least 2 bars, got {}",
            bars.len()
        )));
    }
    let chunks = chunk_ranges(bars.len(), params.num_chunks)?;

    let lows: Vec<f64> = bars.iter().map(|bar| bar.low).collect();
    let highs: Vec<f64> = bars.iter().map(|bar| bar.high).collect();
    let positions: Vec<f64> = (0..bars.len()).map(|idx| idx as f64).collect();

    let baseline = fit_linear(&positions, &lows)?;
    let residuals: Vec<f64> = positions
        .iter()
        .zip(lows.iter())
        .map(|(&x, &low)| low - baseline.predict(x))
        .collect();
    let residual_std_dev = residuals.iter().std_dev();

    let (support_candidates, resistance_candidates) =
        select_candidates(&residuals, &chunks, params.residual_percentile)?;

    let support = fit_candidates(&support_candidates, &lows, "support")?;
    let resistance = fit_candidates(&resistance_candidates, &highs, "resistance")?;
    let trendline = Trendline::from_fits(support, resistance, bars.len());

    debug!(
        "fitted {} bars: support gradient {:.6} ({} points), resistance gradient {:.6} ({} points)",
        bars.len(),
        trendline.support_line_gradient,
        support_candidates.len(),
        trendline.resistance_line_gradient,
        resistance_candidates.len()
    );

    Ok(TrendlineAnalysis {
        trendline,
        baseline,
        residual_std_dev,
        chunks,
        support_candidates,
        resistance_candidates,
    })
}

/// Per-chunk `(support_cutoff, resistance_cutoff)`: the `p`-th and
/// `(100 - p)`-th percentiles of the chunk's residuals.
pub fn chunk_cutoffs(residuals: &[f64], percentile: f64) -> Option<(f64, f64)> {
    if residuals.is_empty() {
        return None;
    }
    let sorted = sorted_values(residuals);
    Some((
        percentile_of_sorted(&sorted, percentile),
        percentile_of_sorted(&sorted, 100.0 - percentile),
    ))
}

/// Support and resistance candidate indices, concatenated in chunk order.
/// Cutoffs are inclusive, so a point may land in both sets.
pub fn select_candidates(
    residuals: &[f64],
    chunks: &[Range<usize>],
    percentile: f64,
) -> Result<(Vec<usize>, Vec<usize>)> {
    let mut support = Vec::new();
    let mut resistance = Vec::new();

    for (chunk_idx, range) in chunks.iter().enumerate() {
        let chunk = residuals.get(range.clone()).unwrap_or(&[]);
        let (support_cutoff, resistance_cutoff) =
            chunk_cutoffs(chunk, percentile).ok_or_else(|| {
                TrendlineError::InsufficientData(format!("chunk {chunk_idx} is empty"))
            })?;

        let before = (support.len(), resistance.len());
        for (offset, &residual) in chunk.iter().enumerate() {
            if residual <= support_cutoff {
                support.push(range.start + offset);
            }
            if residual >= resistance_cutoff {
                resistance.push(range.start + offset);
            }
        }

        let picked = (support.len() - before.0, resistance.len() - before.1);
        debug!(
            "chunk {chunk_idx} ({}..{}): support cutoff {support_cutoff:.6} -> {} points, resistance cutoff {resistance_cutoff:.6} -> {} points",
            range.start, range.end, picked.0, picked.1
        );
        if picked.0 == 0 || picked.1 == 0 {
            return Err(TrendlineError::InsufficientData(format!(
                "chunk {chunk_idx} produced no {} candidates",
                if picked.0 == 0 { "support" } else { "resistance" }
            )));
        }
    }

    Ok((support, resistance))
}

fn fit_candidates(indices: &[usize], values: &[f64], line: &str) -> Result<LinearFit> {
    if indices.len() < 2 {
        return Err(TrendlineError::InsufficientData(format!(
            "{line} line has {} candidate point(s), need at least 2",
            indices.len()
        )));
    }
    fit_positions(indices, values)
}

fn validate_bars(bars: &[Bar]) -> Result<()> {
    for (index, bar) in bars.iter().enumerate() {
        if !bar.high.is_finite() {
            return Err(TrendlineError::MalformedInput {
                index,
                field: "high",
                value: bar.high,
            });
        }
        if !bar.low.is_finite() {
            return Err(TrendlineError::MalformedInput {
                index,
                field: "low",
                value: bar.low,
            });
        }
    }
    Ok(())
}
