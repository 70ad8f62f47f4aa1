use crate::data::LinearFit;
use crate::error::{Result, TrendlineError};

/// Closed-form ordinary least squares of `ys` on `xs`.
pub fn fit_linear(xs: &[f64], ys: &[f64]) -> Result<LinearFit> {
    if xs.len() != ys.len() {
        return Err(TrendlineError::InsufficientData(format!(
            "regression inputs differ in length ({} x values, {} y values)",
            xs.len(),
            ys.len()
        )));
    }
    if xs.len() < 2 {
        return Err(TrendlineError::InsufficientData(format!(
            "regression needs at least 2 points, got {}",
            xs.len()
        )));
    }

    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for (&x, &y) in xs.iter().zip(ys.iter()) {
        let dx = x - mean_x;
        sxx += dx * dx;
        sxy += dx * (y - mean_y);
    }
    if sxx <= 0.0 || !sxx.is_finite() {
        return Err(TrendlineError::InsufficientData(
            "regression x values have no spread".to_string(),
        ));
    }

    let gradient = sxy / sxx;
    let intercept = mean_y - gradient * mean_x;
    if !gradient.is_finite() || !intercept.is_finite() {
        return Err(TrendlineError::NumericOverflow(format!(
            "least-squares sums overflowed (gradient {gradient}, intercept {intercept})"
        )));
    }
    Ok(LinearFit {
        gradient,
        intercept,
    })
}

/// Fit `values[i]` against position `i` for the given indices.
pub fn fit_positions(indices: &[usize], values: &[f64]) -> Result<LinearFit> {
    let xs: Vec<f64> = indices.iter().map(|&idx| idx as f64).collect();
    let ys = indices
        .iter()
        .map(|&idx| {
            values.get(idx).copied().ok_or_else(|| {
                TrendlineError::InvalidParameter(format!(
                    "position {idx} is outside the {} available values",
                    values.len()
                ))
            })
        })
        .collect::<Result<Vec<f64>>>()?;
    fit_linear(&xs, &ys)
}
