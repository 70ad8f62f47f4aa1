use std::collections::BTreeMap;

use anyhow::Result;
use chrono::NaiveDateTime;
use tabled::{settings::Style, Table, Tabled};
use trendlines::{Trendline, TrendlineAnalysis, TrendlineParams};

/// First and last timestamp of a series, when the input carried them.
pub struct SeriesSpan {
    pub bars: usize,
    pub first: Option<NaiveDateTime>,
    pub last: Option<NaiveDateTime>,
}

pub struct AssetReport {
    pub span: SeriesSpan,
    pub analysis: TrendlineAnalysis,
}

#[derive(Tabled)]
struct TrendlineRow {
    #[tabled(rename = "Asset")]
    asset: String,
    #[tabled(rename = "Bars")]
    bars: usize,
    #[tabled(rename = "Span")]
    span: String,
    #[tabled(rename = "Support Grad")]
    support_gradient: String,
    #[tabled(rename = "Support Start")]
    support_start: String,
    #[tabled(rename = "Support End")]
    support_end: String,
    #[tabled(rename = "Resist Grad")]
    resistance_gradient: String,
    #[tabled(rename = "Resist Start")]
    resistance_start: String,
    #[tabled(rename = "Resist End")]
    resistance_end: String,
    #[tabled(rename = "Resid SD")]
    residual_std_dev: String,
    #[tabled(rename = "Points (S/R)")]
    points: String,
}

fn format_span(span: &SeriesSpan) -> String {
    match (span.first, span.last) {
        (Some(first), Some(last)) => format!(
            "{} to {}",
            first.format("%Y-%m-%d %H:%M"),
            last.format("%Y-%m-%d %H:%M")
        ),
        _ => "-".to_string(),
    }
}

pub fn print_report(reports: &BTreeMap<String, AssetReport>, params: &TrendlineParams) {
    println!("\n=== Trendline Recon ===\n");
    println!(
        "Chunks: {} | Residual percentile: {}",
        params.num_chunks, params.residual_percentile
    );

    let rows: Vec<TrendlineRow> = reports
        .iter()
        .map(|(asset, report)| {
            let trendline = &report.analysis.trendline;
            TrendlineRow {
                asset: asset.clone(),
                bars: report.span.bars,
                span: format_span(&report.span),
                support_gradient: format!("{:.4}", trendline.support_line_gradient),
                support_start: format!("{:.2}", trendline.support_line_start),
                support_end: format!("{:.2}", trendline.support_line_end),
                resistance_gradient: format!("{:.4}", trendline.resistance_line_gradient),
                resistance_start: format!("{:.2}", trendline.resistance_line_start),
                resistance_end: format!("{:.2}", trendline.resistance_line_end),
                residual_std_dev: format!("{:.4}", report.analysis.residual_std_dev),
                points: format!(
                    "{}/{}",
                    report.analysis.support_candidates.len(),
                    report.analysis.resistance_candidates.len()
                ),
            }
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("\n{table}\n");
}

pub fn render_json(trendlines: &BTreeMap<String, Trendline>) -> Result<String> {
    Ok(serde_json::to_string_pretty(trendlines)?)
}
