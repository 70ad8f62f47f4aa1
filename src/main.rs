mod config;
mod loader;
mod output;

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Parser;
use itertools::Itertools;
use log::{info, warn};
use trendlines::{analyze_series, calculate_trendlines_multiple, Bar};

use config::AppConfig;
use loader::load_bars_from_csv;
use output::{print_report, render_json, AssetReport, SeriesSpan};

fn main() -> Result<()> {
    let config = AppConfig::parse();
    let default_level = if config.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
    run(&config)
}

fn asset_id(path: &Path) -> Result<String> {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .with_context(|| format!("cannot derive an asset name from {:?}", path))
}

fn run(config: &AppConfig) -> Result<()> {
    let params = config.params();
    params.validate()?;

    let mut series: BTreeMap<String, Vec<Bar>> = BTreeMap::new();
    for path in &config.inputs {
        if !path.exists() {
            bail!("input file {:?} does not exist", path);
        }
        let asset = asset_id(path)?;
        let bars = load_bars_from_csv(path)
            .with_context(|| format!("failed to load input data for {asset}"))?;
        info!("loaded {} bars for {asset} from {:?}", bars.len(), path);
        if series.insert(asset.clone(), bars).is_some() {
            bail!("asset {asset} was given more than once");
        }
    }

    info!(
        "fitting {} asset(s): {}",
        series.len(),
        series.keys().join(", ")
    );

    if config.json {
        let trendlines = calculate_trendlines_multiple(&series, &params).map_err(|err| {
            warn!("{err}");
            err
        })?;
        println!("{}", render_json(&trendlines)?);
        return Ok(());
    }

    let mut reports = BTreeMap::new();
    for (asset, bars) in &series {
        let analysis = analyze_series(bars, &params)
            .with_context(|| format!("failed to fit trendlines for {asset}"))?;
        info!(
            "{asset}: support {:.4} -> {:.4}, resistance {:.4} -> {:.4}",
            analysis.trendline.support_line_start,
            analysis.trendline.support_line_end,
            analysis.trendline.resistance_line_start,
            analysis.trendline.resistance_line_end
        );
        let span = SeriesSpan {
            bars: bars.len(),
            first: bars.first().and_then(|bar| bar.timestamp),
            last: bars.last().and_then(|bar| bar.timestamp),
        };
        reports.insert(asset.clone(), AssetReport { span, analysis });
    }

    print_report(&reports, &params);
    Ok(())
}
