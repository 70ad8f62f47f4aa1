use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use csv::StringRecord;
use thiserror::Error;
use trendlines::Bar;

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("input file contains no valid rows")]
    Empty,

    #[error("header has no '{0}' column")]
    MissingColumn(&'static str),

    #[error("unable to parse timestamp '{0}'")]
    Timestamp(String),

    #[error("row {row}: failed to parse numeric field '{field}' from value '{value}'")]
    ParseNumber {
        row: usize,
        field: &'static str,
        value: String,
    },
}

const TIMESTAMP_COLUMNS: [&str; 4] = ["date", "datetime", "timestamp", "time"];

struct Columns {
    high: usize,
    low: usize,
    timestamp: Option<usize>,
}

impl Columns {
    fn from_header(header: &StringRecord) -> Result<Self, LoaderError> {
        let find = |name: &str| {
            header
                .iter()
                .position(|field| field.trim().eq_ignore_ascii_case(name))
        };
        Ok(Self {
            high: find("high").ok_or(LoaderError::MissingColumn("high"))?,
            low: find("low").ok_or(LoaderError::MissingColumn("low"))?,
            timestamp: TIMESTAMP_COLUMNS.iter().find_map(|name| find(*name)),
        })
    }
}

pub fn load_bars_from_csv<P: AsRef<Path>>(path: P) -> Result<Vec<Bar>> {
    let path_ref = path.as_ref();
    let file = File::open(path_ref).with_context(|| format!("failed to open {:?}", path_ref))?;
    load_bars_from_reader(file).with_context(|| format!("failed to read bars from {:?}", path_ref))
}

/// Bars in file order. Rows are expected to already be in time order.
pub fn load_bars_from_reader<R: Read>(reader: R) -> Result<Vec<Bar>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let columns = Columns::from_header(reader.headers()?)?;

    let mut bars = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        bars.push(parse_record(&record, &columns, row + 1)?);
    }

    if bars.is_empty() {
        return Err(LoaderError::Empty.into());
    }
    Ok(bars)
}

fn parse_record(record: &StringRecord, columns: &Columns, row: usize) -> Result<Bar> {
    let timestamp = match columns.timestamp.and_then(|idx| record.get(idx)) {
        Some(value) if !value.trim().is_empty() => Some(parse_timestamp(value)?),
        _ => None,
    };
    Ok(Bar {
        timestamp,
        high: parse_number(record.get(columns.high), "high", row)?,
        low: parse_number(record.get(columns.low), "low", row)?,
    })
}

fn parse_number(value: Option<&str>, field: &'static str, row: usize) -> Result<f64> {
    let value = value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| LoaderError::ParseNumber {
            row,
            field,
            value: String::from("<missing>"),
        })?;
    value
        .replace(',', "")
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
        .ok_or_else(|| LoaderError::ParseNumber {
            row,
            field,
            value: value.to_string(),
        })
        .map_err(anyhow::Error::from)
}

fn parse_timestamp(value: &str) -> Result<NaiveDateTime> {
    let trimmed = value.trim();
    let datetime_patterns = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M:%S",
        "%m/%d/%Y %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
    ];
    for pattern in &datetime_patterns {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, pattern) {
            return Ok(datetime);
        }
    }

    let date_patterns = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
    for pattern in &date_patterns {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, pattern) {
            return Ok(NaiveDateTime::new(date, NaiveTime::default()));
        }
    }

    Err(LoaderError::Timestamp(trimmed.to_string()).into())
}
