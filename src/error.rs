use thiserror::Error;

pub type Result<T> = std::result::Result<T, TrendlineError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrendlineError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("insufficient data: {0}")]
    InsufficientData(String),

    #[error("numeric overflow: {0}")]
    NumericOverflow(String),

    #[error("malformed input: bar {index} has non-finite {field} value {value}")]
    MalformedInput {
        index: usize,
        field: &'static str,
        value: f64,
    },

    #[error("asset '{asset}': {source}")]
    Asset {
        asset: String,
        #[source]
        source: Box<TrendlineError>,
    },
}

impl TrendlineError {
    pub fn for_asset(self, asset: impl Into<String>) -> Self {
        TrendlineError::Asset {
            asset: asset.into(),
            source: Box::new(self),
        }
    }

    /// Innermost error, skipping any asset wrappers.
    pub fn root(&self) -> &TrendlineError {
        match self {
            TrendlineError::Asset { source, .. } => source.root(),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_wrapper_names_the_asset() {
        let err = TrendlineError::InsufficientData("need at least 2 bars".into()).for_asset("BTC");
        assert_eq!(
            err.to_string(),
            "asset 'BTC': insufficient data: need at least 2 bars"
        );
        assert!(matches!(err.root(), TrendlineError::InsufficientData(_)));
    }
}
