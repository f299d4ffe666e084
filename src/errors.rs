use thiserror::Error;

/// Unexpected datasource failures that surface as 500s at the route layer.
///
/// A missing or unparseable data file is deliberately *not* represented
/// here: the loader degrades those to an empty dataset with a warning so a
/// broken file never fails an endpoint.
#[derive(Debug, Error)]
pub enum DataSourceError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to serialize {what}: {source}")]
    Serialize {
        what: &'static str,
        source: serde_json::Error,
    },
}
