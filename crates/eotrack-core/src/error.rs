use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("CL_API_KEY is not set: a CourtListener API token is required to refresh dockets")]
    MissingCredential,

    #[error("dataset not found: {}", .0.display())]
    DatasetNotFound(PathBuf),

    #[error("dataset record {index} is malformed: {source}")]
    InvalidRecord {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("docket id {0:?} is not numeric")]
    InvalidDocketId(String),

    #[error("no challenge with docket id {0}")]
    DocketNotFound(String),

    #[error("{url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TrackerError>;
