use std::path::PathBuf;

use thiserror::Error;

/// Fatal dashboard errors. Everything else (unknown site, empty selection,
/// inverted range) yields empty results instead.
#[derive(Debug, Error)]
pub enum DashError {
    /// The dataset file is missing, unreadable or malformed.
    #[error("failed to load dataset {}", path.display())]
    DataLoad {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    /// Payload bounds were requested on a table with no records.
    #[error("dataset contains no launch records")]
    EmptyDataset,

    /// The configuration file exists but could not be parsed.
    #[error("invalid configuration file {}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },
}
