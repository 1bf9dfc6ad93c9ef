use std::path::PathBuf;

use thiserror::Error;

/// Feil fra en `Scorer`. Den lokale heuristikken gir aldri feil; disse kommer
/// fra /score-kallet og må aldri tolkes som et Green-resultat.
#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("scoring API is not configured for this host")]
    NotConfigured,

    #[error("transport error calling scoring API: {0}")]
    Transport(String),

    #[error("scoring API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("could not decode scoring payload at {path}: {message}")]
    Decode { path: String, message: String },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed for {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("stored value under '{key}' is not valid JSON: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not encode value for '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config parse error at {path}: {message}")]
    Parse { path: String, message: String },
}
