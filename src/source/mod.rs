//! Source resolution: acquiring one snapshot per run
//!
//! The resolver is total: `resolve()` always yields a renderable snapshot.
//! Acquisition itself is fallible and explicit (`acquire()` returns a
//! `Result`), and every failure is converted into the built-in sample with
//! degraded provenance, so callers can tell a fallback capture from a
//! healthy one without inspecting logs.

pub mod sample;

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::DataSourceConfig;
use crate::snapshot::{Provenance, Snapshot, SourceKind};

/// Fixed timeout for the remote strategy
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors that can occur while acquiring a snapshot
#[derive(Debug, Error)]
pub enum AcquisitionError {
    /// HTTP request failed (connect, timeout, body read)
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// HTTP request completed with a non-success status
    #[error("request to {url} returned status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    /// Local data file could not be read
    #[error("failed to read data file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Payload was not valid JSON
    #[error("malformed JSON payload from {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    /// Strategy is reserved but not implemented
    #[error("{kind} acquisition is not implemented")]
    Unimplemented { kind: SourceKind },
}

/// Acquisition strategy, fixed at construction
#[derive(Debug, Clone)]
enum Strategy {
    Remote { url: String },
    LocalFile { path: PathBuf },
    Database,
    BuiltinSample,
}

impl Strategy {
    fn kind(&self) -> SourceKind {
        match self {
            Strategy::Remote { .. } => SourceKind::Api,
            Strategy::LocalFile { .. } => SourceKind::Json,
            Strategy::Database => SourceKind::Database,
            Strategy::BuiltinSample => SourceKind::Sample,
        }
    }
}

/// Produces one immutable snapshot per invocation
#[derive(Debug, Clone)]
pub struct SourceResolver {
    strategy: Strategy,
}

impl SourceResolver {
    /// Select the strategy from configuration. Unknown `type` values fall
    /// back to the built-in sample with a warning; an empty/unset type means
    /// the sample was chosen deliberately, so no warning is emitted.
    pub fn from_config(config: &DataSourceConfig) -> Self {
        let strategy = match config.source_type.as_str() {
            "api" => Strategy::Remote {
                url: config.url.clone(),
            },
            "json" => Strategy::LocalFile {
                path: config.json_path.clone(),
            },
            "database" => Strategy::Database,
            "" => Strategy::BuiltinSample,
            other => {
                warn!(source_type = other, "unknown data source type, using built-in sample");
                Strategy::BuiltinSample
            }
        };
        SourceResolver { strategy }
    }

    /// Resolver that always yields the built-in sample
    pub fn builtin_sample() -> Self {
        SourceResolver {
            strategy: Strategy::BuiltinSample,
        }
    }

    /// Acquire and wrap a snapshot. Total: on any acquisition error the
    /// built-in sample is substituted and the snapshot is marked degraded.
    pub fn resolve(&self) -> Snapshot {
        let kind = self.strategy.kind();
        let now = chrono::Local::now();
        match self.acquire() {
            Ok(data) => {
                debug!(strategy = %kind, "snapshot acquired");
                Snapshot::new(
                    data,
                    Provenance {
                        strategy: kind,
                        degraded: false,
                    },
                    now,
                )
            }
            Err(error) => {
                warn!(strategy = %kind, %error, "acquisition failed, falling back to built-in sample");
                Snapshot::new(
                    sample::data(),
                    Provenance {
                        strategy: kind,
                        degraded: true,
                    },
                    now,
                )
            }
        }
    }

    /// Strict acquisition, one attempt, no fallback
    fn acquire(&self) -> Result<Value, AcquisitionError> {
        match &self.strategy {
            Strategy::Remote { url } => fetch_remote(url),
            Strategy::LocalFile { path } => read_local(path),
            Strategy::Database => Err(AcquisitionError::Unimplemented {
                kind: SourceKind::Database,
            }),
            Strategy::BuiltinSample => Ok(sample::data()),
        }
    }
}

fn fetch_remote(url: &str) -> Result<Value, AcquisitionError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|source| AcquisitionError::Http {
            url: url.to_owned(),
            source,
        })?;

    info!(url, "fetching snapshot");
    let response = client
        .get(url)
        .header(reqwest::header::CONTENT_TYPE, "application/json")
        .send()
        .map_err(|source| AcquisitionError::Http {
            url: url.to_owned(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(AcquisitionError::Status {
            url: url.to_owned(),
            status,
        });
    }

    let body = response.text().map_err(|source| AcquisitionError::Http {
        url: url.to_owned(),
        source,
    })?;
    serde_json::from_str(&body).map_err(|source| AcquisitionError::Parse {
        origin: url.to_owned(),
        source,
    })
}

fn read_local(path: &Path) -> Result<Value, AcquisitionError> {
    let content = std::fs::read_to_string(path).map_err(|source| AcquisitionError::Io {
        path: path.to_owned(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| AcquisitionError::Parse {
        origin: path.display().to_string(),
        source,
    })
}
