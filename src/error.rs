use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Schema errors – the table loaded but is not a happiness dataset
// ---------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("no {role} column found (looked for {candidates:?})")]
    MissingColumn {
        role: &'static str,
        candidates: &'static [&'static str],
    },
    #[error("table has no rows")]
    Empty,
}

// ---------------------------------------------------------------------------
// Source errors – a single data source attempt failed
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server answered with HTTP {0}")]
    Status(u16),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("no candidate paths configured")]
    NoCandidates,

    #[error("could not parse data: {0:#}")]
    Parse(anyhow::Error),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("no file selected")]
    Cancelled,
}

// ---------------------------------------------------------------------------
// Load errors – the whole fallback chain failed
// ---------------------------------------------------------------------------

/// One failed attempt in the fallback chain.
#[derive(Debug)]
pub struct SourceFailure {
    pub source: String,
    pub error: SourceError,
}

impl fmt::Display for SourceFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.source, self.error)
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no data source configured")]
    NoSources,

    #[error("all data sources failed:\n{}", format_failures(.0))]
    AllSourcesFailed(Vec<SourceFailure>),
}

fn format_failures(failures: &[SourceFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("  - {f}"))
        .collect::<Vec<_>>()
        .join("\n")
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_sources_failed_lists_every_attempt() {
        let err = LoadError::AllSourcesFailed(vec![
            SourceFailure {
                source: "remote https://example.org/data.csv".into(),
                error: SourceError::Status(404),
            },
            SourceFailure {
                source: "local paths".into(),
                error: SourceError::NotFound(PathBuf::from("data.csv")),
            },
        ]);
        let msg = err.to_string();
        assert!(msg.contains("HTTP 404"));
        assert!(msg.contains("file not found: data.csv"));
        assert_eq!(msg.lines().count(), 3);
    }
}
