//! Data-source providers and the prioritised fallback chain.
//!
//! ```text
//!   RemoteSource ──fail──▶ LocalPathsSource ──fail──▶ UploadSource ──fail──▶ LoadError
//!        │ ok                    │ ok                      │ ok
//!        └───────────────────────┴─────────────────────────┴──▶ DatasetCache
//! ```

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use super::loader::{self, FileFormat};
use super::model::{HappinessDataset, RawTable};
use super::prepare::build_dataset;
use crate::error::{LoadError, SourceError, SourceFailure};
use crate::geo::ContinentResolver;

// ---------------------------------------------------------------------------
// SourceKey – identity of a data source for memoization
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SourceKey {
    Url(String),
    Path(PathBuf),
    Upload {
        path: PathBuf,
        len: u64,
        modified: Option<SystemTime>,
    },
}

impl fmt::Display for SourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKey::Url(url) => write!(f, "{url}"),
            SourceKey::Path(path) => write!(f, "{}", path.display()),
            SourceKey::Upload { path, .. } => write!(f, "upload {}", path.display()),
        }
    }
}

// ---------------------------------------------------------------------------
// DataSource – one provider in the chain
// ---------------------------------------------------------------------------

/// A place a happiness table can be fetched from.
pub trait DataSource {
    /// Human-readable label for warnings and the status bar.
    fn describe(&self) -> String;

    /// Identity used by [`DatasetCache`], if it can be known without fetching.
    fn key(&self) -> Option<SourceKey>;

    /// Attempt the fetch. Returns the key the table was actually read from.
    fn fetch(&self) -> Result<(SourceKey, RawTable), SourceError>;
}

/// HTTP(S) download.
pub struct RemoteSource {
    url: String,
    timeout: Duration,
}

impl RemoteSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            timeout,
        }
    }
}

impl DataSource for RemoteSource {
    fn describe(&self) -> String {
        format!("remote {}", self.url)
    }

    fn key(&self) -> Option<SourceKey> {
        Some(SourceKey::Url(self.url.clone()))
    }

    fn fetch(&self) -> Result<(SourceKey, RawTable), SourceError> {
        log::info!("downloading {}", self.url);
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()?;
        let response = client.get(&self.url).send()?;
        if !response.status().is_success() {
            return Err(SourceError::Status(response.status().as_u16()));
        }
        let body = response.bytes()?;
        log::debug!("downloaded {} bytes", body.len());

        let table = loader::load_from_memory(body, FileFormat::from_name(&self.url))
            .map_err(SourceError::Parse)?;
        Ok((SourceKey::Url(self.url.clone()), table))
    }
}

/// Candidate files on disk, tried in order; the first one that exists is
/// read.
pub struct LocalPathsSource {
    candidates: Vec<PathBuf>,
}

impl LocalPathsSource {
    pub fn new(candidates: Vec<PathBuf>) -> Self {
        Self { candidates }
    }

    fn first_existing(&self) -> Option<&Path> {
        self.candidates
            .iter()
            .map(PathBuf::as_path)
            .find(|p| p.is_file())
    }
}

impl DataSource for LocalPathsSource {
    fn describe(&self) -> String {
        let paths: Vec<String> = self
            .candidates
            .iter()
            .map(|p| p.display().to_string())
            .collect();
        format!("local [{}]", paths.join(", "))
    }

    fn key(&self) -> Option<SourceKey> {
        self.first_existing()
            .map(|p| SourceKey::Path(p.to_path_buf()))
    }

    fn fetch(&self) -> Result<(SourceKey, RawTable), SourceError> {
        let Some(last) = self.candidates.last() else {
            return Err(SourceError::NoCandidates);
        };
        let path = self
            .first_existing()
            .ok_or_else(|| SourceError::NotFound(last.clone()))?;
        log::info!("reading {}", path.display());
        let table = loader::load_file(path).map_err(SourceError::Parse)?;
        Ok((SourceKey::Path(path.to_path_buf()), table))
    }
}

/// A file the user picked. `None` means the dialog was cancelled.
pub struct UploadSource {
    path: Option<PathBuf>,
}

impl UploadSource {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    fn upload_key(path: &Path) -> Result<SourceKey, SourceError> {
        let meta = std::fs::metadata(path).map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(SourceKey::Upload {
            path: path.to_path_buf(),
            len: meta.len(),
            modified: meta.modified().ok(),
        })
    }
}

impl DataSource for UploadSource {
    fn describe(&self) -> String {
        match &self.path {
            Some(p) => format!("upload {}", p.display()),
            None => "upload".to_string(),
        }
    }

    fn key(&self) -> Option<SourceKey> {
        self.path
            .as_deref()
            .and_then(|p| Self::upload_key(p).ok())
    }

    fn fetch(&self) -> Result<(SourceKey, RawTable), SourceError> {
        let path = self.path.as_deref().ok_or(SourceError::Cancelled)?;
        let key = Self::upload_key(path)?;
        let table = loader::load_file(path).map_err(SourceError::Parse)?;
        Ok((key, table))
    }
}

// ---------------------------------------------------------------------------
// DatasetCache + fallback chain
// ---------------------------------------------------------------------------

/// Result of a successful chain walk.
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub dataset: Arc<HappinessDataset>,
    pub key: SourceKey,
    /// True when the dataset came out of the cache.
    pub cached: bool,
    /// One line per source that failed before the successful one.
    pub warnings: Vec<String>,
}

/// Loaded-and-derived datasets keyed by where they came from, plus the
/// continent memo shared across loads.
#[derive(Default)]
pub struct DatasetCache {
    entries: HashMap<SourceKey, Arc<HappinessDataset>>,
    resolver: ContinentResolver,
    radar_indicators: Vec<String>,
}

impl DatasetCache {
    pub fn new(radar_indicators: Vec<String>) -> Self {
        Self {
            radar_indicators,
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &SourceKey) -> Option<Arc<HappinessDataset>> {
        self.entries.get(key).cloned()
    }

    fn load_one(
        &mut self,
        source: &dyn DataSource,
    ) -> Result<(SourceKey, Arc<HappinessDataset>, bool), SourceError> {
        if let Some(key) = source.key() {
            if let Some(ds) = self.get(&key) {
                log::debug!("cache hit for {key}");
                return Ok((key, ds, true));
            }
        }
        let (key, table) = source.fetch()?;
        if let Some(ds) = self.get(&key) {
            return Ok((key, ds, true));
        }
        let dataset = Arc::new(build_dataset(
            table,
            &self.radar_indicators,
            &mut self.resolver,
        )?);
        self.entries.insert(key.clone(), Arc::clone(&dataset));
        Ok((key, dataset, false))
    }

    /// Try each source in order and return the first that loads.
    ///
    /// Earlier failures are returned as warnings on success, or collected
    /// into [`LoadError::AllSourcesFailed`] when nothing loads.
    pub fn load_first(&mut self, sources: &[Box<dyn DataSource>]) -> Result<LoadOutcome, LoadError> {
        if sources.is_empty() {
            return Err(LoadError::NoSources);
        }
        let mut failures: Vec<SourceFailure> = Vec::new();
        for source in sources {
            match self.load_one(source.as_ref()) {
                Ok((key, dataset, cached)) => {
                    log::info!("loaded {} records from {key}", dataset.len());
                    return Ok(LoadOutcome {
                        dataset,
                        key,
                        cached,
                        warnings: failures.iter().map(ToString::to_string).collect(),
                    });
                }
                Err(error) => {
                    log::warn!("{} failed: {error}", source.describe());
                    failures.push(SourceFailure {
                        source: source.describe(),
                        error,
                    });
                }
            }
        }
        log::error!("all {} data sources failed", failures.len());
        Err(LoadError::AllSourcesFailed(failures))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::io::Write;

    use super::*;

    const CSV: &str = "Country,Year,Happiness_Score\nFinland,2020,7.8\nChad,2020,4.2\n";

    fn csv_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        write!(file, "{CSV}").unwrap();
        file
    }

    /// Counts fetches so cache behaviour can be observed.
    struct CountingSource {
        path: PathBuf,
        fetches: Cell<usize>,
    }

    impl DataSource for CountingSource {
        fn describe(&self) -> String {
            "counting".into()
        }
        fn key(&self) -> Option<SourceKey> {
            Some(SourceKey::Path(self.path.clone()))
        }
        fn fetch(&self) -> Result<(SourceKey, RawTable), SourceError> {
            self.fetches.set(self.fetches.get() + 1);
            let table = loader::load_file(&self.path).map_err(SourceError::Parse)?;
            Ok((SourceKey::Path(self.path.clone()), table))
        }
    }

    #[test]
    fn local_paths_take_first_existing_candidate() {
        let file = csv_file();
        let source = LocalPathsSource::new(vec![
            PathBuf::from("/definitely/not/here.csv"),
            file.path().to_path_buf(),
        ]);
        let (key, table) = source.fetch().unwrap();
        assert_eq!(key, SourceKey::Path(file.path().to_path_buf()));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn local_paths_report_not_found() {
        let source = LocalPathsSource::new(vec![PathBuf::from("/nope/a.csv")]);
        assert!(matches!(source.fetch(), Err(SourceError::NotFound(_))));
        let empty = LocalPathsSource::new(Vec::new());
        assert!(matches!(empty.fetch(), Err(SourceError::NoCandidates)));
    }

    #[test]
    fn cancelled_upload_fails() {
        let upload = UploadSource::new(None);
        assert!(matches!(upload.fetch(), Err(SourceError::Cancelled)));
        assert!(upload.key().is_none());
    }

    #[test]
    fn chain_falls_back_and_reports_earlier_failures() {
        let file = csv_file();
        let sources: Vec<Box<dyn DataSource>> = vec![
            Box::new(LocalPathsSource::new(vec![PathBuf::from("/nope/a.csv")])),
            Box::new(UploadSource::new(Some(file.path().to_path_buf()))),
        ];
        let mut cache = DatasetCache::new(Vec::new());
        let outcome = cache.load_first(&sources).unwrap();
        assert!(!outcome.cached);
        assert_eq!(outcome.dataset.len(), 2);
        assert_eq!(outcome.warnings.len(), 1);
        assert!(outcome.warnings[0].contains("/nope/a.csv"));
        assert!(matches!(outcome.key, SourceKey::Upload { .. }));
    }

    #[test]
    fn all_sources_failing_is_an_error() {
        let sources: Vec<Box<dyn DataSource>> = vec![
            Box::new(LocalPathsSource::new(vec![PathBuf::from("/nope/a.csv")])),
            Box::new(UploadSource::new(None)),
        ];
        let mut cache = DatasetCache::new(Vec::new());
        match cache.load_first(&sources) {
            Err(LoadError::AllSourcesFailed(failures)) => assert_eq!(failures.len(), 2),
            other => panic!("expected AllSourcesFailed, got {other:?}"),
        }
        assert!(matches!(cache.load_first(&[]), Err(LoadError::NoSources)));
    }

    #[test]
    fn schema_errors_count_as_source_failures() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        write!(file, "Nation,Year\nFinland,2020\n").unwrap();
        let sources: Vec<Box<dyn DataSource>> =
            vec![Box::new(LocalPathsSource::new(vec![file.path().to_path_buf()]))];
        let mut cache = DatasetCache::new(Vec::new());
        match cache.load_first(&sources) {
            Err(LoadError::AllSourcesFailed(failures)) => {
                assert!(matches!(failures[0].error, SourceError::Schema(_)));
            }
            other => panic!("expected AllSourcesFailed, got {other:?}"),
        }
    }

    #[test]
    fn repeated_loads_hit_the_cache() {
        let file = csv_file();
        let source = CountingSource {
            path: file.path().to_path_buf(),
            fetches: Cell::new(0),
        };
        let mut cache = DatasetCache::new(Vec::new());

        let (_, first, cached_first) = cache.load_one(&source).unwrap();
        let (_, second, cached_second) = cache.load_one(&source).unwrap();

        assert!(!cached_first);
        assert!(cached_second);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(source.fetches.get(), 1);
        assert_eq!(cache.len(), 1);
    }
}
