//! JSON cache for scraped data.
//!
//! Scrapes are slow and rate-limited, so each feed is persisted after a
//! successful run: `cache_locations.json` for candidate businesses,
//! `cache_atms.json` for existing ATMs. Analysis-only runs load from here
//! instead of hitting the network. A missing file is a normal condition
//! (`Ok(None)`); a malformed file is a structural fault.

use std::path::{Path, PathBuf};

use atmscout_core::{AtmLocation, CandidateLocation};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ScraperError;

const LOCATIONS_FILE: &str = "cache_locations.json";
const ATMS_FILE: &str = "cache_atms.json";

/// Filesystem cache rooted at the configured cache directory.
pub struct ScrapeCache {
    dir: PathBuf,
}

impl ScrapeCache {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Persists the candidate-business feed.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::CacheIo`] if the directory cannot be created
    /// or the file cannot be written.
    pub fn save_locations(&self, locations: &[CandidateLocation]) -> Result<(), ScraperError> {
        self.save(LOCATIONS_FILE, locations)
    }

    /// Persists the existing-ATM feed.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::CacheIo`] if the directory cannot be created
    /// or the file cannot be written.
    pub fn save_atms(&self, atms: &[AtmLocation]) -> Result<(), ScraperError> {
        self.save(ATMS_FILE, atms)
    }

    /// Loads the candidate-business feed, `Ok(None)` if never scraped.
    ///
    /// # Errors
    ///
    /// [`ScraperError::CacheIo`] on read failure other than not-found,
    /// [`ScraperError::CacheParse`] if the file exists but is malformed.
    pub fn load_locations(&self) -> Result<Option<Vec<CandidateLocation>>, ScraperError> {
        self.load(LOCATIONS_FILE)
    }

    /// Loads the existing-ATM feed, `Ok(None)` if never scraped.
    ///
    /// # Errors
    ///
    /// Same as [`ScrapeCache::load_locations`].
    pub fn load_atms(&self) -> Result<Option<Vec<AtmLocation>>, ScraperError> {
        self.load(ATMS_FILE)
    }

    fn save<T: Serialize>(&self, file_name: &str, value: &[T]) -> Result<(), ScraperError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| ScraperError::CacheIo {
            path: self.dir.display().to_string(),
            source: e,
        })?;
        let path = self.dir.join(file_name);
        let json = serde_json::to_string_pretty(value).map_err(|e| ScraperError::CacheParse {
            path: path.display().to_string(),
            source: e,
        })?;
        std::fs::write(&path, json).map_err(|e| ScraperError::CacheIo {
            path: path.display().to_string(),
            source: e,
        })?;
        tracing::debug!(path = %path.display(), records = value.len(), "cache file written");
        Ok(())
    }

    fn load<T: DeserializeOwned>(&self, file_name: &str) -> Result<Option<Vec<T>>, ScraperError> {
        let path = self.dir.join(file_name);
        let json = match std::fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(ScraperError::CacheIo {
                    path: path.display().to_string(),
                    source: e,
                })
            }
        };
        let records = serde_json::from_str(&json).map_err(|e| ScraperError::CacheParse {
            path: path.display().to_string(),
            source: e,
        })?;
        Ok(Some(records))
    }

    #[must_use]
    pub fn locations_path(&self) -> PathBuf {
        self.dir.join(LOCATIONS_FILE)
    }

    #[must_use]
    pub fn atms_path(&self) -> PathBuf {
        self.dir.join(ATMS_FILE)
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}
