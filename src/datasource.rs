use serde::de::DeserializeOwned;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cache::TtlCache;
use crate::errors::DataSourceError;
use crate::models::{AssetMetadata, AuthenticationCredentials, Website};

pub const WEBSITES_CACHE_KEY: &str = "websites";
pub const CREDENTIALS_CACHE_KEY: &str = "auth_credentials";
pub const ASSETS_CACHE_KEY: &str = "asset_metadata";

const WEBSITES_FILE: &str = "websites.json";
const CREDENTIALS_FILE: &str = "auth-credentials.json";
const ASSETS_FILE: &str = "asset-metadata.json";

/// One of the three datasets the loader serves from a single cache.
#[derive(Clone)]
pub enum Dataset {
    Websites(Arc<Vec<Website>>),
    Credentials(Arc<Vec<AuthenticationCredentials>>),
    Assets(Arc<Vec<AssetMetadata>>),
}

/// Outcome of reading one data file. `Empty` covers a missing file and
/// unparseable content; it degrades to an empty dataset and never surfaces
/// as an error to callers.
enum FileRead<T> {
    Records(Vec<T>),
    Empty,
}

/// Reads JSON data files from the data directory, writing successful loads
/// through the injected cache. Cheap to clone; clones share the cache.
#[derive(Clone)]
pub struct DataSource {
    data_dir: PathBuf,
    cache: Arc<TtlCache<Dataset>>,
}

impl DataSource {
    pub fn new(data_dir: impl Into<PathBuf>, cache: Arc<TtlCache<Dataset>>) -> Self {
        Self {
            data_dir: data_dir.into(),
            cache,
        }
    }

    pub fn cache(&self) -> &TtlCache<Dataset> {
        &self.cache
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    async fn read_records<T: DeserializeOwned>(
        &self,
        file: &str,
    ) -> Result<FileRead<T>, DataSourceError> {
        let path = self.data_dir.join(file);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::warn!(
                    "Data file {} not found, serving empty dataset",
                    path.display()
                );
                return Ok(FileRead::Empty);
            }
            Err(e) => {
                return Err(DataSourceError::Read {
                    path: path.display().to_string(),
                    source: e,
                });
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(records) => Ok(FileRead::Records(records)),
            Err(e) => {
                log::warn!(
                    "Malformed JSON in {}, serving empty dataset: {e}",
                    path.display()
                );
                Ok(FileRead::Empty)
            }
        }
    }

    /// Cached load of `websites.json`. Records missing a tech stack come
    /// back default-filled (hydration applies the default, so the filled
    /// list is what lands in the cache). A missing or corrupt file yields
    /// an empty list without caching it, so the next request retries.
    pub async fn load_websites(&self) -> Result<Arc<Vec<Website>>, DataSourceError> {
        if let Some(Dataset::Websites(cached)) = self.cache.get(WEBSITES_CACHE_KEY) {
            return Ok(cached);
        }

        let websites = match self.read_records::<Website>(WEBSITES_FILE).await? {
            FileRead::Records(records) => Arc::new(records),
            FileRead::Empty => return Ok(Arc::new(Vec::new())),
        };

        self.cache
            .set(WEBSITES_CACHE_KEY, Dataset::Websites(Arc::clone(&websites)));
        Ok(websites)
    }

    pub async fn load_auth_credentials(
        &self,
    ) -> Result<Arc<Vec<AuthenticationCredentials>>, DataSourceError> {
        if let Some(Dataset::Credentials(cached)) = self.cache.get(CREDENTIALS_CACHE_KEY) {
            return Ok(cached);
        }

        let credentials = match self
            .read_records::<AuthenticationCredentials>(CREDENTIALS_FILE)
            .await?
        {
            FileRead::Records(records) => Arc::new(records),
            FileRead::Empty => return Ok(Arc::new(Vec::new())),
        };

        self.cache.set(
            CREDENTIALS_CACHE_KEY,
            Dataset::Credentials(Arc::clone(&credentials)),
        );
        Ok(credentials)
    }

    pub async fn load_asset_metadata(&self) -> Result<Arc<Vec<AssetMetadata>>, DataSourceError> {
        if let Some(Dataset::Assets(cached)) = self.cache.get(ASSETS_CACHE_KEY) {
            return Ok(cached);
        }

        let assets = match self.read_records::<AssetMetadata>(ASSETS_FILE).await? {
            FileRead::Records(records) => Arc::new(records),
            FileRead::Empty => return Ok(Arc::new(Vec::new())),
        };

        self.cache
            .set(ASSETS_CACHE_KEY, Dataset::Assets(Arc::clone(&assets)));
        Ok(assets)
    }

    /// Serializes the list to `websites.json` via a temp file and rename so
    /// a concurrent reader never sees a partial write.
    ///
    /// Does NOT invalidate the `websites` cache entry: reads after a save
    /// return the previously cached list until TTL expiry. Callers that
    /// need immediate freshness must call `cache().clear()` themselves.
    pub async fn save_websites(&self, websites: &[Website]) -> Result<(), DataSourceError> {
        let path = self.data_dir.join(WEBSITES_FILE);
        let json = serde_json::to_vec_pretty(websites).map_err(|e| DataSourceError::Serialize {
            what: "websites",
            source: e,
        })?;

        tokio::fs::create_dir_all(&self.data_dir)
            .await
            .map_err(|e| DataSourceError::Write {
                path: self.data_dir.display().to_string(),
                source: e,
            })?;

        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &json)
            .await
            .map_err(|e| DataSourceError::Write {
                path: tmp.display().to_string(),
                source: e,
            })?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| DataSourceError::Write {
                path: path.display().to_string(),
                source: e,
            })?;

        Ok(())
    }
}
