use std::collections::HashMap;
use std::sync::Arc;

use crate::assets::{placeholder_favicon, placeholder_logo};
use crate::datasource::DataSource;
use crate::errors::DataSourceError;
use crate::models::{AssetMetadata, AuthenticationCredentials, Website};

/// Request-scoped composition over the three loaded collections. Built
/// fresh per request from the (cache-backed) datasource, so a warm cache
/// makes construction cheap.
pub struct CatalogService {
    websites: Arc<Vec<Website>>,
    credentials: HashMap<String, AuthenticationCredentials>,
    assets: HashMap<String, AssetMetadata>,
}

impl CatalogService {
    pub async fn load(data_source: &DataSource) -> Result<Self, DataSourceError> {
        let websites = data_source.load_websites().await?;
        let credentials = data_source
            .load_auth_credentials()
            .await?
            .iter()
            .cloned()
            .map(|c| (c.website_id.clone(), c))
            .collect();
        let assets = data_source
            .load_asset_metadata()
            .await?
            .iter()
            .cloned()
            .map(|a| (a.website_id.clone(), a))
            .collect();

        Ok(Self {
            websites,
            credentials,
            assets,
        })
    }

    pub fn all_websites(&self) -> &[Website] {
        &self.websites
    }

    pub fn website_by_id(&self, id: &str) -> Option<&Website> {
        self.websites.iter().find(|w| w.id == id)
    }

    pub fn credentials_for(&self, id: &str) -> Option<&AuthenticationCredentials> {
        self.credentials.get(id)
    }

    /// `None` when the website id is unknown or no favicon is registered
    /// for it; the route layer maps that to a 404.
    pub fn website_favicon(&self, id: &str) -> Option<Vec<u8>> {
        self.website_by_id(id)?;
        let assets = self.assets.get(id)?;
        if !assets.has_favicon {
            return None;
        }
        Some(placeholder_favicon())
    }

    pub fn website_logo(&self, id: &str) -> Option<Vec<u8>> {
        let website = self.website_by_id(id)?;
        let assets = self.assets.get(id)?;
        if !assets.has_logo {
            return None;
        }
        Some(placeholder_logo(&website.name))
    }
}
