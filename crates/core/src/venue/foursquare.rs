//! Venue search and menu fetch over the Foursquare v2 venues API.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Local;
use reqwest::{Client, Request};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::VenueConfig;
use crate::domain::restaurant::VenueId;
use crate::errors::ProviderError;
use crate::venue::wire::{MenuResponse, VenueSearchResponse};
use crate::venue::VenueProvider;

#[derive(Clone, Debug)]
pub struct FoursquareClient {
    client: Client,
    base_url: String,
    client_id: SecretString,
    client_secret: SecretString,
    version: Option<String>,
}

impl FoursquareClient {
    pub fn new(config: &VenueConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|error| ProviderError::Transport(format!("could not build http client: {error}")))?;

        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: Client, config: &VenueConfig) -> Self {
        let base_url = format!("{}/", config.base_url.trim_end_matches('/'));
        Self {
            client,
            base_url,
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            version: config.version.clone(),
        }
    }

    /// The `v` parameter: the configured version, or today's date.
    pub fn version_date(&self) -> String {
        self.version.clone().unwrap_or_else(|| Local::now().format("%Y%m%d").to_string())
    }

    pub fn search_request(&self, query: &str, location: &str) -> Result<Request, ProviderError> {
        let mut params = self.base_params();
        params.push(("near", location.to_string()));
        params.push(("query", query.to_string()));

        self.client
            .get(format!("{}search", self.base_url))
            .query(&params)
            .build()
            .map_err(|error| ProviderError::Transport(error.to_string()))
    }

    pub fn menu_request(&self, venue_id: &VenueId) -> Result<Request, ProviderError> {
        self.client
            .get(format!("{}{}/menu", self.base_url, venue_id))
            .query(&self.base_params())
            .build()
            .map_err(|error| ProviderError::Transport(error.to_string()))
    }

    fn base_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("client_id", self.client_id.expose_secret().to_string()),
            ("client_secret", self.client_secret.expose_secret().to_string()),
            ("v", self.version_date()),
        ]
    }

    async fn execute<T: DeserializeOwned>(&self, request: Request) -> Result<T, ProviderError> {
        let endpoint = request.url().path().to_string();
        debug!(event_name = "venue.request.sent", endpoint = %endpoint, "calling venue provider");

        let response = self.client.execute(request).await.map_err(|error| {
            // The URL carries the client secret in its query string.
            let error = error.without_url();
            warn!(
                event_name = "venue.request.failed",
                endpoint = %endpoint,
                error = %error,
                "venue provider request failed"
            );
            ProviderError::Transport(error.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(
                event_name = "venue.request.rejected",
                endpoint = %endpoint,
                status = status.as_u16(),
                "venue provider returned non-success status"
            );
            return Err(ProviderError::Status { status: status.as_u16() });
        }

        let body = response
            .bytes()
            .await
            .map_err(|error| ProviderError::Transport(error.without_url().to_string()))?;
        serde_json::from_slice(&body).map_err(|error| ProviderError::Decode(error.to_string()))
    }
}

#[async_trait]
impl VenueProvider for FoursquareClient {
    async fn search_venues(
        &self,
        query: &str,
        location: &str,
    ) -> Result<VenueSearchResponse, ProviderError> {
        let request = self.search_request(query, location)?;
        self.execute(request).await
    }

    async fn fetch_menu(&self, venue_id: &VenueId) -> Result<MenuResponse, ProviderError> {
        let request = self.menu_request(venue_id)?;
        self.execute(request).await
    }
}
