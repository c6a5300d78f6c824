//! reqwest-backed resource client

use crate::wire::{EntityDetail, EvolutionChainRecord, IndexPage, NamedList, SpeciesRecord};
use crate::ResourceClient;
use async_trait::async_trait;
use dexter_core::config::UpstreamConfig;
use dexter_core::error::{Error, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info, warn};

/// HTTP client for the upstream REST API
pub struct HttpResourceClient {
    client: Client,
    base_url: String,
    entity_resource: String,
}

impl HttpResourceClient {
    /// Create a new client
    ///
    /// Fails with a configuration error if `upstream.base_url` is missing.
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let base_url = config.base_url()?.to_string();
        let entity_resource = config.entity_resource.trim_matches('/').to_string();

        info!("Initializing upstream resource client");
        info!("  Base URL: {base_url}");
        info!("  Entity resource: {entity_resource}");
        info!("  Timeout: {}s", config.timeout_secs);

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| Error::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            entity_resource,
        })
    }

    pub fn index_url(&self, offset: usize, limit: usize) -> String {
        format!(
            "{}/{}/?offset={offset}&limit={limit}",
            self.base_url, self.entity_resource
        )
    }

    pub fn entity_url(&self, name: &str) -> String {
        format!("{}/{}/{name}", self.base_url, self.entity_resource)
    }

    pub fn taxonomy_url(&self, family: &str) -> String {
        format!("{}/{family}", self.base_url)
    }

    /// GET a URL and decode the JSON body
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!("GET {url}");

        let response = self.client.get(url).send().await.map_err(|e| {
            let error_kind = if e.is_timeout() {
                "timeout"
            } else if e.is_connect() {
                "connection"
            } else if e.is_request() {
                "request build"
            } else if e.is_body() {
                "body"
            } else {
                "unknown"
            };
            warn!("GET {url} failed ({error_kind}): {e}");
            Error::upstream(url, None, format!("request failed ({error_kind}): {e}"))
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            warn!("GET {url} returned {status}");
            return Err(Error::upstream(
                url,
                Some(status.as_u16()),
                format!("returned {status}: {error_text}"),
            ));
        }

        let body = response.bytes().await.map_err(|e| {
            Error::upstream(url, Some(status.as_u16()), format!("failed to read body: {e}"))
        })?;

        serde_json::from_slice(&body).map_err(|e| Error::parse(url, e.to_string()))
    }
}

#[async_trait]
impl ResourceClient for HttpResourceClient {
    async fn fetch_index_page(&self, offset: usize, limit: usize) -> Result<IndexPage> {
        self.get_json(&self.index_url(offset, limit)).await
    }

    async fn fetch_entity(&self, url: &str) -> Result<EntityDetail> {
        self.get_json(url).await
    }

    async fn fetch_entity_by_name(&self, name: &str) -> Result<EntityDetail> {
        self.get_json(&self.entity_url(name)).await
    }

    async fn fetch_species(&self, url: &str) -> Result<SpeciesRecord> {
        self.get_json(url).await
    }

    async fn fetch_evolution_chain(&self, url: &str) -> Result<EvolutionChainRecord> {
        self.get_json(url).await
    }

    async fn list_types(&self) -> Result<Vec<String>> {
        let list: NamedList = self.get_json(&self.taxonomy_url("type")).await?;
        Ok(list.into_names())
    }

    async fn list_generations(&self) -> Result<Vec<String>> {
        let list: NamedList = self.get_json(&self.taxonomy_url("generation")).await?;
        Ok(list.into_names())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn client(base_url: &str) -> HttpResourceClient {
        let config = UpstreamConfig {
            base_url: Some(base_url.to_string()),
            ..UpstreamConfig::default()
        };
        HttpResourceClient::new(&config).expect("client")
    }

    #[test]
    fn test_urls_are_built_from_base() {
        let client = client("https://pokeapi.co/api/v2/");
        assert_eq!(
            client.index_url(100, 100),
            "https://pokeapi.co/api/v2/pokemon/?offset=100&limit=100"
        );
        assert_eq!(
            client.entity_url("pikachu"),
            "https://pokeapi.co/api/v2/pokemon/pikachu"
        );
        assert_eq!(
            client.taxonomy_url("generation"),
            "https://pokeapi.co/api/v2/generation"
        );
    }

    #[test]
    fn test_missing_base_url_is_config_error() {
        let result = HttpResourceClient::new(&UpstreamConfig::default());
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[tokio::test]
    async fn test_connection_failure_is_upstream_error() {
        // Port 9 (discard) on localhost is not expected to serve HTTP
        let client = client("http://127.0.0.1:9");
        let err = client.fetch_index_page(0, 1).await.unwrap_err();
        assert!(matches!(err, Error::Upstream { status: None, .. }));
    }
}
