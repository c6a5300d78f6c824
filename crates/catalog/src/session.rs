//! Catalog session: the query surface consumed by the presentation layer
//!
//! A session is built once per consumer and shared by reference. It owns
//! the catalog (through its builder) for its whole lifetime; dropping the
//! session discards the catalog.

use crate::builder::{BatchOutcome, CatalogBuilder};
use crate::catalog::{CatalogSnapshot, CatalogStatus};
use crate::detail::DetailResolver;
use crate::view::{view, CatalogPage};
use dexter_core::config::{CatalogConfig, Config};
use dexter_core::error::Result;
use dexter_core::{DetailRecord, FilterCriteria};
use dexter_upstream::{create_resource_client, ResourceClient};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

pub struct CatalogSession {
    client: Arc<dyn ResourceClient>,
    builder: Arc<CatalogBuilder>,
    detail: DetailResolver,
    page_size: usize,
    expected_total: usize,
}

impl CatalogSession {
    /// Create a session over an existing client
    pub fn new(client: Arc<dyn ResourceClient>, config: &CatalogConfig) -> Self {
        let builder = Arc::new(CatalogBuilder::new(Arc::clone(&client), config));
        let detail = DetailResolver::new(
            Arc::clone(&client),
            config.max_chain_depth,
            config.max_concurrent_joins,
        );

        Self {
            client,
            builder,
            detail,
            page_size: config.page_size,
            expected_total: config.expected_total,
        }
    }

    /// Validate the configuration and create a session backed by the HTTP client
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        let client = create_resource_client(&config.upstream)?;
        Ok(Self::new(client, &config.catalog))
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Approximate catalog size, for progress reporting
    pub fn expected_total(&self) -> usize {
        self.expected_total
    }

    /// Load the first batch if nothing has been loaded yet, then snapshot
    ///
    /// If another caller already has a batch in flight, waits for the
    /// catalog to gain its first entities rather than for loading to stop.
    /// When that batch fails, the first batch is requested again here so
    /// its error reaches this caller too.
    pub async fn load_initial_batch(&self) -> Result<CatalogSnapshot> {
        let mut status_rx = self.builder.subscribe();

        loop {
            let _ = status_rx.borrow_and_update();
            {
                let catalog = self.builder.read().await;
                if !catalog.is_empty() || catalog.is_complete() {
                    break;
                }
            }

            match self.builder.load_next_batch().await? {
                BatchOutcome::AlreadyLoading => {
                    if status_rx.changed().await.is_err() {
                        break;
                    }
                }
                BatchOutcome::Loaded { .. } | BatchOutcome::Complete => break,
            }
        }

        Ok(self.builder.snapshot().await)
    }

    /// Advance by one batch; a no-op when complete or already loading
    pub async fn load_next_batch(&self) -> Result<BatchOutcome> {
        self.builder.load_next_batch().await
    }

    /// Load every remaining batch, one after another
    pub async fn load_remaining(&self) -> Result<usize> {
        self.builder.load_remaining().await
    }

    /// Load the remaining batches on a background task
    ///
    /// Each batch starts when the previous one completes. The task stops at
    /// completion or at the first failed batch; a failure can be retried by
    /// calling this again or [`CatalogSession::load_next_batch`].
    pub fn spawn_background_load(&self) -> JoinHandle<Result<usize>> {
        let builder = Arc::clone(&self.builder);
        tokio::spawn(async move {
            match builder.load_remaining().await {
                Ok(batches) => {
                    info!(
                        "Background catalog load finished after {batches} batches ({} entities)",
                        builder.status().loaded
                    );
                    Ok(batches)
                }
                Err(e) => {
                    warn!("Background catalog load stopped: {e}");
                    Err(e)
                }
            }
        })
    }

    pub async fn list_types(&self) -> Result<Vec<String>> {
        self.client.list_types().await
    }

    pub async fn list_generations(&self) -> Result<Vec<String>> {
        self.client.list_generations().await
    }

    /// Filter and paginate the catalog as loaded so far
    pub async fn query_catalog(&self, criteria: &FilterCriteria, page: usize) -> CatalogPage {
        let catalog = self.builder.read().await;
        view(catalog.entities(), criteria, page, self.page_size)
    }

    /// Detail record for one entity, fetched fresh from the upstream
    pub async fn get_entity_detail(&self, name: &str) -> Result<DetailRecord> {
        self.detail.resolve(name).await
    }

    pub async fn snapshot(&self) -> CatalogSnapshot {
        self.builder.snapshot().await
    }

    pub fn status(&self) -> CatalogStatus {
        self.builder.status()
    }

    pub fn subscribe(&self) -> watch::Receiver<CatalogStatus> {
        self.builder.subscribe()
    }
}
