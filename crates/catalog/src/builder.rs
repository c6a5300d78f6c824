//! Incremental catalog builder
//!
//! Loads the upstream index one batch at a time. Each batch is joined with
//! bounded concurrency and merged all-or-nothing; at most one batch is in
//! flight at any moment.

use crate::catalog::{Catalog, CatalogSnapshot, CatalogStatus};
use crate::joiner::DetailJoiner;
use dexter_core::config::CatalogConfig;
use dexter_core::error::{Error, Result};
use dexter_core::CatalogEntity;
use dexter_upstream::ResourceClient;
use futures::stream::{self, StreamExt, TryStreamExt};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, RwLock, RwLockReadGuard};
use tracing::{debug, info, warn};

/// Result of one `load_next_batch` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOutcome {
    /// A batch was fetched, joined and merged
    Loaded {
        offset: usize,
        fetched: usize,
        added: usize,
        complete: bool,
    },
    /// Another batch is in flight; nothing was requested
    AlreadyLoading,
    /// The catalog is complete; nothing was requested
    Complete,
}

/// Owns the catalog and drives its batch-by-batch growth
pub struct CatalogBuilder {
    client: Arc<dyn ResourceClient>,
    joiner: DetailJoiner,
    batch_size: usize,
    max_concurrent_joins: usize,
    catalog: RwLock<Catalog>,
    loading: AtomicBool,
    status_tx: watch::Sender<CatalogStatus>,
}

/// Holds the in-flight flag for one batch; released on drop, including
/// when the loading future is abandoned mid-batch
struct InFlight<'a> {
    flag: &'a AtomicBool,
    status_tx: &'a watch::Sender<CatalogStatus>,
}

impl<'a> InFlight<'a> {
    fn try_acquire(
        flag: &'a AtomicBool,
        status_tx: &'a watch::Sender<CatalogStatus>,
    ) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        status_tx.send_modify(|status| status.loading = true);
        Some(Self { flag, status_tx })
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
        self.status_tx.send_modify(|status| status.loading = false);
    }
}

impl CatalogBuilder {
    pub fn new(client: Arc<dyn ResourceClient>, config: &CatalogConfig) -> Self {
        let joiner = DetailJoiner::new(Arc::clone(&client), config.max_chain_depth);
        let (status_tx, _) = watch::channel(CatalogStatus::default());

        Self {
            client,
            joiner,
            batch_size: config.batch_size.max(1),
            max_concurrent_joins: config.max_concurrent_joins.max(1),
            catalog: RwLock::new(Catalog::new()),
            loading: AtomicBool::new(false),
            status_tx,
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// True while a batch is in flight
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    /// Read access to the catalog for views
    pub async fn read(&self) -> RwLockReadGuard<'_, Catalog> {
        self.catalog.read().await
    }

    pub async fn snapshot(&self) -> CatalogSnapshot {
        self.catalog.read().await.snapshot()
    }

    pub fn status(&self) -> CatalogStatus {
        *self.status_tx.borrow()
    }

    /// Subscribe to status changes
    pub fn subscribe(&self) -> watch::Receiver<CatalogStatus> {
        self.status_tx.subscribe()
    }

    /// Fetch, join and merge the next batch
    ///
    /// A call made while another batch is in flight returns
    /// `AlreadyLoading` without touching the upstream; a call on a complete
    /// catalog returns `Complete`. Failures surface as `Error::CatalogLoad`
    /// and leave the catalog untouched, so calling again retries the same
    /// offset.
    pub async fn load_next_batch(&self) -> Result<BatchOutcome> {
        let Some(_in_flight) = InFlight::try_acquire(&self.loading, &self.status_tx) else {
            debug!("Batch already in flight, ignoring trigger");
            return Ok(BatchOutcome::AlreadyLoading);
        };

        let offset = {
            let catalog = self.catalog.read().await;
            if catalog.is_complete() {
                return Ok(BatchOutcome::Complete);
            }
            self.status_tx.send_replace(CatalogStatus::of(&catalog, true));
            catalog.next_offset()
        };

        info!("Loading catalog batch at offset {offset}");

        let (fetched, joined) = match self.fetch_batch(offset).await {
            Ok(batch) => batch,
            Err(e) => {
                warn!("Catalog batch at offset {offset} failed: {e}");
                return Err(Error::catalog_load(offset, e));
            }
        };

        let mut catalog = self.catalog.write().await;
        let added = catalog.merge_batch(joined, fetched, self.batch_size);
        let complete = catalog.is_complete();
        self.status_tx.send_replace(CatalogStatus::of(&catalog, true));

        info!(
            "Catalog batch at offset {offset}: {fetched} fetched, {added} new, {} total{}",
            catalog.len(),
            if complete { ", catalog complete" } else { "" }
        );

        Ok(BatchOutcome::Loaded {
            offset,
            fetched,
            added,
            complete,
        })
    }

    /// Keep loading batches until the catalog is complete
    ///
    /// Each batch is started only after the previous one finished. If
    /// another caller holds the in-flight batch, waits for it to finish and
    /// continues. Returns the number of batches this call loaded.
    pub async fn load_remaining(&self) -> Result<usize> {
        let mut loaded = 0;
        let mut status_rx = self.subscribe();

        loop {
            match self.load_next_batch().await? {
                BatchOutcome::Loaded { complete, .. } => {
                    loaded += 1;
                    if complete {
                        return Ok(loaded);
                    }
                }
                BatchOutcome::Complete => return Ok(loaded),
                BatchOutcome::AlreadyLoading => {
                    if status_rx.borrow_and_update().loading {
                        if status_rx.changed().await.is_err() {
                            return Ok(loaded);
                        }
                    } else {
                        tokio::task::yield_now().await;
                    }
                }
            }
        }
    }

    /// Index page plus every joined entry, in index order
    async fn fetch_batch(&self, offset: usize) -> Result<(usize, Vec<CatalogEntity>)> {
        let page = self.client.fetch_index_page(offset, self.batch_size).await?;
        let fetched = page.results.len();

        let joined: Vec<CatalogEntity> = stream::iter(page.results)
            .map(|entry| async move { self.joiner.join(&entry).await })
            .buffered(self.max_concurrent_joins)
            .try_collect()
            .await?;

        Ok((fetched, joined))
    }
}
