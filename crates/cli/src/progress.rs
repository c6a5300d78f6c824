//! Whole-catalog loading with a terminal progress bar

use anyhow::Result;
use dexter_catalog::{BatchOutcome, CatalogSession};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::error;

/// Create a progress bar sized by the expected catalog total
pub fn create_progress_bar(total: usize) -> ProgressBar {
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            .map_err(|e| error!("Failed to set progress bar style: {}", e))
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-"),
    );
    pb
}

/// Load every remaining batch, advancing `pb` after each one
///
/// The bar length grows if the catalog turns out larger than expected.
/// Returns the number of batches loaded by this call.
pub async fn load_all_with_progress(session: &CatalogSession, pb: &ProgressBar) -> Result<usize> {
    let mut batches = 0;

    loop {
        let outcome = session.load_next_batch().await?;
        let status = session.status();

        if status.loaded as u64 > pb.length().unwrap_or(0) {
            pb.set_length(status.loaded as u64);
        }
        pb.set_position(status.loaded as u64);

        match outcome {
            BatchOutcome::Loaded { complete, .. } => {
                batches += 1;
                pb.set_message(format!("offset {}", status.next_offset));
                if complete {
                    break;
                }
            }
            BatchOutcome::Complete => break,
            BatchOutcome::AlreadyLoading => {
                let mut status_rx = session.subscribe();
                while status_rx.borrow_and_update().loading {
                    if status_rx.changed().await.is_err() {
                        break;
                    }
                }
            }
        }
    }

    let loaded = session.status().loaded as u64;
    pb.set_length(loaded);
    pb.finish_with_message("catalog complete");
    Ok(batches)
}
