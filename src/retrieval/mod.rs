//! Documentation retrieval and query augmentation.

mod augment;
mod store;

pub use augment::Augmenter;
pub use store::{DocStore, HttpDocStore, Passage};

use std::sync::Arc;

use crate::config::RetrievalConfig;

/// Build an augmenter from configuration. No retrieval URL means
/// augmentation is disabled and queries pass through unchanged.
pub fn create_augmenter(config: &RetrievalConfig) -> Augmenter {
    match &config.base_url {
        Some(url) => {
            tracing::info!(top_k = config.top_k, "Retrieval augmentation via {}", url);
            Augmenter::new(Arc::new(HttpDocStore::new(url.clone())), config.top_k)
        }
        None => {
            tracing::info!("No retrieval store configured, augmentation disabled");
            Augmenter::disabled()
        }
    }
}
