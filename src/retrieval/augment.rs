//! Ephemeral query augmentation with retrieved documentation.
//!
//! The augmenter grounds the outgoing query in Kubernetes documentation to
//! reduce hallucination. The composed string is sent to the backend for one
//! call and is never written into the conversation history; the history
//! always stores the raw user text.

use std::sync::Arc;

use crate::retrieval::store::{DocStore, Passage};

const CONTEXT_HEADER: &str = "--- reference context ---";
const CONTEXT_FOOTER: &str = "--- end reference context ---";

/// Composes queries with reference passages from the doc store.
pub struct Augmenter {
    store: Option<Arc<dyn DocStore>>,
    top_k: usize,
}

impl Augmenter {
    pub fn new(store: Arc<dyn DocStore>, top_k: usize) -> Self {
        Self {
            store: Some(store),
            top_k,
        }
    }

    /// An augmenter with no store; every query passes through unchanged.
    pub fn disabled() -> Self {
        Self {
            store: None,
            top_k: 0,
        }
    }

    /// Return `query` followed by a delimited reference-context block.
    ///
    /// Degrades to the unchanged query when augmentation is disabled, the
    /// store returns nothing, or the store fails. A store failure never
    /// aborts the conversation.
    pub async fn augment(&self, query: &str) -> String {
        let Some(store) = &self.store else {
            return query.to_string();
        };

        match store.query(query, self.top_k).await {
            Ok(passages) if passages.is_empty() => query.to_string(),
            Ok(passages) => compose(query, &passages),
            Err(e) => {
                tracing::warn!("Retrieval unavailable, sending unaugmented query: {}", e);
                query.to_string()
            }
        }
    }
}

/// Append the passages to the query, in store order.
fn compose(query: &str, passages: &[Passage]) -> String {
    let mut out = String::with_capacity(
        query.len() + passages.iter().map(|p| p.text.len() + 8).sum::<usize>() + 64,
    );

    out.push_str(query);
    out.push_str("\n\n");
    out.push_str(CONTEXT_HEADER);
    for (i, passage) in passages.iter().enumerate() {
        out.push_str(&format!("\n[{}] {}", i + 1, passage.text));
    }
    out.push('\n');
    out.push_str(CONTEXT_FOOTER);
    out
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::error::RetrievalError;

    struct FixedStore(Vec<Passage>);

    #[async_trait]
    impl DocStore for FixedStore {
        async fn query(&self, _: &str, _: usize) -> Result<Vec<Passage>, RetrievalError> {
            Ok(self.0.clone())
        }
    }

    struct FailingStore;

    #[async_trait]
    impl DocStore for FailingStore {
        async fn query(&self, _: &str, _: usize) -> Result<Vec<Passage>, RetrievalError> {
            Err(RetrievalError::RequestFailed("connection refused".into()))
        }
    }

    #[tokio::test]
    async fn test_augment_appends_passages_in_store_order() {
        let store = Arc::new(FixedStore(vec![
            Passage::new("Pods are the smallest deployable units."),
            Passage::new("A Deployment manages ReplicaSets."),
        ]));
        let augmenter = Augmenter::new(store, 4);

        let out = augmenter.augment("what is a pod").await;

        assert!(out.starts_with("what is a pod"));
        let first = out.find("smallest deployable").unwrap();
        let second = out.find("manages ReplicaSets").unwrap();
        assert!(first < second);
        assert!(out.contains(CONTEXT_HEADER));
        assert!(out.contains(CONTEXT_FOOTER));
    }

    #[tokio::test]
    async fn test_augment_passthrough_on_empty_results() {
        let augmenter = Augmenter::new(Arc::new(FixedStore(vec![])), 4);
        assert_eq!(augmenter.augment("what is a pod").await, "what is a pod");
    }

    #[tokio::test]
    async fn test_augment_passthrough_on_store_failure() {
        let augmenter = Augmenter::new(Arc::new(FailingStore), 4);
        assert_eq!(augmenter.augment("what is a pod").await, "what is a pod");
    }

    #[tokio::test]
    async fn test_disabled_augmenter_is_passthrough() {
        let augmenter = Augmenter::disabled();
        assert_eq!(augmenter.augment("anything").await, "anything");
    }
}
