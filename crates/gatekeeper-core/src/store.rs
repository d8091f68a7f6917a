//! In-memory embedding store: allowed and denied galleries plus the
//! append-only stranger registry.

use crate::types::{Embedding, IdentityRecord};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum StoreError {
    #[error("embedding dimension mismatch for {label:?}: expected {expected}, got {actual}")]
    DimensionMismatch {
        label: String,
        expected: usize,
        actual: usize,
    },
}

/// Gallery of known faces.
///
/// `allowed` and `denied` are fixed once the store is built. `strangers`
/// only ever grows; entries are never removed or reordered.
#[derive(Debug, Clone, Default)]
pub struct EmbeddingStore {
    allowed: Vec<IdentityRecord>,
    denied: Vec<IdentityRecord>,
    strangers: Vec<Embedding>,
}

impl EmbeddingStore {
    /// Build a store from the allowed and denied galleries.
    ///
    /// All gallery embeddings must share one dimensionality.
    pub fn new(
        allowed: Vec<IdentityRecord>,
        denied: Vec<IdentityRecord>,
    ) -> Result<Self, StoreError> {
        let mut expected: Option<usize> = None;
        for record in allowed.iter().chain(denied.iter()) {
            let actual = record.embedding.dim();
            match expected {
                None => expected = Some(actual),
                Some(e) if e != actual => {
                    return Err(StoreError::DimensionMismatch {
                        label: record.label.clone(),
                        expected: e,
                        actual,
                    });
                }
                Some(_) => {}
            }
        }

        Ok(Self {
            allowed,
            denied,
            strangers: Vec::new(),
        })
    }

    /// Seed the stranger registry, e.g. from a previous session's archive.
    pub fn with_strangers(mut self, strangers: Vec<Embedding>) -> Self {
        self.strangers = strangers;
        self
    }

    pub fn allowed(&self) -> &[IdentityRecord] {
        &self.allowed
    }

    pub fn denied(&self) -> &[IdentityRecord] {
        &self.denied
    }

    pub fn strangers(&self) -> &[Embedding] {
        &self.strangers
    }

    /// Append a stranger embedding and return its registry position.
    pub(crate) fn push_stranger(&mut self, embedding: Embedding) -> usize {
        self.strangers.push(embedding);
        self.strangers.len() - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_store_has_no_strangers() {
        let store = EmbeddingStore::new(
            vec![IdentityRecord::new("alice", Embedding::new(vec![0.0, 1.0]))],
            vec![IdentityRecord::new("mallory", Embedding::new(vec![1.0, 0.0]))],
        )
        .unwrap();
        assert_eq!(store.allowed().len(), 1);
        assert_eq!(store.denied().len(), 1);
        assert!(store.strangers().is_empty());
    }

    #[test]
    fn test_new_rejects_mixed_dimensions() {
        let err = EmbeddingStore::new(
            vec![IdentityRecord::new("alice", Embedding::new(vec![0.0, 1.0]))],
            vec![IdentityRecord::new("mallory", Embedding::new(vec![1.0, 0.0, 0.0]))],
        )
        .unwrap_err();
        assert_eq!(
            err,
            StoreError::DimensionMismatch {
                label: "mallory".into(),
                expected: 2,
                actual: 3,
            }
        );
    }

    #[test]
    fn test_push_stranger_appends_in_order() {
        let mut store = EmbeddingStore::default();
        assert_eq!(store.push_stranger(Embedding::new(vec![0.0])), 0);
        assert_eq!(store.push_stranger(Embedding::new(vec![1.0])), 1);
        assert_eq!(store.strangers()[1].values, vec![1.0]);
    }

    #[test]
    fn test_with_strangers_seeds_registry() {
        let store = EmbeddingStore::default().with_strangers(vec![Embedding::new(vec![0.5])]);
        assert_eq!(store.strangers().len(), 1);
    }
}
