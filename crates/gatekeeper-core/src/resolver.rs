//! Identity resolution: allowed list, then denied list, in that order.

use crate::matcher::Matcher;
use crate::store::EmbeddingStore;
use crate::types::Embedding;
use serde::Serialize;

/// Label shown for a face that matched neither gallery.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Which gallery a face resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListMembership {
    Allowed,
    Denied,
    /// Matched neither gallery. Stranger bookkeeping never changes this.
    Unresolved,
}

/// Per-face, per-frame classification result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolutionOutcome {
    label: String,
    membership: ListMembership,
    access_granted: bool,
}

impl ResolutionOutcome {
    pub fn allowed(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            membership: ListMembership::Allowed,
            access_granted: true,
        }
    }

    pub fn denied(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            membership: ListMembership::Denied,
            access_granted: false,
        }
    }

    pub fn unresolved() -> Self {
        Self {
            label: UNKNOWN_LABEL.to_string(),
            membership: ListMembership::Unresolved,
            access_granted: false,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn membership(&self) -> ListMembership {
        self.membership
    }

    /// True exactly when the face resolved against the allowed list.
    pub fn access_granted(&self) -> bool {
        self.access_granted
    }

    /// Banner text for the access decision.
    pub fn access_text(&self) -> &'static str {
        if self.access_granted {
            "access granted"
        } else {
            "access restricted"
        }
    }
}

/// Resolve a face against the allowed and denied galleries.
///
/// The allowed list always wins: a face present in both galleries resolves
/// as allowed.
pub fn resolve<M: Matcher>(
    matcher: &M,
    store: &EmbeddingStore,
    face: &Embedding,
    threshold: f32,
) -> ResolutionOutcome {
    if let Some(m) = matcher.compare(face, store.allowed(), threshold) {
        let record = &store.allowed()[m.index];
        tracing::debug!(label = %record.label, distance = m.distance, "matched allowed");
        return ResolutionOutcome::allowed(record.label.clone());
    }

    if let Some(m) = matcher.compare(face, store.denied(), threshold) {
        let record = &store.denied()[m.index];
        tracing::debug!(label = %record.label, distance = m.distance, "matched denied");
        return ResolutionOutcome::denied(record.label.clone());
    }

    ResolutionOutcome::unresolved()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::{EuclideanMatcher, DEFAULT_MATCH_THRESHOLD};
    use crate::types::IdentityRecord;

    fn emb(values: &[f32]) -> Embedding {
        Embedding::new(values.to_vec())
    }

    #[test]
    fn test_resolves_allowed() {
        let store = EmbeddingStore::new(
            vec![IdentityRecord::new("alice", emb(&[0.0, 0.0]))],
            vec![],
        )
        .unwrap();
        let outcome = resolve(&EuclideanMatcher, &store, &emb(&[0.1, 0.1]), DEFAULT_MATCH_THRESHOLD);
        assert_eq!(outcome.label(), "alice");
        assert_eq!(outcome.membership(), ListMembership::Allowed);
        assert!(outcome.access_granted());
        assert_eq!(outcome.access_text(), "access granted");
    }

    #[test]
    fn test_resolves_denied() {
        let store = EmbeddingStore::new(
            vec![IdentityRecord::new("alice", emb(&[5.0, 5.0]))],
            vec![IdentityRecord::new("mallory", emb(&[0.0, 0.0]))],
        )
        .unwrap();
        let outcome = resolve(&EuclideanMatcher, &store, &emb(&[0.0, 0.2]), DEFAULT_MATCH_THRESHOLD);
        assert_eq!(outcome, ResolutionOutcome::denied("mallory"));
        assert!(!outcome.access_granted());
    }

    #[test]
    fn test_allowed_takes_precedence_over_denied() {
        let store = EmbeddingStore::new(
            vec![IdentityRecord::new("alice", emb(&[0.3, 0.0]))],
            vec![IdentityRecord::new("mallory", emb(&[0.0, 0.0]))],
        )
        .unwrap();
        // Closer to the denied entry, but within threshold of the allowed one.
        let outcome = resolve(&EuclideanMatcher, &store, &emb(&[0.05, 0.0]), DEFAULT_MATCH_THRESHOLD);
        assert_eq!(outcome, ResolutionOutcome::allowed("alice"));
    }

    #[test]
    fn test_unresolved_when_no_gallery_matches() {
        let store = EmbeddingStore::new(
            vec![IdentityRecord::new("alice", emb(&[1.0, 1.0]))],
            vec![IdentityRecord::new("mallory", emb(&[-1.0, -1.0]))],
        )
        .unwrap();
        let outcome = resolve(&EuclideanMatcher, &store, &emb(&[0.0, 0.0]), DEFAULT_MATCH_THRESHOLD);
        assert_eq!(outcome.label(), UNKNOWN_LABEL);
        assert_eq!(outcome.membership(), ListMembership::Unresolved);
        assert_eq!(outcome.access_text(), "access restricted");
    }

    #[test]
    fn test_allowed_person_named_unknown_is_still_allowed() {
        let store = EmbeddingStore::new(
            vec![IdentityRecord::new(UNKNOWN_LABEL, emb(&[0.0]))],
            vec![IdentityRecord::new("mallory", emb(&[0.0]))],
        )
        .unwrap();
        let outcome = resolve(&EuclideanMatcher, &store, &emb(&[0.0]), DEFAULT_MATCH_THRESHOLD);
        assert_eq!(outcome.membership(), ListMembership::Allowed);
        assert!(outcome.access_granted());
    }

    #[test]
    fn test_empty_store_is_unresolved() {
        let outcome = resolve(
            &EuclideanMatcher,
            &EmbeddingStore::default(),
            &emb(&[0.0]),
            DEFAULT_MATCH_THRESHOLD,
        );
        assert_eq!(outcome, ResolutionOutcome::unresolved());
    }
}
