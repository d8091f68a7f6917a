//! Stranger enrollment: register each unrecognised face once.

use crate::matcher::Matcher;
use crate::store::EmbeddingStore;
use crate::types::Embedding;
use serde::Serialize;
use uuid::Uuid;

/// Request for the persistence collaborator to archive a new stranger.
#[derive(Debug, Clone, Serialize)]
pub struct EnrollmentRequest {
    /// Filename-safe token the archive is keyed by.
    pub identifier: String,
    /// Position of the new entry in the stranger registry.
    pub stranger_index: usize,
    pub embedding: Embedding,
    /// RFC 3339 timestamp of the enrollment.
    pub enrolled_at: String,
}

/// Generate a collision-resistant, filename-safe stranger identifier.
pub fn stranger_identifier() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Register `face` as a new stranger unless it matches an existing one.
///
/// The registry append is committed before the request is returned, so a
/// later persistence failure never causes the same stranger to be enrolled
/// twice.
pub fn enroll_if_new<M: Matcher>(
    matcher: &M,
    store: &mut EmbeddingStore,
    face: &Embedding,
    threshold: f32,
) -> Option<EnrollmentRequest> {
    if let Some(m) = matcher.compare(face, store.strangers(), threshold) {
        tracing::trace!(index = m.index, distance = m.distance, "known stranger");
        return None;
    }

    let stranger_index = store.push_stranger(face.clone());
    let identifier = stranger_identifier();

    tracing::info!(
        identifier = %identifier,
        index = stranger_index,
        total = store.strangers().len(),
        "new stranger enrolled"
    );

    Some(EnrollmentRequest {
        identifier,
        stranger_index,
        embedding: face.clone(),
        enrolled_at: chrono::Utc::now().to_rfc3339(),
    })
}
