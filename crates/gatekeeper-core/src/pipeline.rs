//! Per-frame orchestration of resolution, enrollment, emotion and gesture.

use crate::emotion::{dominant_emotion, NO_EMOTION};
use crate::enrollment::{enroll_if_new, EnrollmentRequest};
use crate::gesture::{self, Gesture};
use crate::matcher::{EuclideanMatcher, Matcher, DEFAULT_MATCH_THRESHOLD};
use crate::resolver::{resolve, ListMembership, ResolutionOutcome};
use crate::store::EmbeddingStore;
use crate::types::{BoundingBox, EmotionScore, FaceObservation, HandLandmarks};
use serde::{Deserialize, Serialize};

/// Everything the external providers produced for one frame.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FrameObservations {
    #[serde(default)]
    pub faces: Vec<FaceObservation>,
    #[serde(default)]
    pub hands: Vec<HandLandmarks>,
    /// Emotion distributions, index-aligned with `faces`.
    #[serde(default)]
    pub emotions: Vec<Vec<EmotionScore>>,
}

/// Stranger bookkeeping for an unresolved face.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StrangerSighting {
    /// First sighting; an enrollment request was emitted.
    New { identifier: String },
    /// Matches a stranger already in the registry.
    Known,
}

#[derive(Debug, Clone, Serialize)]
pub struct FaceReport {
    pub bbox: BoundingBox,
    #[serde(flatten)]
    pub outcome: ResolutionOutcome,
    pub access_text: &'static str,
    pub emotion: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stranger: Option<StrangerSighting>,
}

/// Decisions handed to the rendering collaborator for one frame.
#[derive(Debug, Clone, Serialize)]
pub struct FrameReport {
    pub face_count: usize,
    pub faces: Vec<FaceReport>,
    pub gesture: Gesture,
    pub hand_gestures: Vec<Option<Gesture>>,
}

/// An enrollment request together with the face region to archive.
#[derive(Debug, Clone)]
pub struct PendingEnrollment {
    pub request: EnrollmentRequest,
    pub bbox: BoundingBox,
}

#[derive(Debug, Clone)]
pub struct FrameOutput {
    pub report: FrameReport,
    pub enrollments: Vec<PendingEnrollment>,
}

/// Owns the embedding store and runs every frame through it.
///
/// Taking `&mut self` per frame makes each read-then-append enrollment
/// exclusive; callers sharing a pipeline across threads must serialize
/// access to it.
pub struct FramePipeline<M = EuclideanMatcher> {
    matcher: M,
    store: EmbeddingStore,
    threshold: f32,
}

impl FramePipeline<EuclideanMatcher> {
    pub fn new(store: EmbeddingStore) -> Self {
        Self::with_matcher(EuclideanMatcher, store, DEFAULT_MATCH_THRESHOLD)
    }
}

impl<M: Matcher> FramePipeline<M> {
    pub fn with_matcher(matcher: M, store: EmbeddingStore, threshold: f32) -> Self {
        Self {
            matcher,
            store,
            threshold,
        }
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn store(&self) -> &EmbeddingStore {
        &self.store
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn process(&mut self, frame: &FrameObservations) -> FrameOutput {
        let mut faces = Vec::with_capacity(frame.faces.len());
        let mut enrollments = Vec::new();

        for (i, face) in frame.faces.iter().enumerate() {
            let outcome = resolve(&self.matcher, &self.store, &face.embedding, self.threshold);

            let stranger = if outcome.membership() == ListMembership::Unresolved {
                match enroll_if_new(&self.matcher, &mut self.store, &face.embedding, self.threshold)
                {
                    Some(request) => {
                        let sighting = StrangerSighting::New {
                            identifier: request.identifier.clone(),
                        };
                        enrollments.push(PendingEnrollment {
                            request,
                            bbox: face.bbox,
                        });
                        Some(sighting)
                    }
                    None => Some(StrangerSighting::Known),
                }
            } else {
                None
            };

            let emotion = frame
                .emotions
                .get(i)
                .or_else(|| frame.emotions.first())
                .and_then(|scores| dominant_emotion(scores))
                .unwrap_or(NO_EMOTION)
                .to_string();

            faces.push(FaceReport {
                bbox: face.bbox,
                access_text: outcome.access_text(),
                outcome,
                emotion,
                stranger,
            });
        }

        let report = FrameReport {
            face_count: frame.faces.len(),
            faces,
            gesture: gesture::classify(&frame.hands),
            hand_gestures: gesture::classify_each(&frame.hands),
        };

        FrameOutput {
            report,
            enrollments,
        }
    }
}
