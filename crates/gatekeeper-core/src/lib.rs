//! gatekeeper-core — Face identity resolution and hand gesture classification.
//!
//! Matches face embeddings against allowed and denied galleries, keeps a
//! registry of strangers seen this session, and classifies thumb gestures
//! from hand landmarks. Detection and embedding models are external.

pub mod emotion;
pub mod enrollment;
pub mod gesture;
pub mod matcher;
pub mod pipeline;
pub mod resolver;
pub mod store;
pub mod types;

pub use enrollment::{enroll_if_new, EnrollmentRequest};
pub use gesture::Gesture;
pub use matcher::{EuclideanMatcher, Match, Matcher, DEFAULT_MATCH_THRESHOLD};
pub use pipeline::{FrameObservations, FrameOutput, FramePipeline, FrameReport, PendingEnrollment};
pub use resolver::{resolve, ListMembership, ResolutionOutcome};
pub use store::{EmbeddingStore, StoreError};
pub use types::{BoundingBox, Embedding, EmotionScore, FaceObservation, HandLandmarks, IdentityRecord};
