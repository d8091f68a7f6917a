use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of landmarks in one hand set (MediaPipe hand topology).
pub const HAND_LANDMARK_COUNT: usize = 21;

#[derive(Error, Debug, PartialEq)]
pub enum TypesError {
    #[error("hand landmark set must have {HAND_LANDMARK_COUNT} points, got {0}")]
    LandmarkCount(usize),
}

/// Pixel-space bounding box of a detected face, in detector order
/// (top, right, bottom, left).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

impl BoundingBox {
    pub fn width(&self) -> u32 {
        self.right.saturating_sub(self.left)
    }

    pub fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top)
    }
}

/// Face embedding vector (128-dimensional for the dlib-style extractor).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Embedding {
    pub values: Vec<f32>,
}

impl Embedding {
    pub fn new(values: Vec<f32>) -> Self {
        Self { values }
    }

    pub fn dim(&self) -> usize {
        self.values.len()
    }

    /// Compute Euclidean distance between two embeddings.
    ///
    /// Embeddings of different dimensionality are incomparable and sit at
    /// infinite distance, as does any pair producing a NaN.
    pub fn euclidean_distance(&self, other: &Embedding) -> f32 {
        if self.values.len() != other.values.len() {
            return f32::INFINITY;
        }

        let d = self
            .values
            .iter()
            .zip(other.values.iter())
            .map(|(a, b)| (a - b).powi(2))
            .sum::<f32>()
            .sqrt();

        if d.is_nan() { f32::INFINITY } else { d }
    }
}

impl AsRef<Embedding> for Embedding {
    fn as_ref(&self) -> &Embedding {
        self
    }
}

/// A labelled gallery entry from the allowed or denied collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityRecord {
    /// Source file name with the extension stripped.
    pub label: String,
    pub embedding: Embedding,
}

impl IdentityRecord {
    pub fn new(label: impl Into<String>, embedding: Embedding) -> Self {
        Self {
            label: label.into(),
            embedding,
        }
    }
}

impl AsRef<Embedding> for IdentityRecord {
    fn as_ref(&self) -> &Embedding {
        &self.embedding
    }
}

/// One detected face in one frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaceObservation {
    pub bbox: BoundingBox,
    pub embedding: Embedding,
}

/// A single hand landmark in normalized image coordinates
/// (origin top-left, Y grows downward).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

/// The 21 landmarks of one detected hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Landmark>", into = "Vec<Landmark>")]
pub struct HandLandmarks {
    points: [Landmark; HAND_LANDMARK_COUNT],
}

impl HandLandmarks {
    pub fn new(points: [Landmark; HAND_LANDMARK_COUNT]) -> Self {
        Self { points }
    }

    pub fn point(&self, index: usize) -> &Landmark {
        &self.points[index]
    }
}

impl TryFrom<Vec<Landmark>> for HandLandmarks {
    type Error = TypesError;

    fn try_from(points: Vec<Landmark>) -> Result<Self, Self::Error> {
        let count = points.len();
        let points: [Landmark; HAND_LANDMARK_COUNT] = points
            .try_into()
            .map_err(|_| TypesError::LandmarkCount(count))?;
        Ok(Self { points })
    }
}

impl From<HandLandmarks> for Vec<Landmark> {
    fn from(hand: HandLandmarks) -> Self {
        hand.points.to_vec()
    }
}

/// One entry of an emotion probability distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionScore {
    pub label: String,
    pub probability: f32,
}
