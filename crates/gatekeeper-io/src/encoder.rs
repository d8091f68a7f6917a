//! Gallery encoders: turn one gallery entry on disk into face observations.

use gatekeeper_core::FaceObservation;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed face sidecar: {0}")]
    Json(#[from] serde_json::Error),
}

/// Face detection + embedding extraction for a gallery entry.
pub trait FaceEncoder {
    /// Whether this encoder handles the given file at all.
    fn accepts(&self, _path: &Path) -> bool {
        true
    }

    /// Detected faces in the entry, in detector order. An empty result
    /// means no face was found.
    fn encode(&mut self, path: &Path) -> Result<Vec<FaceObservation>, EncodeError>;
}

/// Reads precomputed face observations from `<label>.json` sidecars
/// written by an external embedding extractor.
#[derive(Debug, Clone, Copy, Default)]
pub struct SidecarEncoder;

impl FaceEncoder for SidecarEncoder {
    fn accepts(&self, path: &Path) -> bool {
        path.extension().is_some_and(|ext| ext == "json")
    }

    fn encode(&mut self, path: &Path) -> Result<Vec<FaceObservation>, EncodeError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}
