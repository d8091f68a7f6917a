//! Stranger archive: durable record of every enrolled stranger.
//!
//! Each stranger gets `<identifier>.webp` (the face crop) and
//! `<identifier>.json` (the embedding) in the strangers directory.

use gatekeeper_core::{Embedding, EnrollmentRequest};
use image::RgbImage;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

const CROP_EXTENSION: &str = "webp";
const SIDECAR_EXTENSION: &str = "json";

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode sidecar: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to write face crop {path}: {source}")]
    Image {
        path: String,
        source: image::ImageError,
    },
}

/// On-disk form of a stranger's embedding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrangerSidecar {
    pub identifier: String,
    pub enrolled_at: String,
    pub embedding: Embedding,
}

/// Paths written for one stranger.
#[derive(Debug, Clone)]
pub struct ArchivedStranger {
    pub sidecar: PathBuf,
    pub crop: Option<PathBuf>,
}

/// Persistence collaborator for enrollment requests.
pub trait StrangerSink {
    /// Persist a new stranger. `crop` is `None` when no frame pixels were
    /// available; the embedding is still recorded.
    fn persist(
        &self,
        request: &EnrollmentRequest,
        crop: Option<&RgbImage>,
    ) -> Result<ArchivedStranger, ArchiveError>;
}

/// Directory-backed stranger archive.
#[derive(Debug, Clone)]
pub struct StrangerArchive {
    dir: PathBuf,
}

impl StrangerArchive {
    /// Open the archive, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, ArchiveError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load every stranger sidecar in the archive, in file-name order.
    /// Unreadable sidecars are skipped with a warning.
    pub fn load_embeddings(&self) -> Result<Vec<Embedding>, ArchiveError> {
        let mut paths: Vec<PathBuf> = std::fs::read_dir(&self.dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == SIDECAR_EXTENSION))
            .collect();
        paths.sort();

        let mut embeddings = Vec::with_capacity(paths.len());
        for path in paths {
            let parsed = std::fs::read_to_string(&path)
                .map_err(ArchiveError::from)
                .and_then(|raw| Ok(serde_json::from_str::<StrangerSidecar>(&raw)?));
            match parsed {
                Ok(sidecar) => embeddings.push(sidecar.embedding),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping stranger sidecar")
                }
            }
        }
        Ok(embeddings)
    }
}

impl StrangerSink for StrangerArchive {
    fn persist(
        &self,
        request: &EnrollmentRequest,
        crop: Option<&RgbImage>,
    ) -> Result<ArchivedStranger, ArchiveError> {
        let sidecar_path = self
            .dir
            .join(format!("{}.{SIDECAR_EXTENSION}", request.identifier));
        let sidecar = StrangerSidecar {
            identifier: request.identifier.clone(),
            enrolled_at: request.enrolled_at.clone(),
            embedding: request.embedding.clone(),
        };
        std::fs::write(&sidecar_path, serde_json::to_vec_pretty(&sidecar)?)?;

        let crop_path = match crop {
            Some(img) => {
                let path = self
                    .dir
                    .join(format!("{}.{CROP_EXTENSION}", request.identifier));
                img.save(&path).map_err(|source| ArchiveError::Image {
                    path: path.display().to_string(),
                    source,
                })?;
                Some(path)
            }
            None => {
                tracing::warn!(
                    identifier = %request.identifier,
                    "no frame pixels for stranger; archived embedding only"
                );
                None
            }
        };

        tracing::debug!(
            identifier = %request.identifier,
            sidecar = %sidecar_path.display(),
            "stranger archived"
        );

        Ok(ArchivedStranger {
            sidecar: sidecar_path,
            crop: crop_path,
        })
    }
}
