//! Startup loading of the allowed and denied galleries.

use crate::archive::{ArchiveError, StrangerArchive};
use crate::encoder::FaceEncoder;
use gatekeeper_core::{EmbeddingStore, IdentityRecord, StoreError};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BootstrapError {
    #[error("cannot read collection {path}: {source}")]
    Collection {
        path: String,
        source: std::io::Error,
    },
    #[error("stranger archive: {0}")]
    Archive(#[from] ArchiveError),
    #[error("store: {0}")]
    Store(#[from] StoreError),
}

/// Collection directories to load at startup.
#[derive(Debug, Clone)]
pub struct GalleryPaths {
    pub allowed: PathBuf,
    pub denied: PathBuf,
    pub strangers: PathBuf,
}

/// Load one labelled collection.
///
/// Entries are visited in file-name order. Each entry's label is its file
/// name without extension, and only the first detected face is kept.
/// Entries with no face, or that fail to encode, are skipped.
pub fn load_collection<E: FaceEncoder>(
    dir: &Path,
    encoder: &mut E,
) -> Result<Vec<IdentityRecord>, BootstrapError> {
    let collection_err = |source: std::io::Error| BootstrapError::Collection {
        path: dir.display().to_string(),
        source,
    };

    std::fs::create_dir_all(dir).map_err(collection_err)?;

    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
        .map_err(collection_err)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && encoder.accepts(p))
        .collect();
    paths.sort();

    let mut records = Vec::with_capacity(paths.len());
    for path in paths {
        let Some(label) = path.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
            continue;
        };

        let faces = match encoder.encode(&path) {
            Ok(faces) => faces,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping gallery entry");
                continue;
            }
        };

        match faces.into_iter().next() {
            Some(face) => records.push(IdentityRecord::new(label, face.embedding)),
            None => tracing::warn!(path = %path.display(), "no face detected in gallery entry"),
        }
    }

    Ok(records)
}

/// Build the embedding store from the gallery directories.
///
/// With `resume_strangers`, strangers archived by earlier sessions are
/// loaded too; otherwise the stranger registry starts empty.
pub fn load_store<E: FaceEncoder>(
    paths: &GalleryPaths,
    encoder: &mut E,
    resume_strangers: bool,
) -> Result<EmbeddingStore, BootstrapError> {
    let allowed = load_collection(&paths.allowed, encoder)?;
    let denied = load_collection(&paths.denied, encoder)?;

    let archive = StrangerArchive::open(&paths.strangers)?;
    let strangers = if resume_strangers {
        archive.load_embeddings()?
    } else {
        Vec::new()
    };

    tracing::info!(
        allowed = allowed.len(),
        denied = denied.len(),
        strangers = strangers.len(),
        "gallery loaded"
    );

    Ok(EmbeddingStore::new(allowed, denied)?.with_strangers(strangers))
}
