//! gatekeeper-io — Filesystem collaborators for the gatekeeper pipeline.
//!
//! Loads the allowed and denied galleries at startup, archives new
//! strangers (face crop plus embedding sidecar) and decodes frames.

pub mod archive;
pub mod bootstrap;
pub mod encoder;
pub mod frame;

pub use archive::{ArchiveError, StrangerArchive, StrangerSink};
pub use bootstrap::{load_store, BootstrapError, GalleryPaths};
pub use encoder::{EncodeError, FaceEncoder, SidecarEncoder};
pub use frame::{Frame, FrameError};
