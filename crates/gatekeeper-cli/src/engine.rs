use crate::config::Config;
use gatekeeper_core::{FrameObservations, FramePipeline, FrameReport};
use gatekeeper_io::{
    load_store, ArchiveError, BootstrapError, Frame, SidecarEncoder, StrangerArchive, StrangerSink,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("bootstrap error: {0}")]
    Bootstrap(#[from] BootstrapError),
    #[error("archive error: {0}")]
    Archive(#[from] ArchiveError),
    #[error("failed to spawn engine thread: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("engine thread exited")]
    ChannelClosed,
}

/// One recorded frame: provider outputs plus an optional path to the
/// frame's pixels (needed to archive stranger face crops).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FrameRecord {
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub sequence: Option<u64>,
    #[serde(default)]
    pub image: Option<PathBuf>,
    #[serde(flatten)]
    pub observations: FrameObservations,
}

/// Report for one frame, tagged with where it came from.
#[derive(Debug, Clone, Serialize)]
pub struct FrameResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence: Option<u64>,
    #[serde(flatten)]
    pub report: FrameReport,
}

/// Snapshot of the loaded galleries.
#[derive(Debug, Clone, Serialize)]
pub struct GallerySummary {
    pub allowed: Vec<String>,
    pub denied: Vec<String>,
    pub strangers: usize,
    pub match_threshold: f32,
}

/// Messages sent from frame sources to the engine thread.
enum EngineRequest {
    Process {
        frame: FrameRecord,
        reply: oneshot::Sender<FrameResult>,
    },
    Gallery {
        reply: oneshot::Sender<GallerySummary>,
    },
}

/// Clone-safe handle to the engine thread.
#[derive(Clone)]
pub struct EngineHandle {
    tx: mpsc::Sender<EngineRequest>,
}

impl EngineHandle {
    /// Run one frame through resolution, enrollment and gesture
    /// classification.
    pub async fn process(&self, frame: FrameRecord) -> Result<FrameResult, EngineError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(EngineRequest::Process {
                frame,
                reply: reply_tx,
            })
            .await
            .map_err(|_| EngineError::ChannelClosed)?;
        reply_rx.await.map_err(|_| EngineError::ChannelClosed)
    }

    /// Labels and sizes of the galleries currently held by the engine.
    pub async fn gallery(&self) -> Result<GallerySummary, EngineError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(EngineRequest::Gallery { reply: reply_tx })
            .await
            .map_err(|_| EngineError::ChannelClosed)?;
        reply_rx.await.map_err(|_| EngineError::ChannelClosed)
    }
}

/// Load the galleries named by `config` and start the engine.
///
/// Fails fast if a collection directory cannot be read.
pub fn start(config: &Config) -> Result<EngineHandle, EngineError> {
    let store = load_store(
        &config.gallery_paths(),
        &mut SidecarEncoder,
        config.resume_strangers,
    )?;
    let archive = StrangerArchive::open(&config.strangers_dir)?;
    let pipeline = FramePipeline::new(store).with_threshold(config.match_threshold);

    spawn_engine(pipeline, archive, config.queue_depth)
}

/// Spawn the engine on a dedicated OS thread.
///
/// The thread is the only owner of the pipeline and its embedding store,
/// so every stranger check-then-enroll runs to completion before the next
/// frame is looked at, whatever the number of frame sources.
pub fn spawn_engine<S>(
    mut pipeline: FramePipeline,
    sink: S,
    queue_depth: usize,
) -> Result<EngineHandle, EngineError>
where
    S: StrangerSink + Send + 'static,
{
    let (tx, mut rx) = mpsc::channel::<EngineRequest>(queue_depth.max(1));

    std::thread::Builder::new()
        .name("gatekeeper-engine".into())
        .spawn(move || {
            tracing::info!("engine thread started");
            while let Some(req) = rx.blocking_recv() {
                match req {
                    EngineRequest::Process { frame, reply } => {
                        let result = run_frame(&mut pipeline, &sink, frame);
                        let _ = reply.send(result);
                    }
                    EngineRequest::Gallery { reply } => {
                        let _ = reply.send(summarize(&pipeline));
                    }
                }
            }
            tracing::info!("engine thread exiting");
        })?;

    Ok(EngineHandle { tx })
}

/// Process one frame and archive any new strangers.
///
/// Archive failures are logged; the stranger stays enrolled in memory.
fn run_frame<S: StrangerSink>(
    pipeline: &mut FramePipeline,
    sink: &S,
    record: FrameRecord,
) -> FrameResult {
    let pixels = record.image.as_deref().and_then(|path| match Frame::open(path) {
        Ok(frame) => Some(frame),
        Err(e) => {
            tracing::warn!(error = %e, "frame pixels unavailable");
            None
        }
    });

    let output = pipeline.process(&record.observations);

    for pending in &output.enrollments {
        let crop = pixels.as_ref().and_then(|f| f.crop(&pending.bbox));
        if let Err(e) = sink.persist(&pending.request, crop.as_ref()) {
            tracing::warn!(
                identifier = %pending.request.identifier,
                error = %e,
                "failed to archive stranger; keeping in-memory enrollment"
            );
        }
    }

    tracing::debug!(
        source = record.source.as_deref().unwrap_or("-"),
        faces = output.report.face_count,
        gesture = output.report.gesture.as_str(),
        "frame processed"
    );

    FrameResult {
        source: record.source,
        sequence: record.sequence,
        report: output.report,
    }
}

fn summarize(pipeline: &FramePipeline) -> GallerySummary {
    let store = pipeline.store();
    GallerySummary {
        allowed: store.allowed().iter().map(|r| r.label.clone()).collect(),
        denied: store.denied().iter().map(|r| r.label.clone()).collect(),
        strangers: store.strangers().len(),
        match_threshold: pipeline.threshold(),
    }
}
