//! Replay of recorded frame observations (JSON lines) through the engine.

use crate::engine::{EngineHandle, FrameRecord, FrameResult};
use anyhow::{Context, Result};
use std::path::Path;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

/// Input name that selects stdin.
pub const STDIN: &str = "-";

/// Stream one input file (or stdin) through the engine.
pub async fn replay_path(
    handle: EngineHandle,
    path: &Path,
    out: mpsc::Sender<FrameResult>,
) -> Result<usize> {
    let name = path.display().to_string();
    if name == STDIN {
        replay_lines(handle, &name, BufReader::new(tokio::io::stdin()), out).await
    } else {
        let file = tokio::fs::File::open(path)
            .await
            .with_context(|| format!("failed to open {name}"))?;
        replay_lines(handle, &name, BufReader::new(file), out).await
    }
}

/// Send each JSON line to the engine and forward the reports to `out`.
///
/// Blank lines are ignored and malformed lines are skipped with a warning.
/// Frames without an explicit source or sequence are tagged with the input
/// name and line number. Returns the number of frames processed.
pub async fn replay_lines<R>(
    handle: EngineHandle,
    name: &str,
    reader: R,
    out: mpsc::Sender<FrameResult>,
) -> Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut line_no = 0u64;
    let mut processed = 0usize;

    while let Some(line) = lines
        .next_line()
        .await
        .with_context(|| format!("failed to read {name}"))?
    {
        line_no += 1;
        if line.trim().is_empty() {
            continue;
        }

        let mut record: FrameRecord = match serde_json::from_str(&line) {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(input = name, line = line_no, error = %e, "skipping malformed frame");
                continue;
            }
        };
        record.source.get_or_insert_with(|| name.to_string());
        record.sequence.get_or_insert(line_no);

        let result = handle.process(record).await?;
        processed += 1;
        if out.send(result).await.is_err() {
            break;
        }
    }

    tracing::info!(input = name, frames = processed, "input finished");
    Ok(processed)
}
