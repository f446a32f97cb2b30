//! JSON lines output for frames and scenes.

use std::{io::Write, time::Duration};

use anyhow::{Context, Result};
use serde::Serialize;
use space_shooter_core::FrameSnapshot;
use space_shooter_rendering::{FrameSink, Scene};

#[derive(Serialize)]
struct Record<'a, T> {
    duration_ms: u64,
    #[serde(flatten)]
    payload: &'a T,
}

/// Writes one JSON document per line to the wrapped writer.
#[derive(Debug)]
pub(crate) struct JsonLinesSink<W: Write> {
    writer: W,
    lines: usize,
}

impl<W: Write> JsonLinesSink<W> {
    pub(crate) fn new(writer: W) -> Self {
        Self { writer, lines: 0 }
    }

    /// Writes a raw simulation snapshot instead of a composed scene.
    pub(crate) fn push_snapshot(&mut self, frame: &FrameSnapshot, duration: Duration) -> Result<()> {
        self.write_record(frame, duration)
    }

    pub(crate) fn lines(&self) -> usize {
        self.lines
    }

    fn write_record<T: Serialize>(&mut self, payload: &T, duration: Duration) -> Result<()> {
        let record = Record {
            duration_ms: u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
            payload,
        };
        serde_json::to_writer(&mut self.writer, &record).context("failed to encode frame")?;
        self.writer
            .write_all(b"\n")
            .context("failed to write frame")?;
        self.lines += 1;
        Ok(())
    }
}

impl<W: Write> FrameSink for JsonLinesSink<W> {
    fn push(&mut self, scene: &Scene, duration: Duration) -> Result<()> {
        self.write_record(scene, duration)
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush().context("failed to flush frame output")
    }
}
