use super::OutputSink;
use anyhow::{ensure, Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Appends raw RGBA frames to a file, pipe or v4l2loopback node
pub struct RawFrameWriter<W: Write> {
    writer: W,
    frames: u64,
}

impl RawFrameWriter<BufWriter<File>> {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        tracing::info!("Writing raw RGBA frames to {}", path.display());

        // Plain files get created, device nodes are opened as they are
        let file = File::options()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .with_context(|| format!("Failed to open output at {}", path.display()))?;

        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> RawFrameWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, frames: 0 }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> OutputSink for RawFrameWriter<W> {
    fn write_frame(&mut self, frame: &[u8], width: u32, height: u32) -> Result<()> {
        let expected = width as usize * height as usize * 4;
        ensure!(
            frame.len() == expected,
            "Frame holds {} bytes, {}x{} RGBA needs {}",
            frame.len(),
            width,
            height,
            expected
        );

        self.writer
            .write_all(frame)
            .context("Failed to write frame")?;
        self.writer.flush().context("Failed to flush frame")?;
        self.frames += 1;
        Ok(())
    }

    fn frames_written(&self) -> u64 {
        self.frames
    }
}
