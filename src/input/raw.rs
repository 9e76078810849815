use super::TensorSource;
use anyhow::{bail, Context, Result};
use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;

/// Reads back-to-back frames of little-endian f32 scores
pub struct RawTensorReader<R> {
    reader: R,
    frame_len: usize,
    buf: Vec<u8>,
}

impl RawTensorReader<BufReader<File>> {
    pub fn open<P: AsRef<Path>>(path: P, frame_len: usize) -> Result<Self> {
        let path = path.as_ref();
        tracing::info!("Opening tensor stream {}", path.display());

        let file = File::open(path)
            .with_context(|| format!("Failed to open tensor file {}", path.display()))?;
        Ok(Self::new(BufReader::new(file), frame_len))
    }
}

impl<R: Read> RawTensorReader<R> {
    pub fn new(reader: R, frame_len: usize) -> Self {
        Self {
            reader,
            frame_len,
            buf: vec![0; frame_len * 4],
        }
    }

    /// Fill the frame buffer; returns bytes read, short only at end of stream
    fn fill(&mut self) -> Result<usize> {
        let mut filled = 0;
        while filled < self.buf.len() {
            match self.reader.read(&mut self.buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e).context("Failed to read tensor frame"),
            }
        }
        Ok(filled)
    }
}

impl<R: Read> TensorSource for RawTensorReader<R> {
    fn next_frame(&mut self) -> Result<Option<Vec<f32>>> {
        let filled = self.fill()?;
        if filled == 0 {
            return Ok(None);
        }
        if filled < self.buf.len() {
            bail!(
                "Truncated tensor frame: got {} of {} bytes",
                filled,
                self.buf.len()
            );
        }

        let scores = self
            .buf
            .chunks_exact(4)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect();
        Ok(Some(scores))
    }

    fn frame_len(&self) -> usize {
        self.frame_len
    }
}
