mod png;
mod raw;

pub use png::PngSequenceWriter;
pub use raw::RawFrameWriter;

use anyhow::Result;

/// Trait for output destinations
pub trait OutputSink {
    /// Write one packed RGBA frame of `width x height` pixels
    fn write_frame(&mut self, frame: &[u8], width: u32, height: u32) -> Result<()>;

    /// Number of frames written so far
    fn frames_written(&self) -> u64;
}
