mod raw;

pub use raw::RawTensorReader;

use anyhow::Result;

/// Trait for score tensor sources
pub trait TensorSource {
    /// Read the next frame's scores, `None` once the stream ends
    fn next_frame(&mut self) -> Result<Option<Vec<f32>>>;

    /// Number of f32 elements in one frame
    fn frame_len(&self) -> usize;
}
