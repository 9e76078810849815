mod image_segment;
mod registry;

pub use image_segment::ImageSegmentDecoder;
pub use registry::{DecoderFactory, DecoderRegistry};

use crate::error::Result;
use crate::segmentation::{FormatDescriptor, TensorType, TensorsConfig};

/// Memory of one input tensor for a single frame
#[derive(Debug, Clone, Copy)]
pub enum TensorData<'a> {
    Float32(&'a [f32]),
    Uint8(&'a [u8]),
}

impl TensorData<'_> {
    pub fn tensor_type(&self) -> TensorType {
        match self {
            Self::Float32(_) => TensorType::Float32,
            Self::Uint8(_) => TensorType::Uint8,
        }
    }
}

/// Trait for tensor decoders
/// Converts model output tensors into frames for a downstream consumer.
/// Construction is the init step; see [`DecoderFactory`].
pub trait TensorDecoder {
    /// Name the decoder is registered under
    fn name(&self) -> &'static str;

    /// Apply option `index`
    ///
    /// Unknown indices are accepted and ignored.
    fn set_option(&mut self, index: usize, value: Option<&str>) -> Result<()>;

    /// Describe the frames this decoder will produce for `config`
    fn out_caps(&self, config: &TensorsConfig) -> Result<FormatDescriptor>;

    /// Expected output size for an input of `size` bytes, 0 when unknown
    fn transform_size(&self, config: &TensorsConfig, size: usize) -> usize;

    /// Decode one frame of `inputs` into `out`
    fn decode(
        &mut self,
        config: &TensorsConfig,
        inputs: &[TensorData<'_>],
        out: &mut Vec<u8>,
    ) -> Result<()>;

    /// Release everything the decoder holds
    fn exit(&mut self) {
        // Default implementation: nothing to release
    }
}
