use crate::segmentation::caps::TensorType;

/// Errors reported by the tensor decoders.
///
/// Two kinds of failure share this enum. Option and caps errors are ordinary
/// caller mistakes. The rest mean the upstream pipeline handed us tensors or
/// buffers that break the decoder's data contract; see
/// [`DecoderError::is_contract_violation`].
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum DecoderError {
    #[error("mode option must be a non-empty string")]
    InvalidOption,

    #[error("unknown image segment mode: {0:?}")]
    UnknownMode(String),

    #[error("upstream configuration has no input tensors")]
    NoTensorsConfigured,

    #[error("no tensor decoder registered as {0:?}")]
    UnknownDecoder(String),

    #[error("decode called without an input tensor")]
    MissingInput,

    #[error("unsupported tensor type {0:?}, expected float32")]
    UnsupportedTensorType(TensorType),

    #[error("label dimension is {actual}, expected {expected}")]
    LabelDimension { expected: u32, actual: u32 },

    #[error("tensor holds {actual} elements, expected {expected}")]
    TensorSize { expected: usize, actual: usize },

    #[error("output buffer holds {actual} bytes, frame needs {expected}")]
    OutputTooSmall { expected: usize, actual: usize },
}

impl DecoderError {
    /// True when the error means upstream broke the tensor/buffer contract.
    ///
    /// Hosts are expected to stop the stream on these rather than retry.
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            Self::MissingInput
                | Self::UnsupportedTensorType(_)
                | Self::LabelDimension { .. }
                | Self::TensorSize { .. }
                | Self::OutputTooSmall { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, DecoderError>;
