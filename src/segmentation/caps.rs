use super::context::SegmentationContext;
use crate::error::{DecoderError, Result};
use std::fmt;

/// Element type of an upstream tensor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TensorType {
    Int8,
    Uint8,
    Int16,
    Uint16,
    Int32,
    Uint32,
    Float32,
    Float64,
}

/// Shape and type of one upstream tensor.
///
/// `dimension[0]` is the innermost axis; for segmentation output that is the
/// label axis, followed by width, height and batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TensorInfo {
    pub tensor_type: TensorType,
    pub dimension: [u32; 4],
}

impl TensorInfo {
    pub fn new(tensor_type: TensorType, dimension: [u32; 4]) -> Self {
        Self {
            tensor_type,
            dimension,
        }
    }

    /// Number of elements described by the dimensions
    pub fn element_count(&self) -> usize {
        self.dimension.iter().map(|&d| d.max(1) as usize).product()
    }
}

/// Upstream stream configuration as seen at negotiation time
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TensorsConfig {
    pub tensors: Vec<TensorInfo>,
    /// Frame rate numerator; negative when unknown
    pub rate_n: i32,
    /// Frame rate denominator; zero when unknown
    pub rate_d: i32,
}

impl TensorsConfig {
    pub fn num_tensors(&self) -> usize {
        self.tensors.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Rgba,
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rgba => f.write_str("RGBA"),
        }
    }
}

/// Frame rate as a fraction, passed through from upstream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRate {
    pub numerator: i32,
    pub denominator: i32,
}

/// Output format offered to the downstream consumer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatDescriptor {
    pub format: PixelFormat,
    pub width: u32,
    pub height: u32,
    pub framerate: Option<FrameRate>,
}

impl fmt::Display for FormatDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "video/x-raw, format={}, width={}, height={}",
            self.format, self.width, self.height
        )?;
        if let Some(rate) = self.framerate {
            write!(f, ", framerate={}/{}", rate.numerator, rate.denominator)?;
        }
        Ok(())
    }
}

/// Derives the output format from the context and upstream config
pub struct CapabilityDescriber;

impl CapabilityDescriber {
    pub fn describe_output(
        ctx: &SegmentationContext,
        config: &TensorsConfig,
    ) -> Result<FormatDescriptor> {
        tracing::info!("Num tensors = {}", config.num_tensors());
        if config.num_tensors() == 0 {
            return Err(DecoderError::NoTensorsConfigured);
        }

        let framerate = (config.rate_n >= 0 && config.rate_d > 0).then_some(FrameRate {
            numerator: config.rate_n,
            denominator: config.rate_d,
        });

        Ok(FormatDescriptor {
            format: PixelFormat::Rgba,
            width: ctx.width(),
            height: ctx.height(),
            framerate,
        })
    }
}
