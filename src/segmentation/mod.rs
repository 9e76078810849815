pub mod caps;
mod classify;
mod context;
mod palette;
mod render;

pub use caps::{
    CapabilityDescriber, FormatDescriptor, FrameRate, PixelFormat, TensorInfo, TensorType,
    TensorsConfig,
};
pub use classify::{argmax, LabelClassifier, ProbabilityTensor, DETECTION_THRESHOLD};
pub use context::{Mode, SegmentationContext, TFLITE_IMAGE_SIZE};
pub use palette::{ColorPalette, Label, BACKGROUND_LABEL, LABEL_COUNT};
pub use render::FrameRenderer;
