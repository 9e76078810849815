use super::registry::DecoderRegistry;
use super::{TensorData, TensorDecoder};
use crate::error::{DecoderError, Result};
use crate::segmentation::{
    CapabilityDescriber, FormatDescriptor, FrameRenderer, LabelClassifier, Mode,
    ProbabilityTensor, SegmentationContext, TensorType, TensorsConfig, LABEL_COUNT,
};

/// Image segmentation decoder
///
/// Turns per-pixel label scores into a color-coded RGBA frame. Option 0
/// selects the mode; only `"tflite"` (21 labels, 257x257) is known.
#[derive(Debug, Default)]
pub struct ImageSegmentDecoder {
    ctx: SegmentationContext,
}

impl ImageSegmentDecoder {
    pub const NAME: &'static str = "image_segment";

    pub fn new() -> Self {
        Self::default()
    }

    /// Boxed constructor used as the registry factory
    pub fn create() -> Box<dyn TensorDecoder> {
        Box::new(Self::new())
    }

    /// Make this decoder available under [`Self::NAME`]
    pub fn register(registry: &mut DecoderRegistry) -> bool {
        registry.register(Self::NAME, Self::create)
    }

    pub fn context(&self) -> &SegmentationContext {
        &self.ctx
    }

    /// Check the tensor contract and view the scores
    fn scores<'a>(
        &self,
        config: &TensorsConfig,
        inputs: &[TensorData<'a>],
    ) -> Result<ProbabilityTensor<'a>> {
        let info = config.tensors.first().ok_or(DecoderError::MissingInput)?;
        let input = inputs.first().ok_or(DecoderError::MissingInput)?;

        if info.tensor_type != TensorType::Float32 {
            return Err(DecoderError::UnsupportedTensorType(info.tensor_type));
        }
        if info.dimension[0] != LABEL_COUNT as u32 {
            return Err(DecoderError::LabelDimension {
                expected: LABEL_COUNT as u32,
                actual: info.dimension[0],
            });
        }

        match *input {
            TensorData::Float32(data) => {
                ProbabilityTensor::from_slice(data, self.ctx.width(), self.ctx.height())
            }
            other => Err(DecoderError::UnsupportedTensorType(other.tensor_type())),
        }
    }
}

impl TensorDecoder for ImageSegmentDecoder {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn set_option(&mut self, index: usize, value: Option<&str>) -> Result<()> {
        if index != 0 {
            tracing::debug!("Ignoring option {} = {:?}", index, value);
            return Ok(());
        }
        self.ctx.select_mode(value)
    }

    fn out_caps(&self, config: &TensorsConfig) -> Result<FormatDescriptor> {
        CapabilityDescriber::describe_output(&self.ctx, config)
    }

    /// Always 0: the output size is only fixed when [`decode`](Self::decode)
    /// renders the frame.
    fn transform_size(&self, _config: &TensorsConfig, _size: usize) -> usize {
        0
    }

    fn decode(
        &mut self,
        config: &TensorsConfig,
        inputs: &[TensorData<'_>],
        out: &mut Vec<u8>,
    ) -> Result<()> {
        let _span = tracing::debug_span!("image_segment_decode").entered();

        if self.ctx.mode() == Mode::TfliteSegmentation {
            let tensor = self.scores(config, inputs)?;
            LabelClassifier::classify(&mut self.ctx, &tensor)?;
        }

        FrameRenderer::render(&self.ctx, out);
        Ok(())
    }

    fn exit(&mut self) {
        tracing::debug!("Tearing down image segment decoder");
        self.ctx.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segmentation::{ColorPalette, TensorInfo};

    const SIDE: usize = 257;

    fn config() -> TensorsConfig {
        TensorsConfig {
            tensors: vec![TensorInfo::new(
                TensorType::Float32,
                [LABEL_COUNT as u32, SIDE as u32, SIDE as u32, 1],
            )],
            rate_n: 30,
            rate_d: 1,
        }
    }

    fn tflite_decoder() -> ImageSegmentDecoder {
        let mut decoder = ImageSegmentDecoder::new();
        decoder.set_option(0, Some("tflite")).unwrap();
        decoder
    }

    #[test]
    fn decodes_single_labelled_pixel() {
        let mut decoder = tflite_decoder();
        let mut scores = vec![0.0f32; SIDE * SIDE * LABEL_COUNT];
        scores[5] = 0.9;

        let mut out = Vec::new();
        decoder
            .decode(&config(), &[TensorData::Float32(&scores)], &mut out)
            .unwrap();

        assert_eq!(out.len(), SIDE * SIDE * 4);
        assert_eq!(&out[..4], &ColorPalette::rgba(5));
        assert!(out[4..]
            .chunks_exact(4)
            .all(|px| px == ColorPalette::rgba(0)));
    }

    #[test]
    fn other_option_indices_are_ignored() {
        let mut decoder = ImageSegmentDecoder::new();
        decoder.set_option(1, Some("whatever")).unwrap();
        decoder.set_option(3, None).unwrap();
        assert_eq!(decoder.context().mode(), Mode::Unset);
    }

    #[test]
    fn rejects_non_float_config() {
        let mut decoder = tflite_decoder();
        let mut cfg = config();
        cfg.tensors[0].tensor_type = TensorType::Uint8;
        let scores = vec![0.0f32; SIDE * SIDE * LABEL_COUNT];

        let err = decoder
            .decode(&cfg, &[TensorData::Float32(&scores)], &mut Vec::new())
            .unwrap_err();
        assert_eq!(err, DecoderError::UnsupportedTensorType(TensorType::Uint8));
    }

    #[test]
    fn rejects_non_float_data() {
        let mut decoder = tflite_decoder();
        let bytes = vec![0u8; 16];
        let err = decoder
            .decode(&config(), &[TensorData::Uint8(&bytes)], &mut Vec::new())
            .unwrap_err();
        assert_eq!(err, DecoderError::UnsupportedTensorType(TensorType::Uint8));
    }

    #[test]
    fn rejects_wrong_label_dimension() {
        let mut decoder = tflite_decoder();
        let mut cfg = config();
        cfg.tensors[0].dimension[0] = 3;
        let scores = vec![0.0f32; SIDE * SIDE * 3];

        let err = decoder
            .decode(&cfg, &[TensorData::Float32(&scores)], &mut Vec::new())
            .unwrap_err();
        assert_eq!(
            err,
            DecoderError::LabelDimension {
                expected: 21,
                actual: 3
            }
        );
    }

    #[test]
    fn rejects_missing_input() {
        let mut decoder = tflite_decoder();
        let err = decoder.decode(&config(), &[], &mut Vec::new()).unwrap_err();
        assert_eq!(err, DecoderError::MissingInput);
        assert!(err.is_contract_violation());
    }

    #[test]
    fn rejected_frame_keeps_previous_labels() {
        let mut decoder = tflite_decoder();
        let mut scores = vec![0.0f32; SIDE * SIDE * LABEL_COUNT];
        scores[2] = 0.7;
        let mut out = Vec::new();
        decoder
            .decode(&config(), &[TensorData::Float32(&scores)], &mut out)
            .unwrap();

        let short = vec![0.0f32; 8];
        assert!(decoder
            .decode(&config(), &[TensorData::Float32(&short)], &mut out)
            .is_err());
        assert_eq!(decoder.context().label_map().unwrap()[[0, 0]], 2);
    }

    #[test]
    fn unset_decoder_produces_empty_frame() {
        let mut decoder = ImageSegmentDecoder::new();
        let mut out = vec![9; 12];
        decoder.decode(&config(), &[], &mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn transform_size_is_not_estimated() {
        let decoder = tflite_decoder();
        assert_eq!(decoder.transform_size(&config(), 1 << 20), 0);
    }

    #[test]
    fn exit_releases_context() {
        let mut decoder = tflite_decoder();
        decoder.exit();
        assert_eq!(decoder.context().mode(), Mode::Unset);
        assert!(decoder.context().label_map().is_none());
    }
}
