use super::context::SegmentationContext;
use super::palette::{Label, BACKGROUND_LABEL, LABEL_COUNT};
use crate::error::{DecoderError, Result};
use ndarray::{s, ArrayView1, ArrayView3};

/// Minimum winning score for a pixel to keep its label
pub const DETECTION_THRESHOLD: f32 = 0.5;

/// Read-only view of one frame of label scores.
///
/// Shape is `(height, width, LABEL_COUNT)`, matching the flat row-major layout
/// `(row * width + col) * LABEL_COUNT + label`.
#[derive(Debug, Clone, Copy)]
pub struct ProbabilityTensor<'a> {
    scores: ArrayView3<'a, f32>,
}

impl<'a> ProbabilityTensor<'a> {
    /// Wrap a flat score buffer for a `width x height` frame
    pub fn from_slice(data: &'a [f32], width: u32, height: u32) -> Result<Self> {
        let shape = (height as usize, width as usize, LABEL_COUNT);
        let expected = shape.0 * shape.1 * shape.2;
        if data.len() != expected {
            return Err(DecoderError::TensorSize {
                expected,
                actual: data.len(),
            });
        }

        let scores = ArrayView3::from_shape(shape, data).map_err(|_| DecoderError::TensorSize {
            expected,
            actual: data.len(),
        })?;
        Ok(Self { scores })
    }

    pub fn width(&self) -> usize {
        self.scores.dim().1
    }

    pub fn height(&self) -> usize {
        self.scores.dim().0
    }

    /// Score of `label` at `(row, col)`; panics when out of range
    pub fn score(&self, row: usize, col: usize, label: usize) -> f32 {
        self.scores[[row, col, label]]
    }

    /// All label scores at `(row, col)`
    pub fn scores_at(&self, row: usize, col: usize) -> ArrayView1<'_, f32> {
        self.scores.slice(s![row, col, ..])
    }
}

/// Index and value of the highest score.
///
/// Strict comparison: on ties the lowest index wins.
///
/// # Panics
///
/// Panics if `scores` is empty. Score vectors always hold `LABEL_COUNT`
/// entries.
pub fn argmax(scores: ArrayView1<'_, f32>) -> (Label, f32) {
    let mut max_idx = 0;
    let mut max_prob = scores[0];
    for (idx, &prob) in scores.iter().enumerate().skip(1) {
        if prob > max_prob {
            max_prob = prob;
            max_idx = idx;
        }
    }
    (max_idx as Label, max_prob)
}

/// Turns a score tensor into the context's label map
pub struct LabelClassifier;

impl LabelClassifier {
    /// Overwrite the label map with this frame's winners.
    ///
    /// The map is cleared first, so nothing carries over between frames.
    pub fn classify(ctx: &mut SegmentationContext, tensor: &ProbabilityTensor<'_>) -> Result<()> {
        let _span = tracing::debug_span!("classify").entered();

        let (width, height) = (ctx.width() as usize, ctx.height() as usize);
        if tensor.width() != width || tensor.height() != height {
            return Err(DecoderError::TensorSize {
                expected: width * height * LABEL_COUNT,
                actual: tensor.width() * tensor.height() * LABEL_COUNT,
            });
        }

        let Some(map) = ctx.label_map_mut() else {
            return Ok(());
        };

        map.fill(BACKGROUND_LABEL);
        for ((row, col), cell) in map.indexed_iter_mut() {
            let (label, prob) = argmax(tensor.scores_at(row, col));
            if prob > DETECTION_THRESHOLD {
                *cell = label;
            }
        }

        Ok(())
    }
}
