use super::context::SegmentationContext;
use super::palette::ColorPalette;
use crate::error::{DecoderError, Result};
use image::RgbaImage;

/// Paints the label map into packed RGBA pixels
pub struct FrameRenderer;

impl FrameRenderer {
    /// Render into `out`, resizing it to exactly one frame
    pub fn render(ctx: &SegmentationContext, out: &mut Vec<u8>) {
        let size = ctx.frame_size();
        out.resize(size, 0);
        Self::paint(ctx, out);
    }

    /// Render into the leading `width * height * 4` bytes of `out`
    pub fn render_into(ctx: &SegmentationContext, out: &mut [u8]) -> Result<()> {
        let size = ctx.frame_size();
        if out.len() < size {
            return Err(DecoderError::OutputTooSmall {
                expected: size,
                actual: out.len(),
            });
        }
        Self::paint(ctx, &mut out[..size]);
        Ok(())
    }

    fn paint(ctx: &SegmentationContext, frame: &mut [u8]) {
        let _span = tracing::debug_span!("render").entered();

        frame.fill(0);
        let Some(map) = ctx.label_map() else {
            return;
        };

        // map iterates row-major, same order as the pixels
        for (pixel, &label) in frame.chunks_exact_mut(4).zip(map.iter()) {
            pixel.copy_from_slice(&ColorPalette::rgba(label));
        }
    }

    /// Rendered frame as an image, for writing to disk
    pub fn to_rgba_image(ctx: &SegmentationContext) -> Option<RgbaImage> {
        let mut pixels = Vec::new();
        Self::render(ctx, &mut pixels);
        RgbaImage::from_raw(ctx.width(), ctx.height(), pixels)
    }
}
