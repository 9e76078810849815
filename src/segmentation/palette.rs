/// Number of labels the segmentation model scores per pixel
pub const LABEL_COUNT: usize = 21;

/// Label index in `[0, LABEL_COUNT)`
pub type Label = u8;

/// Label used for pixels no class claims with enough confidence
pub const BACKGROUND_LABEL: Label = 0;

/// Packed label colors.
///
/// Each value's little-endian byte image is `[R, G, B, A]`, so `0xFF000080`
/// paints `R=0x80, G=0x00, B=0x00, A=0xFF`.
const LABEL_COLORS: [u32; LABEL_COUNT] = [
    0xFF000080, 0xFF800000, 0xFFFFEFD5, 0xFF40E0D0, 0xFFFFA500, //
    0xFF00FF00, 0xFFDC143C, 0xFFF0F8FF, 0xFF008000, 0xFFEE82EE, //
    0xFF808080, 0xFF4169E1, 0xFF008080, 0xFFFF6347, 0xFF000000, //
    0xFFFF4500, 0xFFDA70D6, 0xFFEEE8AA, 0xFF98FB98, 0xFFAFEEEE, //
    0xFFFFF5EE,
];

/// Fixed label -> RGBA color table
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorPalette;

impl ColorPalette {
    /// Packed color for a label
    ///
    /// Panics if `label >= LABEL_COUNT`; label maps never hold such values.
    pub fn packed(label: Label) -> u32 {
        LABEL_COLORS[label as usize]
    }

    /// Color bytes in output order (R, G, B, A)
    pub fn rgba(label: Label) -> [u8; 4] {
        Self::packed(label).to_le_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_covers_every_label() {
        assert_eq!(LABEL_COLORS.len(), LABEL_COUNT);
    }

    #[test]
    fn background_is_opaque() {
        assert_eq!(ColorPalette::rgba(BACKGROUND_LABEL), [0x80, 0x00, 0x00, 0xFF]);
    }

    #[test]
    fn bytes_follow_rgba_order() {
        // 0xFF00FF00
        assert_eq!(ColorPalette::rgba(5), [0x00, 0xFF, 0x00, 0xFF]);
        // 0xFF40E0D0
        assert_eq!(ColorPalette::rgba(3), [0xD0, 0xE0, 0x40, 0xFF]);
        assert_eq!(ColorPalette::packed(20), 0xFFFFF5EE);
    }
}
