use super::palette::{Label, BACKGROUND_LABEL};
use crate::error::{DecoderError, Result};
use ndarray::Array2;

/// Side length of the square tflite segmentation output
pub const TFLITE_IMAGE_SIZE: u32 = 257;

/// Spatial contract selected by the mode option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Unset,
    TfliteSegmentation,
}

impl Mode {
    /// Resolve a mode option value
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "tflite" => Some(Self::TfliteSegmentation),
            _ => None,
        }
    }

    /// Fixed (width, height) of the mode's label map
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            Self::Unset => (0, 0),
            Self::TfliteSegmentation => (TFLITE_IMAGE_SIZE, TFLITE_IMAGE_SIZE),
        }
    }
}

/// Mode selection plus the persistent per-pixel label map.
///
/// The map is indexed `[[row, col]]` and is always `height x width` of the
/// active mode. It only exists while a mode is set.
#[derive(Debug, Default)]
pub struct SegmentationContext {
    mode: Mode,
    width: u32,
    height: u32,
    label_map: Option<Array2<Label>>,
}

impl SegmentationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn label_map(&self) -> Option<&Array2<Label>> {
        self.label_map.as_ref()
    }

    pub(crate) fn label_map_mut(&mut self) -> Option<&mut Array2<Label>> {
        self.label_map.as_mut()
    }

    /// Select the spatial contract by name.
    ///
    /// Empty/missing and unrecognized names fail without touching the current
    /// state. Selecting the active mode again keeps the existing map.
    pub fn select_mode(&mut self, name: Option<&str>) -> Result<()> {
        let name = match name {
            Some(name) if !name.is_empty() => name,
            _ => {
                tracing::error!("Please set a valid mode at option 0");
                return Err(DecoderError::InvalidOption);
            }
        };

        let mode = Mode::from_name(name).ok_or_else(|| {
            tracing::warn!("Unknown image segment mode {:?}", name);
            DecoderError::UnknownMode(name.to_string())
        })?;

        if mode == self.mode {
            tracing::debug!("Mode {:?} already active", mode);
            return Ok(());
        }

        self.init_mode(mode);
        Ok(())
    }

    fn init_mode(&mut self, mode: Mode) {
        let (width, height) = mode.dimensions();
        tracing::info!("Initializing {:?} label map at {}x{}", mode, width, height);

        self.mode = mode;
        self.width = width;
        self.height = height;
        self.label_map = Some(Array2::from_elem(
            (height as usize, width as usize),
            BACKGROUND_LABEL,
        ));
    }

    /// Release the label map and return to `Mode::Unset`
    pub fn teardown(&mut self) {
        if self.label_map.take().is_some() {
            tracing::debug!("Released {}x{} label map", self.width, self.height);
        }
        self.mode = Mode::Unset;
        self.width = 0;
        self.height = 0;
    }

    /// Size in bytes of one rendered RGBA frame
    pub fn frame_size(&self) -> usize {
        self.width as usize * self.height as usize * 4
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_unset_and_empty() {
        let ctx = SegmentationContext::new();
        assert_eq!(ctx.mode(), Mode::Unset);
        assert_eq!((ctx.width(), ctx.height()), (0, 0));
        assert!(ctx.label_map().is_none());
        assert_eq!(ctx.frame_size(), 0);
    }

    #[test]
    fn tflite_allocates_zeroed_map() {
        let mut ctx = SegmentationContext::new();
        ctx.select_mode(Some("tflite")).unwrap();

        assert_eq!(ctx.mode(), Mode::TfliteSegmentation);
        assert_eq!((ctx.width(), ctx.height()), (257, 257));
        let map = ctx.label_map().unwrap();
        assert_eq!(map.dim(), (257, 257));
        assert!(map.iter().all(|&l| l == BACKGROUND_LABEL));
    }

    #[test]
    fn reselecting_same_mode_keeps_buffer() {
        let mut ctx = SegmentationContext::new();
        ctx.select_mode(Some("tflite")).unwrap();
        ctx.label_map_mut().unwrap()[[3, 4]] = 7;
        let before = ctx.label_map().unwrap().as_ptr();

        ctx.select_mode(Some("tflite")).unwrap();

        assert_eq!(ctx.label_map().unwrap().as_ptr(), before);
        assert_eq!(ctx.label_map().unwrap()[[3, 4]], 7);
        assert_eq!((ctx.width(), ctx.height()), (257, 257));
    }

    #[test]
    fn empty_or_missing_name_is_rejected_without_mutation() {
        let mut ctx = SegmentationContext::new();
        assert_eq!(ctx.select_mode(None), Err(DecoderError::InvalidOption));
        assert_eq!(ctx.select_mode(Some("")), Err(DecoderError::InvalidOption));
        assert_eq!(ctx.mode(), Mode::Unset);
        assert!(ctx.label_map().is_none());

        ctx.select_mode(Some("tflite")).unwrap();
        assert_eq!(ctx.select_mode(Some("")), Err(DecoderError::InvalidOption));
        assert_eq!(ctx.mode(), Mode::TfliteSegmentation);
        assert_eq!((ctx.width(), ctx.height()), (257, 257));
        assert!(ctx.label_map().is_some());
    }

    #[test]
    fn unknown_name_leaves_state_untouched() {
        let mut ctx = SegmentationContext::new();
        ctx.select_mode(Some("tflite")).unwrap();

        let err = ctx.select_mode(Some("deeplab")).unwrap_err();

        assert_eq!(err, DecoderError::UnknownMode("deeplab".into()));
        assert_eq!(ctx.mode(), Mode::TfliteSegmentation);
        assert_eq!(ctx.label_map().unwrap().dim(), (257, 257));
    }

    #[test]
    fn teardown_resets_everything() {
        let mut ctx = SegmentationContext::new();
        ctx.select_mode(Some("tflite")).unwrap();
        ctx.teardown();

        assert_eq!(ctx.mode(), Mode::Unset);
        assert_eq!((ctx.width(), ctx.height()), (0, 0));
        assert!(ctx.label_map().is_none());

        // usable again after teardown
        ctx.select_mode(Some("tflite")).unwrap();
        assert!(ctx.label_map().is_some());
    }

    #[test]
    fn mode_names_resolve() {
        assert_eq!(Mode::from_name("tflite"), Some(Mode::TfliteSegmentation));
        assert_eq!(Mode::from_name("TFLITE"), None);
    }
}
