use super::OutputSink;
use anyhow::{Context, Result};
use image::RgbaImage;
use std::fs;
use std::path::{Path, PathBuf};

/// Writes each frame as `frame_NNNNN.png` into a directory
pub struct PngSequenceWriter {
    dir: PathBuf,
    frames: u64,
}

impl PngSequenceWriter {
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        tracing::info!("Writing PNG frames to {}", dir.display());

        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

        Ok(Self { dir, frames: 0 })
    }

    pub fn frame_path(&self, index: u64) -> PathBuf {
        self.dir.join(format!("frame_{:05}.png", index))
    }
}

impl OutputSink for PngSequenceWriter {
    fn write_frame(&mut self, frame: &[u8], width: u32, height: u32) -> Result<()> {
        let image = RgbaImage::from_raw(width, height, frame.to_vec())
            .with_context(|| format!("Frame buffer too small for {}x{}", width, height))?;

        let path = self.frame_path(self.frames);
        image
            .save(&path)
            .with_context(|| format!("Failed to save {}", path.display()))?;

        tracing::debug!("Wrote {}", path.display());
        self.frames += 1;
        Ok(())
    }

    fn frames_written(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_paths_are_zero_padded() {
        let dir = tempfile::tempdir().unwrap();
        let writer = PngSequenceWriter::new(dir.path()).unwrap();
        assert_eq!(writer.frame_path(7), dir.path().join("frame_00007.png"));
    }

    #[test]
    fn creates_missing_output_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        PngSequenceWriter::new(&nested).unwrap();
        assert!(nested.is_dir());
    }

    #[test]
    fn writes_readable_png() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = PngSequenceWriter::new(dir.path()).unwrap();

        let frame = [10, 20, 30, 255, 40, 50, 60, 255];
        writer.write_frame(&frame, 2, 1).unwrap();

        let decoded = image::open(writer.frame_path(0)).unwrap().to_rgba8();
        assert_eq!(decoded.as_raw(), &frame.to_vec());
        assert_eq!(writer.frames_written(), 1);
    }

    #[test]
    fn short_buffer_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = PngSequenceWriter::new(dir.path()).unwrap();
        assert!(writer.write_frame(&[0; 4], 2, 2).is_err());
        assert_eq!(writer.frames_written(), 0);
        assert!(!writer.frame_path(0).exists());
    }
}
