//! Tensor decoder that turns per-pixel label scores from an image
//! segmentation model into color-coded RGBA frames.
//!
//! Hosts register [`decoder::ImageSegmentDecoder`] in a
//! [`decoder::DecoderRegistry`], select a mode through option 0, query the
//! output format once, and then call `decode` for every frame.

pub mod decoder;
pub mod error;
pub mod input;
pub mod output;
pub mod segmentation;

pub use error::{DecoderError, Result};
