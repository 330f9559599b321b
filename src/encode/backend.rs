use std::path::Path;

use anyhow::Context as _;
use image::RgbaImage;

use crate::foundation::core::{Delay, FrameIndex};
use crate::foundation::error::GifResult;

/// Global parameters handed to a backend in [`GifBackend::begin`].
///
/// Output always loops forever.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncodeConfig {
    /// Logical screen width in pixels.
    pub width: u32,
    /// Logical screen height in pixels.
    pub height: u32,
    /// Delay applied to every frame.
    pub delay: Delay,
}

/// Encoder strategy.
///
/// Contract:
/// - [`prepare`](Self::prepare) converts a synthesized frame into the backend's pixel format. It
///   is called concurrently from worker threads, in any order.
/// - [`begin`](Self::begin), [`add_frame`](Self::add_frame) and [`finish`](Self::finish) are
///   called from one thread; `add_frame` receives indices `0..N` in strictly increasing order.
pub trait GifBackend {
    /// Prepared per-frame payload.
    type Frame: Send;

    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Convert one synthesized frame.
    fn prepare(&self, image: RgbaImage) -> GifResult<Self::Frame>;

    /// Pixel size of a prepared frame.
    fn frame_size(&self, frame: &Self::Frame) -> (u32, u32);

    /// Start a new output stream.
    fn begin(&mut self, cfg: EncodeConfig) -> GifResult<()>;

    /// Append the next frame in display order.
    fn add_frame(&mut self, idx: FrameIndex, frame: Self::Frame) -> GifResult<()>;

    /// Finalize and hand out the encoded bytes.
    fn finish(&mut self) -> GifResult<Vec<u8>>;
}

/// Finished animated GIF.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedGif {
    data: Vec<u8>,
    frame_count: usize,
    width: u32,
    height: u32,
}

impl EncodedGif {
    pub(crate) fn new(data: Vec<u8>, frame_count: usize, width: u32, height: u32) -> Self {
        Self {
            data,
            frame_count,
            width,
            height,
        }
    }

    /// Encoded bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// Take the encoded bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Number of encoded frames.
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// Canvas width.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Canvas height.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Write the bytes to `path`, creating parent directories.
    pub fn write_to(&self, path: impl AsRef<Path>) -> GifResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create output directory '{}'", parent.display())
            })?;
        }
        std::fs::write(path, &self.data)
            .with_context(|| format!("write gif '{}'", path.display()))?;
        Ok(())
    }
}
