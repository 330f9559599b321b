use image::{RgbImage, RgbaImage};

use crate::encode::backend::{EncodeConfig, GifBackend};
use crate::encode::pixels::{FLATTEN_BG, check_fits, flatten_to_rgb, gif_dims};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{GifError, GifResult};

/// Palette sampling speed used when the buffered frames are finally encoded.
const STREAM_SPEED: i32 = 10;

/// Encoder that keeps every raw RGB frame in memory and encodes them in one blocking pass when
/// [`finish`](GifBackend::finish) is called.
#[derive(Debug, Default)]
pub struct StreamEncoder {
    cfg: Option<EncodeConfig>,
    frames: Vec<RgbImage>,
    last_idx: Option<FrameIndex>,
}

impl StreamEncoder {
    /// Create an idle encoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames buffered since `begin`.
    pub fn buffered(&self) -> usize {
        self.frames.len()
    }
}

impl GifBackend for StreamEncoder {
    type Frame = RgbImage;

    fn name(&self) -> &'static str {
        "buffered_stream"
    }

    fn prepare(&self, image: RgbaImage) -> GifResult<RgbImage> {
        let (w, h) = image.dimensions();
        gif_dims(w, h)?;
        flatten_to_rgb(&image, FLATTEN_BG)
    }

    fn frame_size(&self, frame: &RgbImage) -> (u32, u32) {
        frame.dimensions()
    }

    fn begin(&mut self, cfg: EncodeConfig) -> GifResult<()> {
        gif_dims(cfg.width, cfg.height)?;
        self.cfg = Some(cfg);
        self.frames.clear();
        self.last_idx = None;
        Ok(())
    }

    fn add_frame(&mut self, idx: FrameIndex, frame: RgbImage) -> GifResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| GifError::encoding("stream encoder not started"))?;
        if let Some(last) = self.last_idx
            && idx <= last
        {
            return Err(GifError::encoding(format!(
                "stream encoder received out-of-order frame {idx} after {last}"
            )));
        }
        check_fits(frame.dimensions(), (cfg.width, cfg.height))?;
        self.last_idx = Some(idx);
        self.frames.push(frame);
        Ok(())
    }

    fn finish(&mut self) -> GifResult<Vec<u8>> {
        let cfg = self
            .cfg
            .take()
            .ok_or_else(|| GifError::encoding("stream encoder not started"))?;
        let frames = std::mem::take(&mut self.frames);
        self.last_idx = None;

        let (w, h) = gif_dims(cfg.width, cfg.height)?;
        let mut encoder = gif::Encoder::new(Vec::new(), w, h, &[])?;
        encoder.set_repeat(gif::Repeat::Infinite)?;
        for raw in &frames {
            let (fw, fh) = gif_dims(raw.width(), raw.height())?;
            let mut frame = gif::Frame::from_rgb_speed(fw, fh, raw.as_raw(), STREAM_SPEED);
            frame.delay = cfg.delay.as_centis();
            encoder.write_frame(&frame)?;
        }
        encoder
            .into_inner()
            .map_err(|e| GifError::encoding(format!("failed to flush gif output: {e}")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/stream.rs"]
mod tests;
