use image::RgbaImage;

use crate::encode::backend::{EncodeConfig, GifBackend};
use crate::encode::pixels::{FLATTEN_BG, check_fits, flatten_to_rgb, gif_dims};
use crate::foundation::core::{Delay, FrameIndex};
use crate::foundation::error::{GifError, GifResult};
use crate::model::params::QUALITY_RANGE;

/// Palette-aware encoder writing into a single in-memory output stream.
///
/// Colour quantisation happens in [`prepare`](GifBackend::prepare), i.e. on the workers; the
/// encoding thread only writes LZW data.
pub struct LibEncoder {
    speed: i32,
    encoder: Option<gif::Encoder<Vec<u8>>>,
    canvas: (u32, u32),
    delay: Delay,
    last_idx: Option<FrameIndex>,
}

impl LibEncoder {
    /// Create an encoder with the given quality (1 = best palette, 30 = fastest).
    pub fn new(quality: u8) -> GifResult<Self> {
        if !QUALITY_RANGE.contains(&quality) {
            return Err(GifError::configuration(format!(
                "quality must be within {}..={}, got {quality}",
                QUALITY_RANGE.start(),
                QUALITY_RANGE.end()
            )));
        }
        Ok(Self {
            speed: i32::from(quality),
            encoder: None,
            canvas: (0, 0),
            delay: Delay::default(),
            last_idx: None,
        })
    }
}

impl std::fmt::Debug for LibEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LibEncoder")
            .field("speed", &self.speed)
            .field("started", &self.encoder.is_some())
            .field("canvas", &self.canvas)
            .finish()
    }
}

impl GifBackend for LibEncoder {
    type Frame = gif::Frame<'static>;

    fn name(&self) -> &'static str {
        "animated_lib"
    }

    fn prepare(&self, image: RgbaImage) -> GifResult<gif::Frame<'static>> {
        let (w, h) = gif_dims(image.width(), image.height())?;
        let rgb = flatten_to_rgb(&image, FLATTEN_BG)?;
        Ok(gif::Frame::from_rgb_speed(w, h, rgb.as_raw(), self.speed))
    }

    fn frame_size(&self, frame: &gif::Frame<'static>) -> (u32, u32) {
        (u32::from(frame.width), u32::from(frame.height))
    }

    fn begin(&mut self, cfg: EncodeConfig) -> GifResult<()> {
        let (w, h) = gif_dims(cfg.width, cfg.height)?;
        let mut encoder = gif::Encoder::new(Vec::new(), w, h, &[])?;
        encoder.set_repeat(gif::Repeat::Infinite)?;
        self.encoder = Some(encoder);
        self.canvas = (cfg.width, cfg.height);
        self.delay = cfg.delay;
        self.last_idx = None;
        Ok(())
    }

    fn add_frame(&mut self, idx: FrameIndex, mut frame: gif::Frame<'static>) -> GifResult<()> {
        let Some(encoder) = self.encoder.as_mut() else {
            return Err(GifError::encoding("lib encoder not started"));
        };
        if let Some(last) = self.last_idx
            && idx <= last
        {
            return Err(GifError::encoding(format!(
                "lib encoder received out-of-order frame {idx} after {last}"
            )));
        }
        check_fits(
            (u32::from(frame.width), u32::from(frame.height)),
            self.canvas,
        )?;
        self.last_idx = Some(idx);
        frame.delay = self.delay.as_centis();
        encoder.write_frame(&frame)?;
        Ok(())
    }

    fn finish(&mut self) -> GifResult<Vec<u8>> {
        let encoder = self
            .encoder
            .take()
            .ok_or_else(|| GifError::encoding("lib encoder not started"))?;
        self.last_idx = None;
        encoder
            .into_inner()
            .map_err(|e| GifError::encoding(format!("failed to flush gif output: {e}")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/animated_lib.rs"]
mod tests;
