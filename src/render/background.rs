use std::collections::BTreeMap;

use image::RgbaImage;

use crate::foundation::core::FrameIndex;
use crate::foundation::error::{GifError, GifResult};
use crate::model::overlay::OverlayData;

/// Background frames of one render call.
#[derive(Clone, Debug)]
pub enum BackgroundSet<'a> {
    /// One sticker reused for every frame; the frame count comes from the overlays.
    Single(&'a RgbaImage),
    /// One sticker per output frame, in display order.
    PerFrame(Vec<&'a RgbaImage>),
}

impl<'a> BackgroundSet<'a> {
    /// Single-sticker set.
    pub fn single(sticker: &'a RgbaImage) -> Self {
        Self::Single(sticker)
    }

    /// Per-frame set from an index-keyed map. Keys must be exactly `0..N` with `N >= 1`.
    pub fn from_map(stickers: &'a BTreeMap<FrameIndex, RgbaImage>) -> GifResult<Self> {
        if stickers.is_empty() {
            return Err(GifError::configuration("sticker frame map must not be empty"));
        }
        let mut frames = Vec::with_capacity(stickers.len());
        for (expected, (idx, image)) in stickers.iter().enumerate() {
            if idx.as_usize() != expected {
                return Err(GifError::configuration(format!(
                    "sticker frame map must be dense from 0: expected frame {expected}, found {idx}"
                )));
            }
            frames.push(image);
        }
        Ok(Self::PerFrame(frames))
    }

    /// Per-frame set from stickers already in display order.
    pub fn from_frames(stickers: &'a [RgbaImage]) -> GifResult<Self> {
        if stickers.is_empty() {
            return Err(GifError::configuration("sticker frame list must not be empty"));
        }
        Ok(Self::PerFrame(stickers.iter().collect()))
    }

    /// Number of output frames.
    pub fn frame_count(&self, overlays: &OverlayData<'_>) -> GifResult<usize> {
        let n = match self {
            Self::Single(_) => overlays.longest_sequence(),
            Self::PerFrame(frames) => frames.len(),
        };
        if n == 0 {
            return Err(GifError::configuration("render has no frames"));
        }
        if u32::try_from(n).is_err() {
            return Err(GifError::configuration(format!(
                "render has too many frames ({n})"
            )));
        }
        Ok(n)
    }

    /// Background for output frame `frame`.
    pub fn background_for(&self, frame: FrameIndex) -> GifResult<&'a RgbaImage> {
        match self {
            Self::Single(image) => Ok(*image),
            Self::PerFrame(frames) => frames.get(frame.as_usize()).copied().ok_or_else(|| {
                GifError::configuration(format!(
                    "no sticker for frame {frame} (have {})",
                    frames.len()
                ))
            }),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/background.rs"]
mod tests;
