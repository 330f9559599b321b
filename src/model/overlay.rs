use image::RgbaImage;

use crate::foundation::core::FrameIndex;

/// Destination rectangle of an avatar on the sticker canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AvatarPos {
    /// Left edge in pixels, may be negative.
    pub x: i64,
    /// Top edge in pixels, may be negative.
    pub y: i64,
    /// Drawn width.
    pub width: u32,
    /// Drawn height.
    pub height: u32,
}

/// Whether an avatar is drawn above or below the sticker.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AvatarLayer {
    /// Drawn after the sticker.
    #[default]
    Top,
    /// Drawn first, the sticker covers it.
    Bottom,
}

/// One avatar overlay: its own (possibly animated) image sequence plus per-frame placement.
#[derive(Clone, Debug)]
pub struct AvatarModel {
    frames: Vec<RgbaImage>,
    positions: Vec<AvatarPos>,
    layer: AvatarLayer,
}

impl AvatarModel {
    /// Avatar with a single placement used for every output frame.
    pub fn new(frames: Vec<RgbaImage>, pos: AvatarPos) -> Self {
        Self {
            frames,
            positions: vec![pos],
            layer: AvatarLayer::Top,
        }
    }

    /// Replace the per-frame placements; the last one repeats past its end.
    pub fn with_positions(mut self, positions: Vec<AvatarPos>) -> Self {
        self.positions = positions;
        self
    }

    /// Set the draw layer.
    pub fn with_layer(mut self, layer: AvatarLayer) -> Self {
        self.layer = layer;
        self
    }

    /// Length of the avatar's own image sequence.
    pub fn frame_len(&self) -> usize {
        self.frames.len()
    }

    /// All avatar frames.
    pub fn frames(&self) -> &[RgbaImage] {
        &self.frames
    }

    /// Draw layer.
    pub fn layer(&self) -> AvatarLayer {
        self.layer
    }

    /// Avatar image for an output frame; the sequence wraps around.
    pub fn frame_at(&self, frame: FrameIndex) -> Option<&RgbaImage> {
        if self.frames.is_empty() {
            return None;
        }
        self.frames.get(frame.as_usize() % self.frames.len())
    }

    /// Placement for an output frame, clamped to the last configured one.
    pub fn pos_at(&self, frame: FrameIndex) -> Option<AvatarPos> {
        let last = self.positions.len().checked_sub(1)?;
        self.positions.get(frame.as_usize().min(last)).copied()
    }
}

/// One text run. Rasterising text is up to synthesizers that carry a font stack.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TextModel {
    /// Text content.
    pub text: String,
    /// Anchor, left edge.
    pub x: i64,
    /// Anchor, baseline.
    pub y: i64,
    /// Font size in pixels.
    pub size: f32,
    /// Straight-alpha RGBA colour.
    pub color: [u8; 4],
}

/// Ordered avatar and text overlays for one render call.
#[derive(Clone, Copy, Debug)]
pub struct OverlayData<'a> {
    /// Avatars in draw order.
    pub avatars: &'a [AvatarModel],
    /// Texts in draw order.
    pub texts: &'a [TextModel],
}

impl<'a> OverlayData<'a> {
    /// Bundle overlay slices.
    pub fn new(avatars: &'a [AvatarModel], texts: &'a [TextModel]) -> Self {
        Self { avatars, texts }
    }

    /// Number of frames a single-background render produces: the longest avatar sequence, at
    /// least 1.
    pub fn longest_sequence(&self) -> usize {
        self.avatars
            .iter()
            .map(AvatarModel::frame_len)
            .max()
            .unwrap_or(0)
            .max(1)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/overlay.rs"]
mod tests;
