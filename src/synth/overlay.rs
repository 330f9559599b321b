use anyhow::Context as _;
use image::RgbaImage;
use image::imageops::{self, FilterType};

use crate::foundation::core::FrameIndex;
use crate::model::overlay::{AvatarLayer, AvatarModel, OverlayData};
use crate::model::params::SynthOptions;
use crate::synth::FrameSynthesizer;

/// Reference compositor: draws avatar layers under and over the sticker, then applies the
/// `max_size` cap.
///
/// Text runs are ignored; plug in a synthesizer with a font stack to draw them.
#[derive(Clone, Copy, Debug, Default)]
pub struct OverlaySynthesizer;

impl OverlaySynthesizer {
    /// Create the compositor.
    pub fn new() -> Self {
        Self
    }
}

impl FrameSynthesizer for OverlaySynthesizer {
    fn synthesize(
        &self,
        background: &RgbaImage,
        overlays: &OverlayData<'_>,
        opts: &SynthOptions,
        frame: FrameIndex,
    ) -> anyhow::Result<RgbaImage> {
        let (w, h) = background.dimensions();
        anyhow::ensure!(w > 0 && h > 0, "sticker image is empty");

        let filter = if opts.antialias {
            FilterType::Triangle
        } else {
            FilterType::Nearest
        };

        let mut canvas = RgbaImage::new(w, h);
        for avatar in layer(overlays.avatars, AvatarLayer::Bottom) {
            draw_avatar(&mut canvas, avatar, frame, filter)?;
        }
        imageops::overlay(&mut canvas, background, 0, 0);
        for avatar in layer(overlays.avatars, AvatarLayer::Top) {
            draw_avatar(&mut canvas, avatar, frame, filter)?;
        }

        Ok(cap_size(canvas, opts.max_size, filter))
    }
}

fn layer(avatars: &[AvatarModel], which: AvatarLayer) -> impl Iterator<Item = &AvatarModel> {
    avatars.iter().filter(move |a| a.layer() == which)
}

fn draw_avatar(
    canvas: &mut RgbaImage,
    avatar: &AvatarModel,
    frame: FrameIndex,
    filter: FilterType,
) -> anyhow::Result<()> {
    let image = avatar
        .frame_at(frame)
        .context("avatar has no image frames")?;
    let pos = avatar
        .pos_at(frame)
        .context("avatar has no placement")?;
    if pos.width == 0 || pos.height == 0 {
        return Ok(());
    }

    if image.dimensions() == (pos.width, pos.height) {
        imageops::overlay(canvas, image, pos.x, pos.y);
    } else {
        let scaled = imageops::resize(image, pos.width, pos.height, filter);
        imageops::overlay(canvas, &scaled, pos.x, pos.y);
    }
    Ok(())
}

fn cap_size(image: RgbaImage, max_size: Option<u32>, filter: FilterType) -> RgbaImage {
    let Some(max) = max_size else {
        return image;
    };
    let (w, h) = image.dimensions();
    let longest = w.max(h);
    if longest <= max {
        return image;
    }
    let scale = f64::from(max) / f64::from(longest);
    let nw = ((f64::from(w) * scale).round() as u32).max(1);
    let nh = ((f64::from(h) * scale).round() as u32).max(1);
    imageops::resize(&image, nw, nh, filter)
}

#[cfg(test)]
#[path = "../../tests/unit/synth/overlay.rs"]
mod tests;
