use image::{RgbImage, RgbaImage};

use crate::foundation::error::{GifError, GifResult};
use crate::foundation::math::mul_div255_u16;

/// Colour transparent pixels are flattened over.
pub(crate) const FLATTEN_BG: [u8; 3] = [0, 0, 0];

/// Blend straight-alpha RGBA over an opaque background into 24-bit RGB.
pub(crate) fn flatten_to_rgb(src: &RgbaImage, bg: [u8; 3]) -> GifResult<RgbImage> {
    let (w, h) = src.dimensions();
    let mut out = Vec::with_capacity(src.as_raw().len() / 4 * 3);
    for s in src.as_raw().chunks_exact(4) {
        let a = u16::from(s[3]);
        if a == 255 {
            out.extend_from_slice(&s[..3]);
            continue;
        }
        let inv = 255 - a;
        for c in 0..3 {
            let v = mul_div255_u16(u16::from(s[c]), a) + mul_div255_u16(u16::from(bg[c]), inv);
            out.push(v.min(255) as u8);
        }
    }
    RgbImage::from_raw(w, h, out).ok_or_else(|| {
        GifError::Other(anyhow::anyhow!(
            "internal error: flattened buffer does not match {w}x{h}"
        ))
    })
}

/// GIF screen/frame sizes are 16-bit.
pub(crate) fn gif_dims(width: u32, height: u32) -> GifResult<(u16, u16)> {
    if width == 0 || height == 0 {
        return Err(GifError::configuration(format!(
            "frame size must be non-zero, got {width}x{height}"
        )));
    }
    match (u16::try_from(width), u16::try_from(height)) {
        (Ok(w), Ok(h)) => Ok((w, h)),
        _ => Err(GifError::encoding(format!(
            "frame size {width}x{height} exceeds the 65535 pixel GIF limit"
        ))),
    }
}

/// Prepared frames may be smaller than the canvas but never larger.
pub(crate) fn check_fits(frame: (u32, u32), canvas: (u32, u32)) -> GifResult<()> {
    if frame.0 > canvas.0 || frame.1 > canvas.1 {
        return Err(GifError::encoding(format!(
            "frame size {}x{} exceeds canvas {}x{}",
            frame.0, frame.1, canvas.0, canvas.1
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/pixels.rs"]
mod tests;
