use super::*;
use crate::model::overlay::AvatarPos;
use image::Rgba;

const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);
const GREEN: Rgba<u8> = Rgba([0, 255, 0, 255]);

fn sticker_with_hole() -> RgbaImage {
    // Opaque red with a transparent 2x2 window at (2,2).
    let mut img = RgbaImage::from_pixel(8, 8, RED);
    for y in 2..4 {
        for x in 2..4 {
            img.put_pixel(x, y, Rgba([0, 0, 0, 0]));
        }
    }
    img
}

fn avatar(colors: &[Rgba<u8>], x: i64, y: i64) -> AvatarModel {
    let frames = colors
        .iter()
        .map(|c| RgbaImage::from_pixel(2, 2, *c))
        .collect();
    AvatarModel::new(
        frames,
        AvatarPos {
            x,
            y,
            width: 2,
            height: 2,
        },
    )
}

fn opts() -> SynthOptions {
    SynthOptions {
        antialias: false,
        max_size: None,
    }
}

#[test]
fn top_avatar_covers_sticker_and_advances_per_frame() {
    let sticker = sticker_with_hole();
    let avatars = vec![avatar(&[BLUE, GREEN], 5, 5)];
    let overlays = OverlayData::new(&avatars, &[]);
    let synth = OverlaySynthesizer::new();

    let f0 = synth
        .synthesize(&sticker, &overlays, &opts(), FrameIndex(0))
        .unwrap();
    let f1 = synth
        .synthesize(&sticker, &overlays, &opts(), FrameIndex(1))
        .unwrap();
    assert_eq!(*f0.get_pixel(5, 5), BLUE);
    assert_eq!(*f1.get_pixel(5, 5), GREEN);
    assert_eq!(*f0.get_pixel(0, 0), RED);
}

#[test]
fn bottom_avatar_only_shows_through_transparent_sticker_pixels() {
    let sticker = sticker_with_hole();
    let avatars = vec![avatar(&[BLUE], 2, 2).with_layer(AvatarLayer::Bottom)];
    let overlays = OverlayData::new(&avatars, &[]);
    let frame = OverlaySynthesizer
        .synthesize(&sticker, &overlays, &opts(), FrameIndex(0))
        .unwrap();
    assert_eq!(*frame.get_pixel(2, 2), BLUE);
    assert_eq!(*frame.get_pixel(1, 1), RED);
}

#[test]
fn max_size_caps_the_longer_side() {
    let sticker = RgbaImage::from_pixel(40, 20, RED);
    let overlays = OverlayData::new(&[], &[]);
    let frame = OverlaySynthesizer
        .synthesize(
            &sticker,
            &overlays,
            &SynthOptions {
                antialias: true,
                max_size: Some(10),
            },
            FrameIndex(0),
        )
        .unwrap();
    assert_eq!(frame.dimensions(), (10, 5));
}

#[test]
fn avatar_without_frames_fails() {
    let sticker = sticker_with_hole();
    let avatars = vec![avatar(&[], 0, 0)];
    let overlays = OverlayData::new(&avatars, &[]);
    let err = OverlaySynthesizer
        .synthesize(&sticker, &overlays, &opts(), FrameIndex(0))
        .unwrap_err();
    assert!(err.to_string().contains("no image frames"));
}
