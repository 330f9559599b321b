use super::*;
use crate::foundation::core::Delay;
use image::Rgba;

fn solid(c: [u8; 3]) -> RgbaImage {
    RgbaImage::from_pixel(4, 3, Rgba([c[0], c[1], c[2], 255]))
}

fn cfg() -> EncodeConfig {
    EncodeConfig {
        width: 4,
        height: 3,
        delay: Delay(50),
    }
}

#[test]
fn buffers_until_finish_then_encodes_in_order() {
    let mut enc = StreamEncoder::new();
    enc.begin(cfg()).unwrap();
    for (i, c) in [[255, 0, 0], [0, 255, 0], [0, 0, 255]].into_iter().enumerate() {
        let frame = enc.prepare(solid(c)).unwrap();
        enc.add_frame(FrameIndex(i as u32), frame).unwrap();
    }
    assert_eq!(enc.buffered(), 3);
    let bytes = enc.finish().unwrap();
    assert_eq!(enc.buffered(), 0);

    let mut opts = gif::DecodeOptions::new();
    opts.set_color_output(gif::ColorOutput::RGBA);
    let mut dec = opts.read_info(std::io::Cursor::new(bytes)).unwrap();
    assert_eq!((dec.width(), dec.height()), (4, 3));
    assert!(matches!(dec.repeat(), gif::Repeat::Infinite));

    let mut firsts = Vec::new();
    while let Some(frame) = dec.read_next_frame().unwrap() {
        assert_eq!(frame.delay, 5);
        firsts.push([frame.buffer[0], frame.buffer[1], frame.buffer[2]]);
    }
    assert_eq!(firsts, vec![[255, 0, 0], [0, 255, 0], [0, 0, 255]]);
}

#[test]
fn rejects_out_of_order_frames() {
    let mut enc = StreamEncoder::new();
    enc.begin(cfg()).unwrap();
    enc.add_frame(FrameIndex(1), enc.prepare(solid([0, 0, 0])).unwrap())
        .unwrap();
    let frame = enc.prepare(solid([0, 0, 0])).unwrap();
    assert!(matches!(
        enc.add_frame(FrameIndex(0), frame),
        Err(GifError::Encoding(_))
    ));
}

#[test]
fn requires_begin() {
    let mut enc = StreamEncoder::new();
    let frame = enc.prepare(solid([1, 2, 3])).unwrap();
    assert!(enc.add_frame(FrameIndex(0), frame).is_err());
    assert!(enc.finish().is_err());
}

#[test]
fn prepare_drops_alpha_over_black() {
    let enc = StreamEncoder::new();
    let rgb = enc
        .prepare(RgbaImage::from_pixel(1, 1, Rgba([200, 200, 200, 0])))
        .unwrap();
    assert_eq!(rgb.as_raw(), &vec![0, 0, 0]);
}

#[test]
fn rejects_frames_larger_than_canvas() {
    let mut enc = StreamEncoder::new();
    enc.begin(cfg()).unwrap();
    let big = enc
        .prepare(RgbaImage::from_pixel(8, 8, Rgba([0, 0, 0, 255])))
        .unwrap();
    assert!(matches!(
        enc.add_frame(FrameIndex(0), big),
        Err(GifError::Encoding(_))
    ));
}
