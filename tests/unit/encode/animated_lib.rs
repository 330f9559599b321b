use super::*;
use image::Rgba;

fn solid(c: [u8; 3]) -> RgbaImage {
    RgbaImage::from_pixel(5, 5, Rgba([c[0], c[1], c[2], 255]))
}

fn cfg() -> EncodeConfig {
    EncodeConfig {
        width: 5,
        height: 5,
        delay: Delay(20),
    }
}

#[test]
fn quality_must_be_in_range() {
    assert!(matches!(LibEncoder::new(0), Err(GifError::Configuration(_))));
    assert!(matches!(LibEncoder::new(31), Err(GifError::Configuration(_))));
    assert!(LibEncoder::new(1).is_ok());
    assert!(LibEncoder::new(30).is_ok());
}

#[test]
fn prepare_quantises_to_indexed_frame() {
    let enc = LibEncoder::new(10).unwrap();
    let frame = enc.prepare(solid([10, 200, 30])).unwrap();
    assert_eq!(enc.frame_size(&frame), (5, 5));
    assert_eq!(frame.buffer.len(), 25);
    assert!(frame.palette.is_some());
}

#[test]
fn streams_frames_with_delay_and_loop() {
    let mut enc = LibEncoder::new(10).unwrap();
    enc.begin(cfg()).unwrap();
    let colors = [[255, 0, 0], [0, 0, 255]];
    for (i, c) in colors.into_iter().enumerate() {
        let frame = enc.prepare(solid(c)).unwrap();
        enc.add_frame(FrameIndex(i as u32), frame).unwrap();
    }
    let bytes = enc.finish().unwrap();

    let mut opts = gif::DecodeOptions::new();
    opts.set_color_output(gif::ColorOutput::RGBA);
    let mut dec = opts.read_info(std::io::Cursor::new(bytes)).unwrap();
    assert!(matches!(dec.repeat(), gif::Repeat::Infinite));
    let mut firsts = Vec::new();
    while let Some(frame) = dec.read_next_frame().unwrap() {
        assert_eq!(frame.delay, 2);
        firsts.push([frame.buffer[0], frame.buffer[1], frame.buffer[2]]);
    }
    assert_eq!(firsts, vec![[255, 0, 0], [0, 0, 255]]);
}

#[test]
fn finish_twice_fails() {
    let mut enc = LibEncoder::new(5).unwrap();
    enc.begin(cfg()).unwrap();
    enc.add_frame(FrameIndex(0), enc.prepare(solid([0, 0, 0])).unwrap())
        .unwrap();
    assert!(enc.finish().is_ok());
    assert!(matches!(enc.finish(), Err(GifError::Encoding(_))));
}

#[test]
fn rejects_repeated_index() {
    let mut enc = LibEncoder::new(5).unwrap();
    enc.begin(cfg()).unwrap();
    enc.add_frame(FrameIndex(0), enc.prepare(solid([0, 0, 0])).unwrap())
        .unwrap();
    let again = enc.prepare(solid([0, 0, 0])).unwrap();
    assert!(enc.add_frame(FrameIndex(0), again).is_err());
}
