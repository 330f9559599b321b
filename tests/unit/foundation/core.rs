use super::*;

#[test]
fn delay_rounds_to_centiseconds() {
    assert_eq!(Delay(0).as_centis(), 0);
    assert_eq!(Delay(64).as_centis(), 6);
    assert_eq!(Delay(65).as_centis(), 7);
    assert_eq!(Delay(100).as_centis(), 10);
    assert_eq!(Delay(u32::MAX).as_centis(), u16::MAX);
}

#[test]
fn frame_index_displays_bare_number() {
    assert_eq!(FrameIndex(17).to_string(), "17");
}
