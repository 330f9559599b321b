use super::*;

fn solid(v: u8) -> RgbaImage {
    RgbaImage::from_pixel(2, 2, image::Rgba([v, v, v, 255]))
}

fn avatar(len: usize) -> AvatarModel {
    let frames = (0..len).map(|i| solid(i as u8)).collect();
    AvatarModel::new(
        frames,
        AvatarPos {
            x: 0,
            y: 0,
            width: 2,
            height: 2,
        },
    )
}

#[test]
fn longest_sequence_is_the_maximum_avatar_length() {
    let avatars = vec![avatar(3), avatar(1), avatar(5)];
    assert_eq!(OverlayData::new(&avatars, &[]).longest_sequence(), 5);
}

#[test]
fn longest_sequence_is_at_least_one() {
    assert_eq!(OverlayData::new(&[], &[]).longest_sequence(), 1);
    let avatars = vec![avatar(0)];
    assert_eq!(OverlayData::new(&avatars, &[]).longest_sequence(), 1);
}

#[test]
fn frame_at_wraps_shorter_sequences() {
    let a = avatar(3);
    assert_eq!(a.frame_at(FrameIndex(4)).unwrap().get_pixel(0, 0)[0], 1);
    assert!(avatar(0).frame_at(FrameIndex(0)).is_none());
}

#[test]
fn pos_at_clamps_to_last_placement() {
    let p = |x| AvatarPos {
        x,
        y: 0,
        width: 1,
        height: 1,
    };
    let a = avatar(1).with_positions(vec![p(0), p(10)]);
    assert_eq!(a.pos_at(FrameIndex(0)).unwrap().x, 0);
    assert_eq!(a.pos_at(FrameIndex(9)).unwrap().x, 10);
    assert!(avatar(1).with_positions(vec![]).pos_at(FrameIndex(0)).is_none());
}
