use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        GifError::configuration("x")
            .to_string()
            .contains("configuration error:")
    );
    assert!(
        GifError::encoding("x")
            .to_string()
            .contains("encoding error:")
    );
    assert!(
        GifError::interrupted("x")
            .to_string()
            .contains("interrupted wait:")
    );
    assert!(
        GifError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn synthesis_names_frame_and_cause_chain() {
    let cause = anyhow::anyhow!("bad avatar").context("decode overlay");
    let err = GifError::synthesis(FrameIndex(3), cause);
    let msg = err.to_string();
    assert!(msg.starts_with("synthesis error at frame 3:"));
    assert!(msg.contains("decode overlay"));
    assert!(msg.contains("bad avatar"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = GifError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
