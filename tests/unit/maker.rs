use super::*;
use crate::synth::overlay::OverlaySynthesizer;
use std::sync::atomic::{AtomicUsize, Ordering};

#[test]
fn opts_parse_from_json() {
    let opts = GifMakerOpts::from_json_str(r#"{"threads":3,"wait_timeout_ms":250}"#).unwrap();
    assert_eq!(opts.threads, Some(3));
    assert_eq!(opts.wait_timeout(), Some(Duration::from_millis(250)));
    assert_eq!(GifMakerOpts::from_json_str("{}").unwrap(), GifMakerOpts::default());
    assert!(matches!(
        GifMakerOpts::from_json_str(r#"{"thread":3}"#),
        Err(GifError::Serde(_))
    ));
}

#[test]
fn zero_threads_is_a_configuration_error() {
    assert!(matches!(
        GifMaker::with_pool_size(OverlaySynthesizer, 0),
        Err(GifError::Configuration(_))
    ));
}

#[test]
fn invalid_params_fail_before_any_synthesis() {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = calls.clone();
    let maker = GifMaker::with_pool_size(
        crate::synth::synthesizer_fn(move |bg, _, _, _| {
            seen.fetch_add(1, Ordering::SeqCst);
            Ok(bg.clone())
        }),
        2,
    )
    .unwrap();
    let sticker = RgbaImage::new(2, 2);
    let params = RenderParams {
        quality: 0,
        ..RenderParams::default()
    };
    let err = maker.make_gif(&[], &[], &sticker, &params).unwrap_err();
    assert!(matches!(err, GifError::Configuration(_)));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn empty_sticker_map_is_a_configuration_error() {
    let maker = GifMaker::with_pool_size(OverlaySynthesizer, 1).unwrap();
    let err = maker
        .make_gif_multi(&[], &[], &BTreeMap::new(), &RenderParams::default())
        .unwrap_err();
    assert!(matches!(err, GifError::Configuration(_)));
}

#[test]
fn makers_can_share_one_pool() {
    let pool = WorkerPool::with_threads(Some(2)).unwrap();
    let a = GifMaker::with_pool(OverlaySynthesizer, pool.clone());
    let b = GifMaker::with_pool(OverlaySynthesizer, pool);
    assert!(std::ptr::eq(a.pool().rayon(), b.pool().rayon()));
}
