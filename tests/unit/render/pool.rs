use super::*;

#[test]
fn zero_threads_is_rejected() {
    assert!(matches!(
        WorkerPool::with_threads(Some(0)),
        Err(GifError::Configuration(_))
    ));
}

#[test]
fn explicit_and_default_sizes() {
    assert_eq!(WorkerPool::with_threads(Some(3)).unwrap().threads(), 3);
    assert_eq!(WorkerPool::new().unwrap().threads(), default_pool_size());
    assert!(default_pool_size() >= 2);
}

#[test]
fn clones_share_threads() {
    let a = WorkerPool::with_threads(Some(2)).unwrap();
    let b = a.clone();
    assert!(std::ptr::eq(a.rayon(), b.rayon()));
}
