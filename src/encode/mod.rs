//! Encoder backends.
//!
//! Backends consume frames in final display order from a single thread and return the encoded
//! byte stream from `finish`.

/// Backend trait, encode configuration and output type.
pub mod backend;
/// Quality-aware streaming encoder.
pub mod animated_lib;
pub(crate) mod pixels;
/// Buffering encoder with a blocking finalize.
pub mod stream;
