//! petgif composes animated stickers: avatars and text are overlaid onto numbered background
//! frames and the resulting sequence is encoded as an animated GIF.
//!
//! # Pipeline overview
//!
//! 1. **Plan**: a [`BackgroundSet`] plus [`OverlayData`] determine the frame count `N`
//! 2. **Synthesize**: [`FrameScheduler`] fans `N` [`FrameSynthesizer`] calls out over a shared
//!    [`WorkerPool`] and waits until every frame has reported back
//! 3. **Prepare**: each worker converts its frame into the selected backend's pixel format
//! 4. **Encode**: [`SequenceBuilder`] applies optional reversal and feeds frames in display order
//!    to a [`GifBackend`] ([`StreamEncoder`] or [`LibEncoder`])
//!
//! [`GifMaker`] wraps all four steps behind `make_gif` / `make_gif_multi` / `render`.
//!
//! Output is deterministic: the same inputs produce byte-identical GIFs regardless of the order in
//! which workers finish.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod encode;
mod foundation;
mod maker;
mod model;
mod render;
mod synth;

pub use encode::animated_lib::LibEncoder;
pub use encode::backend::{EncodeConfig, EncodedGif, GifBackend};
pub use encode::stream::StreamEncoder;
pub use foundation::core::{Delay, FrameIndex};
pub use foundation::error::{GifError, GifResult};
pub use maker::{GifMaker, GifMakerOpts};
pub use model::overlay::{AvatarLayer, AvatarModel, AvatarPos, OverlayData, TextModel};
pub use model::params::{EncoderKind, QUALITY_RANGE, RenderParams, SynthOptions};
pub use render::background::BackgroundSet;
pub use render::pool::{WorkerPool, default_pool_size};
pub use render::scheduler::{FrameResult, FrameScheduler};
pub use render::sequence::SequenceBuilder;
pub use synth::{FnSynthesizer, FrameSynthesizer, synthesizer_fn};
pub use synth::overlay::OverlaySynthesizer;
