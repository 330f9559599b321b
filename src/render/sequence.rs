use crate::encode::backend::{EncodeConfig, EncodedGif, GifBackend};
use crate::foundation::core::{Delay, FrameIndex};
use crate::foundation::error::{GifError, GifResult};
use crate::model::params::RenderParams;
use crate::render::scheduler::FrameResult;

/// Turns a completed [`FrameResult`] into display order and drives an encoder backend with it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SequenceBuilder {
    delay: Delay,
    reverse: bool,
}

impl SequenceBuilder {
    /// Builder with explicit delay and reversal.
    pub fn new(delay: Delay, reverse: bool) -> Self {
        Self { delay, reverse }
    }

    /// Builder configured from render params.
    pub fn from_params(params: &RenderParams) -> Self {
        Self::new(params.delay_ms, params.reverse)
    }

    /// Encode `frames` through `backend`.
    ///
    /// The canvas is sized from synthesized frame 0. With reversal, frame `i` is emitted at
    /// position `N-1-i`; either way exactly `N` frames reach the backend, in ascending index order.
    pub fn build<B>(&self, frames: FrameResult<B::Frame>, backend: &mut B) -> GifResult<EncodedGif>
    where
        B: GifBackend + ?Sized,
    {
        let first = frames
            .get(FrameIndex(0))
            .ok_or_else(|| GifError::configuration("render has no frames"))?;
        let (width, height) = backend.frame_size(first);

        let frames = if self.reverse {
            frames.reversed()
        } else {
            frames
        };
        let frame_count = frames.len();

        backend.begin(EncodeConfig {
            width,
            height,
            delay: self.delay,
        })?;
        for (idx, frame) in frames.into_indexed() {
            backend.add_frame(idx, frame)?;
        }
        let data = backend.finish()?;

        tracing::debug!(
            backend = backend.name(),
            frames = frame_count,
            bytes = data.len(),
            reverse = self.reverse,
            "sequence encoded"
        );
        Ok(EncodedGif::new(data, frame_count, width, height))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/sequence.rs"]
mod tests;
