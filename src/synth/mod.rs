//! Frame synthesis collaborator.
//!
//! The compositing routine is a pluggable dependency of the pipeline: the scheduler calls it once
//! per output frame, concurrently, with disjoint indices.

use image::RgbaImage;

use crate::foundation::core::FrameIndex;
use crate::model::overlay::OverlayData;
use crate::model::params::SynthOptions;

pub(crate) mod overlay;

/// Produces one composited frame from a background and overlay data.
///
/// Implementations are called from several worker threads at once and must not mutate shared
/// inputs. Returning an error aborts the whole render.
pub trait FrameSynthesizer: Send + Sync {
    /// Composite frame `frame` on top of `background`.
    fn synthesize(
        &self,
        background: &RgbaImage,
        overlays: &OverlayData<'_>,
        opts: &SynthOptions,
        frame: FrameIndex,
    ) -> anyhow::Result<RgbaImage>;
}

/// Wrap a closure as a [`FrameSynthesizer`].
pub fn synthesizer_fn<F>(f: F) -> FnSynthesizer<F>
where
    F: Fn(&RgbaImage, &OverlayData<'_>, &SynthOptions, FrameIndex) -> anyhow::Result<RgbaImage>
        + Send
        + Sync,
{
    FnSynthesizer(f)
}

/// Closure-backed synthesizer, see [`synthesizer_fn`].
#[derive(Clone, Copy)]
pub struct FnSynthesizer<F>(F);

impl<F> FrameSynthesizer for FnSynthesizer<F>
where
    F: Fn(&RgbaImage, &OverlayData<'_>, &SynthOptions, FrameIndex) -> anyhow::Result<RgbaImage>
        + Send
        + Sync,
{
    fn synthesize(
        &self,
        background: &RgbaImage,
        overlays: &OverlayData<'_>,
        opts: &SynthOptions,
        frame: FrameIndex,
    ) -> anyhow::Result<RgbaImage> {
        (self.0)(background, overlays, opts, frame)
    }
}
