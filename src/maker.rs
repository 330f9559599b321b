use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context as _;
use image::RgbaImage;

use crate::encode::animated_lib::LibEncoder;
use crate::encode::backend::{EncodedGif, GifBackend};
use crate::encode::stream::StreamEncoder;
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{GifError, GifResult};
use crate::model::overlay::{AvatarModel, OverlayData, TextModel};
use crate::model::params::{EncoderKind, RenderParams};
use crate::render::background::BackgroundSet;
use crate::render::pool::WorkerPool;
use crate::render::scheduler::FrameScheduler;
use crate::render::sequence::SequenceBuilder;
use crate::synth::FrameSynthesizer;

/// Construction options for a [`GifMaker`].
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GifMakerOpts {
    /// Worker thread count. `None` uses hardware parallelism + 1.
    pub threads: Option<usize>,
    /// Deadline after which a render stops starting new frames and fails. Frames already being
    /// synthesized are awaited first. `None` waits forever.
    pub wait_timeout_ms: Option<u64>,
}

impl GifMakerOpts {
    /// Parse options from JSON.
    pub fn from_json_str(s: &str) -> GifResult<Self> {
        serde_json::from_str(s).map_err(|e| GifError::serde(e.to_string()))
    }

    /// Read and parse a JSON options file.
    pub fn from_path(path: impl AsRef<Path>) -> GifResult<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read maker options '{}'", path.display()))?;
        Self::from_json_str(&s)
    }

    /// Barrier deadline as a duration.
    pub fn wait_timeout(&self) -> Option<Duration> {
        self.wait_timeout_ms.map(Duration::from_millis)
    }
}

/// Entry point: composes frames on a shared worker pool and encodes them.
///
/// A maker is meant to live for the whole process and serve many render calls, possibly from
/// several threads at once.
pub struct GifMaker {
    pool: WorkerPool,
    synthesizer: Arc<dyn FrameSynthesizer>,
    wait_timeout: Option<Duration>,
}

impl std::fmt::Debug for GifMaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GifMaker")
            .field("pool", &self.pool)
            .field("wait_timeout", &self.wait_timeout)
            .finish_non_exhaustive()
    }
}

impl GifMaker {
    /// Maker with a default-sized pool (hardware parallelism + 1).
    pub fn new(synthesizer: impl FrameSynthesizer + 'static) -> GifResult<Self> {
        Self::with_opts(synthesizer, &GifMakerOpts::default())
    }

    /// Maker with an explicit pool size.
    pub fn with_pool_size(
        synthesizer: impl FrameSynthesizer + 'static,
        threads: usize,
    ) -> GifResult<Self> {
        Self::with_opts(
            synthesizer,
            &GifMakerOpts {
                threads: Some(threads),
                ..GifMakerOpts::default()
            },
        )
    }

    /// Maker configured from [`GifMakerOpts`].
    pub fn with_opts(
        synthesizer: impl FrameSynthesizer + 'static,
        opts: &GifMakerOpts,
    ) -> GifResult<Self> {
        let pool = WorkerPool::with_threads(opts.threads)?;
        Ok(Self::with_pool(synthesizer, pool).wait_timeout(opts.wait_timeout()))
    }

    /// Maker on an existing pool, shared with its other users.
    pub fn with_pool(synthesizer: impl FrameSynthesizer + 'static, pool: WorkerPool) -> Self {
        Self {
            pool,
            synthesizer: Arc::new(synthesizer),
            wait_timeout: None,
        }
    }

    /// Set the barrier deadline, see [`FrameScheduler::with_deadline`].
    pub fn wait_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.wait_timeout = timeout;
        self
    }

    /// The worker pool.
    pub fn pool(&self) -> &WorkerPool {
        &self.pool
    }

    /// Single-sticker render: the frame count is the longest avatar sequence (at least 1).
    pub fn make_gif(
        &self,
        avatars: &[AvatarModel],
        texts: &[TextModel],
        sticker: &RgbaImage,
        params: &RenderParams,
    ) -> GifResult<EncodedGif> {
        self.render(
            &BackgroundSet::single(sticker),
            &OverlayData::new(avatars, texts),
            params,
        )
    }

    /// Multi-sticker render: one sticker per output frame, keys `0..N`.
    pub fn make_gif_multi(
        &self,
        avatars: &[AvatarModel],
        texts: &[TextModel],
        stickers: &BTreeMap<FrameIndex, RgbaImage>,
        params: &RenderParams,
    ) -> GifResult<EncodedGif> {
        self.render(
            &BackgroundSet::from_map(stickers)?,
            &OverlayData::new(avatars, texts),
            params,
        )
    }

    /// Render with the encoder selected by `params.encoder`.
    #[tracing::instrument(skip_all, fields(encoder = %params.encoder, reverse = params.reverse))]
    pub fn render(
        &self,
        backgrounds: &BackgroundSet<'_>,
        overlays: &OverlayData<'_>,
        params: &RenderParams,
    ) -> GifResult<EncodedGif> {
        params.validate()?;
        match params.encoder {
            EncoderKind::BufferedStream => {
                self.render_with_backend(backgrounds, overlays, params, &mut StreamEncoder::new())
            }
            EncoderKind::AnimatedLib => {
                let mut backend = LibEncoder::new(params.quality)?;
                self.render_with_backend(backgrounds, overlays, params, &mut backend)
            }
        }
    }

    /// Render through a caller-provided backend. `params.encoder` is ignored.
    pub fn render_with_backend<B>(
        &self,
        backgrounds: &BackgroundSet<'_>,
        overlays: &OverlayData<'_>,
        params: &RenderParams,
        backend: &mut B,
    ) -> GifResult<EncodedGif>
    where
        B: GifBackend + Sync,
    {
        let n = backgrounds.frame_count(overlays)?;
        let synth_opts = params.synth_options();
        let synthesizer = self.synthesizer.as_ref();
        let started = Instant::now();

        let frames = {
            let converter: &B = backend;
            FrameScheduler::new(&self.pool)
                .with_deadline(self.wait_timeout)
                .run(n, |idx| {
                    let background = backgrounds.background_for(idx)?;
                    let image = synthesizer
                        .synthesize(background, overlays, &synth_opts, idx)
                        .map_err(|e| GifError::synthesis(idx, e))?;
                    converter.prepare(image)
                })?
        };

        let out = SequenceBuilder::from_params(params).build(frames, backend)?;
        tracing::info!(
            backend = backend.name(),
            frames = out.frame_count(),
            bytes = out.bytes().len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "gif rendered"
        );
        Ok(out)
    }
}

#[cfg(test)]
#[path = "../tests/unit/maker.rs"]
mod tests;
