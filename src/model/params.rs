use std::path::Path;
use std::str::FromStr;

use anyhow::Context as _;

use crate::foundation::core::Delay;
use crate::foundation::error::{GifError, GifResult};

/// Valid range for [`RenderParams::quality`].
pub const QUALITY_RANGE: std::ops::RangeInclusive<u8> = 1..=30;

/// Encoder backend selected for a render.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EncoderKind {
    /// Buffers raw frames and encodes them in one blocking pass at `finish`.
    #[serde(alias = "stream", alias = "buffered_stream")]
    BufferedStream,
    /// Quantises each frame on the worker and streams it straight into the output buffer.
    #[serde(alias = "lib", alias = "animated_lib")]
    AnimatedLib,
}

impl EncoderKind {
    /// Canonical configuration name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BufferedStream => "BUFFERED_STREAM",
            Self::AnimatedLib => "ANIMATED_LIB",
        }
    }
}

impl std::fmt::Display for EncoderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EncoderKind {
    type Err = GifError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "buffered_stream" | "stream" => Ok(Self::BufferedStream),
            "animated_lib" | "lib" => Ok(Self::AnimatedLib),
            other => Err(GifError::configuration(format!(
                "unknown encoder '{other}' (expected BUFFERED_STREAM or ANIMATED_LIB)"
            ))),
        }
    }
}

/// Per-render options.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderParams {
    /// Encoder backend.
    pub encoder: EncoderKind,
    /// Delay between frames.
    pub delay_ms: Delay,
    /// Play the frame sequence backwards (index `i` is emitted at `N-1-i`).
    pub reverse: bool,
    /// Smooth resampling while compositing.
    pub antialias: bool,
    /// Palette sampling factor for [`EncoderKind::AnimatedLib`]; 1 is best, 30 fastest.
    pub quality: u8,
    /// Cap on the longer side of every synthesized frame.
    pub max_size: Option<u32>,
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            encoder: EncoderKind::AnimatedLib,
            delay_ms: Delay::default(),
            reverse: false,
            antialias: true,
            quality: 5,
            max_size: None,
        }
    }
}

impl RenderParams {
    /// Parse params from JSON and validate them.
    pub fn from_json_str(s: &str) -> GifResult<Self> {
        let params: Self = serde_json::from_str(s).map_err(|e| {
            if e.is_data() {
                GifError::configuration(format!("invalid render params: {e}"))
            } else {
                GifError::serde(e.to_string())
            }
        })?;
        params.validate()?;
        Ok(params)
    }

    /// Read and parse a JSON params file.
    pub fn from_path(path: impl AsRef<Path>) -> GifResult<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read render params '{}'", path.display()))?;
        Self::from_json_str(&s)
    }

    /// Check value ranges.
    pub fn validate(&self) -> GifResult<()> {
        if !QUALITY_RANGE.contains(&self.quality) {
            return Err(GifError::configuration(format!(
                "quality must be within {}..={}, got {}",
                QUALITY_RANGE.start(),
                QUALITY_RANGE.end(),
                self.quality
            )));
        }
        if self.max_size == Some(0) {
            return Err(GifError::configuration("max_size must be >= 1 when set"));
        }
        Ok(())
    }

    /// Options forwarded to the synthesizer.
    pub fn synth_options(&self) -> SynthOptions {
        SynthOptions {
            antialias: self.antialias,
            max_size: self.max_size,
        }
    }
}

/// Subset of [`RenderParams`] relevant to compositing a single frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SynthOptions {
    /// Smooth resampling.
    pub antialias: bool,
    /// Cap on the longer frame side.
    pub max_size: Option<u32>,
}

#[cfg(test)]
#[path = "../../tests/unit/model/params.rs"]
mod tests;
