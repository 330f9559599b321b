use std::fmt;

/// 0-based position of a frame in final display order.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u32);

impl FrameIndex {
    /// Index as a slot offset.
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for FrameIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Inter-frame delay in milliseconds.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct Delay(pub u32);

impl Delay {
    /// Delay in the GIF graphic-control unit (1/100 s), rounded to nearest and saturated.
    pub fn as_centis(self) -> u16 {
        let centis = (u64::from(self.0) + 5) / 10;
        centis.min(u64::from(u16::MAX)) as u16
    }
}

impl Default for Delay {
    fn default() -> Self {
        Self(65)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
