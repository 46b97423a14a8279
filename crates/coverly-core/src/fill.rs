// ── Fill rendering ──
//
// Maps a device position to a two-stop visual split. Pure and idempotent:
// the same percentage always produces the same split.

use crate::model::{DeviceId, clamp_percent};
use crate::registry::Registry;

/// A split at `filled` percent between the filled and unfilled tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FillSplit {
    filled: u8,
}

impl FillSplit {
    /// Split at `percent`, clamped into `0..=100`.
    pub fn new(percent: i64) -> Self {
        Self {
            filled: clamp_percent(percent),
        }
    }

    pub fn filled_percent(self) -> u8 {
        self.filled
    }

    pub fn unfilled_percent(self) -> u8 {
        100 - self.filled
    }

    /// Divide `width` cells into `(filled, unfilled)`, rounding to nearest.
    pub fn cells(self, width: u16) -> (u16, u16) {
        let filled = (u32::from(width) * u32::from(self.filled) + 50) / 100;
        let filled = u16::try_from(filled).unwrap_or(width).min(width);
        (filled, width - filled)
    }

    /// The split for a device currently in the registry.
    ///
    /// `None` for unknown ids: a push can name a row that is not rendered yet.
    pub fn for_device(registry: &Registry, id: &DeviceId) -> Option<Self> {
        registry
            .device(id)
            .map(|d| Self::new(i64::from(d.position)))
    }
}
