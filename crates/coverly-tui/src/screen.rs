//! The three top-level screens and their tab order.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScreenId {
    #[default]
    Devices,
    Remotes,
    Console,
}

impl ScreenId {
    /// Tab bar order; a screen's number key is its position plus one.
    pub const ALL: [ScreenId; 3] = [Self::Devices, Self::Remotes, Self::Console];

    fn index(self) -> usize {
        match self {
            Self::Devices => 0,
            Self::Remotes => 1,
            Self::Console => 2,
        }
    }

    pub fn number(self) -> u8 {
        u8::try_from(self.index() + 1).unwrap_or(u8::MAX)
    }

    pub fn from_number(n: u8) -> Option<Self> {
        let index = usize::from(n).checked_sub(1)?;
        Self::ALL.get(index).copied()
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Devices => "Devices",
            Self::Remotes => "Remotes",
            Self::Console => "Console",
        }
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
