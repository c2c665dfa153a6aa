//! Self-reported recall grade on the SM-2 scale.
use crate::error::SrsError;
use std::fmt;
use std::str::FromStr;

/// Recall quality, 0 (complete blackout) to 5 (perfect response).
/// Grades below 3 count as a lapse.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Quality {
    Blackout = 0,
    Incorrect = 1,
    IncorrectEasyRecall = 2,
    Hard = 3,
    Good = 4,
    Perfect = 5,
}

impl Quality {
    pub const ALL: [Quality; 6] = [
        Quality::Blackout,
        Quality::Incorrect,
        Quality::IncorrectEasyRecall,
        Quality::Hard,
        Quality::Good,
        Quality::Perfect,
    ];

    pub fn value(self) -> u8 {
        self as u8
    }

    /// True for grades 3-5.
    pub fn is_pass(self) -> bool {
        self.value() >= 3
    }
}

impl TryFrom<u8> for Quality {
    type Error = SrsError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Quality::ALL
            .get(value as usize)
            .copied()
            .ok_or(SrsError::InvalidQuality(value))
    }
}

impl FromStr for Quality {
    type Err = SrsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u8 = s
            .trim()
            .parse()
            .map_err(|_| SrsError::UnparsableQuality(s.to_string()))?;
        Quality::try_from(value)
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}
