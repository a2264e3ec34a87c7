//! Character level and hit dice tracking.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const MIN_LEVEL: u8 = 1;
pub const MAX_LEVEL: u8 = 20;

/// Level at which a subclass must be chosen.
pub const SUBCLASS_MILESTONE_LEVEL: u8 = 3;

/// A character level, always within 1-20.
///
/// Out-of-range input is clamped, never rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "u8")]
pub struct CharacterLevel(u8);

impl CharacterLevel {
    pub const FIRST: CharacterLevel = CharacterLevel(MIN_LEVEL);

    /// Clamp any integer into the 1-20 range.
    pub fn clamped(level: i64) -> Self {
        Self(level.clamp(MIN_LEVEL as i64, MAX_LEVEL as i64) as u8)
    }

    #[inline]
    pub fn get(&self) -> u8 {
        self.0
    }

    /// Index into a 21-entry progression table (index 0 unused).
    #[inline]
    pub fn table_index(&self) -> usize {
        self.0 as usize
    }

    pub fn is_max(&self) -> bool {
        self.0 == MAX_LEVEL
    }

    /// The next level, or `None` at the cap.
    pub fn next(&self) -> Option<Self> {
        if self.is_max() {
            None
        } else {
            Some(Self(self.0 + 1))
        }
    }
}

impl Default for CharacterLevel {
    fn default() -> Self {
        Self::FIRST
    }
}

impl From<i64> for CharacterLevel {
    fn from(value: i64) -> Self {
        Self::clamped(value)
    }
}

impl From<CharacterLevel> for u8 {
    fn from(value: CharacterLevel) -> Self {
        value.0
    }
}

impl fmt::Display for CharacterLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hit dice pool: one die per level, spent during short rests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitDice {
    total: u8,
    #[serde(default)]
    used: u8,
}

impl HitDice {
    pub fn new(level: CharacterLevel) -> Self {
        Self {
            total: level.get(),
            used: 0,
        }
    }

    /// Rebuild from stored values; `used` is clamped to `total`.
    pub fn with_used(total: u8, used: u8) -> Self {
        Self {
            total,
            used: used.min(total),
        }
    }

    pub fn total(&self) -> u8 {
        self.total
    }

    pub fn used(&self) -> u8 {
        self.used
    }

    pub fn remaining(&self) -> u8 {
        self.total.saturating_sub(self.used)
    }

    /// Track a new level; spent dice stay spent.
    pub fn grow_to(&mut self, level: CharacterLevel) {
        self.total = level.get();
        self.used = self.used.min(self.total);
    }

    /// Spend one die during a short rest.
    pub fn spend(&mut self) -> bool {
        if self.remaining() == 0 {
            return false;
        }
        self.used += 1;
        true
    }

    /// Long rest: regain half the total (at least one).
    pub fn recover_half(&mut self) -> u8 {
        let regain = (self.total / 2).max(1).min(self.used);
        self.used -= regain;
        regain
    }
}

impl Default for HitDice {
    fn default() -> Self {
        Self::new(CharacterLevel::FIRST)
    }
}
