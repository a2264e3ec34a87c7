//! Progression input and output types.

use std::fmt;
use std::str::FromStr;

use sheetwright_domain::{Character, DomainError, ResourceId, MAX_SPELL_LEVEL};

/// What a consume/recover call draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerTarget {
    /// A class pool such as rage or ki points.
    Resource(ResourceId),
    /// A spell slot of the given level. Pact casters are routed to their pact
    /// pool when the level matches.
    Slot(u8),
}

impl fmt::Display for LedgerTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resource(resource) => write!(f, "{}", resource),
            Self::Slot(level) => write!(f, "slot{}", level),
        }
    }
}

impl FromStr for LedgerTarget {
    type Err = DomainError;

    /// Accepts `slot3`, `slot:3`, `level3` and bare `3` for spell slots, and
    /// any resource key for class pools.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().to_ascii_lowercase();
        let digits = trimmed
            .strip_prefix("slot")
            .or_else(|| trimmed.strip_prefix("level"))
            .map(|rest| rest.trim_start_matches([':', '_', '-', ' ']))
            .unwrap_or(trimmed.as_str());

        if let Ok(level) = digits.parse::<u8>() {
            if (1..=MAX_SPELL_LEVEL).contains(&level) {
                return Ok(Self::Slot(level));
            }
            return Err(DomainError::parse(format!(
                "Spell level must be between 1 and {}: {}",
                MAX_SPELL_LEVEL, s
            )));
        }

        s.parse::<ResourceId>().map(Self::Resource)
    }
}

/// A committed operation: the stored snapshot and what the operation did.
#[derive(Debug, Clone, PartialEq)]
pub struct Applied<T> {
    pub character: Character,
    pub outcome: T,
}
