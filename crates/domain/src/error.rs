//! Unified error types for the domain layer
//!
//! `DomainError` covers parsing failures. Rejected
//! gameplay operations have their own enums (`LedgerError`, `LevelUpError`)
//! because each of their variants is a distinct user-facing message.

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Parse error (for value objects)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl DomainError {
    /// Creates a parse error for string-to-type conversion failures.
    ///
    /// Use this in `FromStr` implementations when the input string
    /// doesn't match any known variant:
    ///
    /// ```ignore
    /// impl FromStr for CharacterClass {
    ///     type Err = DomainError;
    ///     fn from_str(s: &str) -> Result<Self, Self::Err> {
    ///         match fold_key(s).as_str() {
    ///             "barbare" => Ok(Self::Barbare),
    ///             _ => Err(DomainError::parse(format!("Unknown class: {}", s))),
    ///         }
    ///     }
    /// }
    /// ```
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}

/// Why a consumption, recovery or arcane recovery exchange was refused.
///
/// A refused operation never touches the character.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Amount must be at least 1")]
    ZeroAmount,

    #[error("Not enough {resource} left: {used}/{max} used, {requested} requested")]
    Exhausted {
        resource: String,
        used: u32,
        max: u32,
        requested: u32,
    },

    #[error("Cannot recover {requested} {resource}: only {used} used")]
    NothingToRecover {
        resource: String,
        used: u32,
        requested: u32,
    },

    #[error("This character does not track {0}")]
    UntrackedResource(String),

    #[error("No spell slots of level {0}")]
    NoSlotsAtLevel(u8),

    #[error("Arcane recovery is only available to a Magicien")]
    NotArcaneCaster,

    #[error("Arcane recovery has already been used since the last long rest")]
    ArcaneRecoveryAlreadyUsed,

    #[error("Arcane recovery budget exhausted ({spent}/{budget} levels recovered)")]
    ArcaneRecoveryBudgetExhausted { spent: u8, budget: u8 },

    #[error("No expended level {0} slot to recover")]
    NoConsumedSlot(u8),

    #[error("A level {level} slot costs {level} of the {remaining} remaining recovery levels")]
    ExceedsArcaneBudget { level: u8, remaining: u8 },

    #[error("No hit dice left to spend")]
    NoHitDiceLeft,

    #[error("A d{die} cannot roll {roll}")]
    HitDieRollOutOfRange { roll: u8, die: u8 },
}

/// Why a level-up was refused.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LevelUpError {
    #[error("Hit point gain must be at least 1")]
    HpGainTooLow,

    #[error("Hit point gain cannot exceed {max} (hit die + Constitution modifier)")]
    HpGainTooHigh { max: i32 },

    #[error("A subclass must be chosen when reaching level {0}")]
    SubclassRequired(u8),

    #[error("'{0}' is not a subclass offered to this class")]
    UnknownSubclass(String),

    #[error("The character is already at the maximum level")]
    MaxLevelReached,
}
