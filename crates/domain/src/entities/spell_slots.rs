//! A character's spell slot record.
//!
//! Stored as a flat open record: `level1`..`level9` hold maxima,
//! `used1`..`used9` the expended counters, and pact magic lives in
//! `pact_slots`/`pact_level`/`used_pact_slots`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use super::pool::Pool;
use crate::error::LedgerError;

pub const MAX_SPELL_LEVEL: u8 = 9;

const PACT_SLOTS_KEY: &str = "pact_slots";
const PACT_LEVEL_KEY: &str = "pact_level";
const USED_PACT_SLOTS_KEY: &str = "used_pact_slots";

/// Pact magic: a single pool of slots that all share one spell level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PactMagic {
    pool: Pool,
    slot_level: u8,
}

impl PactMagic {
    pub fn new(slots: u32, slot_level: u8, used: u32) -> Self {
        Self {
            pool: Pool::with_used(slots, used),
            slot_level,
        }
    }

    pub fn slots(&self) -> u32 {
        self.pool.max()
    }

    pub fn used(&self) -> u32 {
        self.pool.used()
    }

    pub fn slot_level(&self) -> u8 {
        self.slot_level
    }

    pub fn pool(&self) -> Pool {
        self.pool
    }
}

/// Which slot pool a consumption or recovery targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotPoolRef {
    Leveled(u8),
    Pact,
}

/// Spell slot maxima and expended counters.
///
/// A `usedN` counter may exist without a matching `levelN` maximum (the
/// record keeps every counter of the caster's range); such a level simply
/// has no slots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct SpellSlots {
    maxima: BTreeMap<u8, u32>,
    used: BTreeMap<u8, u32>,
    pact: Option<PactMagic>,
}

impl SpellSlots {
    pub fn new() -> Self {
        Self::default()
    }

    // Read-only accessors

    /// Maximum slots at a spell level, if the level has a maximum.
    pub fn max(&self, spell_level: u8) -> Option<u32> {
        self.maxima.get(&spell_level).copied()
    }

    /// Expended counter at a spell level, if tracked.
    pub fn used(&self, spell_level: u8) -> Option<u32> {
        self.used.get(&spell_level).copied()
    }

    /// The pool at a spell level; `None` when the level has no maximum.
    pub fn pool(&self, spell_level: u8) -> Option<Pool> {
        self.max(spell_level)
            .map(|max| Pool::with_used(max, self.used(spell_level).unwrap_or(0)))
    }

    pub fn pact(&self) -> Option<&PactMagic> {
        self.pact.as_ref()
    }

    /// True when any per-level maximum or counter is populated.
    pub fn has_leveled(&self) -> bool {
        !self.maxima.is_empty() || !self.used.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        !self.has_leveled() && self.pact.is_none()
    }

    /// Spell levels that currently have slots, ascending.
    pub fn slot_levels(&self) -> impl Iterator<Item = u8> + '_ {
        self.maxima.keys().copied()
    }

    // Builder-style methods

    /// Set the maximum at a spell level (counter left untouched).
    pub fn with_max(mut self, spell_level: u8, max: u32) -> Self {
        self.maxima.insert(spell_level, max);
        self
    }

    /// Set the expended counter at a spell level, as stored.
    pub fn with_used(mut self, spell_level: u8, used: u32) -> Self {
        self.used.insert(spell_level, used);
        self
    }

    pub fn with_pact(mut self, pact: PactMagic) -> Self {
        self.pact = Some(pact);
        self
    }

    // Progression refresh (called by the slot table resolver)

    /// Replace per-level maxima, keep existing counters, make sure every
    /// counter in `1..=tracked_levels` exists, and pull any counter above its
    /// new maximum back down. Pact magic is dropped.
    pub(crate) fn refresh_leveled(&self, maxima: BTreeMap<u8, u32>, tracked_levels: u8) -> Self {
        let mut used = self.used.clone();
        for level in 1..=tracked_levels {
            used.entry(level).or_insert(0);
        }
        for (level, counter) in used.iter_mut() {
            let max = maxima.get(level).copied().unwrap_or(0);
            *counter = (*counter).min(max);
        }
        Self {
            maxima,
            used,
            pact: None,
        }
    }

    /// Replace the record with a pact pool, keeping the current pact counter.
    /// Per-level maxima and counters are dropped.
    pub(crate) fn refresh_pact(&self, slots: u32, slot_level: u8) -> Self {
        let used = self.pact.map_or(0, |p| p.used());
        Self {
            maxima: BTreeMap::new(),
            used: BTreeMap::new(),
            pact: Some(PactMagic {
                pool: Pool::with_used(slots, used).resized(slots),
                slot_level,
            }),
        }
    }

    // Ledger

    /// Spend `amount` slots from a pool.
    pub fn consume(&self, target: SlotPoolRef, amount: u32) -> Result<Self, LedgerError> {
        let pool = self.pool_for(target)?;
        let next = pool.consume(amount, &slot_label(target))?;
        Ok(self.with_pool(target, next))
    }

    /// Restore `amount` expended slots to a pool.
    pub fn recover(&self, target: SlotPoolRef, amount: u32) -> Result<Self, LedgerError> {
        let pool = self.pool_for(target)?;
        let next = pool.recover(amount, &slot_label(target))?;
        Ok(self.with_pool(target, next))
    }

    /// Long rest: every counter back to zero.
    pub fn restore_all(&self) -> Self {
        let mut restored = self.clone();
        for counter in restored.used.values_mut() {
            *counter = 0;
        }
        restored.pact = restored.pact.map(|p| PactMagic {
            pool: p.pool.reset(),
            slot_level: p.slot_level,
        });
        restored
    }

    /// Short rest: only pact slots come back.
    pub fn restore_pact(&self) -> Self {
        let mut restored = self.clone();
        restored.pact = restored.pact.map(|p| PactMagic {
            pool: p.pool.reset(),
            slot_level: p.slot_level,
        });
        restored
    }

    fn pool_for(&self, target: SlotPoolRef) -> Result<Pool, LedgerError> {
        match target {
            SlotPoolRef::Leveled(level) => self.pool(level).ok_or(LedgerError::NoSlotsAtLevel(level)),
            SlotPoolRef::Pact => self
                .pact
                .map(|p| p.pool)
                .ok_or_else(|| LedgerError::UntrackedResource("pact slots".to_string())),
        }
    }

    fn with_pool(&self, target: SlotPoolRef, pool: Pool) -> Self {
        let mut next = self.clone();
        match target {
            SlotPoolRef::Leveled(level) => {
                next.used.insert(level, pool.used());
            }
            SlotPoolRef::Pact => {
                next.pact = next.pact.map(|p| PactMagic {
                    pool,
                    slot_level: p.slot_level,
                });
            }
        }
        next
    }
}

fn slot_label(target: SlotPoolRef) -> String {
    match target {
        SlotPoolRef::Leveled(level) => format!("level {} spell slots", level),
        SlotPoolRef::Pact => "pact slots".to_string(),
    }
}

// ============================================================================
// Open record translation
// ============================================================================

fn record_number(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn indexed_key(key: &str, prefix: &str) -> Option<u8> {
    key.strip_prefix(prefix)
        .and_then(|rest| rest.parse::<u8>().ok())
        .filter(|level| (1..=MAX_SPELL_LEVEL).contains(level))
}

impl From<Map<String, Value>> for SpellSlots {
    fn from(record: Map<String, Value>) -> Self {
        let mut slots = SpellSlots::new();
        for (key, value) in &record {
            let Some(number) = record_number(value) else {
                continue;
            };
            if let Some(level) = indexed_key(key, "level") {
                slots.maxima.insert(level, number);
            } else if let Some(level) = indexed_key(key, "used") {
                slots.used.insert(level, number);
            }
        }
        if let Some(pact_slots) = record.get(PACT_SLOTS_KEY).and_then(record_number) {
            let slot_level = record
                .get(PACT_LEVEL_KEY)
                .and_then(record_number)
                .and_then(|l| u8::try_from(l).ok())
                .unwrap_or(1);
            let used = record
                .get(USED_PACT_SLOTS_KEY)
                .and_then(record_number)
                .unwrap_or(0);
            slots.pact = Some(PactMagic::new(pact_slots, slot_level, used));
        }
        slots
    }
}

impl From<SpellSlots> for Map<String, Value> {
    fn from(slots: SpellSlots) -> Self {
        let mut record = Map::new();
        for (level, max) in &slots.maxima {
            record.insert(format!("level{}", level), Value::from(*max));
        }
        for (level, used) in &slots.used {
            record.insert(format!("used{}", level), Value::from(*used));
        }
        if let Some(pact) = slots.pact {
            record.insert(PACT_SLOTS_KEY.to_string(), Value::from(pact.slots()));
            record.insert(PACT_LEVEL_KEY.to_string(), Value::from(pact.slot_level()));
            record.insert(USED_PACT_SLOTS_KEY.to_string(), Value::from(pact.used()));
        }
        record
    }
}
