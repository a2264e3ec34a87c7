//! Bounded "used out of max" counter shared by spell slots and class pools.

use crate::error::LedgerError;

/// A consumable pool: `used` out of `max`.
///
/// Every operation returns a new pool and leaves `self` untouched, so a
/// rejected call can never half-apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pool {
    max: u32,
    used: u32,
}

impl Pool {
    /// A fresh pool with nothing used.
    pub fn new(max: u32) -> Self {
        Self { max, used: 0 }
    }

    /// Rebuild a pool from stored values, as-is.
    pub fn with_used(max: u32, used: u32) -> Self {
        Self { max, used }
    }

    #[inline]
    pub fn max(&self) -> u32 {
        self.max
    }

    #[inline]
    pub fn used(&self) -> u32 {
        self.used
    }

    pub fn remaining(&self) -> u32 {
        self.max.saturating_sub(self.used)
    }

    /// Spend `amount` uses. Rejected when it would exceed `max`.
    pub fn consume(&self, amount: u32, resource: &str) -> Result<Pool, LedgerError> {
        if amount == 0 {
            return Err(LedgerError::ZeroAmount);
        }
        match self.used.checked_add(amount) {
            Some(total) if total <= self.max => Ok(Self {
                max: self.max,
                used: total,
            }),
            _ => Err(LedgerError::Exhausted {
                resource: resource.to_string(),
                used: self.used,
                max: self.max,
                requested: amount,
            }),
        }
    }

    /// Give back `amount` uses. Rejected when it would go below zero.
    pub fn recover(&self, amount: u32, resource: &str) -> Result<Pool, LedgerError> {
        if amount == 0 {
            return Err(LedgerError::ZeroAmount);
        }
        if amount > self.used {
            return Err(LedgerError::NothingToRecover {
                resource: resource.to_string(),
                used: self.used,
                requested: amount,
            });
        }
        Ok(Self {
            max: self.max,
            used: self.used - amount,
        })
    }

    /// Same `used`, new `max`, with `used` pulled down if it no longer fits.
    pub fn resized(&self, max: u32) -> Pool {
        Self {
            max,
            used: self.used.min(max),
        }
    }

    /// Everything back.
    pub fn reset(&self) -> Pool {
        Self::new(self.max)
    }
}
