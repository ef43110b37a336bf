//! Unified identifier space for items and cargo
//!
//! Items and cargo come from separate tables with overlapping raw ids. Cargo ids
//! are shifted by [`CARGO_OFFSET`] so both fit in one integer keyspace.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Error, Result};

/// Offset added to raw cargo ids (`u32::MAX`)
pub const CARGO_OFFSET: u64 = 0xffff_ffff;

/// Origin table of a raw id, encoded in source stacks as a type discriminant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    Item,
    Cargo,
}

impl ItemKind {
    /// Decode the discriminant used in item stacks (`0` = item, `1` = cargo)
    pub fn from_discriminant(value: u64) -> Option<Self> {
        match value {
            0 => Some(ItemKind::Item),
            1 => Some(ItemKind::Cargo),
            _ => None,
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKind::Item => write!(f, "item"),
            ItemKind::Cargo => write!(f, "cargo"),
        }
    }
}

/// Identifier shared by items and cargo
///
/// Serializes as a plain integer, so map keys come out as decimal strings in JSON.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UnifiedId(u64);

impl UnifiedId {
    /// Wrap an already-unified value
    pub const fn new(value: u64) -> Self {
        UnifiedId(value)
    }

    pub const fn get(self) -> u64 {
        self.0
    }

    /// Table the id originated from
    pub fn kind(self) -> ItemKind {
        if self.0 >= CARGO_OFFSET {
            ItemKind::Cargo
        } else {
            ItemKind::Item
        }
    }

    pub fn is_cargo(self) -> bool {
        self.kind() == ItemKind::Cargo
    }

    /// Raw id in the origin table
    pub fn raw(self) -> u64 {
        match self.kind() {
            ItemKind::Item => self.0,
            ItemKind::Cargo => self.0 - CARGO_OFFSET,
        }
    }

    /// Sum of the decimal digits, used as a low-weight tie-breaker
    pub fn digit_sum(self) -> u64 {
        let mut n = self.0;
        let mut sum = 0;
        while n > 0 {
            sum += n % 10;
            n /= 10;
        }
        sum
    }
}

impl fmt::Display for UnifiedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Map a raw table id into the unified namespace.
///
/// Raw ids at or above [`CARGO_OFFSET`] would collide with the cargo range and are fatal.
pub fn unify(raw: u64, kind: ItemKind) -> Result<UnifiedId> {
    if raw >= CARGO_OFFSET {
        return Err(Error::IdOutOfRange { raw, kind });
    }
    Ok(match kind {
        ItemKind::Item => UnifiedId(raw),
        ItemKind::Cargo => UnifiedId(raw + CARGO_OFFSET),
    })
}
