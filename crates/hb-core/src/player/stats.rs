//! Player stats (STR, INT, WIS, DEX, CON, CHR)
//!
//! Values use the classic encoding: 3..=18 are plain scores, and anything
//! above 18 is 18/xx where `value = 18 + xx / 10` in tenths (so 18/50 is 23,
//! 18/100 is 28 and 18/220 is 40).

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Number of player stats
pub const NUM_STATS: usize = 6;

/// Highest stat index used by the adjustment tables
pub const MAX_STAT_INDEX: usize = 37;

/// Stat type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
#[repr(u8)]
pub enum Stat {
    Strength = 0,
    Intelligence = 1,
    Wisdom = 2,
    Dexterity = 3,
    Constitution = 4,
    Charisma = 5,
}

impl Stat {
    /// Short name for display
    pub const fn short_name(&self) -> &'static str {
        match self {
            Stat::Strength => "STR",
            Stat::Intelligence => "INT",
            Stat::Wisdom => "WIS",
            Stat::Dexterity => "DEX",
            Stat::Constitution => "CON",
            Stat::Charisma => "CHR",
        }
    }

    /// Get index (0-5)
    pub const fn index(&self) -> usize {
        *self as usize
    }
}

/// Convert a stat value into an index into the adjustment tables.
///
/// 3 maps to 0, 18 and 18/00-18/09 map to 15, each further ten points of
/// 18/xx add one, and 18/220 or more caps at 37.
pub fn stat_index(value: i16) -> usize {
    if value <= 3 {
        0
    } else if value <= 18 {
        (value - 3) as usize
    } else {
        (15 + (value - 18) as usize).min(MAX_STAT_INDEX)
    }
}

/// Format a stat value for the status line (e.g. "18/50")
pub fn stat_string(value: i16) -> String {
    if value <= 18 {
        format!("{}", value)
    } else if value >= 40 {
        "18/***".to_string()
    } else {
        format!("18/{:02}", (value - 18) * 10)
    }
}

/// Player stat block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    values: [i16; NUM_STATS],
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            values: [10; NUM_STATS],
        }
    }
}

impl Stats {
    /// Create a stat block with the given values
    pub const fn new(values: [i16; NUM_STATS]) -> Self {
        Self { values }
    }

    /// Get a stat value
    pub const fn get(&self, stat: Stat) -> i16 {
        self.values[stat as usize]
    }

    /// Set a stat value, clamped to the legal range
    pub fn set(&mut self, stat: Stat, value: i16) {
        self.values[stat as usize] = value.clamp(3, 40);
    }
}
