//! Player classes and races

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::stats::Stat;

/// Player class
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
    EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum PlayerClass {
    #[default]
    Warrior,
    Mage,
    Priest,
    Rogue,
    Ranger,
    Paladin,
    #[strum(to_string = "Blue-Mage", serialize = "BlueMage")]
    BlueMage,
    #[strum(to_string = "Magic-Eater", serialize = "MagicEater")]
    MagicEater,
    Smith,
}

impl PlayerClass {
    /// Stat governing spell failure and mana, if the class casts at all
    pub const fn spell_stat(&self) -> Option<Stat> {
        match self {
            PlayerClass::Warrior | PlayerClass::Smith => None,
            PlayerClass::Priest | PlayerClass::Paladin => Some(Stat::Wisdom),
            PlayerClass::Mage
            | PlayerClass::Rogue
            | PlayerClass::Ranger
            | PlayerClass::BlueMage
            | PlayerClass::MagicEater => Some(Stat::Intelligence),
        }
    }

    /// Whether the class reads spellbooks
    pub const fn uses_spellbooks(&self) -> bool {
        matches!(
            self,
            PlayerClass::Mage
                | PlayerClass::Priest
                | PlayerClass::Rogue
                | PlayerClass::Ranger
                | PlayerClass::Paladin
        )
    }

    /// Half-casters never get a failure floor below 5%
    pub const fn is_half_caster(&self) -> bool {
        matches!(
            self,
            PlayerClass::Rogue | PlayerClass::Ranger | PlayerClass::Paladin
        )
    }
}

/// Player race
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
    EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum Race {
    #[default]
    Human,
    Elf,
    Dwarf,
    Hobbit,
    Gnome,
    #[strum(to_string = "Half-Orc", serialize = "HalfOrc")]
    HalfOrc,
    #[strum(to_string = "Half-Troll", serialize = "HalfTroll")]
    HalfTroll,
    Dracon,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_spell_stat() {
        assert_eq!(PlayerClass::Mage.spell_stat(), Some(Stat::Intelligence));
        assert_eq!(PlayerClass::Priest.spell_stat(), Some(Stat::Wisdom));
        assert_eq!(PlayerClass::Warrior.spell_stat(), None);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!(PlayerClass::from_str("mage").unwrap(), PlayerClass::Mage);
        assert_eq!(
            PlayerClass::from_str("blue-mage").unwrap(),
            PlayerClass::BlueMage
        );
        assert_eq!(Race::from_str("half-troll").unwrap(), Race::HalfTroll);
        assert!(Race::from_str("balrog").is_err());
    }
}
