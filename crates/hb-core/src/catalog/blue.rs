//! Blue magic: monster spells learned by a blue-mage
//!
//! Spells are picked in two steps, first the kind (bolt, ball, ...) and then
//! the spell. Unlearned spells are listed but cannot be picked, and the
//! menu cursor passes over them.

use strum::{Display, EnumIter, IntoEnumIterator};

use super::{
    Availability, CategoryStyle, PowerCatalog, PowerDescriptor, PowerExtra, PowerSource,
};
use crate::player::PlayerState;
use crate::repeat::RepeatContext;

/// Blue magic grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum BlueCategory {
    Bolt,
    Ball,
    Breath,
    Summoning,
    Others,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlueSpellInfo {
    pub name: &'static str,
    pub category: BlueCategory,
    pub level: i32,
    pub mana: i32,
    pub fail: i32,
    pub info: &'static str,
}

const fn blue(
    name: &'static str,
    category: BlueCategory,
    level: i32,
    mana: i32,
    fail: i32,
    info: &'static str,
) -> BlueSpellInfo {
    BlueSpellInfo {
        name,
        category,
        level,
        mana,
        fail,
        info,
    }
}

use BlueCategory::{Ball, Bolt, Breath, Others, Summoning};

/// Every monster spell a blue-mage can learn; the index is the learned bit
pub static BLUE_SPELLS: &[BlueSpellInfo] = &[
    blue("shriek", Others, 1, 1, 15, ""),
    blue("magic missile", Bolt, 1, 1, 10, "dam 2d6"),
    blue("acid bolt", Bolt, 13, 7, 20, "dam 7d8"),
    blue("lightning bolt", Bolt, 10, 5, 20, "dam 4d8"),
    blue("fire bolt", Bolt, 15, 9, 25, "dam 9d8"),
    blue("frost bolt", Bolt, 12, 6, 20, "dam 6d8"),
    blue("nether bolt", Bolt, 30, 20, 40, "dam 30+5d5"),
    blue("water bolt", Bolt, 35, 25, 40, "dam 10d10"),
    blue("mana bolt", Bolt, 40, 30, 45, "dam 50+1d1"),
    blue("plasma bolt", Bolt, 45, 35, 50, "dam 10+8d7"),
    blue("acid ball", Ball, 20, 12, 30, "dam 15+1d30"),
    blue("lightning ball", Ball, 18, 10, 30, "dam 8+1d15"),
    blue("fire ball", Ball, 22, 14, 30, "dam 10+1d35"),
    blue("frost ball", Ball, 22, 14, 30, "dam 10+1d30"),
    blue("stinking cloud", Ball, 5, 3, 20, "dam 12"),
    blue("nether ball", Ball, 38, 30, 50, "dam 50+10d10"),
    blue("water ball", Ball, 40, 35, 50, "dam 50+1d30"),
    blue("mana storm", Ball, 45, 50, 60, "dam 100+10d10"),
    blue("darkness storm", Ball, 46, 50, 60, "dam 100+10d10"),
    blue("breathe acid", Breath, 15, 15, 30, "dam hp/3"),
    blue("breathe lightning", Breath, 15, 15, 30, "dam hp/3"),
    blue("breathe fire", Breath, 15, 15, 30, "dam hp/3"),
    blue("breathe frost", Breath, 15, 15, 30, "dam hp/3"),
    blue("breathe poison", Breath, 20, 18, 35, "dam hp/3"),
    blue("breathe nether", Breath, 30, 25, 40, "dam hp/6"),
    blue("breathe chaos", Breath, 40, 35, 50, "dam hp/6"),
    blue("summon kin", Summoning, 12, 15, 30, ""),
    blue("summon monster", Summoning, 15, 18, 35, ""),
    blue("summon monsters", Summoning, 25, 30, 45, ""),
    blue("summon animals", Summoning, 20, 25, 40, ""),
    blue("summon undead", Summoning, 40, 50, 60, ""),
    blue("summon dragon", Summoning, 44, 60, 60, ""),
    blue("blink", Others, 2, 1, 15, "range 10"),
    blue("teleport", Others, 10, 8, 30, "range 100"),
    blue("haste self", Others, 20, 15, 35, "dur 20+d20"),
    blue("heal monster", Others, 20, 15, 30, "heal lvl*6"),
    blue("scare", Others, 5, 3, 15, "power lvl"),
    blue("confuse", Others, 7, 5, 20, "power lvl"),
    blue("blind", Others, 6, 4, 20, "power lvl"),
    blue("slow", Others, 10, 6, 25, "power lvl"),
    blue("hold", Others, 12, 8, 25, "power lvl"),
    blue("teleport to", Others, 25, 20, 40, ""),
    blue("teleport away", Others, 30, 25, 40, ""),
];

/// Blue magic known to the player
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlueMagicSource;

impl PowerSource for BlueMagicSource {
    fn context(&self) -> RepeatContext {
        RepeatContext::BlueMagic
    }

    fn noun(&self) -> &'static str {
        "blue magic"
    }

    fn verb(&self) -> &'static str {
        "cast"
    }

    fn build_catalog(&self, player: &PlayerState) -> PowerCatalog {
        let mut catalog = PowerCatalog::new().with_style(CategoryStyle::PickFirst);
        for category in BlueCategory::iter() {
            let powers = BLUE_SPELLS
                .iter()
                .enumerate()
                .filter(|(_, s)| s.category == category)
                .map(|(i, s)| {
                    let availability = if !player.knows_blue_spell(i) {
                        Availability::Unknown
                    } else if s.level > player.level {
                        Availability::TooHard
                    } else {
                        Availability::Ready
                    };
                    PowerDescriptor::new(s.name, s.level, s.mana, s.fail, PowerExtra::BlueMagic {
                        spell: i,
                    })
                    .with_availability(availability)
                })
                .collect();
            catalog.push_category(category.to_string(), powers);
        }
        catalog
    }

    fn describe_row(&self, power: &PowerDescriptor, _player: &PlayerState) -> String {
        match power.extra {
            PowerExtra::BlueMagic { spell } => BLUE_SPELLS
                .get(spell)
                .map(|s| s.info.to_string())
                .unwrap_or_default(),
            _ => String::new(),
        }
    }

    fn nothing_message(&self) -> String {
        "You don't know any blue magic!".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::{PlayerClass, Race};

    fn blue_mage() -> PlayerState {
        let mut p = PlayerState::new("Blue", PlayerClass::BlueMage, Race::Human);
        p.level = 12;
        p
    }

    #[test]
    fn test_every_spell_has_a_category() {
        let catalog = BlueMagicSource.build_catalog(&blue_mage());
        assert_eq!(catalog.len(), BLUE_SPELLS.len());
        assert_eq!(catalog.categories().len(), 5);
        assert_eq!(catalog.style(), CategoryStyle::PickFirst);
        let bolts = catalog.view(Some(0));
        assert!(catalog.entries()[bolts].iter().all(|e| e.name.contains("bolt") || e.name == "magic missile"));
    }

    #[test]
    fn test_unlearned_spells_are_unknown() {
        let mut p = blue_mage();
        assert!(!BlueMagicSource.build_catalog(&p).has_choices());
        p.learn_blue_spell(1); // magic missile
        p.learn_blue_spell(9); // plasma bolt, too high
        let catalog = BlueMagicSource.build_catalog(&p);
        let bolts = catalog.view(Some(0));
        let avail: Vec<_> = catalog.entries()[bolts].iter().map(|e| e.availability).collect();
        assert_eq!(avail[0], Availability::Ready);
        assert_eq!(avail[1], Availability::Unknown);
        assert_eq!(avail[8], Availability::TooHard);
        assert!(catalog.has_choices_in(catalog.view(Some(0))));
        assert!(!catalog.has_choices_in(catalog.view(Some(1))));
    }

    #[test]
    fn test_row_info() {
        let catalog = BlueMagicSource.build_catalog(&blue_mage());
        let row = catalog.get(0).map(|e| BlueMagicSource.describe_row(e, &blue_mage()));
        assert_eq!(row.as_deref(), Some("dam 2d6"));
    }
}
