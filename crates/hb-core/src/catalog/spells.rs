//! Spellbook realms
//!
//! Each realm has two books of eight spells. The whole book is always
//! listed; spells the player cannot cast yet are annotated rather than
//! hidden so the letters stay the same as the character grows.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::{Availability, PowerCatalog, PowerDescriptor, PowerExtra, PowerSource};
use crate::chance::proficiency_name;
use crate::player::PlayerState;
use crate::repeat::RepeatContext;

/// Spells in one book
pub const SPELLS_PER_BOOK: usize = 8;

/// Magic realm
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum Realm {
    Life,
    Sorcery,
    Nature,
    Chaos,
}

impl Realm {
    /// Names of the realm's books, in order
    pub const fn book_names(&self) -> [&'static str; 2] {
        match self {
            Realm::Life => ["Book of Common Prayer", "Words of Wisdom"],
            Realm::Sorcery => ["Magic for Beginners", "Conjurings and Tricks"],
            Realm::Nature => ["Call of the Wild", "Nature Mastery"],
            Realm::Chaos => ["Sign of Chaos", "Chaos Mastery"],
        }
    }
}

/// Static data of one spell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpellInfo {
    pub name: &'static str,
    pub level: i32,
    pub mana: i32,
    pub fail: i32,
    /// Short effect summary for the list
    pub info: &'static str,
    pub desc: &'static str,
}

const fn spell(
    name: &'static str,
    level: i32,
    mana: i32,
    fail: i32,
    info: &'static str,
    desc: &'static str,
) -> SpellInfo {
    SpellInfo {
        name,
        level,
        mana,
        fail,
        info,
        desc,
    }
}

static LIFE_SPELLS: &[SpellInfo] = &[
    spell("Detect Evil", 1, 1, 10, "", "Detects all evil monsters in your vicinity."),
    spell("Cure Light Wounds", 3, 2, 15, "heal 2d10", "Heals cuts and a little HP."),
    spell("Bless", 5, 2, 20, "dur 12+d12", "Gives a bonus to hit and AC for a while."),
    spell("Remove Fear", 7, 3, 25, "", "Removes fear."),
    spell("Call Light", 9, 5, 30, "dam 2d5", "Lights up the nearby area."),
    spell("Detect Traps and Doors", 11, 6, 30, "", "Detects traps, doors and stairs nearby."),
    spell("Cure Medium Wounds", 13, 7, 35, "heal 4d10", "Heals cuts and some HP."),
    spell("Satisfy Hunger", 15, 9, 40, "", "Satisfies hunger."),
    spell("Remove Curse", 17, 10, 40, "", "Removes normal curses from equipped items."),
    spell("Cure Poison", 19, 11, 40, "", "Cures poison."),
    spell("Cure Critical Wounds", 21, 13, 45, "heal 8d10", "Heals cuts, stunning and a lot of HP."),
    spell("Sense Unseen", 23, 15, 45, "dur 24+d24", "Gives see invisible for a while."),
    spell("Holy Orb", 25, 16, 50, "dam 3d6+lvl", "Fires a ball which hurts evil monsters more."),
    spell("Protection from Evil", 28, 20, 55, "dur 25+d3*lvl", "Repels evil monsters' melee attacks."),
    spell("Healing", 31, 25, 60, "heal 300", "Heals cuts, stunning and a great deal of HP."),
    spell("Glyph of Warding", 35, 30, 65, "", "Sets a glyph under you that monsters cannot pass."),
];

static SORCERY_SPELLS: &[SpellInfo] = &[
    spell("Detect Monsters", 1, 1, 20, "", "Detects all monsters in your vicinity unless invisible."),
    spell("Phase Door", 3, 2, 25, "range 10", "Teleports you a short distance."),
    spell("Detect Doors and Traps", 5, 3, 25, "", "Detects traps, doors and stairs nearby."),
    spell("Light Area", 7, 4, 30, "dam 2d5", "Lights up the nearby area."),
    spell("Confuse Monster", 9, 5, 30, "power lvl*3/2", "Attempts to confuse a monster."),
    spell("Teleport", 11, 6, 35, "range lvl*5", "Teleports you a long distance."),
    spell("Sleep Monster", 13, 7, 35, "power lvl", "Attempts to put a monster to sleep."),
    spell("Recharging", 15, 10, 40, "power lvl*4", "Recharges staffs, wands or rods."),
    spell("Magic Mapping", 17, 12, 40, "", "Maps the area around you."),
    spell("Identify", 19, 14, 45, "", "Identifies an item."),
    spell("Slow Monster", 21, 15, 45, "power lvl", "Attempts to slow a monster."),
    spell("Mass Sleep", 23, 17, 50, "power lvl", "Attempts to put every monster in sight to sleep."),
    spell("Teleport Away", 25, 20, 50, "", "Teleports a monster away."),
    spell("Haste Self", 28, 22, 55, "dur lvl+d20", "Hastes you for a while."),
    spell("Detection True", 31, 26, 60, "", "Detects all monsters, traps, doors, stairs and objects."),
    spell("Identify True", 35, 30, 65, "", "Fully identifies an item."),
];

static NATURE_SPELLS: &[SpellInfo] = &[
    spell("Detect Creatures", 1, 1, 10, "", "Detects all monsters in your vicinity unless invisible."),
    spell("Lightning", 3, 2, 20, "dam 3d4", "Fires a short beam of lightning."),
    spell("Detect Doors and Traps", 5, 3, 25, "", "Detects traps, doors and stairs nearby."),
    spell("Produce Food", 7, 4, 30, "", "Produces a Ration of Food."),
    spell("Daylight", 9, 5, 30, "dam 2d5", "Lights up the nearby area."),
    spell("Animal Taming", 11, 6, 35, "power lvl", "Attempts to charm an animal."),
    spell("Resist Environment", 13, 8, 35, "dur 20+d20", "Gives resistance to fire, cold and electricity."),
    spell("Cure Wounds & Poison", 15, 9, 40, "", "Heals all cuts and poison."),
    spell("Stone to Mud", 17, 10, 40, "dam 20+d30", "Turns one rock square to mud."),
    spell("Frost Bolt", 19, 11, 40, "dam 6d8", "Fires a bolt or beam of cold."),
    spell("Nature Awareness", 21, 13, 45, "", "Maps nearby area and detects all monsters."),
    spell("Fire Bolt", 23, 15, 45, "dam 9d8", "Fires a bolt or beam of fire."),
    spell("Ray of Sunlight", 25, 17, 50, "dam 6d8", "Fires a beam of light."),
    spell("Entangle", 28, 20, 55, "power lvl", "Attempts to slow all monsters in sight."),
    spell("Summon Animal", 31, 24, 60, "", "Summons an animal."),
    spell("Herbal Healing", 35, 30, 65, "heal 500", "Heals HP greatly and cures all ailments."),
];

static CHAOS_SPELLS: &[SpellInfo] = &[
    spell("Magic Missile", 1, 1, 20, "dam 3d4", "Fires a weak bolt of magic."),
    spell("Trap / Door Destruction", 3, 2, 22, "", "Destroys all traps and doors next to you."),
    spell("Flash of Light", 5, 3, 25, "dam 2d2", "Lights up the nearby area."),
    spell("Touch of Confusion", 7, 4, 30, "", "Your next melee hit attempts to confuse."),
    spell("Mana Burst", 9, 5, 30, "dam 3d5+lvl", "Fires a ball of pure mana."),
    spell("Fire Bolt", 11, 6, 35, "dam 8d8", "Fires a bolt or beam of fire."),
    spell("Fist of Force", 13, 7, 35, "dam 8d8", "Fires a tiny ball of disintegration."),
    spell("Teleport Self", 15, 9, 40, "range lvl*5", "Teleports you a long distance."),
    spell("Wonder", 17, 10, 40, "random", "Fires something random."),
    spell("Chaos Bolt", 19, 12, 45, "dam 10d8", "Fires a bolt or beam of chaos."),
    spell("Sonic Boom", 21, 14, 45, "dam 60+lvl", "Generates a ball of sound centred on you."),
    spell("Doom Bolt", 23, 16, 50, "dam 11d8", "Fires a beam of pure mana."),
    spell("Fire Ball", 25, 18, 50, "dam 55+lvl", "Fires a ball of fire."),
    spell("Teleport Other", 28, 20, 55, "power lvl", "Teleports all monsters on a line away."),
    spell("Word of Destruction", 31, 25, 60, "", "Destroys everything nearby."),
    spell("Invoke Logrus", 35, 30, 65, "dam lvl*2+99", "Generates a huge ball of chaos."),
];

/// All spells of a realm, book by book
pub fn realm_spells(realm: Realm) -> &'static [SpellInfo] {
    match realm {
        Realm::Life => LIFE_SPELLS,
        Realm::Sorcery => SORCERY_SPELLS,
        Realm::Nature => NATURE_SPELLS,
        Realm::Chaos => CHAOS_SPELLS,
    }
}

/// Spells of one book of a realm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpellSource {
    pub realm: Realm,
    pub book: u8,
}

impl SpellSource {
    pub fn new(realm: Realm, book: u8) -> Self {
        Self { realm, book }
    }

    fn book_spells(&self) -> &'static [SpellInfo] {
        let spells = realm_spells(self.realm);
        let start = usize::from(self.book) * SPELLS_PER_BOOK;
        spells
            .get(start..(start + SPELLS_PER_BOOK).min(spells.len()))
            .unwrap_or(&[])
    }
}

impl PowerSource for SpellSource {
    fn context(&self) -> RepeatContext {
        RepeatContext::Spell {
            realm: self.realm,
            book: self.book,
        }
    }

    fn noun(&self) -> &'static str {
        "spell"
    }

    fn verb(&self) -> &'static str {
        "cast"
    }

    fn command_key(&self) -> Option<char> {
        Some('m')
    }

    fn build_catalog(&self, player: &PlayerState) -> PowerCatalog {
        let knowledge = player.realm(self.realm);
        let first = usize::from(self.book) * SPELLS_PER_BOOK;

        let entries = self
            .book_spells()
            .iter()
            .enumerate()
            .map(|(i, info)| {
                let index = first + i;
                let (availability, exp) = match knowledge {
                    None => (Availability::Illegible, 0),
                    Some(k) if k.is_forgotten(index) => (Availability::Forgotten, k.exp_of(index)),
                    Some(k) if info.level > player.level => (Availability::TooHard, k.exp_of(index)),
                    Some(k) if !k.is_learned(index) => (Availability::Unknown, 0),
                    Some(k) => (Availability::Ready, k.exp_of(index)),
                };
                PowerDescriptor::new(
                    info.name,
                    info.level,
                    info.mana,
                    info.fail,
                    PowerExtra::Spell {
                        realm: self.realm,
                        index,
                        exp,
                    },
                )
                .with_availability(availability)
            })
            .collect();

        PowerCatalog::from_entries(entries)
    }

    fn describe_row(&self, power: &PowerDescriptor, _player: &PlayerState) -> String {
        match power.extra {
            PowerExtra::Spell { index, exp, .. } => {
                let info = realm_spells(self.realm)
                    .get(index)
                    .map(|s| s.info)
                    .unwrap_or("");
                if info.is_empty() {
                    proficiency_name(i32::from(exp)).to_string()
                } else {
                    format!("{} {}", proficiency_name(i32::from(exp)), info)
                }
            }
            _ => String::new(),
        }
    }

    fn description(&self, power: &PowerDescriptor) -> String {
        match power.extra {
            PowerExtra::Spell { index, .. } => realm_spells(self.realm)
                .get(index)
                .map(|s| s.desc.to_string())
                .unwrap_or_else(|| power.name.clone()),
            _ => power.name.clone(),
        }
    }

    fn nothing_message(&self) -> String {
        "You don't know any spells in that book.".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::{PlayerClass, Race, SpellKnowledge};
    use strum::IntoEnumIterator;

    fn mage() -> PlayerState {
        let mut p = PlayerState::new("Mage", PlayerClass::Mage, Race::Elf);
        p.level = 10;
        p.spells.push(SpellKnowledge::new(Realm::Sorcery));
        p
    }

    #[test]
    fn test_tables_fill_two_books() {
        for realm in Realm::iter() {
            let spells = realm_spells(realm);
            assert_eq!(spells.len(), 2 * SPELLS_PER_BOOK, "{}", realm);
            assert!(spells.windows(2).all(|w| w[0].level <= w[1].level));
        }
    }

    #[test]
    fn test_annotations() {
        let mut p = mage();
        if let Some(k) = p.realm_mut(Realm::Sorcery) {
            k.learn(0);
            k.learn(1);
            k.forgotten |= 1 << 1;
        }
        let catalog = SpellSource::new(Realm::Sorcery, 0).build_catalog(&p);
        assert_eq!(catalog.len(), SPELLS_PER_BOOK);
        let avail: Vec<_> = catalog.iter().map(|e| e.availability).collect();
        assert_eq!(avail[0], Availability::Ready);
        assert_eq!(avail[1], Availability::Forgotten);
        assert_eq!(avail[2], Availability::Unknown);
        assert_eq!(avail[6], Availability::TooHard);
    }

    #[test]
    fn test_other_realm_is_illegible() {
        let catalog = SpellSource::new(Realm::Life, 0).build_catalog(&mage());
        assert!(catalog.iter().all(|e| e.availability == Availability::Illegible));
        assert!(!catalog.has_choices());
    }

    #[test]
    fn test_second_book_indices() {
        let mut p = mage();
        p.level = 50;
        if let Some(k) = p.realm_mut(Realm::Sorcery) {
            k.learn(8);
            k.exp[8] = 1600;
        }
        let source = SpellSource::new(Realm::Sorcery, 1);
        let catalog = source.build_catalog(&p);
        let first = catalog.get(0).map(|e| e.extra.clone());
        assert_eq!(
            first,
            Some(PowerExtra::Spell {
                realm: Realm::Sorcery,
                index: 8,
                exp: 1600
            })
        );
        let row = catalog.get(0).map(|e| source.describe_row(e, &p));
        assert_eq!(row.as_deref(), Some("Master"));
    }

    #[test]
    fn test_missing_book_is_empty() {
        assert!(SpellSource::new(Realm::Chaos, 5).build_catalog(&mage()).is_empty());
    }

    #[test]
    fn test_realm_parses() {
        assert_eq!("nature".parse::<Realm>().ok(), Some(Realm::Nature));
        assert_eq!(Realm::Life.to_string(), "Life");
    }
}
