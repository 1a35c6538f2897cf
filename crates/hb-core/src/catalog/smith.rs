//! Smith essence effects
//!
//! A smith extracts essences from items and spends them to add an effect to
//! a weapon or armour. Adding an essence never fails; the only limits are the
//! smith's level and the essence stock.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use super::{
    Availability, PowerCatalog, PowerDescriptor, PowerExtra, PowerSource, Resource,
};
use crate::player::PlayerState;
use crate::repeat::RepeatContext;

/// Kind of collected essence
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
)]
pub enum Essence {
    Strength,
    Intelligence,
    Wisdom,
    Dexterity,
    Constitution,
    Speed,
    Fire,
    Cold,
    #[strum(to_string = "Lightning")]
    Elec,
    Acid,
    Poison,
    /// Vampiric and chaotic brands
    Brand,
    #[strum(to_string = "Slay Evil")]
    SlayEvil,
    #[strum(to_string = "Slay Dragon")]
    SlayDragon,
    Resistance,
    #[strum(to_string = "See Invisible")]
    SeeInvisible,
    Telepathy,
}

/// One effect a smith can add
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmithEffect {
    pub name: &'static str,
    pub essence: Essence,
    pub cost: i32,
    pub level: i32,
    pub info: &'static str,
}

const fn effect(
    name: &'static str,
    essence: Essence,
    cost: i32,
    level: i32,
    info: &'static str,
) -> SmithEffect {
    SmithEffect {
        name,
        essence,
        cost,
        level,
        info,
    }
}

/// All smithing effects in menu order
pub static SMITH_EFFECTS: &[SmithEffect] = &[
    effect("strength", Essence::Strength, 20, 10, "+1 STR"),
    effect("intelligence", Essence::Intelligence, 20, 10, "+1 INT"),
    effect("wisdom", Essence::Wisdom, 20, 10, "+1 WIS"),
    effect("dexterity", Essence::Dexterity, 20, 10, "+1 DEX"),
    effect("constitution", Essence::Constitution, 20, 10, "+1 CON"),
    effect("speed", Essence::Speed, 12, 40, "+1 speed"),
    effect("brand fire", Essence::Fire, 20, 15, "x3 vs fire-vulnerable"),
    effect("brand cold", Essence::Cold, 20, 15, "x3 vs cold-vulnerable"),
    effect("brand elec", Essence::Elec, 20, 15, "x3 vs elec-vulnerable"),
    effect("brand acid", Essence::Acid, 20, 15, "x3 vs acid-vulnerable"),
    effect("brand poison", Essence::Poison, 20, 15, "x3 vs poison-vulnerable"),
    effect("vampiric", Essence::Brand, 60, 25, "drain life"),
    effect("chaotic", Essence::Brand, 80, 30, "random effects"),
    effect("slay evil", Essence::SlayEvil, 30, 20, "x2 vs evil"),
    effect("slay dragon", Essence::SlayDragon, 20, 20, "x3 vs dragons"),
    effect("resist fire", Essence::Fire, 15, 5, "resist"),
    effect("resist cold", Essence::Cold, 15, 5, "resist"),
    effect("resist elec", Essence::Elec, 15, 5, "resist"),
    effect("resist acid", Essence::Acid, 15, 5, "resist"),
    effect("resist poison", Essence::Poison, 40, 25, "resist"),
    effect("resistance", Essence::Resistance, 60, 30, "resist base four"),
    effect("see invisible", Essence::SeeInvisible, 20, 10, "sustain"),
    effect("telepathy", Essence::Telepathy, 60, 35, "ESP"),
];

/// Essence effects available to a smith
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SmithSource;

impl PowerSource for SmithSource {
    fn context(&self) -> RepeatContext {
        RepeatContext::Smith
    }

    fn noun(&self) -> &'static str {
        "essence"
    }

    fn verb(&self) -> &'static str {
        "add"
    }

    fn build_catalog(&self, player: &PlayerState) -> PowerCatalog {
        let entries = SMITH_EFFECTS
            .iter()
            .enumerate()
            .filter(|(_, e)| player.essences.contains_key(&e.essence))
            .map(|(i, e)| {
                let stock = player.available(Resource::Essence(e.essence));
                let availability = if e.level > player.level {
                    Availability::TooHard
                } else if stock < e.cost {
                    Availability::Exhausted
                } else {
                    Availability::Ready
                };
                PowerDescriptor::new(e.name, e.level, e.cost, 0, PowerExtra::Essence { effect: i })
                    .paid_with(Resource::Essence(e.essence))
                    .with_availability(availability)
            })
            .collect();
        PowerCatalog::from_entries(entries)
    }

    fn describe_row(&self, power: &PowerDescriptor, player: &PlayerState) -> String {
        match (&power.extra, power.resource) {
            (PowerExtra::Essence { effect }, Resource::Essence(essence)) => {
                let info = SMITH_EFFECTS.get(*effect).map(|e| e.info).unwrap_or("");
                format!("{} ({} left)", info, player.available(Resource::Essence(essence)))
            }
            _ => String::new(),
        }
    }

    fn description(&self, power: &PowerDescriptor) -> String {
        match power.resource {
            Resource::Essence(essence) => format!(
                "Adds {} to a weapon or armour using {} essence of {}.",
                power.name, power.base_cost, essence
            ),
            _ => power.name.clone(),
        }
    }

    fn nothing_message(&self) -> String {
        "You have no essences.".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::{PlayerClass, Race};

    fn smith(level: i32) -> PlayerState {
        let mut p = PlayerState::new("Smith", PlayerClass::Smith, Race::Dwarf);
        p.level = level;
        p
    }

    #[test]
    fn test_only_collected_essences_listed() {
        let mut p = smith(20);
        assert!(SmithSource.build_catalog(&p).is_empty());
        p.essences.insert(Essence::Fire, 25);
        let catalog = SmithSource.build_catalog(&p);
        let names: Vec<_> = catalog.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["brand fire", "resist fire"]);
    }

    #[test]
    fn test_stock_and_level_gating() {
        let mut p = smith(12);
        p.essences.insert(Essence::Fire, 18);
        let catalog = SmithSource.build_catalog(&p);
        // brand fire needs level 15, resist fire costs 15
        assert_eq!(catalog.get(0).map(|e| e.availability), Some(Availability::TooHard));
        assert_eq!(catalog.get(1).map(|e| e.availability), Some(Availability::Ready));

        p.level = 20;
        let catalog = SmithSource.build_catalog(&p);
        assert_eq!(catalog.get(0).map(|e| e.availability), Some(Availability::Exhausted));
    }

    #[test]
    fn test_row_shows_stock() {
        let mut p = smith(20);
        p.essences.insert(Essence::SlayEvil, 45);
        let catalog = SmithSource.build_catalog(&p);
        let row = catalog.get(0).map(|e| SmithSource.describe_row(e, &p));
        assert_eq!(row.as_deref(), Some("x2 vs evil (45 left)"));
    }

    #[test]
    fn test_essence_names() {
        assert_eq!(Essence::Elec.to_string(), "Lightning");
        assert_eq!(Essence::SlayEvil.to_string(), "Slay Evil");
    }
}
