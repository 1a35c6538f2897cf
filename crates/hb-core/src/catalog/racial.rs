//! Racial powers and activatable mutations
//!
//! Powers are paid with mana. Characters without a mana pool pay with hit
//! points instead.

use super::{Availability, PowerCatalog, PowerDescriptor, PowerExtra, PowerSource, Resource};
use crate::player::{Mutations, PlayerState, Race, Stat};
use crate::repeat::RepeatContext;

/// Static data of a racial power or mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RacialPowerInfo {
    pub name: &'static str,
    pub level: i32,
    pub cost: i32,
    pub stat: Stat,
    /// Difficulty; 0 never fails
    pub fail: i32,
    pub info: &'static str,
}

const fn power(
    name: &'static str,
    level: i32,
    cost: i32,
    stat: Stat,
    fail: i32,
    info: &'static str,
) -> RacialPowerInfo {
    RacialPowerInfo {
        name,
        level,
        cost,
        stat,
        fail,
        info,
    }
}

/// Racial powers, in menu order
pub static RACIAL_POWERS: &[(Race, RacialPowerInfo)] = &[
    (Race::Elf, power("Elven Sight", 1, 3, Stat::Wisdom, 0, "detect life")),
    (Race::Dwarf, power("Detect Doors+Traps", 5, 5, Stat::Wisdom, 12, "")),
    (Race::Hobbit, power("Create Food", 15, 10, Stat::Intelligence, 10, "")),
    (Race::Gnome, power("Blink", 5, 5, Stat::Intelligence, 12, "range 10")),
    (Race::HalfOrc, power("Remove Fear", 3, 5, Stat::Wisdom, 8, "")),
    (Race::HalfTroll, power("Berserk", 10, 12, Stat::Strength, 9, "dur 10+d10")),
    (Race::Dracon, power("Breath Weapon", 1, 5, Stat::Constitution, 12, "dam lvl*2")),
];

/// Mutation powers, in menu order
pub static MUTATION_POWERS: &[(Mutations, RacialPowerInfo)] = &[
    (Mutations::SPIT_ACID, power("Spit Acid", 9, 9, Stat::Dexterity, 15, "dam lvl")),
    (Mutations::BR_FIRE, power("Fire Breath", 20, 20, Stat::Constitution, 18, "dam lvl*2")),
    (Mutations::HYPN_GAZE, power("Hypnotic Gaze", 12, 12, Stat::Charisma, 18, "")),
    (Mutations::TELEKINES, power("Telekinesis", 9, 9, Stat::Wisdom, 14, "")),
    (Mutations::VTELEPORT, power("Teleport", 7, 7, Stat::Wisdom, 15, "range lvl*4+10")),
    (Mutations::MIND_BLST, power("Mind Blast", 5, 3, Stat::Wisdom, 15, "dam 3d8")),
    (Mutations::RADIATION, power("Emit Radiation", 15, 15, Stat::Constitution, 14, "dam lvl")),
    (Mutations::EAT_ROCK, power("Eat Rock", 8, 12, Stat::Constitution, 18, "")),
    (Mutations::SHRIEK, power("Shriek", 20, 14, Stat::Constitution, 16, "")),
    (Mutations::ILLUMINE, power("Illuminate", 3, 2, Stat::Intelligence, 10, "")),
];

/// Racial powers and mutations of the player
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RacialSource;

impl RacialSource {
    fn descriptor(info: &RacialPowerInfo, extra: PowerExtra, player: &PlayerState) -> PowerDescriptor {
        let resource = if player.msp > 0 {
            Resource::Mana
        } else {
            Resource::Hp
        };
        let availability = if info.level > player.level {
            Availability::TooHard
        } else {
            Availability::Ready
        };
        PowerDescriptor::new(info.name, info.level, info.cost, info.fail, extra)
            .paid_with(resource)
            .with_availability(availability)
    }

    fn info_of(power: &PowerDescriptor) -> Option<&'static RacialPowerInfo> {
        match power.extra {
            PowerExtra::Racial { id, .. } => RACIAL_POWERS.get(id).map(|(_, info)| info),
            PowerExtra::Mutation { id, .. } => MUTATION_POWERS
                .iter()
                .find(|(flag, _)| *flag == id)
                .map(|(_, info)| info),
            _ => None,
        }
    }
}

impl PowerSource for RacialSource {
    fn context(&self) -> RepeatContext {
        RepeatContext::Racial
    }

    fn noun(&self) -> &'static str {
        "power"
    }

    fn verb(&self) -> &'static str {
        "use"
    }

    fn command_key(&self) -> Option<char> {
        Some('U')
    }

    fn build_catalog(&self, player: &PlayerState) -> PowerCatalog {
        let racial = RACIAL_POWERS
            .iter()
            .enumerate()
            .filter(|(_, (race, _))| *race == player.race)
            .map(|(id, (_, info))| {
                Self::descriptor(info, PowerExtra::Racial { id, stat: info.stat }, player)
            });
        let mutations = MUTATION_POWERS
            .iter()
            .filter(|(flag, _)| player.mutations.contains(*flag))
            .map(|(flag, info)| {
                Self::descriptor(
                    info,
                    PowerExtra::Mutation {
                        id: *flag,
                        stat: info.stat,
                    },
                    player,
                )
            });
        PowerCatalog::from_entries(racial.chain(mutations).collect())
    }

    fn describe_row(&self, power: &PowerDescriptor, _player: &PlayerState) -> String {
        match Self::info_of(power) {
            Some(info) if info.info.is_empty() => format!("({})", info.stat.short_name()),
            Some(info) => format!("{} ({})", info.info, info.stat.short_name()),
            None => String::new(),
        }
    }

    fn nothing_message(&self) -> String {
        "You have no powers to activate.".to_string()
    }
}
