//! Player state snapshot read by the selection engine

mod class;
mod inventory;
mod stats;

pub use class::{PlayerClass, Race};
pub use inventory::{Item, ItemKind, ItemLocation};
pub use stats::{MAX_STAT_INDEX, NUM_STATS, Stat, Stats, stat_index, stat_string};

use std::collections::BTreeMap;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::catalog::{DeviceKind, Essence, Realm, Resource};

/// Spells per realm tracked in the learned/forgotten masks
pub const SPELLS_PER_REALM: usize = 32;

bitflags! {
    /// Equipment-granted casting modifiers
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct CasterFlags: u8 {
        /// Spells are easier to cast
        const EASY_SPELL  = 0x01;
        /// Heavy gloves or armour disturb casting
        const HEAVY_SPELL = 0x02;
        /// Mana costs are reduced by a quarter
        const DEC_MANA    = 0x04;
    }
}

bitflags! {
    /// Activatable mutations
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct Mutations: u32 {
        const SPIT_ACID  = 0x0001;
        const BR_FIRE    = 0x0002;
        const HYPN_GAZE  = 0x0004;
        const TELEKINES  = 0x0008;
        const VTELEPORT  = 0x0010;
        const MIND_BLST  = 0x0020;
        const RADIATION  = 0x0040;
        const EAT_ROCK   = 0x0080;
        const SHRIEK     = 0x0100;
        const ILLUMINE   = 0x0200;
    }
}

/// What the player knows of one magic realm
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellKnowledge {
    pub realm: Realm,
    /// Bit `i` set when spell `i` of the realm has been learned
    pub learned: u32,
    /// Bit `i` set when spell `i` has been forgotten (e.g. after level drain)
    pub forgotten: u32,
    /// Casting experience per spell
    pub exp: [i16; SPELLS_PER_REALM],
}

impl SpellKnowledge {
    pub fn new(realm: Realm) -> Self {
        Self {
            realm,
            learned: 0,
            forgotten: 0,
            exp: [0; SPELLS_PER_REALM],
        }
    }

    pub fn learn(&mut self, index: usize) {
        if index < SPELLS_PER_REALM {
            self.learned |= 1 << index;
            self.forgotten &= !(1 << index);
        }
    }

    pub fn is_learned(&self, index: usize) -> bool {
        index < SPELLS_PER_REALM && self.learned & (1 << index) != 0
    }

    pub fn is_forgotten(&self, index: usize) -> bool {
        index < SPELLS_PER_REALM && self.forgotten & (1 << index) != 0
    }

    pub fn exp_of(&self, index: usize) -> i16 {
        self.exp.get(index).copied().unwrap_or(0)
    }
}

/// A magic device absorbed by a magic-eater
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EatenDevice {
    pub kind: DeviceKind,
    pub name: String,
    /// Object level of the absorbed device
    pub level: i32,
    pub charges: i32,
    /// Rods: turns until the next charge is ready
    pub recharging: i32,
}

/// Snapshot of everything the menus read about the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub name: String,
    pub class: PlayerClass,
    pub race: Race,
    pub level: i32,
    pub stats: Stats,

    // Resource pools
    pub csp: i32,
    pub msp: i32,
    pub chp: i32,
    pub mhp: i32,

    // Status
    pub stun: i32,
    pub confused: bool,

    // Casting modifiers
    pub caster_flags: CasterFlags,
    pub to_m_chance: i32,

    // Known abilities
    pub spells: Vec<SpellKnowledge>,
    pub mutations: Mutations,
    /// Bit `i` set when blue-magic spell `i` has been learned
    pub blue_learned: u64,
    pub devices: Vec<EatenDevice>,
    pub essences: BTreeMap<Essence, i32>,

    // Items
    pub pack: Vec<Item>,
    pub equipment: Vec<Item>,
    pub floor: Vec<Item>,
}

impl PlayerState {
    /// Create a level 1 character with average stats and empty pools
    pub fn new(name: impl Into<String>, class: PlayerClass, race: Race) -> Self {
        Self {
            name: name.into(),
            class,
            race,
            level: 1,
            stats: Stats::default(),
            csp: 0,
            msp: 0,
            chp: 10,
            mhp: 10,
            stun: 0,
            confused: false,
            caster_flags: CasterFlags::empty(),
            to_m_chance: 0,
            spells: Vec::new(),
            mutations: Mutations::empty(),
            blue_learned: 0,
            devices: Vec::new(),
            essences: BTreeMap::new(),
            pack: Vec::new(),
            equipment: Vec::new(),
            floor: Vec::new(),
        }
    }

    /// Amount currently available in a resource pool
    pub fn available(&self, resource: Resource) -> i32 {
        match resource {
            Resource::Mana => self.csp,
            Resource::Hp => self.chp,
            Resource::Essence(kind) => self.essences.get(&kind).copied().unwrap_or(0),
            Resource::Charges { slot } => self.devices.get(slot).map(|d| d.charges).unwrap_or(0),
            Resource::Nothing => i32::MAX,
        }
    }

    /// Knowledge of a realm, if the player studies it
    pub fn realm(&self, realm: Realm) -> Option<&SpellKnowledge> {
        self.spells.iter().find(|k| k.realm == realm)
    }

    pub fn realm_mut(&mut self, realm: Realm) -> Option<&mut SpellKnowledge> {
        self.spells.iter_mut().find(|k| k.realm == realm)
    }

    pub fn knows_blue_spell(&self, index: usize) -> bool {
        index < 64 && self.blue_learned & (1u64 << index) != 0
    }

    pub fn learn_blue_spell(&mut self, index: usize) {
        if index < 64 {
            self.blue_learned |= 1u64 << index;
        }
    }

    /// Items in one location
    pub fn items(&self, location: ItemLocation) -> &[Item] {
        match location {
            ItemLocation::Pack => &self.pack,
            ItemLocation::Equipment => &self.equipment,
            ItemLocation::Floor => &self.floor,
        }
    }
}
