//! Carried, worn and floor items
//!
//! Only the parts of an item the selection menus need: a display name, an
//! item kind for testers, and the player's inscription.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Item kind, used by item testers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum ItemKind {
    Weapon,
    Armour,
    Ring,
    Amulet,
    Light,
    Food,
    Potion,
    Scroll,
    Spellbook,
    Staff,
    Wand,
    Rod,
}

/// Where an item is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum ItemLocation {
    #[strum(to_string = "Inventory")]
    Pack,
    Equipment,
    Floor,
}

/// An item the player can see or carry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub kind: ItemKind,
    /// Object level, used for device difficulty
    pub level: i32,
    pub quantity: i32,
    /// Player inscription, e.g. "@q1" or "@r2@m2"
    pub inscription: Option<String>,
}

impl Item {
    pub fn new(name: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            name: name.into(),
            kind,
            level: 1,
            quantity: 1,
            inscription: None,
        }
    }

    pub fn with_level(mut self, level: i32) -> Self {
        self.level = level;
        self
    }

    pub fn with_quantity(mut self, quantity: i32) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn inscribed(mut self, inscription: impl Into<String>) -> Self {
        self.inscription = Some(inscription.into());
        self
    }

    /// Display name including the quantity and inscription
    pub fn display_name(&self) -> String {
        let base = if self.quantity > 1 {
            format!("{} {}", self.quantity, self.name)
        } else {
            self.name.clone()
        };
        match &self.inscription {
            Some(insc) => format!("{} {{{}}}", base, insc),
            None => base,
        }
    }
}
