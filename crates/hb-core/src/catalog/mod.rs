//! Power catalogs
//!
//! A catalog is the ordered list of powers a selection menu offers. It is
//! built fresh from the player snapshot every time a menu opens and thrown
//! away when it closes. Order matters: positional labels (`a`, `b`, ...) are
//! assigned by index within the visible category.
//!
//! Each power kind (spells, racial powers, blue magic, magic-eater devices,
//! smith essences, items) is a thin [`PowerSource`] adapter in its own
//! submodule.

mod blue;
mod eater;
mod items;
mod racial;
mod smith;
mod spells;

pub use blue::{BLUE_SPELLS, BlueCategory, BlueMagicSource, BlueSpellInfo};
pub use eater::{DeviceKind, MagicEaterSource, device_fail_profile};
pub use items::{ItemSource, ItemTester};
pub use racial::{MUTATION_POWERS, RACIAL_POWERS, RacialPowerInfo, RacialSource};
pub use smith::{Essence, SMITH_EFFECTS, SmithEffect, SmithSource};
pub use spells::{Realm, SPELLS_PER_BOOK, SpellInfo, SpellSource, realm_spells};

use std::ops::Range;

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::player::{ItemLocation, Mutations, PlayerState, Stat};
use crate::repeat::RepeatContext;

/// Pool that pays for a power
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resource {
    Mana,
    Hp,
    Essence(Essence),
    /// Charges of an absorbed device
    Charges { slot: usize },
    Nothing,
}

impl Resource {
    /// Short unit name for prompts and columns
    pub fn unit(&self) -> &'static str {
        match self {
            Resource::Mana => "mana",
            Resource::Hp => "hp",
            Resource::Essence(_) => "essence",
            Resource::Charges { .. } => "charge",
            Resource::Nothing => "",
        }
    }

    /// Pools the player may overdraw at a price
    pub fn allows_over_exertion(&self) -> bool {
        matches!(self, Resource::Mana | Resource::Hp)
    }
}

/// Whether a listed power can be chosen right now
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Availability {
    #[strum(to_string = "")]
    Ready,
    /// Level requirement not met; shown greyed
    #[strum(to_string = "difficult")]
    TooHard,
    #[strum(to_string = "forgotten")]
    Forgotten,
    /// Out of charges or essence
    #[strum(to_string = "exhausted")]
    Exhausted,
    /// Not learned; shown but skipped by cursor navigation
    #[strum(to_string = "unknown")]
    Unknown,
    /// The player cannot read it at all
    #[strum(to_string = "illegible")]
    Illegible,
}

impl Availability {
    pub fn is_ready(&self) -> bool {
        matches!(self, Availability::Ready)
    }

    /// The player knows of the power, even if it cannot be used now
    pub fn is_known(&self) -> bool {
        !matches!(self, Availability::Unknown | Availability::Illegible)
    }
}

/// Kind-specific payload of a power
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PowerExtra {
    Spell { realm: Realm, index: usize, exp: i16 },
    Racial { id: usize, stat: Stat },
    Mutation { id: Mutations, stat: Stat },
    BlueMagic { spell: usize },
    Device { kind: DeviceKind, slot: usize, charges: i32 },
    Essence { effect: usize },
    Item { location: ItemLocation, slot: usize },
}

/// One selectable power
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PowerDescriptor {
    pub name: String,
    pub min_level: i32,
    pub base_cost: i32,
    pub base_fail: i32,
    pub resource: Resource,
    pub availability: Availability,
    pub inscription: Option<String>,
    pub extra: PowerExtra,
}

impl PowerDescriptor {
    pub fn new(
        name: impl Into<String>,
        min_level: i32,
        base_cost: i32,
        base_fail: i32,
        extra: PowerExtra,
    ) -> Self {
        Self {
            name: name.into(),
            min_level,
            base_cost,
            base_fail,
            resource: Resource::Mana,
            availability: Availability::Ready,
            inscription: None,
            extra,
        }
    }

    pub fn paid_with(mut self, resource: Resource) -> Self {
        self.resource = resource;
        self
    }

    pub fn with_availability(mut self, availability: Availability) -> Self {
        self.availability = availability;
        self
    }

    pub fn with_inscription(mut self, inscription: Option<String>) -> Self {
        self.inscription = inscription;
        self
    }

    pub fn is_spell(&self) -> bool {
        matches!(self.extra, PowerExtra::Spell { .. })
    }

    pub fn is_ready(&self) -> bool {
        self.availability.is_ready()
    }
}

/// How a catalog with several categories is navigated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryStyle {
    /// One list, categories (if any) are only headings
    #[default]
    Flat,
    /// The category is chosen before the list is shown
    PickFirst,
    /// One category at a time, cycled with `/`
    Cycle,
}

/// A named, contiguous block of catalog entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub range: Range<usize>,
}

/// Ordered, optionally categorised list of powers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PowerCatalog {
    entries: Vec<PowerDescriptor>,
    categories: Vec<Category>,
    style: CategoryStyle,
}

impl PowerCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog from a flat list of entries
    pub fn from_entries(entries: Vec<PowerDescriptor>) -> Self {
        Self {
            entries,
            categories: Vec::new(),
            style: CategoryStyle::Flat,
        }
    }

    pub fn with_style(mut self, style: CategoryStyle) -> Self {
        self.style = style;
        self
    }

    pub fn push(&mut self, power: PowerDescriptor) {
        self.entries.push(power);
    }

    /// Append a category holding `powers`
    pub fn push_category(&mut self, name: impl Into<String>, powers: Vec<PowerDescriptor>) {
        let start = self.entries.len();
        self.entries.extend(powers);
        self.categories.push(Category {
            name: name.into(),
            range: start..self.entries.len(),
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PowerDescriptor> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[PowerDescriptor] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &PowerDescriptor> {
        self.entries.iter()
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn style(&self) -> CategoryStyle {
        if self.categories.len() > 1 {
            self.style
        } else {
            CategoryStyle::Flat
        }
    }

    /// Entries of one category (the whole catalog for `None`)
    pub fn view(&self, category: Option<usize>) -> Range<usize> {
        category
            .and_then(|c| self.categories.get(c))
            .map(|c| c.range.clone())
            .unwrap_or(0..self.entries.len())
    }

    /// Index of the category holding `index`
    pub fn category_of(&self, index: usize) -> Option<usize> {
        self.categories.iter().position(|c| c.range.contains(&index))
    }

    /// Whether any entry can be chosen right now
    pub fn has_choices(&self) -> bool {
        self.entries.iter().any(PowerDescriptor::is_ready)
    }

    /// Whether any entry of a range can be chosen right now
    pub fn has_choices_in(&self, range: Range<usize>) -> bool {
        self.entries
            .get(range)
            .is_some_and(|entries| entries.iter().any(PowerDescriptor::is_ready))
    }
}

/// One kind of selectable power, adapted to the generic selection machine
pub trait PowerSource {
    /// Key under which the last choice is remembered for repeats
    fn context(&self) -> RepeatContext;

    /// What one power is called ("spell", "power", ...)
    fn noun(&self) -> &'static str;

    /// What the player does with it ("cast", "use", ...)
    fn verb(&self) -> &'static str;

    /// Command character matched against `@<cmd><tag>` inscriptions
    fn command_key(&self) -> Option<char> {
        None
    }

    /// Build the catalog for the current player snapshot
    fn build_catalog(&self, player: &PlayerState) -> PowerCatalog;

    /// Short info column for a row ("dam 3d4", "heal 15")
    fn describe_row(&self, power: &PowerDescriptor, player: &PlayerState) -> String;

    /// Long description for the detail view and browsing
    fn description(&self, power: &PowerDescriptor) -> String {
        power.name.clone()
    }

    /// Message printed when nothing in the catalog can be chosen
    fn nothing_message(&self) -> String {
        format!("You have no {}s to {}.", self.noun(), self.verb())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn power(name: &str) -> PowerDescriptor {
        PowerDescriptor::new(name, 1, 1, 10, PowerExtra::BlueMagic { spell: 0 })
    }

    #[test]
    fn test_categories_and_views() {
        let mut catalog = PowerCatalog::new().with_style(CategoryStyle::PickFirst);
        catalog.push_category("bolt", vec![power("a"), power("b")]);
        catalog.push_category("ball", vec![power("c")]);
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.view(Some(1)), 2..3);
        assert_eq!(catalog.view(None), 0..3);
        assert_eq!(catalog.category_of(1), Some(0));
        assert_eq!(catalog.category_of(2), Some(1));
        assert_eq!(catalog.style(), CategoryStyle::PickFirst);
    }

    #[test]
    fn test_single_category_is_flat() {
        let mut catalog = PowerCatalog::new().with_style(CategoryStyle::Cycle);
        catalog.push_category("pack", vec![power("a")]);
        assert_eq!(catalog.style(), CategoryStyle::Flat);
    }

    #[test]
    fn test_has_choices() {
        let mut catalog = PowerCatalog::new();
        assert!(!catalog.has_choices());
        catalog.push(power("a").with_availability(Availability::Unknown));
        assert!(!catalog.has_choices());
        catalog.push(power("b"));
        assert!(catalog.has_choices());
        assert!(!catalog.has_choices_in(0..1));
        assert!(catalog.has_choices_in(1..2));
    }

    #[test]
    fn test_availability_labels() {
        assert_eq!(Availability::TooHard.to_string(), "difficult");
        assert!(Availability::TooHard.is_known());
        assert!(!Availability::Unknown.is_known());
    }
}
