//! Item prompts over the pack, equipment and floor
//!
//! Each location is a category; `/` switches between them. Items carry
//! the player's inscriptions so `@q1`-style tags can pick them directly.

use strum::IntoEnumIterator;

use super::{CategoryStyle, PowerCatalog, PowerDescriptor, PowerExtra, PowerSource, Resource};
use crate::player::{Item, ItemKind, ItemLocation, PlayerState};
use crate::repeat::RepeatContext;

/// Which items an item prompt accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemTester {
    Any,
    Kind(ItemKind),
    /// Staffs, wands and rods
    Device,
    Wearable,
}

impl ItemTester {
    pub fn accepts(&self, item: &Item) -> bool {
        match self {
            ItemTester::Any => true,
            ItemTester::Kind(kind) => item.kind == *kind,
            ItemTester::Device => matches!(item.kind, ItemKind::Staff | ItemKind::Wand | ItemKind::Rod),
            ItemTester::Wearable => matches!(
                item.kind,
                ItemKind::Weapon | ItemKind::Armour | ItemKind::Ring | ItemKind::Amulet | ItemKind::Light
            ),
        }
    }
}

/// Items one command can act on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemSource {
    pub command: char,
    pub tester: ItemTester,
}

impl ItemSource {
    pub fn new(command: char, tester: ItemTester) -> Self {
        Self { command, tester }
    }

    /// Source for one of the standard item commands
    pub fn for_command(command: char) -> Self {
        let tester = match command {
            'q' => ItemTester::Kind(ItemKind::Potion),
            'r' => ItemTester::Kind(ItemKind::Scroll),
            'E' => ItemTester::Kind(ItemKind::Food),
            'u' => ItemTester::Kind(ItemKind::Staff),
            'a' => ItemTester::Kind(ItemKind::Wand),
            'z' => ItemTester::Kind(ItemKind::Rod),
            'w' => ItemTester::Wearable,
            _ => ItemTester::Any,
        };
        Self::new(command, tester)
    }
}

impl PowerSource for ItemSource {
    fn context(&self) -> RepeatContext {
        RepeatContext::Item(self.command)
    }

    fn noun(&self) -> &'static str {
        "item"
    }

    fn verb(&self) -> &'static str {
        match self.command {
            'q' => "quaff",
            'r' => "read",
            'E' => "eat",
            'a' => "aim",
            'z' => "zap",
            'w' => "wear",
            _ => "use",
        }
    }

    fn command_key(&self) -> Option<char> {
        Some(self.command)
    }

    fn build_catalog(&self, player: &PlayerState) -> PowerCatalog {
        let mut catalog = PowerCatalog::new().with_style(CategoryStyle::Cycle);
        for location in ItemLocation::iter() {
            let powers: Vec<_> = player
                .items(location)
                .iter()
                .enumerate()
                .filter(|(_, item)| self.tester.accepts(item))
                .map(|(slot, item)| {
                    PowerDescriptor::new(
                        item.display_name(),
                        item.level,
                        0,
                        0,
                        PowerExtra::Item { location, slot },
                    )
                    .paid_with(Resource::Nothing)
                    .with_inscription(item.inscription.clone())
                })
                .collect();
            if !powers.is_empty() {
                catalog.push_category(location.to_string(), powers);
            }
        }
        catalog
    }

    fn describe_row(&self, power: &PowerDescriptor, player: &PlayerState) -> String {
        match power.extra {
            PowerExtra::Item { location, slot } => player
                .items(location)
                .get(slot)
                .map(|item| item.kind.to_string())
                .unwrap_or_default(),
            _ => String::new(),
        }
    }

    fn nothing_message(&self) -> String {
        format!("You have nothing to {}.", self.verb())
    }
}
