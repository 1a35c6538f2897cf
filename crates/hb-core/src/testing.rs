//! Test doubles for the terminal and the game
//!
//! `ScriptedUi` plays back a queue of keys and yes/no answers and records
//! everything the engine shows. `CountingGame` wraps a [`Session`] and counts
//! the effects the dispatcher applies.

use std::collections::VecDeque;

use crate::catalog::{DeviceKind, PowerDescriptor, Realm, Resource};
use crate::errors::UiError;
use crate::game::{GameState, OverExertion, Session};
use crate::io::{Color, Display, Input, Key};
use crate::player::{EatenDevice, PlayerClass, PlayerState, Race, SpellKnowledge, Stat};

/// A scripted terminal
#[derive(Debug, Default)]
pub struct ScriptedUi {
    keys: VecDeque<Key>,
    confirms: VecDeque<bool>,
    lines: VecDeque<Option<String>>,

    pub bells: usize,
    pub prompts: Vec<String>,
    pub messages: Vec<String>,
    pub confirm_prompts: Vec<String>,
    pub puts: Vec<(u16, u16, String, Color)>,
    pub clears: usize,
    pub saves: usize,
    pub restores: usize,
}

impl ScriptedUi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_keys(mut self, keys: impl IntoIterator<Item = Key>) -> Self {
        self.keys.extend(keys);
        self
    }

    /// Queue typed characters
    pub fn with_text(self, text: &str) -> Self {
        self.with_keys(text.chars().map(Key::Char))
    }

    pub fn with_confirms(mut self, answers: impl IntoIterator<Item = bool>) -> Self {
        self.confirms.extend(answers);
        self
    }

    pub fn with_lines(mut self, lines: impl IntoIterator<Item = Option<String>>) -> Self {
        self.lines.extend(lines);
        self
    }

    /// Keys not consumed yet
    pub fn pending_keys(&self) -> usize {
        self.keys.len()
    }

    /// Whether any put text contains `needle`
    pub fn shown(&self, needle: &str) -> bool {
        self.puts.iter().any(|(_, _, text, _)| text.contains(needle))
    }
}

impl Input for ScriptedUi {
    fn read_key(&mut self) -> Result<Key, UiError> {
        self.keys.pop_front().ok_or(UiError::InputClosed)
    }

    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, UiError> {
        self.prompts.push(prompt.to_string());
        self.lines.pop_front().ok_or(UiError::InputClosed)
    }

    fn confirm(&mut self, prompt: &str) -> Result<bool, UiError> {
        self.confirm_prompts.push(prompt.to_string());
        self.confirms.pop_front().ok_or(UiError::InputClosed)
    }
}

impl Display for ScriptedUi {
    fn clear_region(&mut self, _row: u16, _col: u16, _rows: u16) -> Result<(), UiError> {
        self.clears += 1;
        Ok(())
    }

    fn put_text(&mut self, row: u16, col: u16, text: &str, color: Color) -> Result<(), UiError> {
        self.puts.push((row, col, text.to_string(), color));
        Ok(())
    }

    fn save_screen(&mut self) -> Result<(), UiError> {
        self.saves += 1;
        Ok(())
    }

    fn restore_screen(&mut self) -> Result<(), UiError> {
        self.restores += 1;
        Ok(())
    }

    fn ring_bell(&mut self) -> Result<(), UiError> {
        self.bells += 1;
        Ok(())
    }

    fn prompt(&mut self, text: &str) -> Result<(), UiError> {
        self.prompts.push(text.to_string());
        Ok(())
    }

    fn message(&mut self, text: &str) -> Result<(), UiError> {
        self.messages.push(text.to_string());
        Ok(())
    }
}

/// A session that counts every effect applied to it
#[derive(Debug, Clone)]
pub struct CountingGame {
    pub session: Session,
    pub spends: Vec<(Resource, i32)>,
    pub turns: usize,
    pub exertions: Vec<OverExertion>,
    pub uses: Vec<(String, bool)>,
}

impl CountingGame {
    pub fn new(player: PlayerState) -> Self {
        Self {
            session: Session::new(player),
            spends: Vec::new(),
            turns: 0,
            exertions: Vec::new(),
            uses: Vec::new(),
        }
    }

    /// No cost was paid and no time passed
    pub fn untouched(&self) -> bool {
        self.spends.is_empty() && self.turns == 0 && self.exertions.is_empty() && self.uses.is_empty()
    }
}

impl GameState for CountingGame {
    fn player(&self) -> &PlayerState {
        &self.session.player
    }

    fn spend(&mut self, resource: Resource, amount: i32) {
        self.spends.push((resource, amount));
        self.session.spend(resource, amount);
    }

    fn take_turn(&mut self, energy: i32) {
        self.turns += 1;
        self.session.take_turn(energy);
    }

    fn over_exert(&mut self, penalty: &OverExertion) {
        self.exertions.push(*penalty);
        self.session.over_exert(penalty);
    }

    fn record_use(&mut self, power: &PowerDescriptor, success: bool) {
        self.uses.push((power.name.clone(), success));
        self.session.record_use(power, success);
    }
}

/// Level 30 sorcerer knowing the first book of Sorcery
pub fn sample_mage() -> PlayerState {
    let mut p = PlayerState::new("Sample Mage", PlayerClass::Mage, Race::Elf);
    p.level = 30;
    p.stats.set(Stat::Intelligence, 23);
    p.csp = 40;
    p.msp = 40;
    p.chp = 120;
    p.mhp = 120;
    let mut sorcery = SpellKnowledge::new(Realm::Sorcery);
    for index in 0..8 {
        sorcery.learn(index);
    }
    p.spells.push(sorcery);
    p
}

/// Level 20 blue mage knowing a few bolts and balls
pub fn sample_blue_mage() -> PlayerState {
    let mut p = PlayerState::new("Sample Blue Mage", PlayerClass::BlueMage, Race::Human);
    p.level = 20;
    p.stats.set(Stat::Intelligence, 18);
    p.csp = 30;
    p.msp = 30;
    for index in [1, 2, 3, 10, 11] {
        p.learn_blue_spell(index);
    }
    p
}

/// Level 15 magic-eater with one of each device kind
pub fn sample_magic_eater() -> PlayerState {
    let mut p = PlayerState::new("Sample Eater", PlayerClass::MagicEater, Race::Gnome);
    p.level = 15;
    p.stats.set(Stat::Intelligence, 17);
    p.devices = vec![
        EatenDevice {
            kind: DeviceKind::Staff,
            name: "Detect Evil".to_string(),
            level: 5,
            charges: 3,
            recharging: 0,
        },
        EatenDevice {
            kind: DeviceKind::Wand,
            name: "Magic Missile".to_string(),
            level: 3,
            charges: 0,
            recharging: 0,
        },
        EatenDevice {
            kind: DeviceKind::Rod,
            name: "Illumination".to_string(),
            level: 20,
            charges: 1,
            recharging: 0,
        },
    ];
    p
}
