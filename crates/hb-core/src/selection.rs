//! Selection state machine
//!
//! One machine drives every power menu. It is split in two layers:
//!
//! - [`SelectionMachine::step`] is pure: it takes one key, updates the
//!   cursor and reports a [`Transition`].
//! - [`SelectionMachine::run`] performs the effects a transition asks for
//!   (drawing, bells, the confirmation gate) against a [`Ui`].
//!
//! Typed mode picks entries by letter and shows the list on demand. Menu
//! mode keeps the list visible and moves a cursor. Catalogs with the
//! `PickFirst` style ask for a category before showing any power.

use std::ops::Range;

use crate::catalog::{Availability, CategoryStyle, PowerCatalog, PowerDescriptor, PowerSource};
use crate::chance::evaluate;
use crate::confirm::{capitalize, confirm_use};
use crate::errors::UiError;
use crate::io::{Color, Key, Ui};
use crate::options::{DEFAULT_PAGE_ROWS, MAX_PAGE_ROWS, UiOptions};
use crate::player::PlayerState;
use crate::render::{LIST_COL, LIST_ROW, list_height, page_count, render, split_rows};
use crate::repeat::RepeatShortcut;
use crate::tags::{index_to_label, label_to_index, resolve_key};

/// How keys pick entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavigationMode {
    /// Letters pick, the list is shown on request
    #[default]
    Typed,
    /// A cursor moves over an always-visible list
    Menu,
}

/// What the selection is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Purpose {
    #[default]
    Use,
    /// Read descriptions; never commits
    Browse,
}

/// Per-call configuration, sourced from the options by the dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionConfig {
    pub mode: NavigationMode,
    pub always_show_list: bool,
    pub purpose: Purpose,
    /// Reuse the last choice of this context without asking
    pub repeat: bool,
    pub page_rows: usize,
    /// Ask for confirmation after an inscription tag match
    pub confirm_tagged: bool,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            mode: NavigationMode::Typed,
            always_show_list: false,
            purpose: Purpose::Use,
            repeat: false,
            page_rows: DEFAULT_PAGE_ROWS,
            confirm_tagged: false,
        }
    }
}

impl SelectionConfig {
    pub fn from_options(options: &UiOptions) -> Self {
        Self {
            mode: options.navigation_mode(),
            always_show_list: options.always_show_list,
            purpose: Purpose::Use,
            repeat: false,
            page_rows: options.page_rows.clamp(1, MAX_PAGE_ROWS),
            confirm_tagged: options.confirm_tagged,
        }
    }

    pub fn with_mode(mut self, mode: NavigationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_purpose(mut self, purpose: Purpose) -> Self {
        self.purpose = purpose;
        self
    }

    pub fn with_repeat(mut self, repeat: bool) -> Self {
        self.repeat = repeat;
        self
    }
}

/// Outcome of a selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Catalog index of the chosen power
    Committed(usize),
    /// Escape, or the category prompt was left
    Cancelled,
    /// Nothing in the catalog can be chosen
    NoChoices,
}

/// Why a key was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    NoSuchLabel,
    OutOfRange,
    Unknown,
    TooHard,
    Forgotten,
    Exhausted,
    EmptyCategory,
}

impl Rejection {
    fn for_availability(availability: Availability) -> Option<Self> {
        match availability {
            Availability::Ready => None,
            Availability::TooHard => Some(Rejection::TooHard),
            Availability::Forgotten => Some(Rejection::Forgotten),
            Availability::Exhausted => Some(Rejection::Exhausted),
            Availability::Unknown | Availability::Illegible => Some(Rejection::Unknown),
        }
    }

    pub fn message(&self, noun: &str) -> String {
        match self {
            Rejection::NoSuchLabel => "Illegal choice.".to_string(),
            Rejection::OutOfRange => format!("There is no such {}.", noun),
            Rejection::Unknown => format!("You don't know that {}.", noun),
            Rejection::TooHard => format!("That {} is too difficult for you.", noun),
            Rejection::Forgotten => format!("You have forgotten that {}.", noun),
            Rejection::Exhausted => format!("That {} is exhausted.", noun),
            Rejection::EmptyCategory => format!("You have no {}s of that kind.", noun),
        }
    }
}

/// Transient UI state of one selection call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionCursor {
    /// Index within the visible view
    pub current_index: usize,
    pub current_page: usize,
    pub list_visible: bool,
    pub input_mode: NavigationMode,
    pub show_details: bool,
    /// Visible category, `None` for the whole catalog
    pub category: Option<usize>,
}

impl SelectionCursor {
    pub fn new(input_mode: NavigationMode, list_visible: bool) -> Self {
        Self {
            current_index: 0,
            current_page: 0,
            list_visible,
            input_mode,
            show_details: false,
            category: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Categories,
    Powers,
}

/// Result of feeding one key to the machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Nothing changed
    Stay,
    /// Cursor or list state changed; draw again
    Redraw,
    /// The typed-mode list was toggled off
    HideList,
    Reject(Rejection),
    /// A category was picked in the category prompt
    ChooseCategory(usize),
    /// An entry of the view was picked; `ask` requests confirmation
    Pick { index: usize, ask: bool },
    /// Browse purpose: show the description of an entry of the view
    Describe(usize),
    /// Escape inside a power list reached through the category prompt
    BackToCategories,
    Cancel,
}

/// The generic selection machine over one power source
pub struct SelectionMachine<'a, S: PowerSource + ?Sized> {
    source: &'a S,
    player: &'a PlayerState,
    catalog: PowerCatalog,
    config: SelectionConfig,
    cursor: SelectionCursor,
    phase: Phase,
}

impl<'a, S: PowerSource + ?Sized> SelectionMachine<'a, S> {
    /// Build the catalog for `player` and set up the initial state
    pub fn new(source: &'a S, player: &'a PlayerState, config: SelectionConfig) -> Self {
        let catalog = source.build_catalog(player);
        Self::with_catalog(source, player, catalog, config)
    }

    /// Machine over an already built catalog
    pub fn with_catalog(
        source: &'a S,
        player: &'a PlayerState,
        catalog: PowerCatalog,
        config: SelectionConfig,
    ) -> Self {
        let list_visible = config.mode == NavigationMode::Menu || config.always_show_list;
        let mut machine = Self {
            source,
            player,
            catalog,
            config,
            cursor: SelectionCursor::new(config.mode, list_visible),
            phase: Phase::Powers,
        };
        match machine.catalog.style() {
            CategoryStyle::Flat => machine.enter_category(None),
            CategoryStyle::Cycle => {
                let first = (0..machine.catalog.categories().len())
                    .find(|&c| machine.category_selectable(c))
                    .unwrap_or(0);
                machine.enter_category(Some(first));
            }
            CategoryStyle::PickFirst => machine.phase = Phase::Categories,
        }
        machine
    }

    pub fn catalog(&self) -> &PowerCatalog {
        &self.catalog
    }

    pub fn cursor(&self) -> &SelectionCursor {
        &self.cursor
    }

    /// Catalog range of the visible view
    pub fn view(&self) -> Range<usize> {
        self.catalog.view(self.cursor.category)
    }

    fn view_entries(&self) -> &[PowerDescriptor] {
        self.catalog.entries().get(self.view()).unwrap_or(&[])
    }

    fn page_rows(&self) -> usize {
        self.config.page_rows.clamp(1, MAX_PAGE_ROWS)
    }

    fn usable(&self, power: &PowerDescriptor) -> bool {
        match self.config.purpose {
            Purpose::Use => power.is_ready(),
            Purpose::Browse => power.availability.is_known(),
        }
    }

    /// Whether the selection can offer anything at all
    pub fn has_choices(&self) -> bool {
        self.catalog.iter().any(|p| self.usable(p))
    }

    fn category_selectable(&self, category: usize) -> bool {
        let range = self.catalog.view(Some(category));
        self.catalog
            .entries()
            .get(range)
            .is_some_and(|entries| entries.iter().any(|p| self.usable(p)))
    }

    fn enter_category(&mut self, category: Option<usize>) {
        self.cursor.category = category;
        self.phase = Phase::Powers;
        let first = self
            .view_entries()
            .iter()
            .position(|p| p.availability.is_known())
            .unwrap_or(0);
        self.set_index(first);
    }

    fn set_index(&mut self, index: usize) {
        self.cursor.current_index = index;
        self.cursor.current_page = index / self.page_rows();
    }

    /// Feed one key to the machine
    pub fn step(&mut self, key: Key) -> Transition {
        match self.phase {
            Phase::Categories => self.step_category(key),
            Phase::Powers => match self.cursor.input_mode {
                NavigationMode::Typed => self.step_typed(key),
                NavigationMode::Menu => self.step_menu(key),
            },
        }
    }

    fn step_category(&mut self, key: Key) -> Transition {
        let count = self.catalog.categories().len();
        let menu = self.cursor.input_mode == NavigationMode::Menu;
        match key {
            Key::Escape => Transition::Cancel,
            Key::Char('0') if menu => Transition::Cancel,
            Key::Up | Key::Char('k' | 'K' | '8') if menu && count > 0 => {
                self.cursor.current_index = (self.cursor.current_index + count - 1) % count;
                Transition::Redraw
            }
            Key::Down | Key::Char('j' | 'J' | '2') if menu && count > 0 => {
                self.cursor.current_index = (self.cursor.current_index + 1) % count;
                Transition::Redraw
            }
            Key::Enter | Key::Char('x' | 'X') if menu => self.choose_category(self.cursor.current_index),
            Key::Char(c) => match label_to_index(c.to_ascii_lowercase()) {
                Some(category) if category < count => self.choose_category(category),
                Some(_) => Transition::Reject(Rejection::OutOfRange),
                None => Transition::Reject(Rejection::NoSuchLabel),
            },
            _ => Transition::Reject(Rejection::NoSuchLabel),
        }
    }

    fn choose_category(&mut self, category: usize) -> Transition {
        if !self.category_selectable(category) {
            return Transition::Reject(Rejection::EmptyCategory);
        }
        self.enter_category(Some(category));
        Transition::ChooseCategory(category)
    }

    fn leave(&self) -> Transition {
        if self.catalog.style() == CategoryStyle::PickFirst {
            Transition::BackToCategories
        } else {
            Transition::Cancel
        }
    }

    fn step_typed(&mut self, key: Key) -> Transition {
        match key {
            Key::Escape => self.leave(),
            Key::Char(' ' | '*' | '?') => {
                self.cursor.list_visible = !self.cursor.list_visible;
                if self.cursor.list_visible {
                    Transition::Redraw
                } else {
                    Transition::HideList
                }
            }
            Key::Char('/') if self.catalog.style() == CategoryStyle::Cycle => self.cycle_category(),
            Key::Char('!') => self.toggle_details(),
            Key::Char(c) => self.pick_by_key(c),
            _ => Transition::Reject(Rejection::NoSuchLabel),
        }
    }

    fn step_menu(&mut self, key: Key) -> Transition {
        let pages = page_count(self.view_entries().len(), self.page_rows());
        match key {
            Key::Escape | Key::Char('0') => self.leave(),
            Key::Up | Key::Char('k' | 'K' | '8') => self.move_vertical(false),
            Key::Down | Key::Char('j' | 'J' | '2') => self.move_vertical(true),
            Key::Left | Key::PageUp | Key::Char('h' | 'H' | '4') => self.move_page(false),
            Key::Right | Key::PageDown | Key::Char('l' | 'L' | '6') => self.move_page(true),
            Key::Enter | Key::Char('x' | 'X') => self.pick_index(self.cursor.current_index, false),
            Key::Char(' ' | '*' | '?') if pages > 1 => self.move_page(true),
            Key::Char(' ' | '*' | '?') => Transition::Stay,
            Key::Char('/') if self.catalog.style() == CategoryStyle::Cycle => self.cycle_category(),
            Key::Char('!') => self.toggle_details(),
            Key::Char(c) => self.pick_by_key(c),
        }
    }

    fn toggle_details(&mut self) -> Transition {
        self.cursor.show_details = !self.cursor.show_details;
        self.cursor.list_visible = true;
        Transition::Redraw
    }

    fn cycle_category(&mut self) -> Transition {
        let count = self.catalog.categories().len();
        if count < 2 {
            return Transition::Stay;
        }
        let current = self.cursor.category.unwrap_or(0);
        let next = (1..count)
            .map(|step| (current + step) % count)
            .find(|&c| !self.catalog.view(Some(c)).is_empty())
            .unwrap_or(current);
        self.enter_category(Some(next));
        Transition::Redraw
    }

    /// Up/Down with wraparound, passing over entries the player does not know
    fn move_vertical(&mut self, down: bool) -> Transition {
        let entries = self.view_entries();
        let len = entries.len();
        if len == 0 {
            return Transition::Stay;
        }
        let current = self.cursor.current_index.min(len - 1);
        let step = |i: usize| if down { (i + 1) % len } else { (i + len - 1) % len };

        let mut next = step(current);
        while next != current && !entries[next].availability.is_known() {
            next = step(next);
        }
        if next == current {
            // No other known entry: plain move
            next = step(current);
        }
        self.set_index(next);
        Transition::Redraw
    }

    /// Left/Right: one page with wraparound, or first/last known entry
    fn move_page(&mut self, forward: bool) -> Transition {
        let entries = self.view_entries();
        let len = entries.len();
        if len == 0 {
            return Transition::Stay;
        }
        let rows = self.page_rows();
        let pages = page_count(len, rows);

        if pages == 1 {
            let known = |p: &PowerDescriptor| p.availability.is_known();
            let target = if forward {
                entries.iter().rposition(known)
            } else {
                entries.iter().position(known)
            };
            self.set_index(target.unwrap_or(if forward { len - 1 } else { 0 }));
            return Transition::Redraw;
        }

        let page = if forward {
            (self.cursor.current_page + 1) % pages
        } else {
            (self.cursor.current_page + pages - 1) % pages
        };
        let offset = self.cursor.current_index % rows;
        self.cursor.current_index = (page * rows + offset).min(len - 1);
        self.cursor.current_page = page;
        Transition::Redraw
    }

    fn pick_by_key(&mut self, c: char) -> Transition {
        let upper = c.is_ascii_uppercase();
        let c = c.to_ascii_lowercase();
        let command = self.source.command_key();
        match resolve_key(c, self.view_entries(), command) {
            Some(m) => {
                let ask = upper || (m.by_tag && self.config.confirm_tagged);
                self.pick_index(m.index, ask)
            }
            None if label_to_index(c).is_some() => Transition::Reject(Rejection::OutOfRange),
            None => Transition::Reject(Rejection::NoSuchLabel),
        }
    }

    fn pick_index(&mut self, index: usize, ask: bool) -> Transition {
        let Some(power) = self.view_entries().get(index) else {
            return Transition::Reject(Rejection::OutOfRange);
        };
        let availability = power.availability;
        match self.config.purpose {
            Purpose::Browse if availability.is_known() => {
                self.set_index(index);
                Transition::Describe(index)
            }
            Purpose::Browse => Transition::Reject(Rejection::Unknown),
            Purpose::Use => match Rejection::for_availability(availability) {
                Some(rejection) => Transition::Reject(rejection),
                None => {
                    self.set_index(index);
                    Transition::Pick { index, ask }
                }
            },
        }
    }

    fn prompt_text(&self) -> String {
        let noun = self.source.noun();
        let verb = self.source.verb();
        match self.phase {
            Phase::Categories => {
                let kinds: Vec<String> = self
                    .catalog
                    .categories()
                    .iter()
                    .enumerate()
                    .map(|(i, c)| format!("{}) {}", index_to_label(i).unwrap_or('?'), c.name))
                    .collect();
                format!("Which kind of {}? [{}] ", noun, kinds.join(", "))
            }
            Phase::Powers => {
                let last = self.view_entries().len().saturating_sub(1);
                let range = format!("a-{}", index_to_label(last.min(35)).unwrap_or('a'));
                let cycle = match self.catalog.style() {
                    CategoryStyle::Cycle => {
                        let count = self.catalog.categories().len();
                        let next = (self.cursor.category.unwrap_or(0) + 1) % count.max(1);
                        self.catalog
                            .categories()
                            .get(next)
                            .map(|c| format!(" / for {},", c.name))
                            .unwrap_or_default()
                    }
                    _ => String::new(),
                };
                match (self.cursor.input_mode, self.config.purpose) {
                    (NavigationMode::Menu, Purpose::Use) => format!(
                        "({}s {},{} x=select, ESC=exit) {} which {}? ",
                        noun, range, cycle, capitalize(verb), noun
                    ),
                    (NavigationMode::Typed, Purpose::Use) => format!(
                        "({}s {},{} *=List, ESC=exit) {} which {}? ",
                        noun, range, cycle, capitalize(verb), noun
                    ),
                    (_, Purpose::Browse) => format!(
                        "({}s {},{} ESC=exit) Browse which {}? ",
                        noun, range, cycle, noun
                    ),
                }
            }
        }
    }

    /// Run the interactive loop until a commit or cancellation
    pub fn run<U: Ui + ?Sized>(
        &mut self,
        ui: &mut U,
        repeats: &mut RepeatShortcut,
    ) -> Result<Selection, UiError> {
        let context = self.source.context();

        if self.catalog.is_empty() || !self.has_choices() {
            tracing::debug!(%context, "no choices");
            return Ok(Selection::NoChoices);
        }

        if self.config.repeat && self.config.purpose == Purpose::Use {
            if let Some(index) = repeats.try_repeat(context) {
                if self.catalog.get(index).is_some_and(PowerDescriptor::is_ready) {
                    tracing::info!(%context, index, "repeating last choice");
                    repeats.record_choice(context, index);
                    return Ok(Selection::Committed(index));
                }
            }
        }

        let mut overlay = Overlay::default();
        let result = self.run_loop(ui, repeats, &mut overlay);
        overlay.close(ui)?;
        result
    }

    fn run_loop<U: Ui + ?Sized>(
        &mut self,
        ui: &mut U,
        repeats: &mut RepeatShortcut,
        overlay: &mut Overlay,
    ) -> Result<Selection, UiError> {
        let context = self.source.context();
        let mut redraw = true;

        loop {
            if redraw {
                self.draw(ui, overlay)?;
                redraw = false;
            }
            ui.prompt(&self.prompt_text())?;
            let key = ui.read_key()?;

            match self.step(key) {
                Transition::Stay => {}
                Transition::Redraw | Transition::ChooseCategory(_) => redraw = true,
                Transition::HideList => overlay.close(ui)?,
                Transition::Reject(rejection) => {
                    tracing::debug!(%context, ?key, ?rejection, "rejected key");
                    ui.ring_bell()?;
                    ui.message(&rejection.message(self.source.noun()))?;
                }
                Transition::Describe(index) => {
                    if let Some(power) = self.view_entries().get(index) {
                        ui.message(&self.source.description(power))?;
                    }
                    redraw = true;
                }
                Transition::BackToCategories => {
                    self.phase = Phase::Categories;
                    self.cursor.category = None;
                    self.cursor.current_index = 0;
                    self.cursor.current_page = 0;
                    overlay.close(ui)?;
                    redraw = true;
                }
                Transition::Cancel => {
                    tracing::debug!(%context, "selection cancelled");
                    return Ok(Selection::Cancelled);
                }
                Transition::Pick { index, ask } => {
                    let absolute = self.view().start + index;
                    let Some(power) = self.catalog.get(absolute) else {
                        continue;
                    };
                    if ask {
                        let chance = evaluate(power, self.player);
                        if !confirm_use(self.source, power, &chance, ui)? {
                            redraw = true;
                            continue;
                        }
                    }
                    tracing::info!(%context, index = absolute, power = %power.name, "selection committed");
                    repeats.record_choice(context, absolute);
                    return Ok(Selection::Committed(absolute));
                }
            }
        }
    }

    fn draw<U: Ui + ?Sized>(&self, ui: &mut U, overlay: &mut Overlay) -> Result<(), UiError> {
        let show = match self.phase {
            Phase::Categories => self.cursor.input_mode == NavigationMode::Menu,
            Phase::Powers => self.cursor.list_visible,
        };
        if !show {
            return Ok(());
        }

        overlay.open(ui)?;
        let rows = split_rows(self.view_entries().len(), self.page_rows());
        ui.clear_region(LIST_ROW, LIST_COL.saturating_sub(1), list_height(rows))?;

        match self.phase {
            Phase::Categories => {
                for (i, category) in self.catalog.categories().iter().enumerate() {
                    let marker = if i == self.cursor.current_index { "> " } else { "  " };
                    let color = if self.category_selectable(i) {
                        Color::White
                    } else {
                        Color::Slate
                    };
                    let text = format!(
                        "{}{}) {}",
                        marker,
                        index_to_label(i).unwrap_or('?'),
                        category.name
                    );
                    let row = LIST_ROW + 1 + u16::try_from(i).unwrap_or(0);
                    ui.put_text(row, LIST_COL, &text, color)?;
                }
            }
            Phase::Powers => {
                let lines = render(
                    self.source,
                    &self.catalog,
                    &self.cursor,
                    self.player,
                    self.page_rows(),
                );
                for line in &lines {
                    ui.put_text(line.row, line.col, &line.text, line.color)?;
                }
            }
        }
        Ok(())
    }
}

/// Tracks whether the list overlay is on screen
#[derive(Debug, Default)]
struct Overlay {
    saved: bool,
}

impl Overlay {
    fn open<U: Ui + ?Sized>(&mut self, ui: &mut U) -> Result<(), UiError> {
        if !self.saved {
            ui.save_screen()?;
            self.saved = true;
        }
        Ok(())
    }

    fn close<U: Ui + ?Sized>(&mut self, ui: &mut U) -> Result<(), UiError> {
        if self.saved {
            ui.restore_screen()?;
            self.saved = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{BlueMagicSource, PowerExtra};
    use crate::player::{PlayerClass, Race};
    use crate::testing::ScriptedUi;

    fn player() -> PlayerState {
        let mut p = PlayerState::new("Tester", PlayerClass::BlueMage, Race::Human);
        p.level = 5;
        p.csp = 20;
        p.msp = 20;
        p
    }

    fn power(name: &str, availability: Availability) -> PowerDescriptor {
        PowerDescriptor::new(name, 1, 1, 10, PowerExtra::BlueMagic { spell: 0 })
            .with_availability(availability)
    }

    fn flat(entries: Vec<PowerDescriptor>) -> PowerCatalog {
        PowerCatalog::from_entries(entries)
    }

    fn machine<'a>(
        player: &'a PlayerState,
        catalog: PowerCatalog,
        mode: NavigationMode,
    ) -> SelectionMachine<'a, BlueMagicSource> {
        let config = SelectionConfig::default().with_mode(mode);
        SelectionMachine::with_catalog(&BlueMagicSource, player, catalog, config)
    }

    fn abc() -> PowerCatalog {
        flat(vec![
            power("a", Availability::Ready),
            power("b", Availability::Unknown),
            power("c", Availability::Ready),
        ])
    }

    #[test]
    fn test_typed_lowercase_picks_without_asking() {
        let p = player();
        let mut m = machine(&p, abc(), NavigationMode::Typed);
        assert_eq!(m.step(Key::Char('c')), Transition::Pick { index: 2, ask: false });
    }

    #[test]
    fn test_typed_uppercase_asks() {
        let p = player();
        let mut m = machine(&p, abc(), NavigationMode::Typed);
        assert_eq!(m.step(Key::Char('A')), Transition::Pick { index: 0, ask: true });
    }

    #[test]
    fn test_typed_rejections() {
        let p = player();
        let mut m = machine(&p, abc(), NavigationMode::Typed);
        assert_eq!(m.step(Key::Char('b')), Transition::Reject(Rejection::Unknown));
        assert_eq!(m.step(Key::Char('z')), Transition::Reject(Rejection::OutOfRange));
        assert_eq!(m.step(Key::Char('#')), Transition::Reject(Rejection::NoSuchLabel));
        assert_eq!(m.step(Key::Up), Transition::Reject(Rejection::NoSuchLabel));
    }

    #[test]
    fn test_typed_list_toggle() {
        let p = player();
        let mut m = machine(&p, abc(), NavigationMode::Typed);
        assert!(!m.cursor().list_visible);
        assert_eq!(m.step(Key::Char('*')), Transition::Redraw);
        assert!(m.cursor().list_visible);
        assert_eq!(m.step(Key::Char(' ')), Transition::HideList);
        assert!(!m.cursor().list_visible);
        assert_eq!(m.step(Key::Char('!')), Transition::Redraw);
        assert!(m.cursor().list_visible && m.cursor().show_details);
        assert_eq!(m.step(Key::Escape), Transition::Cancel);
    }

    #[test]
    fn test_menu_moves_skip_unknown_and_wrap() {
        let p = player();
        let mut m = machine(&p, abc(), NavigationMode::Menu);
        assert!(m.cursor().list_visible);
        assert_eq!(m.cursor().current_index, 0);
        m.step(Key::Down);
        assert_eq!(m.cursor().current_index, 2);
        m.step(Key::Char('j'));
        assert_eq!(m.cursor().current_index, 0);
        m.step(Key::Up);
        assert_eq!(m.cursor().current_index, 2);
        m.step(Key::Char('8'));
        assert_eq!(m.cursor().current_index, 0);
    }

    #[test]
    fn test_menu_move_without_other_known_entry() {
        let p = player();
        let catalog = flat(vec![
            power("a", Availability::Ready),
            power("b", Availability::Unknown),
        ]);
        let mut m = machine(&p, catalog, NavigationMode::Menu);
        m.step(Key::Down);
        assert_eq!(m.cursor().current_index, 1);
    }

    #[test]
    fn test_menu_commit_never_asks() {
        let p = player();
        let mut m = machine(&p, abc(), NavigationMode::Menu);
        m.step(Key::Down);
        assert_eq!(m.step(Key::Char('x')), Transition::Pick { index: 2, ask: false });
        assert_eq!(m.step(Key::Enter), Transition::Pick { index: 2, ask: false });
        assert_eq!(m.step(Key::Char('C')), Transition::Pick { index: 2, ask: true });
        assert_eq!(m.step(Key::Char('0')), Transition::Cancel);
    }

    #[test]
    fn test_menu_single_page_left_right() {
        let p = player();
        let catalog = flat(vec![
            power("a", Availability::Unknown),
            power("b", Availability::Ready),
            power("c", Availability::TooHard),
            power("d", Availability::Unknown),
        ]);
        let mut m = machine(&p, catalog, NavigationMode::Menu);
        assert_eq!(m.cursor().current_index, 1);
        m.step(Key::Right);
        assert_eq!(m.cursor().current_index, 2);
        m.step(Key::Left);
        assert_eq!(m.cursor().current_index, 1);
        assert_eq!(m.step(Key::Char('*')), Transition::Stay);
    }

    #[test]
    fn test_menu_paging_wraps() {
        let p = player();
        let entries = (0..5).map(|i| power(&i.to_string(), Availability::Ready)).collect();
        let mut config = SelectionConfig::default().with_mode(NavigationMode::Menu);
        config.page_rows = 2;
        let mut m = SelectionMachine::with_catalog(&BlueMagicSource, &p, flat(entries), config);
        m.step(Key::Down);
        m.step(Key::Right);
        assert_eq!((m.cursor().current_page, m.cursor().current_index), (1, 3));
        m.step(Key::Char(' '));
        assert_eq!((m.cursor().current_page, m.cursor().current_index), (2, 4));
        m.step(Key::PageDown);
        assert_eq!((m.cursor().current_page, m.cursor().current_index), (0, 0));
        m.step(Key::Left);
        assert_eq!(m.cursor().current_page, 2);
    }

    #[test]
    fn test_pick_first_categories() {
        let p = player();
        let mut catalog = PowerCatalog::new().with_style(CategoryStyle::PickFirst);
        catalog.push_category("bolt", vec![power("missile", Availability::Unknown)]);
        catalog.push_category("ball", vec![power("cloud", Availability::Ready)]);
        let mut m = machine(&p, catalog, NavigationMode::Typed);
        assert_eq!(m.step(Key::Char('a')), Transition::Reject(Rejection::EmptyCategory));
        assert_eq!(m.step(Key::Char('c')), Transition::Reject(Rejection::OutOfRange));
        assert_eq!(m.step(Key::Char('b')), Transition::ChooseCategory(1));
        assert_eq!(m.view(), 1..2);
        assert_eq!(m.step(Key::Escape), Transition::BackToCategories);
    }

    #[test]
    fn test_cycle_categories() {
        let p = player();
        let mut catalog = PowerCatalog::new().with_style(CategoryStyle::Cycle);
        catalog.push_category("Inventory", vec![power("a", Availability::Ready)]);
        catalog.push_category("Floor", vec![power("b", Availability::Ready), power("c", Availability::Ready)]);
        let mut m = machine(&p, catalog, NavigationMode::Typed);
        assert_eq!(m.cursor().category, Some(0));
        assert_eq!(m.step(Key::Char('/')), Transition::Redraw);
        assert_eq!(m.cursor().category, Some(1));
        assert_eq!(m.step(Key::Char('b')), Transition::Pick { index: 1, ask: false });
        m.step(Key::Char('/'));
        assert_eq!(m.cursor().category, Some(0));
        assert_eq!(m.step(Key::Escape), Transition::Cancel);
    }

    #[test]
    fn test_browse_describes_known_entries() {
        let p = player();
        let catalog = flat(vec![
            power("a", Availability::TooHard),
            power("b", Availability::Unknown),
        ]);
        let config = SelectionConfig::default().with_purpose(Purpose::Browse);
        let mut m = SelectionMachine::with_catalog(&BlueMagicSource, &p, catalog, config);
        assert!(m.has_choices());
        assert_eq!(m.step(Key::Char('a')), Transition::Describe(0));
        assert_eq!(m.step(Key::Char('b')), Transition::Reject(Rejection::Unknown));
    }

    #[test]
    fn test_run_no_choices_draws_nothing() {
        let p = player();
        let mut ui = ScriptedUi::new();
        let mut repeats = RepeatShortcut::new();
        let mut m = machine(&p, flat(Vec::new()), NavigationMode::Menu);
        assert_eq!(m.run(&mut ui, &mut repeats).unwrap(), Selection::NoChoices);
        let mut m = machine(&p, flat(vec![power("x", Availability::Unknown)]), NavigationMode::Menu);
        assert_eq!(m.run(&mut ui, &mut repeats).unwrap(), Selection::NoChoices);
        assert!(ui.puts.is_empty());
        assert!(ui.prompts.is_empty());
        assert_eq!(ui.saves, 0);
    }

    #[test]
    fn test_run_declined_confirmation_returns_to_menu() {
        let p = player();
        let mut ui = ScriptedUi::new()
            .with_keys([Key::Char('A'), Key::Char('A')])
            .with_confirms([false, true]);
        let mut repeats = RepeatShortcut::new();
        let mut m = machine(&p, abc(), NavigationMode::Typed);
        assert_eq!(m.run(&mut ui, &mut repeats).unwrap(), Selection::Committed(0));
        assert_eq!(ui.confirm_prompts.len(), 2);
        assert_eq!(repeats.try_repeat(BlueMagicSource.context()), Some(0));
    }

    #[test]
    fn test_run_rejection_rings_bell() {
        let p = player();
        let mut ui = ScriptedUi::new().with_keys([Key::Char('b'), Key::Escape]);
        let mut repeats = RepeatShortcut::new();
        let mut m = machine(&p, abc(), NavigationMode::Typed);
        assert_eq!(m.run(&mut ui, &mut repeats).unwrap(), Selection::Cancelled);
        assert_eq!(ui.bells, 1);
        assert_eq!(ui.messages, ["You don't know that blue magic."]);
        assert!(repeats.is_empty());
    }

    #[test]
    fn test_run_restores_screen() {
        let p = player();
        let mut ui = ScriptedUi::new().with_keys([Key::Down, Key::Char('x')]);
        let mut repeats = RepeatShortcut::new();
        let mut m = machine(&p, abc(), NavigationMode::Menu);
        assert_eq!(m.run(&mut ui, &mut repeats).unwrap(), Selection::Committed(2));
        assert_eq!(ui.saves, 1);
        assert_eq!(ui.restores, 1);
        assert!(ui.confirm_prompts.is_empty());
    }

    #[test]
    fn test_run_repeat_skips_the_loop() {
        let p = player();
        let mut ui = ScriptedUi::new();
        let mut repeats = RepeatShortcut::new();
        repeats.record_choice(BlueMagicSource.context(), 2);
        let config = SelectionConfig::default().with_repeat(true);
        let mut m = SelectionMachine::with_catalog(&BlueMagicSource, &p, abc(), config);
        assert_eq!(m.run(&mut ui, &mut repeats).unwrap(), Selection::Committed(2));
        assert!(ui.prompts.is_empty());

        // A stale index falls back to the menu
        repeats.record_choice(BlueMagicSource.context(), 1);
        let mut ui = ScriptedUi::new().with_keys([Key::Escape]);
        let mut m = SelectionMachine::with_catalog(&BlueMagicSource, &p, abc(), config);
        assert_eq!(m.run(&mut ui, &mut repeats).unwrap(), Selection::Cancelled);
    }

    #[test]
    fn test_run_pick_first_escape_returns_to_categories() {
        let p = player();
        let mut catalog = PowerCatalog::new().with_style(CategoryStyle::PickFirst);
        catalog.push_category("bolt", vec![power("missile", Availability::Ready)]);
        catalog.push_category("ball", vec![power("cloud", Availability::Ready)]);
        let mut ui = ScriptedUi::new().with_keys([
            Key::Char('a'),
            Key::Escape,
            Key::Char('b'),
            Key::Char('a'),
        ]);
        let mut repeats = RepeatShortcut::new();
        let mut m = machine(&p, catalog, NavigationMode::Typed);
        assert_eq!(m.run(&mut ui, &mut repeats).unwrap(), Selection::Committed(1));
        assert!(ui.prompts[0].starts_with("Which kind of blue magic?"));
    }
}
