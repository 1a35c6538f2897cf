//! Application state and command routing
//!
//! Routes top-level keys to the power dispatcher. Every power command
//! goes through the same selection engine; only the source differs.

use std::path::PathBuf;

use hb_core::catalog::{
    BlueMagicSource, ItemSource, MagicEaterSource, PowerSource, RacialSource, Realm, SmithSource,
    SpellSource,
};
use hb_core::dispatch::{Dispatcher, TURN_ENERGY, UseOutcome};
use hb_core::errors::UiError;
use hb_core::game::{GameState, Session};
use hb_core::io::{Color, Key, Ui};
use hb_core::player::PlayerClass;
use hb_core::tags::{index_to_label, label_to_index};

use crate::input::{Command, key_to_command};

/// Screen row of the status line
pub const STATUS_ROW: u16 = 23;

/// Main application state
pub struct App {
    session: Session,
    dispatcher: Dispatcher,
    /// Last power command, for `n`
    last: Option<Command>,
    /// Spellbook of the last cast
    last_book: Option<u8>,
    options_path: Option<PathBuf>,
    quit: bool,
}

impl App {
    pub fn new(session: Session, dispatcher: Dispatcher) -> Self {
        Self {
            session,
            dispatcher,
            last: None,
            last_book: None,
            options_path: None,
            quit: false,
        }
    }

    /// Where toggled options are written back
    pub fn with_options_path(mut self, path: PathBuf) -> Self {
        self.options_path = Some(path);
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Read and execute commands until the player quits
    pub fn run<U: Ui + ?Sized>(&mut self, ui: &mut U) -> Result<(), UiError> {
        while !self.quit {
            self.draw_status(ui)?;
            ui.prompt("Command: ")?;
            let key = ui.read_key()?;
            self.handle_key(key, ui)?;
        }
        Ok(())
    }

    pub fn draw_status<U: Ui + ?Sized>(&self, ui: &mut U) -> Result<(), UiError> {
        let p = &self.session.player;
        let mut status = format!(
            "{} the {} {}  Lv {}  SP {}/{}  HP {}/{}  Turn {}",
            p.name,
            p.race,
            p.class,
            p.level,
            p.csp,
            p.msp,
            p.chp,
            p.mhp,
            self.session.turns()
        );
        if self.session.paralyzed > 0 {
            status.push_str("  Paralyzed!");
        }
        ui.clear_region(STATUS_ROW, 0, 1)?;
        ui.put_text(STATUS_ROW, 0, &status, Color::LightBlue)
    }

    pub fn handle_key<U: Ui + ?Sized>(&mut self, key: Key, ui: &mut U) -> Result<(), UiError> {
        match key_to_command(key) {
            Some(command) => self.execute(command, ui).map(|_| ()),
            None => ui.message("That command does not exist."),
        }
    }

    /// Execute one command; power commands report their outcome
    pub fn execute<U: Ui + ?Sized>(
        &mut self,
        command: Command,
        ui: &mut U,
    ) -> Result<Option<UseOutcome>, UiError> {
        tracing::debug!(?command, "execute");
        match command {
            Command::Quit => {
                self.quit = true;
                Ok(None)
            }
            Command::CancelRepeat => {
                self.dispatcher.cancel_repeat();
                self.last = None;
                ui.message("Repeat cleared.")?;
                Ok(None)
            }
            Command::ToggleMenu => {
                self.toggle_menu(ui)?;
                Ok(None)
            }
            Command::Repeat => match self.last {
                Some(last) => self.power_command(last, ui, true),
                None => {
                    ui.message("There is nothing to repeat.")?;
                    Ok(None)
                }
            },
            Command::Browse => {
                let Some(source) = self.class_source(ui, false)? else {
                    return Ok(None);
                };
                self.dispatcher.browse(&*source, &self.session.player, ui)?;
                Ok(None)
            }
            Command::Cast | Command::RacialPower | Command::UseItem(_) => {
                self.power_command(command, ui, false)
            }
        }
    }

    fn power_command<U: Ui + ?Sized>(
        &mut self,
        command: Command,
        ui: &mut U,
        repeat: bool,
    ) -> Result<Option<UseOutcome>, UiError> {
        if self.session.paralyzed > 0 {
            self.session.paralyzed -= 1;
            self.session.take_turn(TURN_ENERGY);
            ui.message("You are paralyzed!")?;
            return Ok(None);
        }

        let source: Box<dyn PowerSource> = match command {
            Command::Cast => match self.class_source(ui, repeat)? {
                Some(source) => source,
                None => return Ok(None),
            },
            Command::RacialPower => Box::new(RacialSource),
            Command::UseItem(c) => Box::new(ItemSource::for_command(c)),
            _ => return Ok(None),
        };

        self.last = Some(command);
        let outcome = self
            .dispatcher
            .use_power(&*source, &mut self.session, ui, repeat)?;
        tracing::info!(?command, ?outcome, repeat, "power command");
        Ok(Some(outcome))
    }

    /// The class power source, asking for a spellbook when needed
    fn class_source<U: Ui + ?Sized>(
        &mut self,
        ui: &mut U,
        repeat: bool,
    ) -> Result<Option<Box<dyn PowerSource>>, UiError> {
        let class = self.session.player.class;
        let source: Box<dyn PowerSource> = match class {
            PlayerClass::BlueMage => Box::new(BlueMagicSource),
            PlayerClass::MagicEater => Box::new(MagicEaterSource),
            PlayerClass::Smith => Box::new(SmithSource),
            _ if class.uses_spellbooks() => {
                let Some(realm) = self.session.player.spells.first().map(|k| k.realm) else {
                    ui.message("You don't know any spells.")?;
                    return Ok(None);
                };
                let book = match (repeat, self.last_book) {
                    (true, Some(book)) => book,
                    _ => match choose_book(realm, ui)? {
                        Some(book) => book,
                        None => return Ok(None),
                    },
                };
                self.last_book = Some(book);
                Box::new(SpellSource::new(realm, book))
            }
            _ => {
                ui.message("You cannot use any class powers.")?;
                return Ok(None);
            }
        };
        Ok(Some(source))
    }

    fn toggle_menu<U: Ui + ?Sized>(&mut self, ui: &mut U) -> Result<(), UiError> {
        let options = self.dispatcher.options_mut();
        options.use_menu = !options.use_menu;
        let text = if options.use_menu {
            "Menu navigation on."
        } else {
            "Menu navigation off."
        };
        if let Some(path) = &self.options_path
            && let Err(err) = options.save_to_file(path)
        {
            tracing::warn!(%err, path = %path.display(), "could not save options");
        }
        ui.message(text)
    }
}

/// Ask which book of `realm` to open
fn choose_book<U: Ui + ?Sized>(realm: Realm, ui: &mut U) -> Result<Option<u8>, UiError> {
    let names = realm.book_names();
    let choices: Vec<String> = names
        .iter()
        .enumerate()
        .map(|(i, name)| format!("{}) [{}]", index_to_label(i).unwrap_or('?'), name))
        .collect();
    loop {
        ui.prompt(&format!("Use which book? {} ", choices.join(" ")))?;
        match ui.read_key()? {
            Key::Escape => return Ok(None),
            Key::Char(c) => match label_to_index(c) {
                Some(book) if book < names.len() => return Ok(u8::try_from(book).ok()),
                _ => ui.ring_bell()?,
            },
            _ => ui.ring_bell()?,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hb_core::options::UiOptions;
    use hb_core::player::{PlayerState, Race};
    use hb_core::rng::GameRng;
    use hb_core::testing::{ScriptedUi, sample_blue_mage, sample_mage};

    fn app(player: PlayerState) -> App {
        App::new(
            Session::new(player),
            Dispatcher::new(UiOptions::default(), GameRng::new(3)),
        )
    }

    #[test]
    fn test_quit() {
        let mut app = app(sample_mage());
        let mut ui = ScriptedUi::new();
        app.handle_key(Key::Char('Q'), &mut ui).unwrap();
        assert!(app.should_quit());
    }

    #[test]
    fn test_unknown_command() {
        let mut app = app(sample_mage());
        let mut ui = ScriptedUi::new();
        app.handle_key(Key::Char('#'), &mut ui).unwrap();
        assert_eq!(ui.messages, ["That command does not exist."]);
    }

    #[test]
    fn test_cast_asks_for_book_then_repeats() {
        let mut app = app(sample_mage());
        let mut ui = ScriptedUi::new().with_text("aa");
        let outcome = app.execute(Command::Cast, &mut ui).unwrap();
        assert!(outcome.is_some_and(|o| o.took_turn()));
        assert!(ui.prompts[0].starts_with("Use which book?"));

        let mut ui = ScriptedUi::new();
        let outcome = app.execute(Command::Repeat, &mut ui).unwrap();
        assert!(outcome.is_some_and(|o| o.took_turn()));
        assert!(ui.prompts.is_empty());
        assert_eq!(app.session().uses, 2);
    }

    #[test]
    fn test_book_prompt_escape() {
        let mut app = app(sample_mage());
        let mut ui = ScriptedUi::new().with_keys([Key::Char('z'), Key::Escape]);
        assert_eq!(app.execute(Command::Cast, &mut ui).unwrap(), None);
        assert_eq!(ui.bells, 1);
        assert_eq!(app.session().turns(), 0);
    }

    #[test]
    fn test_blue_mage_casts_blue_magic() {
        let mut app = app(sample_blue_mage());
        let mut ui = ScriptedUi::new().with_text("aa");
        let outcome = app.execute(Command::Cast, &mut ui).unwrap();
        assert!(outcome.is_some_and(|o| o.took_turn()));
        assert!(ui.prompts[0].starts_with("Which kind of blue magic?"));
        assert_eq!(app.session().uses, 1);
    }

    #[test]
    fn test_warrior_has_no_class_powers() {
        let mut app = app(PlayerState::new("Conan", PlayerClass::Warrior, Race::Human));
        let mut ui = ScriptedUi::new();
        assert_eq!(app.execute(Command::Cast, &mut ui).unwrap(), None);
        assert_eq!(ui.messages, ["You cannot use any class powers."]);
    }

    #[test]
    fn test_toggle_menu() {
        let mut app = app(sample_mage());
        let mut ui = ScriptedUi::new();
        app.execute(Command::ToggleMenu, &mut ui).unwrap();
        assert!(app.dispatcher().options().use_menu);
        app.execute(Command::ToggleMenu, &mut ui).unwrap();
        assert!(!app.dispatcher().options().use_menu);
        assert_eq!(ui.messages, ["Menu navigation on.", "Menu navigation off."]);
    }

    #[test]
    fn test_paralysis_blocks_powers() {
        let mut app = app(sample_mage());
        app.session_mut().paralyzed = 1;
        let mut ui = ScriptedUi::new();
        assert_eq!(app.execute(Command::RacialPower, &mut ui).unwrap(), None);
        assert_eq!(ui.messages, ["You are paralyzed!"]);
        assert_eq!(app.session().turns(), 1);
        assert_eq!(app.session().paralyzed, 0);
    }

    #[test]
    fn test_repeat_without_history() {
        let mut app = app(sample_mage());
        let mut ui = ScriptedUi::new();
        assert_eq!(app.execute(Command::Repeat, &mut ui).unwrap(), None);
        assert_eq!(ui.messages, ["There is nothing to repeat."]);
    }

    #[test]
    fn test_status_line() {
        let app = app(sample_mage());
        let mut ui = ScriptedUi::new();
        app.draw_status(&mut ui).unwrap();
        assert!(ui.shown("Sample Mage the Elf Mage  Lv 30  SP 40/40"));
    }

    #[test]
    fn test_run_until_quit() {
        let mut app = app(sample_mage());
        let mut ui = ScriptedUi::new().with_keys([Key::Char('#'), Key::Char('Q')]);
        app.run(&mut ui).unwrap();
        assert!(app.should_quit());
        assert_eq!(ui.prompts, ["Command: ", "Command: "]);
    }
}
