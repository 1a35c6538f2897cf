//! Power-use dispatcher
//!
//! Runs a selection for one power source, then pays for and attempts the
//! chosen power: check the pool, offer over-exertion, roll for failure,
//! deduct the cost, record the use and spend a turn.

use crate::catalog::{PowerDescriptor, PowerSource};
use crate::chance::{ChanceResult, evaluate};
use crate::errors::UiError;
use crate::game::{ConDrain, GameState, OverExertion};
use crate::io::Ui;
use crate::options::UiOptions;
use crate::player::PlayerState;
use crate::repeat::RepeatShortcut;
use crate::rng::GameRng;
use crate::selection::{Purpose, Selection, SelectionConfig, SelectionMachine};

/// Energy one power use costs
pub const TURN_ENERGY: i32 = 100;

/// What happened to one use request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UseOutcome {
    /// The catalog offered nothing usable
    NothingToUse,
    /// The player backed out; no cost, no time
    Cancelled,
    /// The power was attempted and failed; cost and time were spent
    Failed { index: usize },
    Succeeded { index: usize },
}

impl UseOutcome {
    /// Whether game time passed
    pub fn took_turn(&self) -> bool {
        matches!(self, UseOutcome::Failed { .. } | UseOutcome::Succeeded { .. })
    }
}

/// Owns the options, the repeat memory and the RNG for power use
#[derive(Debug)]
pub struct Dispatcher {
    options: UiOptions,
    repeats: RepeatShortcut,
    rng: GameRng,
}

impl Dispatcher {
    pub fn new(options: UiOptions, rng: GameRng) -> Self {
        Self {
            options,
            repeats: RepeatShortcut::new(),
            rng,
        }
    }

    pub fn options(&self) -> &UiOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut UiOptions {
        &mut self.options
    }

    pub fn repeats(&self) -> &RepeatShortcut {
        &self.repeats
    }

    /// Forget every remembered choice
    pub fn cancel_repeat(&mut self) {
        tracing::debug!(remembered = self.repeats.len(), "repeat memory cleared");
        self.repeats.clear();
    }

    pub fn selection_config(&self, purpose: Purpose, repeat: bool) -> SelectionConfig {
        SelectionConfig::from_options(&self.options)
            .with_purpose(purpose)
            .with_repeat(repeat)
    }

    /// Run a selection only
    pub fn select<S, U>(
        &mut self,
        source: &S,
        player: &PlayerState,
        ui: &mut U,
        repeat: bool,
    ) -> Result<Selection, UiError>
    where
        S: PowerSource + ?Sized,
        U: Ui + ?Sized,
    {
        let config = self.selection_config(Purpose::Use, repeat);
        SelectionMachine::new(source, player, config).run(ui, &mut self.repeats)
    }

    /// Read descriptions without using anything
    pub fn browse<S, U>(
        &mut self,
        source: &S,
        player: &PlayerState,
        ui: &mut U,
    ) -> Result<Selection, UiError>
    where
        S: PowerSource + ?Sized,
        U: Ui + ?Sized,
    {
        let config = self.selection_config(Purpose::Browse, false);
        let selection = SelectionMachine::new(source, player, config).run(ui, &mut self.repeats)?;
        if selection == Selection::NoChoices {
            ui.message(&source.nothing_message())?;
        }
        Ok(selection)
    }

    /// Select a power and attempt it
    pub fn use_power<S, G, U>(
        &mut self,
        source: &S,
        game: &mut G,
        ui: &mut U,
        repeat: bool,
    ) -> Result<UseOutcome, UiError>
    where
        S: PowerSource + ?Sized,
        G: GameState + ?Sized,
        U: Ui + ?Sized,
    {
        let config = self.selection_config(Purpose::Use, repeat);
        let (index, power, chance) = {
            let player = game.player();
            let mut machine = SelectionMachine::new(source, player, config);
            match machine.run(ui, &mut self.repeats)? {
                Selection::NoChoices => {
                    ui.message(&source.nothing_message())?;
                    return Ok(UseOutcome::NothingToUse);
                }
                Selection::Cancelled => return Ok(UseOutcome::Cancelled),
                Selection::Committed(index) => match machine.catalog().get(index) {
                    Some(power) => (index, power.clone(), evaluate(power, player)),
                    None => return Ok(UseOutcome::Cancelled),
                },
            }
        };

        let shortfall = chance.effective_cost - game.player().available(power.resource);
        let over_exert = if shortfall > 0 {
            if !self.accept_shortfall(source, &power, ui)? {
                tracing::debug!(power = %power.name, shortfall, "not enough to pay");
                return Ok(UseOutcome::Cancelled);
            }
            true
        } else {
            false
        };

        let success = self.attempt(source, &power, &chance, ui)?;

        if over_exert {
            let penalty = self.roll_over_exertion(&power, shortfall);
            game.over_exert(&penalty);
            ui.message("You faint from the effort!")?;
            if penalty.con_drain.is_some() {
                ui.message("You have damaged your health!")?;
            }
        } else {
            game.spend(power.resource, chance.effective_cost);
        }
        game.record_use(&power, success);
        game.take_turn(TURN_ENERGY);

        tracing::info!(
            context = %source.context(),
            power = %power.name,
            cost = chance.effective_cost,
            fail = chance.fail_percent,
            success,
            "power used"
        );
        Ok(if success {
            UseOutcome::Succeeded { index }
        } else {
            UseOutcome::Failed { index }
        })
    }

    fn accept_shortfall<S, U>(
        &mut self,
        source: &S,
        power: &PowerDescriptor,
        ui: &mut U,
    ) -> Result<bool, UiError>
    where
        S: PowerSource + ?Sized,
        U: Ui + ?Sized,
    {
        ui.message(&format!(
            "You do not have enough {} to {} this {}.",
            power.resource.unit(),
            source.verb(),
            source.noun()
        ))?;
        if !power.resource.allows_over_exertion() || !self.options.over_exert {
            return Ok(false);
        }
        ui.confirm("Attempt it anyway? ")
    }

    fn attempt<S, U>(
        &mut self,
        source: &S,
        power: &PowerDescriptor,
        chance: &ChanceResult,
        ui: &mut U,
    ) -> Result<bool, UiError>
    where
        S: PowerSource + ?Sized,
        U: Ui + ?Sized,
    {
        if self.rng.rn2(100) < chance.fail_percent {
            if self.options.flush_failure {
                ui.ring_bell()?;
            }
            ui.message(&format!("You failed to {} the {}!", source.verb(), source.noun()))?;
            Ok(false)
        } else {
            ui.message(&format!("You {} {}.", source.verb(), power.name))?;
            Ok(true)
        }
    }

    fn roll_over_exertion(&mut self, power: &PowerDescriptor, shortfall: i32) -> OverExertion {
        let paralysis = self.rng.randint1(5 * shortfall + 1);
        let con_drain = if self.rng.percent(50) {
            let permanent = self.rng.percent(25);
            Some(ConDrain {
                amount: 15 + self.rng.randint1(10),
                permanent,
            })
        } else {
            None
        };
        OverExertion {
            resource: power.resource,
            shortfall,
            paralysis,
            con_drain,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{RacialSource, Realm, SpellSource};
    use crate::io::Key;
    use crate::player::Race;
    use crate::testing::{CountingGame, ScriptedUi, sample_mage};

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(UiOptions::default(), GameRng::new(42))
    }

    fn elf() -> CountingGame {
        let mut p = sample_mage();
        p.race = Race::Elf;
        CountingGame::new(p)
    }

    #[test]
    fn test_zero_fail_power_always_succeeds() {
        let mut d = dispatcher();
        let mut game = elf();
        let mut ui = ScriptedUi::new().with_keys([Key::Char('a')]);
        let outcome = d.use_power(&RacialSource, &mut game, &mut ui, false).unwrap();
        assert_eq!(outcome, UseOutcome::Succeeded { index: 0 });
        assert_eq!(game.turns, 1);
        assert_eq!(game.session.energy_used, i64::from(TURN_ENERGY));
        assert_eq!(game.uses, [("Elven Sight".to_string(), true)]);
        assert_eq!(game.session.player.csp, 37);
    }

    #[test]
    fn test_cancel_spends_nothing() {
        let mut d = dispatcher();
        let mut game = elf();
        let mut ui = ScriptedUi::new().with_keys([Key::Escape]);
        let source = SpellSource::new(Realm::Sorcery, 0);
        let outcome = d.use_power(&source, &mut game, &mut ui, false).unwrap();
        assert_eq!(outcome, UseOutcome::Cancelled);
        assert!(!outcome.took_turn());
        assert!(game.untouched());
    }

    #[test]
    fn test_nothing_to_use() {
        let mut d = dispatcher();
        let mut game = elf();
        let mut ui = ScriptedUi::new();
        let source = SpellSource::new(Realm::Life, 0);
        let outcome = d.use_power(&source, &mut game, &mut ui, false).unwrap();
        assert_eq!(outcome, UseOutcome::NothingToUse);
        assert_eq!(ui.messages, [source.nothing_message()]);
        assert!(game.untouched());
    }

    #[test]
    fn test_over_exertion_declined() {
        let mut d = dispatcher();
        let mut game = elf();
        game.session.player.csp = 0;
        let mut ui = ScriptedUi::new()
            .with_keys([Key::Char('b')])
            .with_confirms([false]);
        let source = SpellSource::new(Realm::Sorcery, 0);
        let outcome = d.use_power(&source, &mut game, &mut ui, false).unwrap();
        assert_eq!(outcome, UseOutcome::Cancelled);
        assert_eq!(ui.confirm_prompts, ["Attempt it anyway? "]);
        assert!(game.untouched());
    }

    #[test]
    fn test_over_exertion_accepted() {
        let mut d = dispatcher();
        let mut game = elf();
        game.session.player.csp = 0;
        let mut ui = ScriptedUi::new()
            .with_keys([Key::Char('b')])
            .with_confirms([true]);
        let source = SpellSource::new(Realm::Sorcery, 0);
        let outcome = d.use_power(&source, &mut game, &mut ui, false).unwrap();
        assert!(outcome.took_turn());
        assert_eq!(game.exertions.len(), 1);
        let penalty = game.exertions[0];
        assert!(penalty.shortfall > 0);
        assert!((1..=5 * penalty.shortfall + 1).contains(&penalty.paralysis));
        assert!(game.spends.is_empty());
        assert_eq!(game.session.paralyzed, penalty.paralysis);
    }

    #[test]
    fn test_over_exertion_disabled() {
        let mut options = UiOptions::default();
        options.over_exert = false;
        let mut d = Dispatcher::new(options, GameRng::new(1));
        let mut game = elf();
        game.session.player.csp = 0;
        let mut ui = ScriptedUi::new().with_keys([Key::Char('b')]);
        let source = SpellSource::new(Realm::Sorcery, 0);
        let outcome = d.use_power(&source, &mut game, &mut ui, false).unwrap();
        assert_eq!(outcome, UseOutcome::Cancelled);
        assert!(ui.confirm_prompts.is_empty());
        assert!(game.untouched());
    }

    #[test]
    fn test_repeat_uses_last_choice() {
        let mut d = dispatcher();
        let mut game = elf();
        let source = SpellSource::new(Realm::Sorcery, 0);
        let mut ui = ScriptedUi::new().with_keys([Key::Char('c')]);
        assert!(d.use_power(&source, &mut game, &mut ui, false).unwrap().took_turn());

        let mut ui = ScriptedUi::new();
        let outcome = d.use_power(&source, &mut game, &mut ui, true).unwrap();
        assert!(matches!(
            outcome,
            UseOutcome::Succeeded { index: 2 } | UseOutcome::Failed { index: 2 }
        ));
        assert!(ui.prompts.is_empty());

        d.cancel_repeat();
        assert!(d.repeats().is_empty());
    }

    #[test]
    fn test_browse_prints_description() {
        let mut d = dispatcher();
        let game = elf();
        let mut ui = ScriptedUi::new().with_keys([Key::Char('b'), Key::Escape]);
        let source = SpellSource::new(Realm::Sorcery, 0);
        let selection = d.browse(&source, &game.session.player, &mut ui).unwrap();
        assert_eq!(selection, Selection::Cancelled);
        assert_eq!(ui.messages, ["Teleports you a short distance."]);
        assert!(d.repeats().is_empty());
    }
}
