//! Confirmation gate
//!
//! Asked only when the player picked with an uppercase letter (or through
//! an inscription tag with `confirm_tagged` set). Declining returns to the
//! menu, it does not cancel the whole selection.

use crate::catalog::{PowerDescriptor, PowerSource, Resource};
use crate::chance::ChanceResult;
use crate::errors::UiError;
use crate::io::Ui;

/// First letter uppercased, as in prompts ("Cast", "Use")
pub(crate) fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Prompt text, e.g. `Cast magic missile (1 mana, 22% fail)? `
pub fn confirm_prompt<S: PowerSource + ?Sized>(
    source: &S,
    power: &PowerDescriptor,
    chance: &ChanceResult,
) -> String {
    let verb = capitalize(source.verb());
    match power.resource {
        Resource::Nothing => format!("{} {}? ", verb, power.name),
        resource => format!(
            "{} {} ({} {}, {}% fail)? ",
            verb,
            power.name,
            chance.effective_cost,
            resource.unit(),
            chance.fail_percent
        ),
    }
}

/// Ask whether to go ahead with `power`
pub fn confirm_use<S, U>(
    source: &S,
    power: &PowerDescriptor,
    chance: &ChanceResult,
    ui: &mut U,
) -> Result<bool, UiError>
where
    S: PowerSource + ?Sized,
    U: Ui + ?Sized,
{
    let answer = ui.confirm(&confirm_prompt(source, power, chance))?;
    tracing::debug!(power = %power.name, answer, "confirmation");
    Ok(answer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ItemSource, PowerExtra, Realm, SpellSource};
    use crate::player::ItemLocation;
    use crate::testing::ScriptedUi;

    fn missile() -> PowerDescriptor {
        PowerDescriptor::new(
            "Magic Missile",
            1,
            1,
            22,
            PowerExtra::Spell {
                realm: Realm::Chaos,
                index: 0,
                exp: 0,
            },
        )
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("cast"), "Cast");
        assert_eq!(capitalize("a"), "A");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_prompt_text() {
        let chance = ChanceResult {
            effective_cost: 1,
            fail_percent: 22,
        };
        let source = SpellSource::new(Realm::Chaos, 0);
        assert_eq!(
            confirm_prompt(&source, &missile(), &chance),
            "Cast Magic Missile (1 mana, 22% fail)? "
        );

        let potion = PowerDescriptor::new(
            "Potion of Speed",
            1,
            0,
            0,
            PowerExtra::Item {
                location: ItemLocation::Pack,
                slot: 0,
            },
        )
        .paid_with(Resource::Nothing);
        assert_eq!(
            confirm_prompt(&ItemSource::for_command('q'), &potion, &chance),
            "Quaff Potion of Speed? "
        );
    }

    #[test]
    fn test_answer_is_passed_through() {
        let chance = ChanceResult {
            effective_cost: 1,
            fail_percent: 22,
        };
        let source = SpellSource::new(Realm::Chaos, 0);
        let mut ui = ScriptedUi::new().with_confirms([true, false]);
        assert!(confirm_use(&source, &missile(), &chance, &mut ui).unwrap());
        assert!(!confirm_use(&source, &missile(), &chance, &mut ui).unwrap());
        assert_eq!(ui.confirm_prompts.len(), 2);
    }
}
