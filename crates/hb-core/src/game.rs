//! Game state seen by the power-use dispatcher
//!
//! The dispatcher only needs a handful of effects from the game: pay for a
//! power, spend a turn, apply an over-exertion penalty and note the use.
//! [`Session`] is the concrete state the front-end runs on.

use serde::{Deserialize, Serialize};

use crate::catalog::{PowerDescriptor, PowerExtra, Resource};
use crate::chance::{SPELL_EXP_BEGINNER, SPELL_EXP_EXPERT, SPELL_EXP_MASTER, SPELL_EXP_SKILLED};
use crate::player::{PlayerState, Stat};

/// Lost constitution after over-exerting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConDrain {
    pub amount: i32,
    pub permanent: bool,
}

/// Penalty for using a power without enough mana or hit points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverExertion {
    pub resource: Resource,
    /// How much the cost exceeded the pool
    pub shortfall: i32,
    /// Turns of paralysis
    pub paralysis: i32,
    pub con_drain: Option<ConDrain>,
}

/// Effects the dispatcher applies to the game
pub trait GameState {
    fn player(&self) -> &PlayerState;

    /// Deduct `amount` from a resource pool
    fn spend(&mut self, resource: Resource, amount: i32);

    /// Advance the game clock
    fn take_turn(&mut self, energy: i32);

    /// Drain the pool and apply the penalty
    fn over_exert(&mut self, penalty: &OverExertion);

    /// Note a use, successful or not
    fn record_use(&mut self, power: &PowerDescriptor, success: bool);
}

/// Experience gained by one successful cast at `exp`
pub fn spell_exp_gain(exp: i32) -> i32 {
    let gain = if exp < SPELL_EXP_BEGINNER {
        60
    } else if exp < SPELL_EXP_SKILLED {
        8
    } else if exp < SPELL_EXP_EXPERT {
        2
    } else if exp < SPELL_EXP_MASTER {
        1
    } else {
        0
    };
    (exp + gain).min(SPELL_EXP_MASTER) - exp
}

/// A running game: the player plus clock and bookkeeping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub player: PlayerState,
    /// Energy spent since the session started
    pub energy_used: i64,
    /// Turns the player cannot act
    pub paralyzed: i32,
    pub uses: u32,
    pub failures: u32,
}

impl Session {
    pub fn new(player: PlayerState) -> Self {
        Self {
            player,
            energy_used: 0,
            paralyzed: 0,
            uses: 0,
            failures: 0,
        }
    }

    /// Game turns elapsed at normal speed
    pub fn turns(&self) -> i64 {
        self.energy_used / 100
    }
}

impl GameState for Session {
    fn player(&self) -> &PlayerState {
        &self.player
    }

    fn spend(&mut self, resource: Resource, amount: i32) {
        let player = &mut self.player;
        match resource {
            Resource::Mana => player.csp = (player.csp - amount).max(0),
            Resource::Hp => player.chp -= amount,
            Resource::Essence(kind) => {
                if let Some(stock) = player.essences.get_mut(&kind) {
                    *stock = (*stock - amount).max(0);
                }
            }
            Resource::Charges { slot } => {
                if let Some(device) = player.devices.get_mut(slot) {
                    device.charges = (device.charges - amount).max(0);
                }
            }
            Resource::Nothing => {}
        }
    }

    fn take_turn(&mut self, energy: i32) {
        self.energy_used += i64::from(energy);
    }

    fn over_exert(&mut self, penalty: &OverExertion) {
        match penalty.resource {
            Resource::Mana => self.player.csp = 0,
            Resource::Hp => self.player.chp = 0,
            _ => {}
        }
        self.paralyzed += penalty.paralysis;

        if let Some(drain) = penalty.con_drain {
            let con = self.player.stats.get(Stat::Constitution);
            let loss = (drain.amount / 10).max(1);
            self.player
                .stats
                .set(Stat::Constitution, con - i16::try_from(loss).unwrap_or(i16::MAX));
            tracing::info!(loss, permanent = drain.permanent, "constitution drained");
        }
    }

    fn record_use(&mut self, power: &PowerDescriptor, success: bool) {
        self.uses += 1;
        if !success {
            self.failures += 1;
            return;
        }
        if let PowerExtra::Spell { realm, index, .. } = power.extra {
            if let Some(exp) = self
                .player
                .realm_mut(realm)
                .and_then(|k| k.exp.get_mut(index))
            {
                let gain = spell_exp_gain(i32::from(*exp));
                *exp += i16::try_from(gain).unwrap_or(0);
            }
        }
    }
}
