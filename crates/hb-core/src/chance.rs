//! Spell failure and cost model
//!
//! Pure functions: nothing here touches the UI or the RNG. Results depend on
//! live player state (stun, current mana), so callers recompute them every
//! time a list row is drawn instead of caching them.

use crate::catalog::{PowerDescriptor, PowerExtra, Resource};
use crate::player::{CasterFlags, MAX_STAT_INDEX, PlayerState, Stat};

/// Failure can never exceed this
pub const MAX_FAIL: i32 = 95;

/// Spell experience thresholds
pub const SPELL_EXP_BEGINNER: i32 = 900;
pub const SPELL_EXP_SKILLED: i32 = 1200;
pub const SPELL_EXP_EXPERT: i32 = 1400;
pub const SPELL_EXP_MASTER: i32 = 1600;

const MANA_CONST: i32 = 2400;
const MANA_DIV: i32 = 4;
const DEC_MANA_DIV: i32 = 3;

/// Stat adjustment to spell failure, by stat index
static ADJ_MAG_STAT: [i32; MAX_STAT_INDEX + 1] = [
    0, 0, 0, 0, 0, // 3-7
    1, 1, 1, 1, 1, 1, 1, // 8-14
    2, 2, 2, // 15-17
    3, 3, 3, 3, 3, // 18/00-18/49
    4, 4, // 18/50-18/69
    5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, // 18/70-18/220+
];

/// Minimum spell failure, by stat index
static ADJ_MAG_FAIL: [i32; MAX_STAT_INDEX + 1] = [
    99, 99, 99, 99, 99, // 3-7
    50, 30, 20, 15, 12, 11, 10, // 8-14
    9, 8, 7, // 15-17
    6, 6, 5, 5, 5, // 18/00-18/49
    4, 4, 4, 4, // 18/50-18/89
    3, 3, // 18/90-18/109
    2, 2, 2, 2, // 18/110-18/149
    1, 1, 1, 1, 1, // 18/150-18/199
    0, 0, 0, // 18/200-18/220+
];

/// Effective cost and failure chance of one power
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChanceResult {
    pub effective_cost: i32,
    pub fail_percent: i32,
}

/// Stat-derived casting figures plus equipment modifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CasterProfile {
    /// Table adjustment of the governing stat (1 is neutral)
    pub stat_adjust: i32,
    /// Failure floor
    pub min_fail: i32,
    pub flags: CasterFlags,
    /// Flat failure adjustment from equipment
    pub to_m_chance: i32,
}

impl CasterProfile {
    /// Profile for a governing stat value
    pub fn from_stat(value: i16, flags: CasterFlags, to_m_chance: i32) -> Self {
        let index = crate::player::stat_index(value);
        Self {
            stat_adjust: ADJ_MAG_STAT[index],
            min_fail: ADJ_MAG_FAIL[index],
            flags,
            to_m_chance,
        }
    }

    /// Profile of the player, using the class spell stat (INT for non-casters)
    pub fn for_player(player: &PlayerState) -> Self {
        let stat = player.class.spell_stat().unwrap_or(Stat::Intelligence);
        Self::for_stat(player, stat)
    }

    /// Profile for a power, honouring the stat racial powers and mutations name
    pub fn for_power(power: &PowerDescriptor, player: &PlayerState) -> Self {
        match power.extra {
            PowerExtra::Racial { stat, .. } | PowerExtra::Mutation { stat, .. } => {
                Self::for_stat(player, stat)
            }
            _ => Self::for_player(player),
        }
    }

    fn for_stat(player: &PlayerState, stat: Stat) -> Self {
        let mut profile = Self::from_stat(
            player.stats.get(stat),
            player.caster_flags,
            player.to_m_chance,
        );
        if player.class.is_half_caster() {
            profile.min_fail = profile.min_fail.max(5);
        }
        profile
    }
}

/// Everything about the caster the failure formula reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChanceInputs {
    pub level: i32,
    pub profile: CasterProfile,
    /// Current amount of the pool paying the cost
    pub current_resource: i32,
    pub stun: i32,
}

impl ChanceInputs {
    pub fn for_power(power: &PowerDescriptor, player: &PlayerState) -> Self {
        Self {
            level: player.level,
            profile: CasterProfile::for_power(power, player),
            current_resource: player.available(power.resource),
            stun: player.stun,
        }
    }
}

/// Cost after proficiency and mana-reduction modifiers
pub fn compute_effective_cost(power: &PowerDescriptor, player: &PlayerState) -> i32 {
    effective_cost(power, player.caster_flags)
}

/// Cost of a power given the caster's flags
pub fn effective_cost(power: &PowerDescriptor, flags: CasterFlags) -> i32 {
    let dec_mana = flags.contains(CasterFlags::DEC_MANA);
    match (&power.extra, power.resource) {
        (_, _) if power.base_cost <= 0 => 0,
        (PowerExtra::Spell { exp, .. }, Resource::Mana) => {
            let exp = i32::from(*exp);
            let mut need = power.base_cost * (MANA_CONST + SPELL_EXP_EXPERT - exp) + (MANA_CONST - 1);
            need *= if dec_mana { DEC_MANA_DIV } else { MANA_DIV };
            need /= MANA_CONST * MANA_DIV;
            need.max(1)
        }
        (_, Resource::Mana) if dec_mana => ((power.base_cost + 1) * DEC_MANA_DIV / MANA_DIV).max(1),
        _ => power.base_cost,
    }
}

/// Failure percentage of a power for the player, 0..=95
pub fn compute_fail_percent(power: &PowerDescriptor, player: &PlayerState) -> i32 {
    let cost = compute_effective_cost(power, player);
    fail_percent(power, cost, &ChanceInputs::for_power(power, player))
}

/// Cost and failure together, as shown in list rows and prompts
pub fn evaluate(power: &PowerDescriptor, player: &PlayerState) -> ChanceResult {
    let effective_cost = compute_effective_cost(power, player);
    ChanceResult {
        effective_cost,
        fail_percent: fail_percent(power, effective_cost, &ChanceInputs::for_power(power, player)),
    }
}

/// The failure formula proper
pub fn fail_percent(power: &PowerDescriptor, effective_cost: i32, inputs: &ChanceInputs) -> i32 {
    // Non-spell powers with no base failure never fail
    if power.base_fail == 0 && !power.is_spell() {
        return 0;
    }

    let profile = &inputs.profile;
    let mut fail = power.base_fail;

    if inputs.level > power.min_level {
        fail -= 3 * (inputs.level - power.min_level);
    } else {
        fail += power.min_level - inputs.level;
    }

    fail -= 3 * (profile.stat_adjust - 1);
    fail = modify_chance_first(fail, profile);

    if power.resource == Resource::Mana && effective_cost > inputs.current_resource {
        fail += 5 * (effective_cost - inputs.current_resource);
    }

    fail = fail.max(profile.min_fail);

    if inputs.stun > 50 {
        fail += 25;
    } else if inputs.stun > 0 {
        fail += 15;
    }

    fail = fail.min(MAX_FAIL);

    if let PowerExtra::Spell { exp, .. } = power.extra {
        let exp = i32::from(exp);
        if exp >= SPELL_EXP_EXPERT {
            fail -= 1;
        }
        if exp >= SPELL_EXP_MASTER {
            fail -= 1;
        }
    }

    modify_chance_second(fail, profile).min(MAX_FAIL)
}

fn modify_chance_first(mut fail: i32, profile: &CasterProfile) -> i32 {
    let easy = profile.flags.contains(CasterFlags::EASY_SPELL);
    let dec_mana = profile.flags.contains(CasterFlags::DEC_MANA);

    fail += profile.to_m_chance;
    if profile.flags.contains(CasterFlags::HEAVY_SPELL) {
        fail += 20;
    }
    if dec_mana && easy {
        fail -= 4;
    } else if easy {
        fail -= 3;
    } else if dec_mana {
        fail -= 2;
    }
    fail
}

fn modify_chance_second(mut fail: i32, profile: &CasterProfile) -> i32 {
    if profile.flags.contains(CasterFlags::DEC_MANA) {
        fail -= 1;
    }
    if profile.flags.contains(CasterFlags::HEAVY_SPELL) {
        fail += 5;
    }
    fail.max(0)
}

/// Proficiency label for a spell experience value
pub fn proficiency_name(exp: i32) -> &'static str {
    if exp >= SPELL_EXP_MASTER {
        "Master"
    } else if exp >= SPELL_EXP_EXPERT {
        "Expert"
    } else if exp >= SPELL_EXP_SKILLED {
        "Skilled"
    } else if exp >= SPELL_EXP_BEGINNER {
        "Beginner"
    } else {
        "Unskilled"
    }
}
