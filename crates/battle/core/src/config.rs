use crate::state::SkillId;

/// Battle rules and tunable parameters.
///
/// Defaults reproduce the classic formulas: escape odds start at half the
/// agility ratio and grow by 10% per failed attempt, preemptive/surprise
/// odds sit at 5%/3% depending on which side is faster.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BattleConfig {
    /// Factor applied to `party_agility / troop_agility` for the first escape roll.
    pub escape_base_factor: f64,
    /// Added to the escape ratio after every failed attempt.
    pub escape_ratio_step: f64,

    /// Preemptive odds when the party is at least as fast as the troop.
    pub preemptive_rate_faster: f64,
    /// Preemptive odds when the troop is faster.
    pub preemptive_rate_slower: f64,
    /// Multiplier granted by the raise-preemptive party ability.
    pub preemptive_raise_multiplier: f64,
    /// Surprise odds when the party is at least as fast as the troop.
    pub surprise_rate_faster: f64,
    /// Surprise odds when the troop is faster.
    pub surprise_rate_slower: f64,

    /// Speed variance is `random_int(speed_variance_base + agi / speed_variance_divisor)`.
    pub speed_variance_base: i32,
    pub speed_variance_divisor: i32,

    /// Battlers below this fraction of max HP are dying and may be covered by a substitute.
    pub dying_hp_ratio: f64,

    /// Damage multiplier applied on critical hits.
    pub critical_multiplier: f64,

    /// Skill used by counter attacks and the basic attack command.
    pub attack_skill: SkillId,
    /// Skill used by the guard command.
    pub guard_skill: SkillId,

    pub max_gold: u32,
    pub max_level: u32,
}

impl BattleConfig {
    // ===== compile-time constants used as type parameters =====
    pub const MAX_UNIT_MEMBERS: usize = 8;
    /// Party members past this count are reserves.
    pub const MAX_BATTLE_MEMBERS: usize = 4;
    pub const MAX_STATUS_EFFECTS: usize = 8;
    pub const MAX_ACTIONS_PER_TURN: usize = 4;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_ESCAPE_BASE_FACTOR: f64 = 0.5;
    pub const DEFAULT_ESCAPE_RATIO_STEP: f64 = 0.1;
    pub const DEFAULT_ATTACK_SKILL: SkillId = SkillId(1);
    pub const DEFAULT_GUARD_SKILL: SkillId = SkillId(2);

    pub fn new() -> Self {
        Self {
            escape_base_factor: Self::DEFAULT_ESCAPE_BASE_FACTOR,
            escape_ratio_step: Self::DEFAULT_ESCAPE_RATIO_STEP,
            preemptive_rate_faster: 0.05,
            preemptive_rate_slower: 0.03,
            preemptive_raise_multiplier: 4.0,
            surprise_rate_faster: 0.03,
            surprise_rate_slower: 0.05,
            speed_variance_base: 5,
            speed_variance_divisor: 4,
            dying_hp_ratio: 0.25,
            critical_multiplier: 3.0,
            attack_skill: Self::DEFAULT_ATTACK_SKILL,
            guard_skill: Self::DEFAULT_GUARD_SKILL,
            max_gold: 99_999_999,
            max_level: 99,
        }
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-battle switches chosen by whoever starts the encounter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleOptions {
    /// Whether the party command window offers the escape command.
    pub can_escape: bool,
    /// Whether a defeat lets the game continue (party revived) instead of ending it.
    pub can_lose: bool,
}

impl BattleOptions {
    pub const fn new(can_escape: bool, can_lose: bool) -> Self {
        Self {
            can_escape,
            can_lose,
        }
    }
}
