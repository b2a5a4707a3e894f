//! Encounter advantage and escape odds.

use super::Encounter;
use crate::config::BattleConfig;
use crate::env::{BattleRng, roll};
use crate::error::SetupError;
use crate::state::{Combatants, PartyAbility};

/// Escape odds of the running battle.
///
/// The ratio starts at `escape_base_factor * party_agility_sum / troop_agility_sum`
/// and only ever grows, by `escape_ratio_step` per failed attempt.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EscapeState {
    ratio: f64,
}

impl EscapeState {
    pub fn new(units: &Combatants, config: &BattleConfig) -> Result<Self, SetupError> {
        let troop_agility = units.troop.roster.agility_sum();
        if troop_agility <= 0 {
            return Err(SetupError::ZeroTroopAgility);
        }
        let party_agility = units.party.roster.agility_sum();
        Ok(Self {
            ratio: config.escape_base_factor * f64::from(party_agility)
                / f64::from(troop_agility),
        })
    }

    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    /// Rolls an escape. Always succeeds under preemptive advantage.
    /// A failure raises the ratio for the next attempt.
    pub fn attempt(
        &mut self,
        preemptive: bool,
        config: &BattleConfig,
        rng: &mut dyn BattleRng,
    ) -> bool {
        let success = preemptive || roll(rng, self.ratio);
        if !success {
            self.ratio += config.escape_ratio_step;
        }
        success
    }
}

/// Preemptive odds: higher when the party is at least as fast as the troop.
pub fn preemptive_rate(units: &Combatants, config: &BattleConfig) -> f64 {
    let rate = if units.party.roster.agility() >= units.troop.roster.agility() {
        config.preemptive_rate_faster
    } else {
        config.preemptive_rate_slower
    };
    if units.party.has_ability(PartyAbility::RAISE_PREEMPTIVE) {
        rate * config.preemptive_raise_multiplier
    } else {
        rate
    }
}

/// Surprise odds: higher when the troop is faster; zero with cancel-surprise.
pub fn surprise_rate(units: &Combatants, config: &BattleConfig) -> f64 {
    if units.party.has_ability(PartyAbility::CANCEL_SURPRISE) {
        return 0.0;
    }
    if units.party.roster.agility() >= units.troop.roster.agility() {
        config.surprise_rate_faster
    } else {
        config.surprise_rate_slower
    }
}

/// Rolls preemptive first; surprise is only rolled when preemptive failed.
pub fn roll_encounter(
    units: &Combatants,
    config: &BattleConfig,
    rng: &mut dyn BattleRng,
) -> Encounter {
    let preemptive = roll(rng, preemptive_rate(units, config));
    let surprise = !preemptive && roll(rng, surprise_rate(units, config));
    Encounter {
        preemptive,
        surprise,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::SequenceRng;
    use crate::state::{
        Battler, BattlerId, EnemyId, EnemyProfile, Params, Party, Role, Troop, TroopId,
    };

    fn units(party_agi: i32, troop_agi: i32) -> Combatants {
        let member = |agi: i32| {
            Battler::new(
                BattlerId::party(0),
                "X",
                Role::Enemy(EnemyProfile {
                    enemy_id: EnemyId(1),
                }),
                Params::new(10, 0, 1, 1, 1, 1, agi, 1),
            )
        };
        let mut party = Party::new();
        party.add_member(member(party_agi)).unwrap();
        let mut troop = Troop::new(TroopId(1));
        troop.add_member(member(troop_agi)).unwrap();
        Combatants::new(party, troop)
    }

    #[test]
    fn failed_escape_adds_step() {
        let config = BattleConfig::default();
        let mut escape = EscapeState::new(&units(10, 10), &config).unwrap();
        assert_eq!(escape.ratio(), 0.5);

        let mut rng = SequenceRng::new([0.6, 0.55]);
        assert!(!escape.attempt(false, &config, &mut rng));
        assert!((escape.ratio() - 0.6).abs() < 1e-9);
        assert!(escape.attempt(false, &config, &mut rng));
        assert!((escape.ratio() - 0.6).abs() < 1e-9);
    }

    #[test]
    fn preemptive_always_escapes() {
        let config = BattleConfig::default();
        let mut escape = EscapeState::new(&units(1, 100), &config).unwrap();
        let mut rng = SequenceRng::new([]);
        assert!(escape.attempt(true, &config, &mut rng));
        assert_eq!(rng.drawn(), 0);
    }

    #[test]
    fn zero_troop_agility_is_rejected() {
        let result = EscapeState::new(&units(10, 0), &BattleConfig::default());
        assert_eq!(result, Err(SetupError::ZeroTroopAgility));
    }

    #[test]
    fn surprise_not_rolled_after_preemptive() {
        let config = BattleConfig::default();
        let mut rng = SequenceRng::new([0.01, 0.01]);
        let encounter = roll_encounter(&units(10, 5), &config, &mut rng);
        assert!(encounter.preemptive);
        assert!(!encounter.surprise);
        assert_eq!(rng.drawn(), 1);
    }

    #[test]
    fn encounter_rates_depend_on_relative_agility() {
        let config = BattleConfig::default();
        assert_eq!(preemptive_rate(&units(10, 5), &config), 0.05);
        assert_eq!(preemptive_rate(&units(5, 10), &config), 0.03);
        assert_eq!(surprise_rate(&units(10, 5), &config), 0.03);
        assert_eq!(surprise_rate(&units(5, 10), &config), 0.05);
    }
}
