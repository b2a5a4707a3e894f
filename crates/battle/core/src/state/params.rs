//! Battle parameters and rate traits.

/// Base parameters of a combatant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Params {
    pub mhp: i32,
    pub mmp: i32,
    pub atk: i32,
    pub def: i32,
    pub mat: i32,
    pub mdf: i32,
    pub agi: i32,
    pub luk: i32,
}

impl Params {
    #[allow(clippy::too_many_arguments)]
    pub const fn new(
        mhp: i32,
        mmp: i32,
        atk: i32,
        def: i32,
        mat: i32,
        mdf: i32,
        agi: i32,
        luk: i32,
    ) -> Self {
        Self {
            mhp,
            mmp,
            atk,
            def,
            mat,
            mdf,
            agi,
            luk,
        }
    }
}

/// Probability and multiplier traits (`hit`, `eva`, `cnt`, ...).
///
/// Probabilities are in `0.0..=1.0`; multipliers default to `1.0`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Rates {
    /// Hit rate of physical actions.
    pub hit: f64,
    /// Physical evasion.
    pub eva: f64,
    /// Critical rate.
    pub cri: f64,
    /// Critical evasion.
    pub cev: f64,
    /// Magic evasion.
    pub mev: f64,
    /// Magic reflection.
    pub mrf: f64,
    /// Counter attack.
    pub cnt: f64,
    /// HP regeneration per turn (fraction of max HP, may be negative).
    pub hrg: f64,
    /// MP regeneration per turn.
    pub mrg: f64,
    /// Target rate: weight when picked as a random target.
    pub tgr: f64,
    /// Guard effect: damage divisor is `2 * grd` while guarding.
    pub grd: f64,
    /// Recovery effect multiplier.
    pub rec: f64,
    /// Experience multiplier.
    pub exr: f64,
}

impl Rates {
    pub const ACTOR_DEFAULT: Self = Self {
        hit: 0.95,
        eva: 0.05,
        cri: 0.04,
        cev: 0.0,
        mev: 0.0,
        mrf: 0.0,
        cnt: 0.0,
        hrg: 0.0,
        mrg: 0.0,
        tgr: 1.0,
        grd: 1.0,
        rec: 1.0,
        exr: 1.0,
    };
}

impl Default for Rates {
    fn default() -> Self {
        Self::ACTOR_DEFAULT
    }
}

bitflags::bitflags! {
    /// Per-battler special behavior flags.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct SpecialFlags: u8 {
        /// Actions are chosen by the computer instead of player input.
        const AUTO_BATTLE = 1 << 0;
        /// Takes hits aimed at dying allies.
        const SUBSTITUTE = 1 << 1;
    }
}

bitflags::bitflags! {
    /// Abilities granted to the whole party by any of its members.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct PartyAbility: u8 {
        const RAISE_PREEMPTIVE = 1 << 0;
        const CANCEL_SURPRISE = 1 << 1;
        const GOLD_DOUBLE = 1 << 2;
        const DROP_ITEM_DOUBLE = 1 << 3;
    }
}

bitflags::bitflags! {
    /// Motion and animation requests consumed by the presentation layer.
    ///
    /// The engine only raises flags; the presentation clears them once the
    /// matching sprite motion has started.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct MotionRequest: u8 {
        const REFRESH = 1 << 0;
        const ATTACK = 1 << 1;
        const DAMAGE = 1 << 2;
        const EVADE = 1 << 3;
        const COLLAPSE = 1 << 4;
        const GUARD = 1 << 5;
        const ESCAPE = 1 << 6;
        const VICTORY = 1 << 7;
    }
}

/// Cursor state of a battler during command input, used for display.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ActionState {
    #[default]
    Undecided,
    Inputting,
    Waiting,
    Acting,
    Done,
}
