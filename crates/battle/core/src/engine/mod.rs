//! Battle session: the phase state machine and the calculators it sequences.
//!
//! [`BattleSession`] owns the round cursor (subject, action, targets), the
//! escape state and the reward slot. Turn ordering, per-target resolution,
//! escape odds and rewards live in their own modules and are pure functions
//! over [`Combatants`](crate::state::Combatants) plus the injected RNG.

mod context;
mod escape;
mod host;
mod order;
mod phase;
mod resolver;
mod reward;
mod session;
mod turn;

pub use context::BattleContext;
pub use escape::{EscapeState, preemptive_rate, roll_encounter, surprise_rate};
pub use host::{BattleHost, BusyFlags, RecordingHost};
pub use order::{action_speed, make_action_orders, make_speed};
pub use phase::{AbortCheck, BattleOutcome, Encounter, Phase};
pub use resolver::InvokeOutcome;
pub use reward::{LevelUp, Rewards, gain_rewards, make_rewards};
pub use session::BattleSession;
