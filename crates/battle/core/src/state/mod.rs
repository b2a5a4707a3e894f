//! Mutable battle state: battlers, rosters and the value types they carry.
mod battler;
mod common;
mod exp;
mod params;
mod status;
mod unit;

pub use battler::{
    ActorProfile, Battler, EnemyProfile, ExpiredStatuses, Regeneration, Role, SubjectStats,
};
pub use common::{ActorId, BattlerId, EnemyId, EventId, ItemId, Side, SkillId, TroopId};
pub use exp::ExpCurve;
pub use params::{ActionState, MotionRequest, Params, PartyAbility, Rates, SpecialFlags};
pub use status::{AutoRemoval, StatusEffect, StatusEffects, StatusKind};
pub use unit::{Combatants, Members, Party, Roster, Troop};
