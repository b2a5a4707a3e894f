//! Usability checks and cost payment.

use super::{Action, ActionError, ActionItem};
use crate::env::CatalogOracle;
use crate::state::Combatants;

/// Checks that `action` can still be performed by its subject.
///
/// Forced actions only need an existing skill or item.
pub fn validate(
    action: &Action,
    units: &Combatants,
    catalog: &dyn CatalogOracle,
) -> Result<(), ActionError> {
    let subject = units
        .battler(action.subject)
        .ok_or(ActionError::SubjectMissing(action.subject))?;
    let item = action.item.ok_or(ActionError::EmptyAction(action.subject))?;

    match item {
        ActionItem::Skill(id) => {
            let skill = catalog.skill(id).ok_or(ActionError::UnknownSkill(id))?;
            if action.forcing {
                return Ok(());
            }
            if !subject.can_move() {
                return Err(ActionError::SubjectCannotMove(subject.id));
            }
            if subject.mp() < skill.mp_cost {
                return Err(ActionError::InsufficientMp {
                    subject: subject.id,
                    required: skill.mp_cost,
                    available: subject.mp(),
                });
            }
        }
        ActionItem::Item(id) => {
            catalog.item(id).ok_or(ActionError::UnknownItem(id))?;
            if action.forcing {
                return Ok(());
            }
            if !subject.can_move() {
                return Err(ActionError::SubjectCannotMove(subject.id));
            }
            if !subject.is_actor() || !units.party.has_item(id) {
                return Err(ActionError::ItemUnavailable {
                    subject: subject.id,
                    item: id,
                });
            }
        }
    }
    Ok(())
}

/// Pays the MP cost of a skill or consumes the item from the party inventory.
pub fn pay_cost(action: &Action, units: &mut Combatants, catalog: &dyn CatalogOracle) {
    match action.item {
        Some(ActionItem::Skill(id)) => {
            let cost = catalog.skill(id).map_or(0, |skill| skill.mp_cost);
            if let Some(subject) = units.battler_mut(action.subject) {
                subject.gain_mp(-cost);
            }
        }
        Some(ActionItem::Item(id)) => {
            if catalog.item(id).is_some_and(|item| item.consumable) {
                units.party.consume_item(id);
            }
        }
        None => {}
    }
}
