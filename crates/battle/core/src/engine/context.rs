use super::BattleHost;
use crate::env::CatalogOracle;
use crate::event::BattleEvent;
use crate::state::Combatants;

/// Everything the session borrows for one call: the combatants it mutates,
/// the catalog it reads and the host it reports to.
pub struct BattleContext<'a> {
    pub units: &'a mut Combatants,
    pub catalog: &'a dyn CatalogOracle,
    pub host: &'a mut dyn BattleHost,
}

impl<'a> BattleContext<'a> {
    pub fn new(
        units: &'a mut Combatants,
        catalog: &'a dyn CatalogOracle,
        host: &'a mut dyn BattleHost,
    ) -> Self {
        Self {
            units,
            catalog,
            host,
        }
    }

    #[inline]
    pub(crate) fn publish(&mut self, event: BattleEvent) {
        self.host.publish(event);
    }
}
