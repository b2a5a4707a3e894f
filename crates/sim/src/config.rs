//! Simulator settings read from the environment.
use std::env;

/// Runtime knobs that are not worth a command-line flag.
#[derive(Clone, Debug)]
pub struct SimConfig {
    /// Tick budget before the battle is declared stalled.
    pub max_ticks: u32,
    /// Ticks the host stays busy after each published event.
    pub busy_ticks: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            max_ticks: 50_000,
            busy_ticks: 2,
        }
    }
}

impl SimConfig {
    /// Construct configuration from environment variables.
    ///
    /// Environment variables:
    /// - `BATTLE_SIM_MAX_TICKS` - Tick budget (default: 50000)
    /// - `BATTLE_SIM_BUSY_TICKS` - Busy ticks per event (default: 2)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(ticks) = read_env::<u32>("BATTLE_SIM_MAX_TICKS") {
            config.max_ticks = ticks.max(1);
        }
        if let Some(ticks) = read_env::<u32>("BATTLE_SIM_BUSY_TICKS") {
            config.busy_ticks = ticks;
        }

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
