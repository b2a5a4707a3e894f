//! Battle rules loader.

use std::path::Path;

use battle_core::BattleConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for battle rules from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load a `BattleConfig` from a TOML file.
    ///
    /// Missing keys keep their defaults, so an empty file yields
    /// `BattleConfig::default()`.
    pub fn load(path: &Path) -> LoadResult<BattleConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<BattleConfig> {
        let config: BattleConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse battle config TOML: {}", e))?;
        if config.speed_variance_divisor <= 0 {
            anyhow::bail!(
                "speed_variance_divisor must be positive, got {}",
                config.speed_variance_divisor
            );
        }
        if config.escape_ratio_step <= 0.0 {
            anyhow::bail!(
                "escape_ratio_step must be positive, got {}",
                config.escape_ratio_step
            );
        }
        if config.escape_base_factor < 0.0 {
            anyhow::bail!(
                "escape_base_factor must not be negative, got {}",
                config.escape_base_factor
            );
        }
        if config.max_level == 0 {
            anyhow::bail!("max_level must be at least 1");
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = ConfigLoader::parse("").unwrap();
        assert_eq!(config, BattleConfig::default());
    }

    #[test]
    fn partial_config_overrides_selected_keys() {
        let config = ConfigLoader::parse("escape_ratio_step = 0.25\nmax_level = 50\n").unwrap();
        assert_eq!(config.escape_ratio_step, 0.25);
        assert_eq!(config.max_level, 50);
        assert_eq!(config.escape_base_factor, 0.5);
    }

    #[test]
    fn zero_divisor_is_rejected() {
        assert!(ConfigLoader::parse("speed_variance_divisor = 0").is_err());
    }

    #[test]
    fn escape_ratio_must_not_shrink() {
        for step in ["0.0", "-0.2"] {
            let err = ConfigLoader::parse(&format!("escape_ratio_step = {step}")).unwrap_err();
            assert!(err.to_string().contains("escape_ratio_step"));
        }
        let err = ConfigLoader::parse("escape_base_factor = -0.5").unwrap_err();
        assert!(err.to_string().contains("escape_base_factor"));
        assert!(ConfigLoader::parse("escape_base_factor = 0.0").is_ok());
    }
}
