//! Shared per-simulation state.
//!
//! Everything a tick reads besides the physics service and the entity
//! lists: tuning, the gravity field and the target registry. Passed
//! explicitly; there is no global world.

use log::info;

use crate::config::SimConfig;
use crate::error::ConfigError;
use crate::gravity::GravityField;
use crate::guidance::TargetRegistry;

#[derive(Debug)]
pub struct SimContext {
    pub config: SimConfig,
    pub gravity: GravityField,
    pub targets: TargetRegistry,
}

impl SimContext {
    /// Validate `config` and build the gravity field from it.
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let gravity = GravityField::from_config(&config.gravity);
        info!(
            "simulation context: gravity {:.2} m/s^2 toward {:?}, {} Hz",
            gravity.strength(),
            gravity.center(),
            config.tick_rate
        );
        Ok(Self {
            config,
            gravity,
            targets: TargetRegistry::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_from_defaults() {
        let context = SimContext::new(SimConfig::default()).expect("defaults are valid");
        assert_eq!(context.gravity.strength(), context.config.gravity.strength);
        assert!(context.targets.is_empty());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = SimConfig::default();
        config.gravity.strength = -1.0;
        assert!(matches!(SimContext::new(config), Err(ConfigError::Invalid { .. })));
    }
}
