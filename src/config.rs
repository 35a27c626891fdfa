//! Configuration types.

use crate::error::ConfigError;

/// Engine configuration.
///
/// The onboarding flow never collects body metrics, so the meal generator's
/// weight and baseline-expenditure inputs live here and can be overridden by
/// an embedding caller that has real biometrics.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Assumed body weight for protein targets, in kilograms.
    pub avg_weight_kg: f64,
    /// Baseline daily energy expenditure before the activity multiplier.
    pub base_tdee_kcal: u32,
    /// Allowed relative deviation between macro calories and daily calories.
    pub macro_tolerance: f64,
    /// Seconds per repetition used when estimating workout-day duration.
    pub seconds_per_rep: u32,
    /// Minimum number of sample meals a meal plan must carry.
    pub min_sample_meals: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            avg_weight_kg: 75.0,
            base_tdee_kcal: 2000,
            macro_tolerance: 0.10,
            seconds_per_rep: 4,
            min_sample_meals: 3,
        }
    }
}

impl EngineConfig {
    /// Check that all values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.avg_weight_kg <= 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "avg_weight_kg".into(),
                message: format!("must be positive, got {}", self.avg_weight_kg),
            });
        }
        if self.base_tdee_kcal == 0 {
            return Err(ConfigError::InvalidValue {
                key: "base_tdee_kcal".into(),
                message: "must be positive".into(),
            });
        }
        if !(0.0..1.0).contains(&self.macro_tolerance) {
            return Err(ConfigError::InvalidValue {
                key: "macro_tolerance".into(),
                message: format!("must be in [0, 1), got {}", self.macro_tolerance),
            });
        }
        if self.seconds_per_rep == 0 {
            return Err(ConfigError::InvalidValue {
                key: "seconds_per_rep".into(),
                message: "must be positive".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_zero_weight() {
        let config = EngineConfig {
            avg_weight_kg: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_out_of_range_tolerance() {
        let config = EngineConfig {
            macro_tolerance: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
