//! Configuration validation.
//!
//! Checks that configured values are present and within valid ranges
//! before anything is started with them.

use thiserror::Error;

use crate::config::{Config, DashboardConfig, MnavBands, ObservabilityConfig};
use crate::error::Error as CommonError;
use crate::logging::{LOG_FORMATS, LOG_LEVELS};

/// Configuration validation error.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Configuration conflict: {reason}")]
    Conflict { reason: String },

    #[error("Multiple validation errors: {0:?}")]
    Multiple(Vec<ValidationError>),
}

impl From<ValidationError> for CommonError {
    fn from(e: ValidationError) -> Self {
        CommonError::Config(e.to_string())
    }
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Trait for validatable configuration sections.
pub trait Validate {
    /// Validate this configuration section.
    fn validate(&self) -> ValidationResult<()>;
}

impl Config {
    /// Validate the entire configuration.
    pub fn validate(&self) -> ValidationResult<()> {
        let mut errors = Vec::new();

        if let Err(e) = self.observability.validate() {
            errors.push(e);
        }

        if let Err(e) = self.dashboard.validate() {
            errors.push(e);
        }

        if errors.is_empty() {
            Ok(())
        } else if errors.len() == 1 {
            Err(errors.remove(0))
        } else {
            Err(ValidationError::Multiple(errors))
        }
    }

    /// Load, apply environment overrides and validate.
    pub fn load_and_validate() -> anyhow::Result<Self> {
        let config = Self::load_with_env()?;
        config.validate().map_err(CommonError::from)?;
        Ok(config)
    }
}

impl Validate for ObservabilityConfig {
    fn validate(&self) -> ValidationResult<()> {
        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            return Err(ValidationError::InvalidValue {
                field: "observability.log_level".into(),
                reason: format!("must be one of {}", LOG_LEVELS.join(", ")),
            });
        }

        if !LOG_FORMATS.contains(&self.log_format.as_str()) {
            return Err(ValidationError::InvalidValue {
                field: "observability.log_format".into(),
                reason: format!("must be one of {}", LOG_FORMATS.join(", ")),
            });
        }

        Ok(())
    }
}

impl Validate for MnavBands {
    fn validate(&self) -> ValidationResult<()> {
        for (field, value) in [
            ("dashboard.mnav_bands.discount_below", self.discount_below),
            ("dashboard.mnav_bands.premium_above", self.premium_above),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ValidationError::InvalidValue {
                    field: field.into(),
                    reason: "must be a positive finite number".into(),
                });
            }
        }

        if self.discount_below > self.premium_above {
            return Err(ValidationError::Conflict {
                reason: format!(
                    "discount_below ({}) is above premium_above ({})",
                    self.discount_below, self.premium_above
                ),
            });
        }

        Ok(())
    }
}

impl Validate for DashboardConfig {
    fn validate(&self) -> ValidationResult<()> {
        self.mnav_bands.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test_case("info" ; "lowercase")]
    #[test_case("WARN" ; "uppercase")]
    #[test_case("trace" ; "trace")]
    fn test_accepts_log_level(level: &str) {
        let obs = ObservabilityConfig {
            log_level: level.into(),
            ..Default::default()
        };
        assert!(obs.validate().is_ok());
    }

    #[test]
    fn test_rejects_unknown_format() {
        let obs = ObservabilityConfig {
            log_format: "xml".into(),
            ..Default::default()
        };
        assert!(matches!(
            obs.validate(),
            Err(ValidationError::InvalidValue { .. })
        ));
    }

    #[test_case(0.0, 1.5 ; "zero discount")]
    #[test_case(f64::NAN, 1.5 ; "nan discount")]
    #[test_case(1.0, -1.0 ; "negative premium")]
    fn test_rejects_bad_band_values(discount_below: f64, premium_above: f64) {
        let bands = MnavBands {
            discount_below,
            premium_above,
        };
        assert!(bands.validate().is_err());
    }

    #[test]
    fn test_rejects_inverted_bands() {
        let bands = MnavBands {
            discount_below: 2.0,
            premium_above: 1.5,
        };
        assert!(matches!(
            bands.validate(),
            Err(ValidationError::Conflict { .. })
        ));
    }

    #[test]
    fn test_collects_multiple_errors() {
        let mut config = Config::default();
        config.observability.log_format = "xml".into();
        config.dashboard.mnav_bands.discount_below = 3.0;
        assert!(matches!(
            config.validate(),
            Err(ValidationError::Multiple(errs)) if errs.len() == 2
        ));
    }

    #[test]
    fn test_validation_failure_becomes_config_error() {
        let mut config = Config::default();
        config.observability.log_level = "loud".into();
        let err = CommonError::from(config.validate().unwrap_err());
        assert!(matches!(err, CommonError::Config(_)));
        assert!(err.to_string().contains("observability.log_level"));
    }
}
