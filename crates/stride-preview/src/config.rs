use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Serde default functions
// ---------------------------------------------------------------------------

const fn default_sample_time() -> f64 {
    0.001
}
const fn default_step_height() -> f64 {
    0.1
}
const fn default_slip_height() -> f64 {
    0.6
}
const fn default_slip_stiffness() -> f64 {
    1000.0
}

// ---------------------------------------------------------------------------
// SlipModel
// ---------------------------------------------------------------------------

/// Spring-loaded inverted pendulum parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlipModel {
    /// Nominal pendulum length in meters, sets the horizontal natural
    /// frequency `sqrt(g / height)`.
    #[serde(default = "default_slip_height")]
    pub height: f64,

    /// Leg stiffness in N/m, sets the vertical frequency
    /// `sqrt(stiffness / mass)`.
    #[serde(default = "default_slip_stiffness")]
    pub stiffness: f64,
}

impl Default for SlipModel {
    fn default() -> Self {
        Self {
            height: default_slip_height(),
            stiffness: default_slip_stiffness(),
        }
    }
}

// ---------------------------------------------------------------------------
// PreviewConfig
// ---------------------------------------------------------------------------

/// Preview controller configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewConfig {
    /// Spacing between preview samples in seconds (default: 0.001).
    #[serde(default = "default_sample_time")]
    pub sample_time: f64,

    /// Swing foot clearance in meters (default: 0.1).
    #[serde(default = "default_step_height")]
    pub step_height: f64,

    /// Normal force above which a contact counts as active, in N.
    #[serde(default)]
    pub force_threshold: f64,

    #[serde(default)]
    pub slip: SlipModel,

    /// Feet to track instead of the leaf links of the robot model.
    #[serde(default)]
    pub end_effectors: Option<Vec<String>>,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            sample_time: default_sample_time(),
            step_height: default_step_height(),
            force_threshold: 0.0,
            slip: SlipModel::default(),
            end_effectors: None,
        }
    }
}

impl PreviewConfig {
    /// Validate configuration. Returns Err on invalid values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.sample_time > 0.0 && self.sample_time.is_finite()) {
            return Err(ConfigError::InvalidSampleTime(self.sample_time));
        }
        positive("slip.height", self.slip.height)?;
        positive("slip.stiffness", self.slip.stiffness)?;
        non_negative("step_height", self.step_height)?;
        non_negative("force_threshold", self.force_threshold)?;
        Ok(())
    }

    /// Preview rate in Hz.
    pub fn sample_hz(&self) -> f64 {
        1.0 / self.sample_time
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

fn non_negative(field: &str, value: f64) -> Result<(), ConfigError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, "must be >= 0"))
    }
}

fn positive(field: &str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, "must be > 0"))
    }
}

fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.into(),
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = PreviewConfig::default();
        assert!(config.validate().is_ok());
        assert!((config.sample_time - 0.001).abs() < f64::EPSILON);
        assert!((config.step_height - 0.1).abs() < f64::EPSILON);
        assert!((config.sample_hz() - 1000.0).abs() < 1e-9);
        assert!(config.end_effectors.is_none());
    }

    #[test]
    fn rejects_non_positive_sample_time() {
        let config = PreviewConfig {
            sample_time: 0.0,
            ..PreviewConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidSampleTime(_))
        ));
    }

    #[test]
    fn rejects_bad_slip_model() {
        let config = PreviewConfig {
            slip: SlipModel {
                height: 0.5,
                stiffness: -10.0,
            },
            ..PreviewConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("slip.stiffness"));
    }

    #[test]
    fn rejects_negative_step_height() {
        let config = PreviewConfig {
            step_height: -0.05,
            ..PreviewConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field, .. }) if field == "step_height"
        ));
    }

    #[test]
    fn parse_partial_toml_uses_defaults() {
        let config = PreviewConfig::from_toml_str(
            r#"
            sample_time = 0.01
            force_threshold = 5.0

            [slip]
            height = 0.45
            "#,
        )
        .unwrap();
        assert!((config.sample_time - 0.01).abs() < f64::EPSILON);
        assert!((config.force_threshold - 5.0).abs() < f64::EPSILON);
        assert!((config.slip.height - 0.45).abs() < f64::EPSILON);
        assert!((config.slip.stiffness - 1000.0).abs() < f64::EPSILON);
        assert!((config.step_height - 0.1).abs() < f64::EPSILON);
    }

    #[test]
    fn parse_end_effector_override() {
        let config = PreviewConfig::from_toml_str(
            r#"end_effectors = ["lf_foot", "rh_foot"]"#,
        )
        .unwrap();
        assert_eq!(
            config.end_effectors.as_deref(),
            Some(&["lf_foot".to_string(), "rh_foot".to_string()][..])
        );
    }

    #[test]
    fn invalid_toml_is_rejected() {
        let err = PreviewConfig::from_toml_str("sample_time = -1.0").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSampleTime(_)));

        let err = PreviewConfig::from_toml_str("sample_time = [").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = PreviewConfig::from_file("/nonexistent/preview.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
