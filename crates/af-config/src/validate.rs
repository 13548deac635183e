//! Config validation logic.

use crate::schema::{DashboardConfig, LATEST_VERSION};

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_config(config: &DashboardConfig) -> Result<(), ValidationError> {
    if config.version != LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: config.version,
        });
    }

    if config.history.capacity == 0 {
        return Err(ValidationError::InvalidValue {
            field: "history.capacity".to_string(),
            value: "0".to_string(),
            reason: "must hold at least one reading".to_string(),
        });
    }

    if config.history.command_log == 0 {
        return Err(ValidationError::InvalidValue {
            field: "history.command_log".to_string(),
            value: "0".to_string(),
            reason: "must hold at least one command".to_string(),
        });
    }

    config
        .bands
        .validate()
        .map_err(|e| ValidationError::InvalidValue {
            field: "bands".to_string(),
            value: format!("{:?}", config.bands),
            reason: e.to_string(),
        })?;

    for (field, rule) in [("auto.light", &config.auto.light), ("auto.pump", &config.auto.pump)] {
        rule.validate().map_err(|e| ValidationError::InvalidValue {
            field: field.to_string(),
            value: format!("[{}, {})", rule.low, rule.high),
            reason: e.to_string(),
        })?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        validate_config(&DashboardConfig::default()).unwrap();
    }

    #[test]
    fn rejects_zero_capacity() {
        let mut config = DashboardConfig::default();
        config.history.capacity = 0;
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("history.capacity"));
    }

    #[test]
    fn rejects_zero_command_log() {
        let mut config = DashboardConfig::default();
        config.history.command_log = 0;
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("history.command_log"));
    }

    #[test]
    fn rejects_inverted_band() {
        let mut config = DashboardConfig::default();
        config.bands.humidity.min = 90.0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn rejects_inverted_hysteresis() {
        let mut config = DashboardConfig::default();
        config.auto.light.low = 600.0;
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("auto.light"));
    }

    #[test]
    fn rejects_version_zero() {
        let config = DashboardConfig {
            version: 0,
            ..DashboardConfig::default()
        };
        assert!(matches!(
            validate_config(&config),
            Err(ValidationError::UnsupportedVersion { version: 0 })
        ));
    }

    #[test]
    fn rejects_future_version() {
        let config = DashboardConfig {
            version: 99,
            ..DashboardConfig::default()
        };
        assert!(matches!(
            validate_config(&config),
            Err(ValidationError::UnsupportedVersion { version: 99 })
        ));
    }
}
