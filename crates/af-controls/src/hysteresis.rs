//! Two-threshold on/off rules.
//!
//! A rule switches on below `low` and off at or above `high`. Values in
//! `[low, high)` leave the output alone, which keeps a reading that hovers
//! around one threshold from toggling the actuator on every push.

use serde::{Deserialize, Serialize};

use crate::error::{ControlError, ControlResult};

/// Hysteresis thresholds in the units of the sensor they read.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hysteresis {
    /// Switch on when the value drops below this.
    pub low: f64,
    /// Switch off when the value reaches this.
    pub high: f64,
}

impl Hysteresis {
    /// Create a rule.
    ///
    /// # Errors
    ///
    /// Returns error if a threshold is non-finite or `low >= high`.
    pub fn new(low: f64, high: f64) -> ControlResult<Self> {
        let rule = Self { low, high };
        rule.validate()?;
        Ok(rule)
    }

    pub fn validate(&self) -> ControlResult<()> {
        if !self.low.is_finite() || !self.high.is_finite() {
            return Err(ControlError::InvalidArg {
                what: "hysteresis thresholds must be finite",
            });
        }
        if self.low >= self.high {
            return Err(ControlError::InvalidArg {
                what: "hysteresis low threshold must be below high threshold",
            });
        }
        Ok(())
    }

    /// New output state, or `None` if the output should stay as it is.
    pub fn decide(&self, value: f64, currently_on: bool) -> Option<bool> {
        if value < self.low && !currently_on {
            Some(true)
        } else if value >= self.high && currently_on {
            Some(false)
        } else {
            None
        }
    }
}

/// Auto-mode rules for both actuators.
///
/// Light follows sunlight; the pump follows soil moisture. Both sensors report
/// raw ADC counts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoThresholds {
    pub light: Hysteresis,
    pub pump: Hysteresis,
}

impl Default for AutoThresholds {
    fn default() -> Self {
        Self {
            light: Hysteresis {
                low: 300.0,
                high: 500.0,
            },
            pump: Hysteresis {
                low: 300.0,
                high: 600.0,
            },
        }
    }
}

impl AutoThresholds {
    pub fn validate(&self) -> ControlResult<()> {
        self.light.validate()?;
        self.pump.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn switches_at_thresholds() {
        let rule = Hysteresis::new(300.0, 500.0).unwrap();
        assert_eq!(rule.decide(299.0, false), Some(true));
        assert_eq!(rule.decide(300.0, false), None);
        assert_eq!(rule.decide(500.0, true), Some(false));
        assert_eq!(rule.decide(499.9, true), None);
    }

    #[test]
    fn already_in_target_state() {
        let rule = Hysteresis::new(300.0, 500.0).unwrap();
        assert_eq!(rule.decide(100.0, true), None);
        assert_eq!(rule.decide(900.0, false), None);
    }

    #[test]
    fn invalid_parameters() {
        assert!(Hysteresis::new(500.0, 300.0).is_err());
        assert!(Hysteresis::new(300.0, 300.0).is_err());
        assert!(Hysteresis::new(f64::NAN, 300.0).is_err());
        assert!(AutoThresholds::default().validate().is_ok());
    }

    proptest! {
        #[test]
        fn dead_zone_never_switches(v in 300.0f64..500.0, on in any::<bool>()) {
            let rule = AutoThresholds::default().light;
            prop_assert_eq!(rule.decide(v, on), None);
        }

        #[test]
        fn decision_always_flips(v in -100.0f64..1200.0, on in any::<bool>()) {
            let rule = AutoThresholds::default().pump;
            if let Some(next) = rule.decide(v, on) {
                prop_assert_ne!(next, on);
            }
        }
    }
}
