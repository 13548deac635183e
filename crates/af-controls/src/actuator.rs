//! Actuator state and partial state updates.

use std::fmt;

use af_telemetry::Reading;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::mode::ControlMode;

/// The two switched outputs of the field controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Actuator {
    Light,
    Pump,
}

impl Actuator {
    pub fn wire_key(self) -> &'static str {
        match self {
            Actuator::Light => "light",
            Actuator::Pump => "pump",
        }
    }
}

impl fmt::Display for Actuator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_key())
    }
}

/// Last known on/off state of both actuators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ActuatorState {
    pub light: bool,
    pub pump: bool,
}

impl ActuatorState {
    /// State reported by the store alongside a reading.
    pub fn observed(reading: &Reading) -> Self {
        Self {
            light: reading.light_on,
            pump: reading.pump_on,
        }
    }

    pub fn get(&self, actuator: Actuator) -> bool {
        match actuator {
            Actuator::Light => self.light,
            Actuator::Pump => self.pump,
        }
    }

    pub fn set(&mut self, actuator: Actuator, on: bool) {
        match actuator {
            Actuator::Light => self.light = on,
            Actuator::Pump => self.pump = on,
        }
    }

    /// Apply the actuator fields of a command.
    pub fn apply(&mut self, command: &ActuatorCommand) {
        if let Some(on) = command.light {
            self.light = on;
        }
        if let Some(on) = command.pump {
            self.pump = on;
        }
    }

    /// Restore the fields named by `command` from `previous`.
    pub fn revert(&mut self, command: &ActuatorCommand, previous: &ActuatorState) {
        if command.light.is_some() {
            self.light = previous.light;
        }
        if command.pump.is_some() {
            self.pump = previous.pump;
        }
    }
}

/// Partial update merged into the store. `None` fields are left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ActuatorCommand {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub light: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pump: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_mode: Option<ControlMode>,
}

impl ActuatorCommand {
    pub fn set(actuator: Actuator, on: bool) -> Self {
        let mut cmd = Self::default();
        match actuator {
            Actuator::Light => cmd.light = Some(on),
            Actuator::Pump => cmd.pump = Some(on),
        }
        cmd
    }

    pub fn mode(mode: ControlMode) -> Self {
        Self {
            control_mode: Some(mode),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.light.is_none() && self.pump.is_none() && self.control_mode.is_none()
    }

    /// Store representation: actuators as `1`/`0`, mode as `controlMode`.
    pub fn to_wire(&self) -> Value {
        let mut obj = Map::new();
        if let Some(on) = self.light {
            obj.insert("light".to_string(), Value::from(u8::from(on)));
        }
        if let Some(on) = self.pump {
            obj.insert("pump".to_string(), Value::from(u8::from(on)));
        }
        if let Some(mode) = self.control_mode {
            obj.insert("controlMode".to_string(), Value::from(mode.as_str()));
        }
        Value::Object(obj)
    }
}

impl fmt::Display for ActuatorCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let on_off = |on: bool| if on { "ON" } else { "OFF" };
        let mut parts = Vec::new();
        if let Some(on) = self.light {
            parts.push(format!("light={}", on_off(on)));
        }
        if let Some(on) = self.pump {
            parts.push(format!("pump={}", on_off(on)));
        }
        if let Some(mode) = self.control_mode {
            parts.push(format!("mode={mode}"));
        }
        write!(f, "{}", parts.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wire_form_uses_integers() {
        let cmd = ActuatorCommand {
            light: Some(true),
            pump: Some(false),
            control_mode: None,
        };
        assert_eq!(cmd.to_wire(), json!({ "light": 1, "pump": 0 }));
        assert_eq!(
            ActuatorCommand::mode(ControlMode::Auto).to_wire(),
            json!({ "controlMode": "auto" })
        );
    }

    #[test]
    fn revert_only_touches_commanded_fields() {
        let previous = ActuatorState {
            light: false,
            pump: true,
        };
        let cmd = ActuatorCommand::set(Actuator::Light, true);
        let mut state = previous;
        state.apply(&cmd);
        state.pump = false;
        state.revert(&cmd, &previous);
        assert_eq!(
            state,
            ActuatorState {
                light: false,
                pump: false
            }
        );
    }

    #[test]
    fn display_lists_fields() {
        let cmd = ActuatorCommand {
            light: Some(true),
            pump: Some(false),
            control_mode: None,
        };
        assert_eq!(cmd.to_string(), "light=ON pump=OFF");
        assert!(ActuatorCommand::default().is_empty());
    }
}
