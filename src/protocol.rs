use serde::{Deserialize, Serialize};

use crate::types::*;

/// Settings in the heat pump's own string tokens, e.g. `{"power": "ON", "mode": "HEAT"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireSettings {
    pub power: String,
    pub mode: String,
    pub temperature: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fan: Option<String>,
    pub vane: String,
    pub wide_vane: String,
}

impl Default for WireSettings {
    fn default() -> Self {
        Self {
            power: Power::Off.as_wire_str().to_string(),
            mode: Mode::Auto.as_wire_str().to_string(),
            temperature: 20.0,
            fan: Some(FanSpeed::Auto.as_wire_str().to_string()),
            vane: VerticalVane::Auto.as_wire_str().to_string(),
            wide_vane: HorizontalVane::Center.as_wire_str().to_string(),
        }
    }
}

pub fn encode_command(cmd: &HeatPumpCommand) -> WireSettings {
    WireSettings {
        power: cmd.power.as_wire_str().to_string(),
        mode: cmd.mode.as_wire_str().to_string(),
        temperature: cmd.temperature,
        fan: cmd.fan.map(|f| f.as_wire_str().to_string()),
        vane: cmd.vane.as_wire_str().to_string(),
        wide_vane: cmd.wide_vane.as_wire_str().to_string(),
    }
}

pub fn decode_settings(wire: &WireSettings) -> HeatPumpSettings {
    HeatPumpSettings {
        power: Power::from_wire_str(&wire.power),
        mode: Mode::from_wire_str(&wire.mode),
        temperature: wire.temperature,
        fan: wire.fan.as_deref().and_then(FanSpeed::from_wire_str),
        vane: VerticalVane::from_wire_str(&wire.vane),
        wide_vane: HorizontalVane::from_wire_str(&wire.wide_vane),
    }
}

/// Merge a command into the settings the unit holds, the way the unit applies it.
pub fn apply_command(current: &WireSettings, cmd: &WireSettings) -> WireSettings {
    WireSettings {
        fan: cmd.fan.clone().or_else(|| current.fan.clone()),
        ..cmd.clone()
    }
}
