use crate::state::AccessoryState;
use crate::types::*;

/// Build the one settings set the heat pump should run given the accessory state.
///
/// The thermostat wins over the dehumidifier, which wins over the plain fan.
/// Write handlers keep at most one of them active, so in practice only one
/// branch applies.
pub fn command_for(state: &AccessoryState) -> HeatPumpCommand {
    let thermostat = &state.thermostat;
    let fan = &state.fan;
    let dehumidifier = &state.dehumidifier;

    let thermostat_off = thermostat.target_state == TargetHeatingCoolingState::Off;
    let power = if thermostat_off && !fan.active.is_active() && !dehumidifier.active.is_active() {
        Power::Off
    } else {
        Power::On
    };

    let mode = match (power, thermostat.target_state) {
        (Power::Off, _) => Mode::Auto,
        (Power::On, TargetHeatingCoolingState::Heat) => Mode::Heat,
        (Power::On, TargetHeatingCoolingState::Cool) => Mode::Cool,
        (Power::On, TargetHeatingCoolingState::Auto) => Mode::Auto,
        (Power::On, TargetHeatingCoolingState::Off) if dehumidifier.active.is_active() => Mode::Dry,
        (Power::On, TargetHeatingCoolingState::Off) if fan.active.is_active() => Mode::Fan,
        (Power::On, TargetHeatingCoolingState::Off) => Mode::Auto,
    };

    let fan_speed = match fan.target_state {
        FanTargetState::Auto => Some(FanSpeed::Auto),
        FanTargetState::Manual => FanSpeed::from_rotation_speed(fan.rotation_speed),
    };

    let vane = if fan.swing_mode {
        VerticalVane::Swing
    } else {
        VerticalVane::Auto
    };

    let wide_vane = if dehumidifier.swing_mode {
        HorizontalVane::Swing
    } else {
        HorizontalVane::Center
    };

    HeatPumpCommand {
        power,
        mode,
        temperature: thermostat.target_temperature,
        fan: fan_speed,
        vane,
        wide_vane,
    }
}
