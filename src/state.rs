use serde::Serialize;

use crate::types::*;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThermostatState {
    pub current_temperature: f32,
    pub target_temperature: f32,
    pub current_state: CurrentHeatingCoolingState,
    pub target_state: TargetHeatingCoolingState,
}

impl Default for ThermostatState {
    fn default() -> Self {
        Self {
            current_temperature: 20.0,
            target_temperature: 20.0,
            current_state: CurrentHeatingCoolingState::Off,
            target_state: TargetHeatingCoolingState::Off,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct FanState {
    pub active: Active,
    pub rotation_speed: f32,
    pub target_state: FanTargetState,
    pub swing_mode: bool,
    pub current_state: FanCurrentState,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct DehumidifierState {
    pub active: Active,
    pub swing_mode: bool,
    pub current_state: DehumidifierCurrentState,
}

/// The accessory-side view of the heat pump: three HomeKit services backed by one unit.
///
/// Every mutation goes through a compare-and-set so that only real changes
/// are reported to controllers.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AccessoryState {
    pub thermostat: ThermostatState,
    pub fan: FanState,
    pub dehumidifier: DehumidifierState,
    #[serde(skip)]
    pending: Vec<Notification>,
}

fn compare_and_set<T>(
    slot: &mut T,
    value: T,
    characteristic: Characteristic,
    notify: bool,
    pending: &mut Vec<Notification>,
) -> bool
where
    T: PartialEq + Copy + Into<CharacteristicValue>,
{
    if *slot == value {
        return false;
    }
    *slot = value;
    if notify {
        pending.push(Notification {
            characteristic,
            value: value.into(),
        });
    }
    true
}

impl AccessoryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications queued since the last drain, in the order they happened.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.pending)
    }

    pub fn value_of(&self, characteristic: Characteristic) -> CharacteristicValue {
        match characteristic {
            Characteristic::CurrentTemperature => self.thermostat.current_temperature.into(),
            Characteristic::TargetTemperature => self.thermostat.target_temperature.into(),
            Characteristic::CurrentHeatingCoolingState => self.thermostat.current_state.into(),
            Characteristic::TargetHeatingCoolingState => self.thermostat.target_state.into(),
            Characteristic::FanActive => self.fan.active.into(),
            Characteristic::FanRotationSpeed => self.fan.rotation_speed.into(),
            Characteristic::FanTargetState => self.fan.target_state.into(),
            Characteristic::FanCurrentState => self.fan.current_state.into(),
            Characteristic::FanSwingMode => self.fan.swing_mode.into(),
            Characteristic::DehumidifierActive => self.dehumidifier.active.into(),
            Characteristic::DehumidifierCurrentState => self.dehumidifier.current_state.into(),
            Characteristic::DehumidifierSwingMode => self.dehumidifier.swing_mode.into(),
        }
    }

    pub(crate) fn set_current_temperature(&mut self, v: f32, notify: bool) -> bool {
        compare_and_set(
            &mut self.thermostat.current_temperature,
            v,
            Characteristic::CurrentTemperature,
            notify,
            &mut self.pending,
        )
    }

    pub(crate) fn set_target_temperature(&mut self, v: f32, notify: bool) -> bool {
        compare_and_set(
            &mut self.thermostat.target_temperature,
            v,
            Characteristic::TargetTemperature,
            notify,
            &mut self.pending,
        )
    }

    pub(crate) fn set_current_heating_cooling_state(
        &mut self,
        v: CurrentHeatingCoolingState,
        notify: bool,
    ) -> bool {
        compare_and_set(
            &mut self.thermostat.current_state,
            v,
            Characteristic::CurrentHeatingCoolingState,
            notify,
            &mut self.pending,
        )
    }

    pub(crate) fn set_target_heating_cooling_state(
        &mut self,
        v: TargetHeatingCoolingState,
        notify: bool,
    ) -> bool {
        compare_and_set(
            &mut self.thermostat.target_state,
            v,
            Characteristic::TargetHeatingCoolingState,
            notify,
            &mut self.pending,
        )
    }

    pub(crate) fn set_fan_active(&mut self, v: Active, notify: bool) -> bool {
        compare_and_set(
            &mut self.fan.active,
            v,
            Characteristic::FanActive,
            notify,
            &mut self.pending,
        )
    }

    pub(crate) fn set_fan_rotation_speed(&mut self, v: f32, notify: bool) -> bool {
        compare_and_set(
            &mut self.fan.rotation_speed,
            v,
            Characteristic::FanRotationSpeed,
            notify,
            &mut self.pending,
        )
    }

    pub(crate) fn set_fan_target_state(&mut self, v: FanTargetState, notify: bool) -> bool {
        compare_and_set(
            &mut self.fan.target_state,
            v,
            Characteristic::FanTargetState,
            notify,
            &mut self.pending,
        )
    }

    pub(crate) fn set_fan_current_state(&mut self, v: FanCurrentState, notify: bool) -> bool {
        compare_and_set(
            &mut self.fan.current_state,
            v,
            Characteristic::FanCurrentState,
            notify,
            &mut self.pending,
        )
    }

    pub(crate) fn set_fan_swing_mode(&mut self, v: bool, notify: bool) -> bool {
        compare_and_set(
            &mut self.fan.swing_mode,
            v,
            Characteristic::FanSwingMode,
            notify,
            &mut self.pending,
        )
    }

    pub(crate) fn set_dehumidifier_active(&mut self, v: Active, notify: bool) -> bool {
        compare_and_set(
            &mut self.dehumidifier.active,
            v,
            Characteristic::DehumidifierActive,
            notify,
            &mut self.pending,
        )
    }

    pub(crate) fn set_dehumidifier_current_state(
        &mut self,
        v: DehumidifierCurrentState,
        notify: bool,
    ) -> bool {
        compare_and_set(
            &mut self.dehumidifier.current_state,
            v,
            Characteristic::DehumidifierCurrentState,
            notify,
            &mut self.pending,
        )
    }

    pub(crate) fn set_dehumidifier_swing_mode(&mut self, v: bool, notify: bool) -> bool {
        compare_and_set(
            &mut self.dehumidifier.swing_mode,
            v,
            Characteristic::DehumidifierSwingMode,
            notify,
            &mut self.pending,
        )
    }
}
