//! Entry points for values written by HomeKit controllers.
//!
//! Each handler stores the written value without echoing it back, then
//! adjusts the other services so that only one of heating/cooling,
//! dehumidifying or plain fan is requested, and finally arms the update
//! scheduler. None of them talk to the heat pump directly.

use std::ops::RangeInclusive;
use std::time::Instant;

use tracing::debug;

use crate::scheduler::UpdateScheduler;
use crate::state::AccessoryState;
use crate::types::*;
use crate::{Error, Result};

/// Target temperatures a controller may set, in degrees Celsius.
pub const TARGET_TEMPERATURE_RANGE: RangeInclusive<f32> = 10.0..=38.0;

/// A decoded controller write to one of the writable characteristics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AccessoryWrite {
    TargetHeatingCoolingState(TargetHeatingCoolingState),
    TargetTemperature(f32),
    DehumidifierActive(Active),
    DehumidifierSwingMode(bool),
    FanActive(Active),
    FanRotationSpeed(f32),
    FanTargetState(FanTargetState),
    FanSwingMode(bool),
}

impl AccessoryWrite {
    /// Decode a raw HomeKit value written to `characteristic`.
    pub fn decode(characteristic: Characteristic, value: CharacteristicValue) -> Result<Self> {
        let invalid = || Error::InvalidValue {
            characteristic,
            value,
        };
        let swing = || match value.as_u8() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(invalid()),
        };

        match characteristic {
            Characteristic::TargetHeatingCoolingState => value
                .as_u8()
                .and_then(TargetHeatingCoolingState::from_homekit)
                .map(AccessoryWrite::TargetHeatingCoolingState)
                .ok_or_else(invalid),
            Characteristic::TargetTemperature => value
                .as_f32()
                .filter(|t| TARGET_TEMPERATURE_RANGE.contains(t))
                .map(AccessoryWrite::TargetTemperature)
                .ok_or_else(invalid),
            Characteristic::DehumidifierActive => value
                .as_u8()
                .and_then(Active::from_homekit)
                .map(AccessoryWrite::DehumidifierActive)
                .ok_or_else(invalid),
            Characteristic::DehumidifierSwingMode => swing().map(AccessoryWrite::DehumidifierSwingMode),
            Characteristic::FanActive => value
                .as_u8()
                .and_then(Active::from_homekit)
                .map(AccessoryWrite::FanActive)
                .ok_or_else(invalid),
            Characteristic::FanRotationSpeed => value
                .as_f32()
                .filter(|s| (0.0..=100.0).contains(s))
                .map(AccessoryWrite::FanRotationSpeed)
                .ok_or_else(invalid),
            Characteristic::FanTargetState => value
                .as_u8()
                .and_then(FanTargetState::from_homekit)
                .map(AccessoryWrite::FanTargetState)
                .ok_or_else(invalid),
            Characteristic::FanSwingMode => swing().map(AccessoryWrite::FanSwingMode),
            Characteristic::CurrentTemperature
            | Characteristic::CurrentHeatingCoolingState
            | Characteristic::FanCurrentState
            | Characteristic::DehumidifierCurrentState => Err(Error::ReadOnly(characteristic)),
        }
    }

    pub fn characteristic(&self) -> Characteristic {
        match self {
            AccessoryWrite::TargetHeatingCoolingState(_) => Characteristic::TargetHeatingCoolingState,
            AccessoryWrite::TargetTemperature(_) => Characteristic::TargetTemperature,
            AccessoryWrite::DehumidifierActive(_) => Characteristic::DehumidifierActive,
            AccessoryWrite::DehumidifierSwingMode(_) => Characteristic::DehumidifierSwingMode,
            AccessoryWrite::FanActive(_) => Characteristic::FanActive,
            AccessoryWrite::FanRotationSpeed(_) => Characteristic::FanRotationSpeed,
            AccessoryWrite::FanTargetState(_) => Characteristic::FanTargetState,
            AccessoryWrite::FanSwingMode(_) => Characteristic::FanSwingMode,
        }
    }
}

/// Route a write to its handler.
pub fn apply(
    state: &mut AccessoryState,
    scheduler: &mut UpdateScheduler,
    now: Instant,
    write: AccessoryWrite,
) {
    match write {
        AccessoryWrite::TargetHeatingCoolingState(v) => {
            set_target_heating_cooling_state(state, scheduler, now, v)
        }
        AccessoryWrite::TargetTemperature(v) => set_target_temperature(state, scheduler, now, v),
        AccessoryWrite::DehumidifierActive(v) => set_dehumidifier_active(state, scheduler, now, v),
        AccessoryWrite::DehumidifierSwingMode(v) => {
            set_dehumidifier_swing_mode(state, scheduler, now, v)
        }
        AccessoryWrite::FanActive(v) => set_fan_active(state, scheduler, now, v),
        AccessoryWrite::FanRotationSpeed(v) => set_fan_rotation_speed(state, scheduler, now, v),
        AccessoryWrite::FanTargetState(v) => set_fan_target_state(state, scheduler, now, v),
        AccessoryWrite::FanSwingMode(v) => set_fan_swing_mode(state, scheduler, now, v),
    }
}

/// Turn the fan on or off as a side effect of another service.
/// The fan runs in AUTO unless a usable manual speed is already set.
fn update_fan_state(state: &mut AccessoryState, active: bool) {
    state.set_fan_active(Active::from(active), true);
    if !active {
        return;
    }
    match state.fan.target_state {
        FanTargetState::Auto => {
            state.set_fan_rotation_speed(AUTO_FAN_SPEED, true);
        }
        FanTargetState::Manual if state.fan.rotation_speed < AUTO_FAN_SPEED => {
            state.set_fan_target_state(FanTargetState::Auto, true);
            state.set_fan_rotation_speed(AUTO_FAN_SPEED, true);
        }
        FanTargetState::Manual => {}
    }
}

pub fn set_target_heating_cooling_state(
    state: &mut AccessoryState,
    scheduler: &mut UpdateScheduler,
    now: Instant,
    target: TargetHeatingCoolingState,
) {
    state.set_target_heating_cooling_state(target, false);
    debug!(?target, "controller set thermostat target state");

    if target != TargetHeatingCoolingState::Off {
        update_fan_state(state, true);
        state.set_dehumidifier_active(Active::Inactive, true);
    } else if !state.dehumidifier.active.is_active() {
        update_fan_state(state, false);
    }

    scheduler.request_update(now);
}

pub fn set_target_temperature(
    state: &mut AccessoryState,
    scheduler: &mut UpdateScheduler,
    now: Instant,
    temperature: f32,
) {
    state.set_target_temperature(temperature, false);
    debug!(temperature, "controller set target temperature");

    scheduler.request_update(now);
}

pub fn set_dehumidifier_active(
    state: &mut AccessoryState,
    scheduler: &mut UpdateScheduler,
    now: Instant,
    active: Active,
) {
    state.set_dehumidifier_active(active, false);
    debug!(?active, "controller set dehumidifier active");

    if active.is_active() {
        update_fan_state(state, true);
        state.set_target_heating_cooling_state(TargetHeatingCoolingState::Off, true);
    } else if state.thermostat.target_state == TargetHeatingCoolingState::Off {
        update_fan_state(state, false);
    }

    scheduler.request_update(now);
}

pub fn set_dehumidifier_swing_mode(
    state: &mut AccessoryState,
    scheduler: &mut UpdateScheduler,
    now: Instant,
    swing: bool,
) {
    state.set_dehumidifier_swing_mode(swing, false);
    debug!(swing, "controller set horizontal swing");

    scheduler.request_update(now);
}

/// Every mode needs the fan, so switching it off stops the other services too.
pub fn set_fan_active(
    state: &mut AccessoryState,
    scheduler: &mut UpdateScheduler,
    now: Instant,
    active: Active,
) {
    state.set_fan_active(active, false);
    debug!(?active, "controller set fan active");

    if !active.is_active() {
        state.set_dehumidifier_active(Active::Inactive, true);
        state.set_target_heating_cooling_state(TargetHeatingCoolingState::Off, true);
    }

    scheduler.request_update(now);
}

pub fn set_fan_rotation_speed(
    state: &mut AccessoryState,
    scheduler: &mut UpdateScheduler,
    now: Instant,
    speed: f32,
) {
    let speed = speed.round();

    if state.fan.target_state == FanTargetState::Auto {
        debug!(speed, "fan is in auto mode, ignoring speed change");
        state.set_fan_rotation_speed(AUTO_FAN_SPEED, true);
    } else {
        state.set_fan_rotation_speed(speed, false);
        debug!(speed, "controller set fan speed");
        state.set_fan_target_state(FanTargetState::Manual, true);
    }

    scheduler.request_update(now);
}

pub fn set_fan_target_state(
    state: &mut AccessoryState,
    scheduler: &mut UpdateScheduler,
    now: Instant,
    target: FanTargetState,
) {
    state.set_fan_target_state(target, false);
    debug!(?target, "controller set fan target state");

    if target == FanTargetState::Auto {
        state.set_fan_rotation_speed(AUTO_FAN_SPEED, true);
    }

    scheduler.request_update(now);
}

pub fn set_fan_swing_mode(
    state: &mut AccessoryState,
    scheduler: &mut UpdateScheduler,
    now: Instant,
    swing: bool,
) {
    state.set_fan_swing_mode(swing, false);
    debug!(swing, "controller set vertical swing");

    scheduler.request_update(now);
}
