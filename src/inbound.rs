use tracing::debug;

use crate::state::AccessoryState;
use crate::types::*;

/// Mirror a settings snapshot reported by the heat pump onto every accessory service.
pub fn on_settings_changed(state: &mut AccessoryState, settings: &HeatPumpSettings) {
    update_thermostat_settings(state, settings);
    update_fan_settings(state, settings);
    update_dehumidifier_settings(state, settings);
}

/// Apply a status report. `settings` is the last snapshot the unit reported,
/// which supplies the power and mode the current states are derived from.
pub fn on_status_changed(
    state: &mut AccessoryState,
    status: &HeatPumpStatus,
    settings: &HeatPumpSettings,
) {
    // Room temperature changes on almost every poll; controllers read it on demand.
    state.set_current_temperature(status.room_temperature, false);

    update_thermostat_operating_status(state, status.operating, settings);
    update_fan_operating_status(state, status.operating, settings);
    update_dehumidifier_operating_status(state, status.operating, settings);
}

fn thermostat_target_for(settings: &HeatPumpSettings) -> TargetHeatingCoolingState {
    if !settings.is_powered() {
        return TargetHeatingCoolingState::Off;
    }
    match settings.mode {
        Some(Mode::Cool) => TargetHeatingCoolingState::Cool,
        Some(Mode::Heat) => TargetHeatingCoolingState::Heat,
        Some(Mode::Auto) => TargetHeatingCoolingState::Auto,
        Some(Mode::Dry) | Some(Mode::Fan) | None => TargetHeatingCoolingState::Off,
    }
}

fn update_thermostat_settings(state: &mut AccessoryState, settings: &HeatPumpSettings) {
    let mut changed = state.set_target_heating_cooling_state(thermostat_target_for(settings), true);
    changed |= state.set_target_temperature(settings.temperature, true);

    if changed {
        debug!(
            target_state = ?state.thermostat.target_state,
            target_temperature = state.thermostat.target_temperature,
            "thermostat target updated from heat pump"
        );
    }
}

fn update_fan_settings(state: &mut AccessoryState, settings: &HeatPumpSettings) {
    let mut changed = state.set_fan_active(Active::from(settings.is_powered()), true);

    if let Some(fan) = settings.fan {
        let target = match fan {
            FanSpeed::Auto => FanTargetState::Auto,
            _ => FanTargetState::Manual,
        };
        changed |= state.set_fan_rotation_speed(fan.rotation_speed(), true);
        changed |= state.set_fan_target_state(target, true);
    }

    let swing = settings.vane == Some(VerticalVane::Swing);
    changed |= state.set_fan_swing_mode(swing, true);

    if changed {
        debug!(
            active = ?state.fan.active,
            speed = state.fan.rotation_speed,
            target_state = ?state.fan.target_state,
            swing = state.fan.swing_mode,
            "fan updated from heat pump"
        );
    }
}

fn update_dehumidifier_settings(state: &mut AccessoryState, settings: &HeatPumpSettings) {
    let active = settings.mode == Some(Mode::Dry) && settings.is_powered();
    let mut changed = state.set_dehumidifier_active(Active::from(active), true);

    let swing = settings.wide_vane == Some(HorizontalVane::Swing);
    changed |= state.set_dehumidifier_swing_mode(swing, true);

    if changed {
        debug!(
            active = ?state.dehumidifier.active,
            swing = state.dehumidifier.swing_mode,
            "dehumidifier updated from heat pump"
        );
    }
}

fn update_thermostat_operating_status(
    state: &mut AccessoryState,
    operating: bool,
    settings: &HeatPumpSettings,
) {
    let thermostat = state.thermostat;
    let current = if settings.is_powered() && operating {
        match thermostat.target_state {
            TargetHeatingCoolingState::Heat => CurrentHeatingCoolingState::Heat,
            TargetHeatingCoolingState::Cool => CurrentHeatingCoolingState::Cool,
            TargetHeatingCoolingState::Auto
                if thermostat.current_temperature < thermostat.target_temperature =>
            {
                CurrentHeatingCoolingState::Heat
            }
            TargetHeatingCoolingState::Auto
                if thermostat.current_temperature > thermostat.target_temperature =>
            {
                CurrentHeatingCoolingState::Cool
            }
            _ => CurrentHeatingCoolingState::Off,
        }
    } else {
        CurrentHeatingCoolingState::Off
    };

    if state.set_current_heating_cooling_state(current, true) {
        debug!(
            state = ?current,
            temperature = thermostat.current_temperature,
            "thermostat operating state changed"
        );
    }
}

fn update_fan_operating_status(
    state: &mut AccessoryState,
    operating: bool,
    settings: &HeatPumpSettings,
) {
    let current = if !settings.is_powered() {
        FanCurrentState::Inactive
    } else if operating {
        FanCurrentState::Blowing
    } else {
        FanCurrentState::Idle
    };

    if state.set_fan_current_state(current, true) {
        debug!(state = ?current, "fan operating state changed");
    }
}

fn update_dehumidifier_operating_status(
    state: &mut AccessoryState,
    operating: bool,
    settings: &HeatPumpSettings,
) {
    let current = match settings.mode {
        Some(Mode::Dry) if !settings.is_powered() => DehumidifierCurrentState::Inactive,
        Some(Mode::Dry) if operating => DehumidifierCurrentState::Dehumidifying,
        Some(Mode::Dry) => DehumidifierCurrentState::Idle,
        _ => DehumidifierCurrentState::Inactive,
    };

    if state.set_dehumidifier_current_state(current, true) {
        debug!(state = ?current, "dehumidifier operating state changed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(power: Power, mode: Mode) -> HeatPumpSettings {
        HeatPumpSettings {
            power: Some(power),
            mode: Some(mode),
            temperature: 22.0,
            fan: Some(FanSpeed::Two),
            vane: Some(VerticalVane::Auto),
            wide_vane: Some(HorizontalVane::Center),
        }
    }

    fn status(room: f32, operating: bool) -> HeatPumpStatus {
        HeatPumpStatus {
            room_temperature: room,
            operating,
            compressor_frequency: 30,
        }
    }

    #[test]
    fn power_and_mode_map_to_thermostat_target() {
        let cases = [
            (Power::Off, Mode::Heat, TargetHeatingCoolingState::Off),
            (Power::On, Mode::Heat, TargetHeatingCoolingState::Heat),
            (Power::On, Mode::Cool, TargetHeatingCoolingState::Cool),
            (Power::On, Mode::Auto, TargetHeatingCoolingState::Auto),
            (Power::On, Mode::Dry, TargetHeatingCoolingState::Off),
            (Power::On, Mode::Fan, TargetHeatingCoolingState::Off),
        ];
        for (power, mode, expected) in cases {
            let mut state = AccessoryState::new();
            on_settings_changed(&mut state, &settings(power, mode));
            assert_eq!(state.thermostat.target_state, expected, "{power:?} {mode:?}");
        }
    }

    #[test]
    fn unknown_mode_leaves_thermostat_off() {
        let mut state = AccessoryState::new();
        let mut s = settings(Power::On, Mode::Heat);
        s.mode = None;
        on_settings_changed(&mut state, &s);
        assert_eq!(state.thermostat.target_state, TargetHeatingCoolingState::Off);
        assert_eq!(state.dehumidifier.active, Active::Inactive);
        assert_eq!(state.fan.active, Active::Active);
    }

    #[test]
    fn fan_tokens_map_to_speed_and_target() {
        let cases = [
            (FanSpeed::Quiet, 20.0, FanTargetState::Manual),
            (FanSpeed::One, 40.0, FanTargetState::Manual),
            (FanSpeed::Four, 100.0, FanTargetState::Manual),
            (FanSpeed::Auto, AUTO_FAN_SPEED, FanTargetState::Auto),
        ];
        for (fan, speed, target) in cases {
            let mut state = AccessoryState::new();
            let mut s = settings(Power::On, Mode::Fan);
            s.fan = Some(fan);
            on_settings_changed(&mut state, &s);
            assert_eq!(state.fan.rotation_speed, speed);
            assert_eq!(state.fan.target_state, target);
        }
    }

    #[test]
    fn missing_fan_token_keeps_speed() {
        let mut state = AccessoryState::new();
        state.fan.rotation_speed = 60.0;
        let mut s = settings(Power::On, Mode::Fan);
        s.fan = None;
        on_settings_changed(&mut state, &s);
        assert_eq!(state.fan.rotation_speed, 60.0);
    }

    #[test]
    fn dry_mode_activates_dehumidifier_only_when_powered() {
        let mut state = AccessoryState::new();
        on_settings_changed(&mut state, &settings(Power::On, Mode::Dry));
        assert_eq!(state.dehumidifier.active, Active::Active);

        on_settings_changed(&mut state, &settings(Power::Off, Mode::Dry));
        assert_eq!(state.dehumidifier.active, Active::Inactive);
    }

    #[test]
    fn settings_notify_only_changes() {
        let mut state = AccessoryState::new();
        let s = settings(Power::On, Mode::Heat);
        on_settings_changed(&mut state, &s);
        let first = state.take_notifications();
        assert!(!first.is_empty());

        on_settings_changed(&mut state, &s);
        assert!(state.take_notifications().is_empty());
    }

    #[test]
    fn vane_swing_flags() {
        let mut state = AccessoryState::new();
        let mut s = settings(Power::On, Mode::Cool);
        s.vane = Some(VerticalVane::Swing);
        s.wide_vane = None;
        on_settings_changed(&mut state, &s);
        assert!(state.fan.swing_mode);
        assert!(!state.dehumidifier.swing_mode);
    }

    #[test]
    fn room_temperature_is_silent() {
        let mut state = AccessoryState::new();
        on_status_changed(&mut state, &status(18.5, false), &settings(Power::Off, Mode::Auto));
        assert_eq!(state.thermostat.current_temperature, 18.5);
        assert!(state
            .take_notifications()
            .iter()
            .all(|n| n.characteristic != Characteristic::CurrentTemperature));
    }

    #[test]
    fn auto_target_compares_room_and_target() {
        let s = settings(Power::On, Mode::Auto);
        let cases = [
            (19.0, CurrentHeatingCoolingState::Heat),
            (25.0, CurrentHeatingCoolingState::Cool),
            (22.0, CurrentHeatingCoolingState::Off),
        ];
        for (room, expected) in cases {
            let mut state = AccessoryState::new();
            on_settings_changed(&mut state, &s);
            on_status_changed(&mut state, &status(room, true), &s);
            assert_eq!(state.thermostat.current_state, expected, "room {room}");
        }
    }

    #[test]
    fn not_operating_means_thermostat_off() {
        let s = settings(Power::On, Mode::Heat);
        let mut state = AccessoryState::new();
        on_settings_changed(&mut state, &s);
        on_status_changed(&mut state, &status(18.0, false), &s);
        assert_eq!(state.thermostat.current_state, CurrentHeatingCoolingState::Off);
        assert_eq!(state.fan.current_state, FanCurrentState::Idle);
    }

    #[test]
    fn explicit_heat_and_cool_follow_operating() {
        let cases = [
            (Mode::Heat, true, CurrentHeatingCoolingState::Heat),
            (Mode::Heat, false, CurrentHeatingCoolingState::Off),
            (Mode::Cool, true, CurrentHeatingCoolingState::Cool),
            (Mode::Cool, false, CurrentHeatingCoolingState::Off),
        ];
        for (mode, operating, expected) in cases {
            let s = settings(Power::On, mode);
            let mut state = AccessoryState::new();
            on_settings_changed(&mut state, &s);
            // Room temperature on the "wrong" side of the target must not matter.
            on_status_changed(&mut state, &status(30.0, operating), &s);
            assert_eq!(state.thermostat.current_state, expected, "{mode:?} operating={operating}");

            on_status_changed(&mut state, &status(30.0, operating), &settings(Power::Off, mode));
            assert_eq!(state.thermostat.current_state, CurrentHeatingCoolingState::Off);
        }
    }

    #[test]
    fn fan_current_state_follows_power_and_operating() {
        let mut state = AccessoryState::new();
        on_status_changed(&mut state, &status(20.0, true), &settings(Power::Off, Mode::Fan));
        assert_eq!(state.fan.current_state, FanCurrentState::Inactive);
        on_status_changed(&mut state, &status(20.0, true), &settings(Power::On, Mode::Fan));
        assert_eq!(state.fan.current_state, FanCurrentState::Blowing);
        on_status_changed(&mut state, &status(20.0, false), &settings(Power::On, Mode::Fan));
        assert_eq!(state.fan.current_state, FanCurrentState::Idle);
    }

    #[test]
    fn dehumidifier_current_state_only_in_dry() {
        let mut state = AccessoryState::new();
        on_status_changed(&mut state, &status(20.0, true), &settings(Power::On, Mode::Dry));
        assert_eq!(
            state.dehumidifier.current_state,
            DehumidifierCurrentState::Dehumidifying
        );

        on_status_changed(&mut state, &status(20.0, false), &settings(Power::On, Mode::Dry));
        assert_eq!(state.dehumidifier.current_state, DehumidifierCurrentState::Idle);

        for mode in [Mode::Auto, Mode::Heat, Mode::Cool, Mode::Fan] {
            on_status_changed(&mut state, &status(20.0, true), &settings(Power::On, mode));
            assert_eq!(
                state.dehumidifier.current_state,
                DehumidifierCurrentState::Inactive,
                "{mode:?}"
            );
        }
    }
}
