use std::fmt;

use serde::{Deserialize, Serialize};

/// Rotation speed reported while the fan runs in AUTO. The heat pump does not
/// report a speed in that mode, so a fixed value keeps HomeKit scenes stable.
pub const AUTO_FAN_SPEED: f32 = 20.0;

/// Every characteristic exposed by the thermostat, fan and dehumidifier services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Characteristic {
    CurrentTemperature,
    TargetTemperature,
    CurrentHeatingCoolingState,
    TargetHeatingCoolingState,
    FanActive,
    FanRotationSpeed,
    FanTargetState,
    FanCurrentState,
    FanSwingMode,
    DehumidifierActive,
    DehumidifierCurrentState,
    DehumidifierSwingMode,
}

impl Characteristic {
    pub fn name(&self) -> &'static str {
        match self {
            Characteristic::CurrentTemperature => "thermostat.current_temperature",
            Characteristic::TargetTemperature => "thermostat.target_temperature",
            Characteristic::CurrentHeatingCoolingState => "thermostat.current_state",
            Characteristic::TargetHeatingCoolingState => "thermostat.target_state",
            Characteristic::FanActive => "fan.active",
            Characteristic::FanRotationSpeed => "fan.rotation_speed",
            Characteristic::FanTargetState => "fan.target_state",
            Characteristic::FanCurrentState => "fan.current_state",
            Characteristic::FanSwingMode => "fan.swing_mode",
            Characteristic::DehumidifierActive => "dehumidifier.active",
            Characteristic::DehumidifierCurrentState => "dehumidifier.current_state",
            Characteristic::DehumidifierSwingMode => "dehumidifier.swing_mode",
        }
    }
}

impl fmt::Display for Characteristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Raw HomeKit value as it travels to and from the accessory server.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CharacteristicValue {
    UInt8(u8),
    Float(f32),
}

impl CharacteristicValue {
    pub fn as_u8(&self) -> Option<u8> {
        match self {
            CharacteristicValue::UInt8(v) => Some(*v),
            CharacteristicValue::Float(_) => None,
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        match self {
            CharacteristicValue::UInt8(v) => Some(f32::from(*v)),
            CharacteristicValue::Float(v) => Some(*v),
        }
    }
}

impl fmt::Display for CharacteristicValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CharacteristicValue::UInt8(v) => write!(f, "{v}"),
            CharacteristicValue::Float(v) => write!(f, "{v:.1}"),
        }
    }
}

impl From<f32> for CharacteristicValue {
    fn from(v: f32) -> Self {
        CharacteristicValue::Float(v)
    }
}

impl From<bool> for CharacteristicValue {
    fn from(v: bool) -> Self {
        CharacteristicValue::UInt8(u8::from(v))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum TargetHeatingCoolingState {
    #[default]
    Off,
    Heat,
    Cool,
    Auto,
}

impl TargetHeatingCoolingState {
    pub fn as_homekit(&self) -> u8 {
        match self {
            TargetHeatingCoolingState::Off => 0,
            TargetHeatingCoolingState::Heat => 1,
            TargetHeatingCoolingState::Cool => 2,
            TargetHeatingCoolingState::Auto => 3,
        }
    }

    pub fn from_homekit(v: u8) -> Option<Self> {
        match v {
            0 => Some(TargetHeatingCoolingState::Off),
            1 => Some(TargetHeatingCoolingState::Heat),
            2 => Some(TargetHeatingCoolingState::Cool),
            3 => Some(TargetHeatingCoolingState::Auto),
            _ => None,
        }
    }
}

impl From<TargetHeatingCoolingState> for CharacteristicValue {
    fn from(v: TargetHeatingCoolingState) -> Self {
        CharacteristicValue::UInt8(v.as_homekit())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum CurrentHeatingCoolingState {
    #[default]
    Off,
    Heat,
    Cool,
}

impl CurrentHeatingCoolingState {
    pub fn as_homekit(&self) -> u8 {
        match self {
            CurrentHeatingCoolingState::Off => 0,
            CurrentHeatingCoolingState::Heat => 1,
            CurrentHeatingCoolingState::Cool => 2,
        }
    }
}

impl From<CurrentHeatingCoolingState> for CharacteristicValue {
    fn from(v: CurrentHeatingCoolingState) -> Self {
        CharacteristicValue::UInt8(v.as_homekit())
    }
}

/// HomeKit `Active` characteristic shared by the fan and dehumidifier services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Active {
    #[default]
    Inactive,
    Active,
}

impl Active {
    pub fn is_active(&self) -> bool {
        matches!(self, Active::Active)
    }

    pub fn as_homekit(&self) -> u8 {
        match self {
            Active::Inactive => 0,
            Active::Active => 1,
        }
    }

    pub fn from_homekit(v: u8) -> Option<Self> {
        match v {
            0 => Some(Active::Inactive),
            1 => Some(Active::Active),
            _ => None,
        }
    }
}

impl From<bool> for Active {
    fn from(active: bool) -> Self {
        if active { Active::Active } else { Active::Inactive }
    }
}

impl From<Active> for CharacteristicValue {
    fn from(v: Active) -> Self {
        CharacteristicValue::UInt8(v.as_homekit())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum FanTargetState {
    #[default]
    Manual,
    Auto,
}

impl FanTargetState {
    pub fn as_homekit(&self) -> u8 {
        match self {
            FanTargetState::Manual => 0,
            FanTargetState::Auto => 1,
        }
    }

    pub fn from_homekit(v: u8) -> Option<Self> {
        match v {
            0 => Some(FanTargetState::Manual),
            1 => Some(FanTargetState::Auto),
            _ => None,
        }
    }
}

impl From<FanTargetState> for CharacteristicValue {
    fn from(v: FanTargetState) -> Self {
        CharacteristicValue::UInt8(v.as_homekit())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum FanCurrentState {
    #[default]
    Inactive,
    Idle,
    Blowing,
}

impl FanCurrentState {
    pub fn as_homekit(&self) -> u8 {
        match self {
            FanCurrentState::Inactive => 0,
            FanCurrentState::Idle => 1,
            FanCurrentState::Blowing => 2,
        }
    }
}

impl From<FanCurrentState> for CharacteristicValue {
    fn from(v: FanCurrentState) -> Self {
        CharacteristicValue::UInt8(v.as_homekit())
    }
}

/// HomeKit reserves 2 for "humidifying", which this accessory never reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum DehumidifierCurrentState {
    #[default]
    Inactive,
    Idle,
    Dehumidifying,
}

impl DehumidifierCurrentState {
    pub fn as_homekit(&self) -> u8 {
        match self {
            DehumidifierCurrentState::Inactive => 0,
            DehumidifierCurrentState::Idle => 1,
            DehumidifierCurrentState::Dehumidifying => 3,
        }
    }
}

impl From<DehumidifierCurrentState> for CharacteristicValue {
    fn from(v: DehumidifierCurrentState) -> Self {
        CharacteristicValue::UInt8(v.as_homekit())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Power {
    On,
    Off,
}

impl Power {
    pub fn as_wire_str(&self) -> &'static str {
        match self {
            Power::On => "ON",
            Power::Off => "OFF",
        }
    }

    pub fn from_wire_str(s: &str) -> Option<Self> {
        match s {
            "ON" => Some(Power::On),
            "OFF" => Some(Power::Off),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Auto,
    Heat,
    Cool,
    Dry,
    Fan,
}

impl Mode {
    pub fn as_wire_str(&self) -> &'static str {
        match self {
            Mode::Auto => "AUTO",
            Mode::Heat => "HEAT",
            Mode::Cool => "COOL",
            Mode::Dry => "DRY",
            Mode::Fan => "FAN",
        }
    }

    pub fn from_wire_str(s: &str) -> Option<Self> {
        match s {
            "AUTO" => Some(Mode::Auto),
            "HEAT" => Some(Mode::Heat),
            "COOL" => Some(Mode::Cool),
            "DRY" => Some(Mode::Dry),
            "FAN" => Some(Mode::Fan),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FanSpeed {
    Quiet,
    One,
    Two,
    Three,
    Four,
    Auto,
}

impl FanSpeed {
    pub fn as_wire_str(&self) -> &'static str {
        match self {
            FanSpeed::Quiet => "QUIET",
            FanSpeed::One => "1",
            FanSpeed::Two => "2",
            FanSpeed::Three => "3",
            FanSpeed::Four => "4",
            FanSpeed::Auto => "AUTO",
        }
    }

    pub fn from_wire_str(s: &str) -> Option<Self> {
        match s {
            "QUIET" => Some(FanSpeed::Quiet),
            "1" => Some(FanSpeed::One),
            "2" => Some(FanSpeed::Two),
            "3" => Some(FanSpeed::Three),
            "4" => Some(FanSpeed::Four),
            "AUTO" => Some(FanSpeed::Auto),
            _ => None,
        }
    }

    /// Quantize a HomeKit rotation speed onto the five manual device levels.
    /// Speeds of zero or below have no level.
    pub fn from_rotation_speed(speed: f32) -> Option<Self> {
        if speed <= 0.0 {
            None
        } else if speed <= 20.0 {
            Some(FanSpeed::Quiet)
        } else if speed <= 40.0 {
            Some(FanSpeed::One)
        } else if speed <= 60.0 {
            Some(FanSpeed::Two)
        } else if speed <= 80.0 {
            Some(FanSpeed::Three)
        } else {
            Some(FanSpeed::Four)
        }
    }

    /// HomeKit rotation speed for this level; AUTO maps to [`AUTO_FAN_SPEED`].
    pub fn rotation_speed(&self) -> f32 {
        match self {
            FanSpeed::Quiet | FanSpeed::Auto => AUTO_FAN_SPEED,
            FanSpeed::One => 40.0,
            FanSpeed::Two => 60.0,
            FanSpeed::Three => 80.0,
            FanSpeed::Four => 100.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalVane {
    Auto,
    Swing,
}

impl VerticalVane {
    pub fn as_wire_str(&self) -> &'static str {
        match self {
            VerticalVane::Auto => "AUTO",
            VerticalVane::Swing => "SWING",
        }
    }

    /// Fixed positions ("1".."5") have no counterpart and decode to `None`.
    pub fn from_wire_str(s: &str) -> Option<Self> {
        match s {
            "AUTO" => Some(VerticalVane::Auto),
            "SWING" => Some(VerticalVane::Swing),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalVane {
    Center,
    Swing,
}

impl HorizontalVane {
    pub fn as_wire_str(&self) -> &'static str {
        match self {
            HorizontalVane::Center => "|",
            HorizontalVane::Swing => "SWING",
        }
    }

    /// Off-center positions ("<<", "<", ">", ">>", "<>") decode to `None`.
    pub fn from_wire_str(s: &str) -> Option<Self> {
        match s {
            "|" => Some(HorizontalVane::Center),
            "SWING" => Some(HorizontalVane::Swing),
            _ => None,
        }
    }
}

/// Complete settings set sent to the heat pump.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatPumpCommand {
    pub power: Power,
    pub mode: Mode,
    pub temperature: f32,
    /// `None` leaves the fan speed currently configured on the unit untouched.
    pub fan: Option<FanSpeed>,
    pub vane: VerticalVane,
    pub wide_vane: HorizontalVane,
}

/// Settings as reported by the heat pump. Tokens the codec does not know decode to `None`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HeatPumpSettings {
    pub power: Option<Power>,
    pub mode: Option<Mode>,
    pub temperature: f32,
    pub fan: Option<FanSpeed>,
    pub vane: Option<VerticalVane>,
    pub wide_vane: Option<HorizontalVane>,
}

impl HeatPumpSettings {
    pub fn is_powered(&self) -> bool {
        self.power == Some(Power::On)
    }
}

impl From<HeatPumpCommand> for HeatPumpSettings {
    fn from(cmd: HeatPumpCommand) -> Self {
        Self {
            power: Some(cmd.power),
            mode: Some(cmd.mode),
            temperature: cmd.temperature,
            fan: cmd.fan,
            vane: Some(cmd.vane),
            wide_vane: Some(cmd.wide_vane),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatPumpStatus {
    pub room_temperature: f32,
    pub operating: bool,
    pub compressor_frequency: u32,
}

/// Characteristic change the accessory server must push to paired controllers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Notification {
    pub characteristic: Characteristic,
    pub value: CharacteristicValue,
}
