mod bridge;
mod calculator;
mod config;
mod error;
mod handlers;
mod heatpump;
mod inbound;
mod logger;
mod protocol;
mod scheduler;
mod state;
mod status;
mod types;

pub use bridge::{Bridge, BridgeBuilder, Input, DEFAULT_POLL_INTERVAL, DEFAULT_SLOW_SYNC_THRESHOLD};
pub use calculator::command_for;
pub use config::{ConfigStore, Settings, DEFAULT_MQTT_PORT};
pub use error::{Error, Result};
pub use handlers::{AccessoryWrite, TARGET_TEMPERATURE_RANGE};
pub use heatpump::{HeatPump, HeatPumpEvent, LoopbackHeatPump};
pub use inbound::{on_settings_changed, on_status_changed};
pub use logger::MessageLogMode;
pub use protocol::{decode_settings, encode_command, WireSettings};
pub use scheduler::{UpdateScheduler, DEFAULT_UPDATE_DELAY};
pub use state::{AccessoryState, DehumidifierState, FanState, ThermostatState};
pub use status::{connection_string, uptime_string, Pairing, StatusReport};
pub use types::*;
