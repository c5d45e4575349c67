use std::time::Duration;

use serde::Serialize;

/// Read-only summary shown on the device status page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusReport {
    pub title: String,
    pub heatpump: String,
    pub homekit: String,
    pub uptime: String,
    pub firmware: String,
}

/// Pairing state of the HomeKit server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pairing {
    Unpaired,
    Paired { clients: usize },
}

impl Pairing {
    pub fn describe(&self) -> String {
        match self {
            Pairing::Unpaired => "waiting for pairing".to_string(),
            Pairing::Paired { clients: 1 } => "paired, 1 client".to_string(),
            Pairing::Paired { clients } => format!("paired, {clients} clients"),
        }
    }
}

pub fn connection_string(connected: bool) -> &'static str {
    if connected { "connected" } else { "not connected" }
}

/// Format an uptime, dropping leading units that are zero: `"2m 5s"`, `"1d 0h 0m 3s"`.
pub fn uptime_string(uptime: Duration) -> String {
    let total = uptime.as_secs();
    let days = total / 86_400;
    let hours = (total % 86_400) / 3_600;
    let minutes = (total % 3_600) / 60;
    let seconds = total % 60;

    if days > 0 {
        format!("{days}d {hours}h {minutes}m {seconds}s")
    } else if hours > 0 {
        format!("{hours}h {minutes}m {seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m {seconds}s")
    } else {
        format!("{seconds}s")
    }
}
