use crate::protocol::{WireSettings, apply_command};
use crate::types::HeatPumpStatus;
use crate::{Error, Result};

/// Change reported by the heat pump during a sync.
#[derive(Debug, Clone, PartialEq)]
pub enum HeatPumpEvent {
    SettingsChanged(WireSettings),
    StatusChanged(HeatPumpStatus),
}

/// Serial protocol client for the indoor unit.
///
/// `set_settings` only stages a command; `update` transmits it. Nothing is
/// retried by the caller: the next `sync` reports what the unit really runs.
pub trait HeatPump {
    fn connect(&mut self) -> Result<()>;
    fn is_connected(&self) -> bool;
    fn settings(&self) -> WireSettings;
    fn status(&self) -> HeatPumpStatus;
    fn set_settings(&mut self, settings: WireSettings);
    fn update(&mut self) -> Result<()>;
    /// Exchange packets with the unit and return what changed since the last sync.
    fn sync(&mut self) -> Vec<HeatPumpEvent>;
}

/// In-memory unit that applies commands immediately. Useful for demos and tests.
#[derive(Debug, Clone, Default)]
pub struct LoopbackHeatPump {
    connected: bool,
    settings: WireSettings,
    staged: Option<WireSettings>,
    status: HeatPumpStatus,
    settings_dirty: bool,
    status_dirty: bool,
    fail_updates: bool,
    applied: Vec<WireSettings>,
}

impl LoopbackHeatPump {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate a change made on the unit itself, e.g. with the IR remote.
    pub fn set_device_settings(&mut self, settings: WireSettings) {
        self.settings = settings;
        self.settings_dirty = true;
    }

    pub fn set_status(&mut self, status: HeatPumpStatus) {
        self.status = status;
        self.status_dirty = true;
    }

    /// Make every following `update` fail as a dropped serial link would.
    pub fn fail_updates(&mut self, fail: bool) {
        self.fail_updates = fail;
    }

    pub fn disconnect(&mut self) {
        self.connected = false;
    }

    /// Every command that reached the unit, oldest first.
    pub fn applied(&self) -> &[WireSettings] {
        &self.applied
    }
}

impl HeatPump for LoopbackHeatPump {
    fn connect(&mut self) -> Result<()> {
        self.connected = true;
        self.settings_dirty = true;
        self.status_dirty = true;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn settings(&self) -> WireSettings {
        self.settings.clone()
    }

    fn status(&self) -> HeatPumpStatus {
        self.status
    }

    fn set_settings(&mut self, settings: WireSettings) {
        self.staged = Some(settings);
    }

    fn update(&mut self) -> Result<()> {
        if !self.connected {
            return Err(Error::NotConnected);
        }
        if self.fail_updates {
            return Err(Error::Transport("no acknowledgement from unit".to_string()));
        }
        if let Some(cmd) = self.staged.take() {
            self.settings = apply_command(&self.settings, &cmd);
            self.applied.push(cmd);
            self.settings_dirty = true;
        }
        Ok(())
    }

    fn sync(&mut self) -> Vec<HeatPumpEvent> {
        let mut events = Vec::new();
        if !self.connected {
            return events;
        }
        if std::mem::take(&mut self.settings_dirty) {
            events.push(HeatPumpEvent::SettingsChanged(self.settings.clone()));
        }
        if std::mem::take(&mut self.status_dirty) {
            events.push(HeatPumpEvent::StatusChanged(self.status));
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_requires_connection() {
        let mut hp = LoopbackHeatPump::new();
        hp.set_settings(WireSettings::default());
        assert!(matches!(hp.update(), Err(Error::NotConnected)));
    }

    #[test]
    fn connect_reports_full_state_once() {
        let mut hp = LoopbackHeatPump::new();
        hp.connect().unwrap();
        let events = hp.sync();
        assert_eq!(events.len(), 2);
        assert!(hp.sync().is_empty());
    }

    #[test]
    fn update_applies_staged_command() {
        let mut hp = LoopbackHeatPump::new();
        hp.connect().unwrap();
        hp.sync();

        let mut cmd = WireSettings::default();
        cmd.power = "ON".to_string();
        cmd.mode = "COOL".to_string();
        cmd.fan = None;
        hp.set_settings(cmd);
        hp.update().unwrap();

        assert_eq!(hp.settings().mode, "COOL");
        assert_eq!(hp.settings().fan.as_deref(), Some("AUTO"));
        assert_eq!(hp.applied().len(), 1);
        assert!(matches!(
            hp.sync().as_slice(),
            [HeatPumpEvent::SettingsChanged(_)]
        ));
    }

    #[test]
    fn failing_link_keeps_settings() {
        let mut hp = LoopbackHeatPump::new();
        hp.connect().unwrap();
        hp.fail_updates(true);
        let mut cmd = WireSettings::default();
        cmd.mode = "HEAT".to_string();
        hp.set_settings(cmd);
        assert!(matches!(hp.update(), Err(Error::Transport(_))));
        assert_eq!(hp.settings().mode, "AUTO");
        assert!(hp.applied().is_empty());
    }
}
