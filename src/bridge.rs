use std::time::{Duration, Instant};

use tracing::{debug, info, trace, warn};
use uuid::Uuid;

use crate::calculator::command_for;
use crate::handlers::{self, AccessoryWrite};
use crate::heatpump::{HeatPump, HeatPumpEvent};
use crate::inbound;
use crate::logger::{MessageLogMode, MessageLogger};
use crate::protocol::{WireSettings, decode_settings, encode_command};
use crate::scheduler::{DEFAULT_UPDATE_DELAY, UpdateScheduler};
use crate::state::AccessoryState;
use crate::status::{Pairing, StatusReport, connection_string, uptime_string};
use crate::types::*;
use crate::Result;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);
pub const DEFAULT_SLOW_SYNC_THRESHOLD: Duration = Duration::from_millis(150);

type NotifyCallback = Box<dyn Fn(&Notification) + Send + Sync>;

/// Everything that can happen to the bridge, in the order it happened.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Write(AccessoryWrite),
    HeatPump(HeatPumpEvent),
}

pub struct BridgeBuilder<H> {
    heat_pump: H,
    update_delay: Duration,
    poll_interval: Duration,
    slow_sync_threshold: Duration,
    notify_callbacks: Vec<NotifyCallback>,
    log_mode: Option<MessageLogMode>,
    log_path: Option<String>,
}

impl<H: HeatPump> BridgeBuilder<H> {
    pub fn new(heat_pump: H) -> Self {
        Self {
            heat_pump,
            update_delay: DEFAULT_UPDATE_DELAY,
            poll_interval: DEFAULT_POLL_INTERVAL,
            slow_sync_threshold: DEFAULT_SLOW_SYNC_THRESHOLD,
            notify_callbacks: Vec::new(),
            log_mode: None,
            log_path: None,
        }
    }

    /// How long writes are collected before one command goes to the unit.
    pub fn update_delay(mut self, delay: Duration) -> Self {
        self.update_delay = delay;
        self
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn slow_sync_threshold(mut self, threshold: Duration) -> Self {
        self.slow_sync_threshold = threshold;
        self
    }

    pub fn on_notify(mut self, f: impl Fn(&Notification) + Send + Sync + 'static) -> Self {
        self.notify_callbacks.push(Box::new(f));
        self
    }

    pub fn message_log(mut self, mode: MessageLogMode, path: impl Into<String>) -> Self {
        self.log_mode = Some(mode);
        self.log_path = Some(path.into());
        self
    }

    pub fn build(self) -> Result<Bridge<H>> {
        let logger = match (self.log_mode, self.log_path) {
            (Some(mode), Some(path)) => Some(MessageLogger::new(mode, &path)?),
            _ => None,
        };

        Ok(Bridge {
            heat_pump: self.heat_pump,
            state: AccessoryState::new(),
            scheduler: UpdateScheduler::new(self.update_delay),
            device_settings: HeatPumpSettings::default(),
            poll_interval: self.poll_interval,
            slow_sync_threshold: self.slow_sync_threshold,
            last_sync: None,
            notify_callbacks: self.notify_callbacks,
            logger,
        })
    }
}

/// Keeps the HomeKit services and the heat pump in step.
///
/// The bridge is driven from a single thread: controller writes and heat pump
/// events are fed in through [`Bridge::handle`], and [`Bridge::tick`] runs the
/// periodic sync and the throttled outbound update.
pub struct Bridge<H> {
    heat_pump: H,
    state: AccessoryState,
    scheduler: UpdateScheduler,
    device_settings: HeatPumpSettings,
    poll_interval: Duration,
    slow_sync_threshold: Duration,
    last_sync: Option<Instant>,
    notify_callbacks: Vec<NotifyCallback>,
    logger: Option<MessageLogger>,
}

impl<H: HeatPump> Bridge<H> {
    pub fn builder(heat_pump: H) -> BridgeBuilder<H> {
        BridgeBuilder::new(heat_pump)
    }

    pub fn connect(&mut self) -> Result<()> {
        debug!("connecting to heat pump");
        self.heat_pump.connect()?;
        self.device_settings = decode_settings(&self.heat_pump.settings());
        info!(
            room_temperature = self.heat_pump.status().room_temperature,
            "connected to heat pump"
        );
        Ok(())
    }

    pub fn is_connected(&self) -> bool {
        self.heat_pump.is_connected()
    }

    pub fn state(&self) -> &AccessoryState {
        &self.state
    }

    pub fn heat_pump(&self) -> &H {
        &self.heat_pump
    }

    pub fn heat_pump_mut(&mut self) -> &mut H {
        &mut self.heat_pump
    }

    /// Last settings the unit reported.
    pub fn device_settings(&self) -> &HeatPumpSettings {
        &self.device_settings
    }

    /// Deadline of the pending outbound update, if any.
    pub fn pending_update(&self) -> Option<Instant> {
        self.scheduler.deadline()
    }

    /// The command the next outbound update would send.
    pub fn command(&self) -> HeatPumpCommand {
        command_for(&self.state)
    }

    pub fn handle(&mut self, input: Input, now: Instant) {
        match input {
            Input::Write(write) => self.apply_write(write, now),
            Input::HeatPump(event) => self.on_heat_pump_event(event),
        }
    }

    /// Entry point for the accessory server: a raw value written by a controller.
    pub fn write(
        &mut self,
        characteristic: Characteristic,
        value: CharacteristicValue,
        now: Instant,
    ) -> Result<()> {
        let write = AccessoryWrite::decode(characteristic, value)?;
        self.apply_write(write, now);
        Ok(())
    }

    pub fn settings_changed(&mut self, settings: &WireSettings) {
        trace!(
            power = %settings.power,
            mode = %settings.mode,
            temperature = settings.temperature,
            fan = ?settings.fan,
            vane = %settings.vane,
            wide_vane = %settings.wide_vane,
            "heat pump reported settings"
        );
        if let Some(ref mut logger) = self.logger {
            logger.log_settings(settings);
        }

        self.device_settings = decode_settings(settings);
        inbound::on_settings_changed(&mut self.state, &self.device_settings);
        self.emit_notifications();
    }

    pub fn status_changed(&mut self, status: HeatPumpStatus) {
        trace!(
            room_temperature = status.room_temperature,
            operating = status.operating,
            compressor_frequency = status.compressor_frequency,
            "heat pump reported status"
        );
        if let Some(ref mut logger) = self.logger {
            logger.log_status(&status);
        }

        inbound::on_status_changed(&mut self.state, &status, &self.device_settings);
        self.emit_notifications();
    }

    /// Run the periodic sync when it is due, then send the pending update when its deadline passed.
    pub fn tick(&mut self, now: Instant) {
        let sync_due = self
            .last_sync
            .is_none_or(|last| now.duration_since(last) >= self.poll_interval);

        if sync_due && self.heat_pump.is_connected() {
            self.last_sync = Some(now);
            let started = Instant::now();
            let events = self.heat_pump.sync();
            let elapsed = started.elapsed();
            if elapsed > self.slow_sync_threshold {
                debug!(elapsed_ms = elapsed.as_millis() as u64, "slow heat pump sync");
            }
            for event in events {
                self.on_heat_pump_event(event);
            }
        }

        if self.scheduler.take_due(now) {
            self.send_update();
        }
    }

    pub fn status_report(
        &self,
        title: impl Into<String>,
        pairing: Pairing,
        uptime: Duration,
        firmware: impl Into<String>,
    ) -> StatusReport {
        StatusReport {
            title: title.into(),
            heatpump: connection_string(self.heat_pump.is_connected()).to_string(),
            homekit: pairing.describe(),
            uptime: uptime_string(uptime),
            firmware: firmware.into(),
        }
    }

    fn apply_write(&mut self, write: AccessoryWrite, now: Instant) {
        handlers::apply(&mut self.state, &mut self.scheduler, now, write);
        self.emit_notifications();
    }

    fn on_heat_pump_event(&mut self, event: HeatPumpEvent) {
        match event {
            HeatPumpEvent::SettingsChanged(settings) => self.settings_changed(&settings),
            HeatPumpEvent::StatusChanged(status) => self.status_changed(status),
        }
    }

    fn send_update(&mut self) {
        let started = Instant::now();
        let id = Uuid::new_v4();
        let settings = encode_command(&command_for(&self.state));

        info!(
            %id,
            power = %settings.power,
            mode = %settings.mode,
            temperature = settings.temperature,
            fan = ?settings.fan,
            vane = %settings.vane,
            wide_vane = %settings.wide_vane,
            "updating heat pump"
        );
        if let Some(ref mut logger) = self.logger {
            logger.log_command(id, &settings);
        }

        self.heat_pump.set_settings(settings);
        match self.heat_pump.update() {
            Ok(()) => {
                debug!(%id, elapsed_ms = started.elapsed().as_millis() as u64, "heat pump updated");
            }
            Err(e) => {
                warn!(%id, "heat pump update failed: {e}");
                if let Some(ref mut logger) = self.logger {
                    logger.log_command_failed(id, &e.to_string());
                }
            }
        }
    }

    fn emit_notifications(&mut self) {
        let notifications = self.state.take_notifications();
        if notifications.is_empty() {
            return;
        }
        if let Some(ref mut logger) = self.logger {
            logger.log_notifications(&notifications);
        }
        for notification in &notifications {
            for cb in &self.notify_callbacks {
                cb(notification);
            }
        }
        debug!(count = notifications.len(), "notified characteristic changes");
    }
}
