use std::fs::{File, OpenOptions};
use std::io::Write;

use chrono::Utc;
use serde_json::{Value, json};
use tracing::warn;
use uuid::Uuid;

use crate::protocol::WireSettings;
use crate::types::{HeatPumpStatus, Notification};

pub enum MessageLogMode {
    /// Every settings report is written in full.
    Full,
    /// The first settings report is written in full, later ones as field changes.
    Diffed,
}

/// NDJSON trace of the traffic between the bridge and the heat pump.
pub(crate) struct MessageLogger {
    mode: MessageLogMode,
    file: File,
    previous_settings: Option<Value>,
}

/// Top-level fields of `current` that differ from `previous`, as `(field, old, new)`.
fn changed_fields(previous: &Value, current: &Value) -> Vec<(String, Value, Value)> {
    let (Some(prev), Some(curr)) = (previous.as_object(), current.as_object()) else {
        return if previous == current {
            Vec::new()
        } else {
            vec![(String::new(), previous.clone(), current.clone())]
        };
    };

    let mut changes: Vec<_> = curr
        .iter()
        .filter_map(|(key, new)| {
            let old = prev.get(key).unwrap_or(&Value::Null);
            (old != new).then(|| (key.clone(), old.clone(), new.clone()))
        })
        .collect();
    changes.extend(
        prev.iter()
            .filter(|(key, _)| !curr.contains_key(*key))
            .map(|(key, old)| (key.clone(), old.clone(), Value::Null)),
    );
    changes
}

impl MessageLogger {
    pub fn new(mode: MessageLogMode, path: &str) -> std::io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            mode,
            file,
            previous_settings: None,
        })
    }

    pub fn log_command(&mut self, id: Uuid, settings: &WireSettings) {
        let entry = json!({
            "ts": Utc::now().to_rfc3339(),
            "dir": "cmd",
            "id": id.to_string(),
            "body": settings,
        });
        self.write_line(&entry);
    }

    pub fn log_command_failed(&mut self, id: Uuid, error: &str) {
        let entry = json!({
            "ts": Utc::now().to_rfc3339(),
            "dir": "cmd",
            "id": id.to_string(),
            "error": error,
        });
        self.write_line(&entry);
    }

    pub fn log_status(&mut self, status: &HeatPumpStatus) {
        let entry = json!({
            "ts": Utc::now().to_rfc3339(),
            "dir": "status",
            "body": status,
        });
        self.write_line(&entry);
    }

    pub fn log_notifications(&mut self, notifications: &[Notification]) {
        if notifications.is_empty() {
            return;
        }
        let entry = json!({
            "ts": Utc::now().to_rfc3339(),
            "dir": "notify",
            "body": notifications,
        });
        self.write_line(&entry);
    }

    pub fn log_settings(&mut self, settings: &WireSettings) {
        let body = match serde_json::to_value(settings) {
            Ok(v) => v,
            Err(e) => {
                warn!("failed to serialize settings for log: {e}");
                return;
            }
        };

        let entry = match (&self.mode, &self.previous_settings) {
            (MessageLogMode::Diffed, Some(prev)) => {
                let changes: Vec<Value> = changed_fields(prev, &body)
                    .into_iter()
                    .map(|(field, old, new)| json!({ "field": field, "old": old, "new": new }))
                    .collect();
                json!({
                    "ts": Utc::now().to_rfc3339(),
                    "dir": "settings",
                    "changes": changes,
                })
            }
            (MessageLogMode::Diffed, None) => json!({
                "ts": Utc::now().to_rfc3339(),
                "dir": "settings",
                "full": true,
                "body": body,
            }),
            (MessageLogMode::Full, _) => json!({
                "ts": Utc::now().to_rfc3339(),
                "dir": "settings",
                "body": body,
            }),
        };
        self.write_line(&entry);
        self.previous_settings = Some(body);
    }

    fn write_line(&mut self, entry: &Value) {
        if let Ok(line) = serde_json::to_string(entry)
            && let Err(e) = writeln!(self.file, "{line}")
        {
            warn!("failed to write log entry: {e}");
        }
    }
}
