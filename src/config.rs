use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::Result;

pub const DEFAULT_MQTT_PORT: u16 = 1883;

/// Persisted settings for the environment sensor feed, read once at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub mqtt_server: String,
    #[serde(default = "default_mqtt_port", deserialize_with = "port_from_number_or_string")]
    pub mqtt_port: u16,
    #[serde(default)]
    pub mqtt_temp: String,
    #[serde(default, rename = "mqtt_hum")]
    pub mqtt_humidity: String,
    #[serde(default)]
    pub mqtt_dew_point: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mqtt_server: String::new(),
            mqtt_port: DEFAULT_MQTT_PORT,
            mqtt_temp: String::new(),
            mqtt_humidity: String::new(),
            mqtt_dew_point: String::new(),
        }
    }
}

impl Settings {
    pub fn mqtt_configured(&self) -> bool {
        !self.mqtt_server.is_empty()
    }
}

fn default_mqtt_port() -> u16 {
    DEFAULT_MQTT_PORT
}

// Values posted from the settings form are stored as strings.
fn port_from_number_or_string<'de, D>(deserializer: D) -> std::result::Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Port {
        Number(u16),
        Text(String),
    }

    Ok(match Port::deserialize(deserializer)? {
        Port::Number(n) => n,
        Port::Text(s) => s.trim().parse().unwrap_or(DEFAULT_MQTT_PORT),
    })
}

/// JSON document on disk holding [`Settings`].
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create an empty document if none exists yet.
    pub fn init(&self) -> Result<()> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "creating empty configuration file");
            fs::write(&self.path, "{}")?;
        }
        Ok(())
    }

    /// Load settings; an unreadable or malformed file yields the defaults.
    pub fn load(&self) -> Settings {
        let parsed = fs::read_to_string(&self.path)
            .map_err(crate::Error::from)
            .and_then(|text| Ok(serde_json::from_str::<Settings>(&text)?));
        match parsed {
            Ok(settings) => settings,
            Err(e) => {
                warn!(path = %self.path.display(), "error loading configuration file: {e}");
                Settings::default()
            }
        }
    }

    pub fn raw(&self) -> Result<String> {
        Ok(fs::read_to_string(&self.path)?)
    }

    /// Merge form fields into the stored document and return the result.
    ///
    /// Non-empty values are set, empty values remove the key, and the `plain`
    /// field carrying the raw request body is skipped.
    pub fn update<'a, I>(&self, fields: I) -> Result<Value>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut doc = match fs::read_to_string(&self.path)
            .ok()
            .and_then(|text| serde_json::from_str::<Value>(&text).ok())
        {
            Some(Value::Object(map)) => map,
            _ => Map::new(),
        };

        for (key, value) in fields {
            if key == "plain" {
                continue;
            }
            if value.is_empty() {
                doc.remove(key);
            } else {
                doc.insert(key.to_string(), Value::String(value.to_string()));
            }
        }

        let doc = Value::Object(doc);
        fs::write(&self.path, serde_json::to_string(&doc)?)?;
        debug!(path = %self.path.display(), "configuration updated");
        Ok(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> ConfigStore {
        ConfigStore::new(dir.path().join("config.json"))
    }

    #[test]
    fn init_creates_empty_document() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.init().unwrap();
        assert_eq!(store.raw().unwrap(), "{}");
        assert_eq!(store.load(), Settings::default());
    }

    #[test]
    fn init_keeps_existing_file() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        fs::write(store.path(), r#"{"mqtt_server":"broker"}"#).unwrap();
        store.init().unwrap();
        assert_eq!(store.load().mqtt_server, "broker");
    }

    #[test]
    fn load_reads_all_fields() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        fs::write(
            store.path(),
            r#"{"mqtt_server":"broker.local","mqtt_port":1884,"mqtt_temp":"env/temp","mqtt_hum":"env/hum","mqtt_dew_point":"env/dew"}"#,
        )
        .unwrap();
        let settings = store.load();
        assert_eq!(settings.mqtt_server, "broker.local");
        assert_eq!(settings.mqtt_port, 1884);
        assert_eq!(settings.mqtt_humidity, "env/hum");
        assert_eq!(settings.mqtt_dew_point, "env/dew");
        assert!(settings.mqtt_configured());
    }

    #[test]
    fn malformed_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        fs::write(store.path(), "{not json").unwrap();
        assert_eq!(store.load(), Settings::default());
    }

    #[test]
    fn update_sets_removes_and_skips_plain() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        fs::write(store.path(), r#"{"mqtt_temp":"old/topic"}"#).unwrap();

        let doc = store
            .update([
                ("mqtt_server", "broker"),
                ("mqtt_port", "1999"),
                ("mqtt_temp", ""),
                ("plain", "raw body"),
            ])
            .unwrap();

        assert_eq!(doc["mqtt_server"], "broker");
        assert!(doc.get("mqtt_temp").is_none());
        assert!(doc.get("plain").is_none());

        let settings = store.load();
        assert_eq!(settings.mqtt_server, "broker");
        assert_eq!(settings.mqtt_port, 1999);
        assert_eq!(settings.mqtt_temp, "");
    }
}
