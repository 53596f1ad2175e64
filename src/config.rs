//! Station configuration.
//!
//! Uses `heapless::String` so the same structures fit a microcontroller
//! build, while loading from JSON on a desktop through serde.
//!
//! # Example
//!
//! ```rust
//! use trainz_accessories::config::{Config, StorageConfig, StationConfig};
//!
//! // Use defaults
//! let config = Config::default();
//! assert_eq!(config.storage.turnouts_key.as_str(), "turnouts.json");
//!
//! // Or customize
//! let config = Config::default()
//!     .with_storage(StorageConfig::default().with_data_dir("/var/lib/station"))
//!     .with_station(StationConfig::default().with_list_empty_fails(false));
//! ```

use heapless::String as HString;
use serde::{Deserialize, Serialize};

/// Maximum length for short config strings (names, store keys)
pub const MAX_SHORT_STRING: usize = 64;

/// Maximum length for longer config strings (paths)
pub const MAX_LONG_STRING: usize = 128;

/// Type alias for short config strings
pub type ShortString = HString<MAX_SHORT_STRING>;

/// Type alias for longer config strings
pub type LongString = HString<MAX_LONG_STRING>;

// ============================================================================
// Helpers for creating heapless strings
// ============================================================================

fn truncated<const N: usize>(s: &str) -> HString<N> {
    let mut end = s.len().min(N);
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    let mut hs = HString::new();
    // Cannot fail: `end <= N`.
    let _ = hs.push_str(&s[..end]);
    hs
}

/// Create a ShortString from a &str, truncating if too long
pub fn short_string(s: &str) -> ShortString {
    truncated(s)
}

/// Create a LongString from a &str, truncating if too long
pub fn long_string(s: &str) -> LongString {
    truncated(s)
}

// ============================================================================
// Main Config
// ============================================================================

/// Complete accessory subsystem configuration
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Command handling behavior
    pub station: StationConfig,
    /// Persistence location
    pub storage: StorageConfig,
    /// Device identification
    pub device: DeviceConfig,
}

impl Config {
    /// Parse a configuration document. Missing sections use defaults.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Set station configuration
    pub fn with_station(mut self, station: StationConfig) -> Self {
        self.station = station;
        self
    }

    /// Set storage configuration
    pub fn with_storage(mut self, storage: StorageConfig) -> Self {
        self.storage = storage;
        self
    }

    /// Set device configuration
    pub fn with_device(mut self, device: DeviceConfig) -> Self {
        self.device = device;
        self
    }
}

// ============================================================================
// Station Config
// ============================================================================

/// Command handling configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StationConfig {
    /// Reply `<X>` to a turnout listing when no turnouts are defined
    pub list_empty_fails: bool,
    /// Write the turnout document after every create, update or delete
    pub autosave: bool,
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            list_empty_fails: true,
            autosave: false,
        }
    }
}

impl StationConfig {
    /// Set empty-listing behavior
    pub fn with_list_empty_fails(mut self, fails: bool) -> Self {
        self.list_empty_fails = fails;
        self
    }

    /// Enable or disable autosave
    pub fn with_autosave(mut self, autosave: bool) -> Self {
        self.autosave = autosave;
        self
    }
}

// ============================================================================
// Storage Config
// ============================================================================

/// Persistence configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding persisted documents
    pub data_dir: LongString,
    /// Document key for turnouts
    pub turnouts_key: ShortString,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: long_string("."),
            turnouts_key: short_string(crate::registry::TURNOUTS_KEY),
        }
    }
}

impl StorageConfig {
    /// Set the data directory
    pub fn with_data_dir(mut self, dir: &str) -> Self {
        self.data_dir = long_string(dir);
        self
    }

    /// Set the turnout document key
    pub fn with_turnouts_key(mut self, key: &str) -> Self {
        self.turnouts_key = short_string(key);
        self
    }
}

// ============================================================================
// Device Config
// ============================================================================

/// Device identification configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Human-readable station name
    pub name: ShortString,
    /// Station ID
    pub id: ShortString,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            name: short_string("trainz-accessories"),
            id: short_string("station1"),
        }
    }
}

impl DeviceConfig {
    /// Set the device name
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = short_string(name);
        self
    }

    /// Set the device ID
    pub fn with_id(mut self, id: &str) -> Self {
        self.id = short_string(id);
        self
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert!(config.station.list_empty_fails);
        assert!(!config.station.autosave);
        assert_eq!(config.storage.data_dir.as_str(), ".");
        assert_eq!(config.storage.turnouts_key.as_str(), "turnouts.json");
        assert_eq!(config.device.name.as_str(), "trainz-accessories");
    }

    #[test]
    fn builder_pattern() {
        let config = Config::default()
            .with_station(StationConfig::default().with_autosave(true))
            .with_storage(
                StorageConfig::default()
                    .with_data_dir("/data")
                    .with_turnouts_key("layout.json"),
            )
            .with_device(DeviceConfig::default().with_name("Yard").with_id("yard-1"));

        assert!(config.station.autosave);
        assert_eq!(config.storage.data_dir.as_str(), "/data");
        assert_eq!(config.storage.turnouts_key.as_str(), "layout.json");
        assert_eq!(config.device.id.as_str(), "yard-1");
    }

    #[test]
    fn from_json_partial() {
        let config =
            Config::from_json(r#"{"storage": {"data_dir": "/mnt/sd"}, "station": {"autosave": true}}"#)
                .unwrap();
        assert_eq!(config.storage.data_dir.as_str(), "/mnt/sd");
        assert_eq!(config.storage.turnouts_key.as_str(), "turnouts.json");
        assert!(config.station.autosave);
        assert!(config.station.list_empty_fails);
    }

    #[test]
    fn from_json_invalid() {
        let err = Config::from_json("[1, 2").unwrap_err();
        assert!(err.is_eof());
        let err = Config::from_json(r#"{"station": {"autosave": "yes"}}"#).unwrap_err();
        assert!(err.is_data());
    }

    // =========================================================================
    // String Helper Tests
    // =========================================================================

    #[test]
    fn short_string_truncation() {
        let long_input = "a".repeat(100);
        let s = short_string(&long_input);
        assert_eq!(s.len(), MAX_SHORT_STRING);
    }

    #[test]
    fn long_string_truncation() {
        let long_input = "b".repeat(200);
        let s = long_string(&long_input);
        assert_eq!(s.len(), MAX_LONG_STRING);
    }

    #[test]
    fn string_helpers_utf8_boundary() {
        // 3 + 4 * 16 = 67 bytes; the cut must fall before a whole emoji
        let input = format!("abc{}", "\u{1F682}".repeat(16));
        let s = short_string(&input);
        assert!(s.len() <= MAX_SHORT_STRING);
        assert_eq!(s.len(), 63);
        assert!(core::str::from_utf8(s.as_bytes()).is_ok());
    }
}
