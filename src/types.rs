//! Common types used throughout activity-elt
//!
//! This module contains the activity event record, its categorical
//! fields, and a few shared enums used across modules.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Constants
// ============================================================================

/// Default number of records per run
pub const DEFAULT_COUNT: usize = 1000;

/// Smallest user id the generator emits
pub const USER_ID_MIN: u32 = 1;

/// Largest user id the generator emits (inclusive)
pub const USER_ID_MAX: u32 = 100;

// ============================================================================
// Action
// ============================================================================

/// What the user did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Login,
    Logout,
    Purchase,
    View,
}

impl Action {
    /// Every action, in a fixed order
    pub const ALL: [Action; 4] = [
        Action::Login,
        Action::Logout,
        Action::Purchase,
        Action::View,
    ];

    /// Wire name of the action
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Login => "login",
            Action::Logout => "logout",
            Action::Purchase => "purchase",
            Action::View => "view",
        }
    }
}

// ============================================================================
// Device
// ============================================================================

/// Client device class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    Mobile,
    Desktop,
    Tablet,
}

impl Device {
    /// Every device, in a fixed order
    pub const ALL: [Device; 3] = [Device::Mobile, Device::Desktop, Device::Tablet];

    /// Wire name of the device
    pub fn as_str(self) -> &'static str {
        match self {
            Device::Mobile => "mobile",
            Device::Desktop => "desktop",
            Device::Tablet => "tablet",
        }
    }
}

// ============================================================================
// Location
// ============================================================================

/// Coarse user region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Location {
    Us,
    Eu,
    Asia,
}

impl Location {
    /// Every location, in a fixed order
    pub const ALL: [Location; 3] = [Location::Us, Location::Eu, Location::Asia];

    /// Wire name of the location
    pub fn as_str(self) -> &'static str {
        match self {
            Location::Us => "US",
            Location::Eu => "EU",
            Location::Asia => "ASIA",
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )*
    };
}

display_as_str!(Action, Device, Location);

// ============================================================================
// Timestamp Style
// ============================================================================

/// How event timestamps are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum TimestampStyle {
    /// `2024-01-15T10:30:00.123456` (UTC, no zone designator)
    #[default]
    Naive,
    /// `2024-01-15T10:30:00.123456Z`
    Utc,
}

// ============================================================================
// Activity Event
// ============================================================================

/// Nested device/location block of an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EventMetadata {
    pub device: Device,
    pub location: Location,
}

/// One synthetic user-activity record
///
/// Field order here is the order keys appear on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActivityEvent {
    pub event_id: uuid::Uuid,
    pub user_id: u32,
    pub action: Action,
    pub timestamp: String,
    pub metadata: EventMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_enum_wire_names() {
        assert_eq!(serde_json::to_value(Action::Purchase).unwrap(), "purchase");
        assert_eq!(serde_json::to_value(Device::Tablet).unwrap(), "tablet");
        assert_eq!(serde_json::to_value(Location::Asia).unwrap(), "ASIA");
        assert_eq!(serde_json::to_value(Location::Us).unwrap(), "US");
    }

    #[test]
    fn test_as_str_matches_serde() {
        for action in Action::ALL {
            assert_eq!(serde_json::to_value(action).unwrap(), action.as_str());
        }
        for device in Device::ALL {
            assert_eq!(serde_json::to_value(device).unwrap(), device.as_str());
        }
        for location in Location::ALL {
            assert_eq!(serde_json::to_value(location).unwrap(), location.to_string());
        }
    }

    #[test]
    fn test_event_rejects_extra_keys() {
        let value = json!({
            "event_id": "67e55044-10b1-426f-9247-bb680e5fe0c8",
            "user_id": 5,
            "action": "view",
            "timestamp": "2024-01-15T10:30:00.000000",
            "metadata": {"device": "mobile", "location": "EU"},
            "extra": 1
        });
        assert!(serde_json::from_value::<ActivityEvent>(value).is_err());
    }

    #[test]
    fn test_timestamp_style_default() {
        assert_eq!(TimestampStyle::default(), TimestampStyle::Naive);
        let style: TimestampStyle = serde_yaml::from_str("utc").unwrap();
        assert_eq!(style, TimestampStyle::Utc);
    }
}
