//! Routing signals and output route resolution

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the independent inputs that drive route selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RouteSignal {
    /// A voice call is in progress
    CallActive,

    /// A Bluetooth audio device is connected
    BluetoothConnected,

    /// A wired headset is plugged in
    HeadsetConnected,

    /// A USB audio device is connected
    UsbConnected,
}

/// Snapshot of all routing inputs
///
/// Signals are independent booleans and several may be active at once.
/// [`RouteSignals::resolve`] collapses them into the single winning route.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteSignals {
    /// A voice call is in progress
    pub in_call: bool,

    /// A Bluetooth audio device is connected
    pub bluetooth_connected: bool,

    /// A wired headset is plugged in
    pub headset_connected: bool,

    /// A USB audio device is connected
    pub usb_connected: bool,
}

impl RouteSignals {
    /// Read one signal
    pub fn get(&self, signal: RouteSignal) -> bool {
        match signal {
            RouteSignal::CallActive => self.in_call,
            RouteSignal::BluetoothConnected => self.bluetooth_connected,
            RouteSignal::HeadsetConnected => self.headset_connected,
            RouteSignal::UsbConnected => self.usb_connected,
        }
    }

    /// Write one signal
    pub fn set(&mut self, signal: RouteSignal, active: bool) {
        match signal {
            RouteSignal::CallActive => self.in_call = active,
            RouteSignal::BluetoothConnected => self.bluetooth_connected = active,
            RouteSignal::HeadsetConnected => self.headset_connected = active,
            RouteSignal::UsbConnected => self.usb_connected = active,
        }
    }

    /// Collapse the signals into the winning output route
    ///
    /// Precedence is strict: an active call suspends processing outright,
    /// then Bluetooth, wired headset and USB in that order. With nothing
    /// connected the speaker route wins.
    pub fn resolve(&self) -> RouteMode {
        if self.in_call {
            RouteMode::Disabled
        } else if self.bluetooth_connected {
            RouteMode::Bluetooth
        } else if self.headset_connected {
            RouteMode::Headset
        } else if self.usb_connected {
            RouteMode::Usb
        } else {
            RouteMode::Speaker
        }
    }
}

/// The output route a configuration is keyed by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RouteMode {
    /// Processing suspended (voice call in progress)
    Disabled,

    /// Bluetooth audio device
    Bluetooth,

    /// Wired headset
    Headset,

    /// USB audio device
    Usb,

    /// Built-in speaker
    Speaker,
}

impl RouteMode {
    /// Configuration key fragment for this route
    ///
    /// These are the names configurations are stored under. No configuration
    /// named `"disable"` exists; resolving it falls through to the defaults,
    /// which leave every effect switched off.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disabled => "disable",
            Self::Bluetooth => "bluetooth",
            Self::Headset => "headset",
            Self::Usb => "usb",
            Self::Speaker => "speaker",
        }
    }
}

impl fmt::Display for RouteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
