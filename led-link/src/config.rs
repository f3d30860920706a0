//! Compile-time settings for the radio link.
//!
//! Credentials come from the `WIFI_SSID` / `WIFI_PASSWORD` environment variables at build time,
//! e.g. `WIFI_SSID=lab WIFI_PASSWORD=secret cargo build --release`.

/// Line buffer size, terminator slot included.
pub const LINE_CAPACITY: usize = 128;

/// Number of LEDs on the output port.
pub const LED_COUNT: usize = 16;

/// Longest AT command the boot sequence will render, `\r\n` excluded.
pub const AT_COMMAND_CAPACITY: usize = 128;

pub const DEFAULT_LISTEN_PORT: u16 = 80;

const DEFAULT_WIFI_SSID: &str = "Kozsi";
const DEFAULT_WIFI_PASSWORD: &str = "123456789";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WifiCredentials {
    pub ssid: &'static str,
    pub password: &'static str,
}

impl WifiCredentials {
    pub const fn from_env() -> Self {
        Self {
            ssid: match option_env!("WIFI_SSID") {
                Some(ssid) => ssid,
                None => DEFAULT_WIFI_SSID,
            },
            password: match option_env!("WIFI_PASSWORD") {
                Some(password) => password,
                None => DEFAULT_WIFI_PASSWORD,
            },
        }
    }
}

impl Default for WifiCredentials {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Waits after each boot command, in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BootWaits {
    pub station_mode_ms: u32,
    pub join_ms: u32,
    pub multiplex_ms: u32,
    pub server_ms: u32,
}

impl BootWaits {
    pub const STANDARD: Self = Self {
        station_mode_ms: 5_000,
        join_ms: 10_000,
        multiplex_ms: 5_000,
        server_ms: 5_000,
    };
}

impl Default for BootWaits {
    fn default() -> Self {
        Self::STANDARD
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinkConfig {
    pub wifi: WifiCredentials,
    pub listen_port: u16,
    pub waits: BootWaits,
}

impl LinkConfig {
    pub const fn new(wifi: WifiCredentials) -> Self {
        Self {
            wifi,
            listen_port: DEFAULT_LISTEN_PORT,
            waits: BootWaits::STANDARD,
        }
    }
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self::new(WifiCredentials::from_env())
    }
}
