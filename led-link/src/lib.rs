//! Board-independent half of the pico2w LED server.
//!
//! An AT-command Wi-Fi module on a UART is brought up as a station running a TCP server on
//! port 80. Text commands arriving from a client in `+IPD` frames switch LEDs on a 16-bit
//! output port:
//!
//! ```text
//! +IPD,0,10:led_3_on      LED 3 on
//! +IPD,0,11:all_led_off   every LED off
//! ```
//!
//! While no client is connected, bytes typed on a local console UART go straight to the
//! module, so it can be driven by hand with raw AT commands.
//!
//! Everything here is generic over [`embedded_io_async`] streams, an [`embedded_hal_async`]
//! delay and the [`OutputPort`] trait, and is tested on the host.
//!
//! # Features
//!
//! - **`log`** (default): log through the `log` facade.
//! - **`defmt`**: log through `defmt` and derive `defmt::Format`. The firmware turns this on
//!   and `log` off. With neither feature the log calls compile to nothing.

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod boot;
pub mod command;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod gpio;
pub mod ipd;
pub mod line;
pub mod session;
pub mod tracker;

#[cfg(test)]
mod testing;

pub use boot::{BootSequencer, BootStage, BootStep};
pub use command::{Command, CommandError};
pub use config::{LinkConfig, WifiCredentials};
pub use dispatch::CommandDispatcher;
pub use error::{ConfigError, LinkError};
pub use gpio::{GpioActuator, LedBank, LedIndex, OutputPort};
pub use ipd::IpdFrame;
pub use line::{LineAssembler, LineEvent};
pub use session::{Activity, LinkStatus, Links, Session};
pub use tracker::{ConnectionEvent, ConnectionTracker};
