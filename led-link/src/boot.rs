//! Brings the module up as a station with a TCP server, once, at startup.
//!
//! The sequence is fire-and-forget: replies are not read here. Whatever the module answers
//! stays in the receive buffer and is drained by the session loop afterwards, so a failed
//! join looks exactly like a successful one.

use core::fmt::Write as _;

use embedded_hal_async::delay::DelayNs;
use embedded_io_async::Write;
use heapless::String;

use crate::config::{AT_COMMAND_CAPACITY, LinkConfig};
use crate::error::{ConfigError, LinkError};

pub type AtCommand = String<AT_COMMAND_CAPACITY>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BootStage {
    StationMode,
    JoinNetwork,
    MultipleConnections,
    TcpServer,
}

impl BootStage {
    pub const ORDER: [BootStage; 4] = [
        BootStage::StationMode,
        BootStage::JoinNetwork,
        BootStage::MultipleConnections,
        BootStage::TcpServer,
    ];

    fn describe(self) -> &'static str {
        match self {
            BootStage::StationMode => "Setting ESP32 to Station Mode (AT+CWMODE=1)...",
            BootStage::JoinNetwork => "Connecting to Wi-Fi Network (AT+CWJAP)...",
            BootStage::MultipleConnections => "Enabling multiple connections (AT+CIPMUX=1)...",
            BootStage::TcpServer => "Starting TCP server (AT+CIPSERVER)...",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BootStep {
    pub stage: BootStage,
    pub command: AtCommand,
    pub wait_ms: u32,
}

impl BootStep {
    fn render(config: &LinkConfig, stage: BootStage) -> Result<Self, ConfigError> {
        let mut command = AtCommand::new();
        let wait_ms = match stage {
            BootStage::StationMode => {
                push(&mut command, "AT+CWMODE=1")?;
                config.waits.station_mode_ms
            }
            BootStage::JoinNetwork => {
                push(&mut command, "AT+CWJAP=\"")?;
                push_quoted(&mut command, config.wifi.ssid)
                    .map_err(|_| ConfigError::SsidTooLong)?;
                push(&mut command, "\",\"")?;
                push_quoted(&mut command, config.wifi.password)
                    .map_err(|_| ConfigError::PasswordTooLong)?;
                push(&mut command, "\"")?;
                config.waits.join_ms
            }
            BootStage::MultipleConnections => {
                push(&mut command, "AT+CIPMUX=1")?;
                config.waits.multiplex_ms
            }
            BootStage::TcpServer => {
                write!(command, "AT+CIPSERVER=1,{}", config.listen_port)
                    .map_err(|_| ConfigError::CommandTooLong)?;
                config.waits.server_ms
            }
        };
        Ok(Self {
            stage,
            command,
            wait_ms,
        })
    }
}

fn push(command: &mut AtCommand, text: &str) -> Result<(), ConfigError> {
    command
        .push_str(text)
        .map_err(|_| ConfigError::CommandTooLong)
}

/// Escapes `"`, `,` and `\` with a backslash, as the AT parser expects inside quoted strings.
fn push_quoted(command: &mut AtCommand, text: &str) -> Result<(), ()> {
    for c in text.chars() {
        if matches!(c, '"' | ',' | '\\') {
            command.push('\\')?;
        }
        command.push(c)?;
    }
    Ok(())
}

pub struct BootSequencer {
    config: LinkConfig,
}

impl BootSequencer {
    pub const fn new(config: LinkConfig) -> Self {
        Self { config }
    }

    pub fn step(&self, stage: BootStage) -> Result<BootStep, ConfigError> {
        BootStep::render(&self.config, stage)
    }

    /// Sends every step in order, waiting the step's delay after each one.
    ///
    /// A step that cannot be rendered is logged and skipped; the rest still run.
    /// Only a transport failure stops the sequence.
    pub async fn run<W, D>(&self, radio: &mut W, delay: &mut D) -> Result<(), LinkError>
    where
        W: Write,
        D: DelayNs,
    {
        info!("Initializing ESP32 ...");
        for stage in BootStage::ORDER {
            info!("{}", stage.describe());
            let step = match self.step(stage) {
                Ok(step) => step,
                Err(e) => {
                    error!("Skipping {:?}: {:?}", stage, e);
                    continue;
                }
            };
            debug!("> {}", step.command.as_str());
            radio
                .write_all(step.command.as_bytes())
                .await
                .map_err(LinkError::radio)?;
            radio.write_all(b"\r\n").await.map_err(LinkError::radio)?;
            radio.flush().await.map_err(LinkError::radio)?;
            delay.delay_ms(step.wait_ms).await;
        }
        info!("ESP32 is now running...");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use embassy_futures::block_on;

    use super::*;
    use crate::config::{BootWaits, WifiCredentials};
    use crate::testing::{RecordingDelay, SinkStream};

    fn config(ssid: &'static str, password: &'static str) -> LinkConfig {
        LinkConfig::new(WifiCredentials { ssid, password })
    }

    #[test]
    fn sends_the_four_commands_in_order() {
        let sequencer = BootSequencer::new(config("Kozsi", "123456789"));
        let mut radio = SinkStream::default();
        let mut delay = RecordingDelay::default();

        block_on(sequencer.run(&mut radio, &mut delay)).unwrap();

        assert_eq!(
            radio.text(),
            "AT+CWMODE=1\r\n\
             AT+CWJAP=\"Kozsi\",\"123456789\"\r\n\
             AT+CIPMUX=1\r\n\
             AT+CIPSERVER=1,80\r\n"
        );
        assert_eq!(delay.waits_ms.as_slice(), &[5_000, 10_000, 5_000, 5_000]);
    }

    #[test]
    fn waits_and_port_come_from_config() {
        let mut config = config("lab", "pw");
        config.listen_port = 8080;
        config.waits = BootWaits {
            station_mode_ms: 1,
            join_ms: 2,
            multiplex_ms: 3,
            server_ms: 4,
        };
        let sequencer = BootSequencer::new(config);
        let mut radio = SinkStream::default();
        let mut delay = RecordingDelay::default();

        block_on(sequencer.run(&mut radio, &mut delay)).unwrap();

        assert!(radio.text().ends_with("AT+CIPSERVER=1,8080\r\n"));
        assert_eq!(delay.waits_ms.as_slice(), &[1, 2, 3, 4]);
    }

    #[test]
    fn credentials_are_escaped() {
        let sequencer = BootSequencer::new(config("my,net", "pa\"ss\\"));
        let step = sequencer.step(BootStage::JoinNetwork).unwrap();
        assert_eq!(step.command.as_str(), r#"AT+CWJAP="my\,net","pa\"ss\\""#);
    }

    #[test]
    fn oversized_ssid_skips_only_the_join() {
        const LONG: &str = "ssid-ssid-ssid-ssid-ssid-ssid-ssid-ssid-ssid-ssid-ssid-ssid-ssid-ssid-ssid-ssid-ssid-ssid-ssid-ssid-ssid-ssid-ssid-ssid-ssid-ssid";
        let sequencer = BootSequencer::new(config(LONG, "pw"));
        assert_eq!(
            sequencer.step(BootStage::JoinNetwork),
            Err(ConfigError::SsidTooLong)
        );

        let mut radio = SinkStream::default();
        let mut delay = RecordingDelay::default();
        block_on(sequencer.run(&mut radio, &mut delay)).unwrap();

        assert_eq!(
            radio.text(),
            "AT+CWMODE=1\r\nAT+CIPMUX=1\r\nAT+CIPSERVER=1,80\r\n"
        );
        assert_eq!(delay.waits_ms.as_slice(), &[5_000, 5_000, 5_000]);
    }

    #[test]
    fn oversized_password_is_reported() {
        const LONG: &str = "pw-pw-pw-pw-pw-pw-pw-pw-pw-pw-pw-pw-pw-pw-pw-pw-pw-pw-pw-pw-pw-pw-pw-pw-pw-pw-pw-pw-pw-pw-pw-pw-pw-pw-pw-pw-pw-pw-pw-pw-pw-pw-pw";
        let sequencer = BootSequencer::new(config("lab", LONG));
        assert_eq!(
            sequencer.step(BootStage::JoinNetwork),
            Err(ConfigError::PasswordTooLong)
        );
    }
}
