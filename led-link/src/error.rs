use embedded_io_async::ErrorKind;
use thiserror::Error;

/// A UART refused a read or write.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError {
    #[error("radio link: {0:?}")]
    Radio(ErrorKind),
    #[error("console link: {0:?}")]
    Console(ErrorKind),
}

impl LinkError {
    pub fn radio<E: embedded_io_async::Error>(e: E) -> Self {
        LinkError::Radio(e.kind())
    }

    pub fn console<E: embedded_io_async::Error>(e: E) -> Self {
        LinkError::Console(e.kind())
    }
}

/// The configured values do not fit an AT command.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    #[error("SSID does not fit in the join command")]
    SsidTooLong,
    #[error("password does not fit in the join command")]
    PasswordTooLong,
    #[error("AT command exceeds the command buffer")]
    CommandTooLong,
}
