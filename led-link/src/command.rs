//! The LED command grammar.
//!
//! Rules are tried in order and match on prefix, case-sensitive:
//!
//! ```text
//! all_led_on            -> every LED on
//! all_led_off           -> every LED off
//! led_<N>_on            -> LED N on,  0 <= N < 16
//! led_<N>_off           -> LED N off, 0 <= N < 16
//! ```
//!
//! Text after a matched rule is ignored, so `all_led_on please` is still `AllOn`.

use thiserror::Error;

use crate::gpio::LedIndex;

const ALL_ON: &[u8] = b"all_led_on";
const ALL_OFF: &[u8] = b"all_led_off";
const LED_PREFIX: &[u8] = b"led_";
const ON_SUFFIX: &[u8] = b"_on";
const OFF_SUFFIX: &[u8] = b"_off";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    AllOn,
    AllOff,
    LedOn(LedIndex),
    LedOff(LedIndex),
}

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    /// `led_<N>_...` with N missing, negative or out of range, or without `_on`/`_off` after it.
    #[error("invalid LED number")]
    InvalidLedNumber,
    #[error("unknown command")]
    UnknownCommand,
}

impl Command {
    pub fn parse(text: &[u8]) -> Result<Self, CommandError> {
        if text.starts_with(ALL_ON) {
            return Ok(Command::AllOn);
        }
        if text.starts_with(ALL_OFF) {
            return Ok(Command::AllOff);
        }
        let Some(rest) = text.strip_prefix(LED_PREFIX) else {
            return Err(CommandError::UnknownCommand);
        };

        let Some((number, suffix)) = parse_leading_int(rest) else {
            return Err(CommandError::InvalidLedNumber);
        };
        let Ok(led) = LedIndex::try_from(number) else {
            return Err(CommandError::InvalidLedNumber);
        };

        if suffix.starts_with(ON_SUFFIX) {
            Ok(Command::LedOn(led))
        } else if suffix.starts_with(OFF_SUFFIX) {
            Ok(Command::LedOff(led))
        } else {
            Err(CommandError::InvalidLedNumber)
        }
    }
}

/// Reads a decimal integer the way `strtol` does: leading whitespace, an optional sign,
/// then as many digits as there are. Returns `None` when no digit follows or the value
/// overflows.
fn parse_leading_int(bytes: &[u8]) -> Option<(i64, &[u8])> {
    let mut i = 0;
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    let negative = match bytes.get(i) {
        Some(b'-') => {
            i += 1;
            true
        }
        Some(b'+') => {
            i += 1;
            false
        }
        _ => false,
    };

    let start = i;
    let mut value: i64 = 0;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        let digit = i64::from(bytes[i] - b'0');
        value = value.checked_mul(10)?.checked_add(digit)?;
        i += 1;
    }
    if i == start {
        return None;
    }
    Some((if negative { -value } else { value }, &bytes[i..]))
}
