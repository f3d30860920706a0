//! LED bank state and the discrete output port it is mirrored to.

use crate::config::LED_COUNT;

/// An LED position on the 16-bit port, always `< LED_COUNT`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LedIndex(u8);

impl LedIndex {
    pub const fn new(index: u8) -> Option<Self> {
        if (index as usize) < LED_COUNT {
            Some(Self(index))
        } else {
            None
        }
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    const fn bit(self) -> u16 {
        1 << self.0
    }

    pub fn all() -> impl Iterator<Item = LedIndex> {
        (0..LED_COUNT as u8).map(LedIndex)
    }
}

impl TryFrom<i64> for LedIndex {
    type Error = ();

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value).ok().and_then(LedIndex::new).ok_or(())
    }
}

/// Commanded LED state, bit `i` set means LED `i` is on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LedBank(u16);

impl LedBank {
    pub const ALL_OFF: Self = Self(0x0000);
    pub const ALL_ON: Self = Self(0xFFFF);

    pub const fn mask(self) -> u16 {
        self.0
    }

    pub const fn is_on(self, led: LedIndex) -> bool {
        self.0 & led.bit() != 0
    }

    pub fn set(&mut self, led: LedIndex, on: bool) {
        if on {
            self.0 |= led.bit();
        } else {
            self.0 &= !led.bit();
        }
    }
}

/// A port that takes the whole LED pattern in one write.
pub trait OutputPort {
    fn write_mask(&mut self, mask: u16);
}

/// Owns the LED bank and pushes it to the port after every change.
pub struct GpioActuator<P> {
    port: P,
    bank: LedBank,
}

impl<P: OutputPort> GpioActuator<P> {
    /// Starts with every LED off and writes that state to the port once.
    pub fn new(mut port: P) -> Self {
        port.write_mask(LedBank::ALL_OFF.mask());
        Self {
            port,
            bank: LedBank::ALL_OFF,
        }
    }

    pub fn bank(&self) -> LedBank {
        self.bank
    }

    /// One port write per call, whatever bit changed.
    pub fn set_led(&mut self, led: LedIndex, on: bool) {
        self.bank.set(led, on);
        self.port.write_mask(self.bank.mask());
    }

    pub fn set_all(&mut self, on: bool) {
        for led in LedIndex::all() {
            self.set_led(led, on);
        }
    }

    pub fn port(&self) -> &P {
        &self.port
    }
}
