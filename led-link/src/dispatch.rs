use crate::command::{Command, CommandError};
use crate::fmt::as_text;
use crate::gpio::{GpioActuator, LedBank, OutputPort};

/// Runs parsed commands against the LED port.
pub struct CommandDispatcher<P> {
    actuator: GpioActuator<P>,
}

impl<P: OutputPort> CommandDispatcher<P> {
    pub fn new(port: P) -> Self {
        Self {
            actuator: GpioActuator::new(port),
        }
    }

    pub fn leds(&self) -> LedBank {
        self.actuator.bank()
    }

    pub fn actuator(&self) -> &GpioActuator<P> {
        &self.actuator
    }

    /// Parses and applies one command. Failures are logged and leave the LEDs untouched.
    pub fn dispatch(&mut self, text: &[u8]) -> Result<Command, CommandError> {
        let command = match Command::parse(text) {
            Ok(command) => command,
            Err(e) => {
                let shown = as_text(text);
                match e {
                    CommandError::InvalidLedNumber => warn!("Invalid LED number: {}", shown),
                    CommandError::UnknownCommand => warn!("Unknown command: {}", shown),
                }
                return Err(e);
            }
        };
        self.apply(command);
        Ok(command)
    }

    pub fn apply(&mut self, command: Command) {
        match command {
            Command::AllOn => {
                info!("Turning all LEDs ON");
                self.actuator.set_all(true);
            }
            Command::AllOff => {
                info!("Turning all LEDs OFF");
                self.actuator.set_all(false);
            }
            Command::LedOn(led) => {
                info!("Turning LED {} ON", led.get());
                self.actuator.set_led(led, true);
            }
            Command::LedOff(led) => {
                info!("Turning LED {} OFF", led.get());
                self.actuator.set_led(led, false);
            }
        }
    }
}
