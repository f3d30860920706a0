//! The forever loop between the radio module, the local console and the LEDs.

use embassy_futures::select::{Either, select};
use embedded_hal_async::delay::DelayNs;
use embedded_io_async::{Read, Write};

use crate::dispatch::CommandDispatcher;
use crate::error::LinkError;
use crate::fmt::as_text;
use crate::gpio::{LedBank, OutputPort};
use crate::ipd::IpdFrame;
use crate::line::{LineAssembler, LineEvent};
use crate::tracker::ConnectionTracker;

const CHUNK: usize = 64;
const ERROR_PAUSE_MS: u32 = 100;

/// Both UARTs, split into halves.
pub struct Links<RadioRx, RadioTx, ConsoleRx, ConsoleTx> {
    pub radio_rx: RadioRx,
    pub radio_tx: RadioTx,
    pub console_rx: ConsoleRx,
    pub console_tx: ConsoleTx,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Activity {
    /// Bytes typed on the console went to the radio.
    Forwarded(usize),
    /// Bytes from the radio were processed and mirrored to the console.
    Received(usize),
    /// A stream reported end of data.
    Idle,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinkStatus {
    pub leds: LedBank,
    pub client_connected: bool,
}

/// Owns every piece of mutable state the loop touches.
pub struct Session<P> {
    dispatcher: CommandDispatcher<P>,
    tracker: ConnectionTracker,
    lines: LineAssembler,
}

impl<P: OutputPort> Session<P> {
    pub fn new(port: P) -> Self {
        Self {
            dispatcher: CommandDispatcher::new(port),
            tracker: ConnectionTracker::new(),
            lines: LineAssembler::new(),
        }
    }

    pub fn status(&self) -> LinkStatus {
        LinkStatus {
            leds: self.dispatcher.leds(),
            client_connected: self.tracker.is_connected(),
        }
    }

    /// Feeds radio output through the connection tracker and the line assembler,
    /// dispatching the payload of every `+IPD` line.
    pub fn ingest(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.tracker.observe(byte);
            if let LineEvent::Complete(line) = self.lines.feed(byte) {
                let Some(frame) = IpdFrame::parse(line) else {
                    continue;
                };
                debug!(
                    "+IPD link {:?} len {:?}: {}",
                    frame.link,
                    frame.declared_len,
                    as_text(frame.payload)
                );
                let _ = self.dispatcher.dispatch(frame.payload);
            }
        }
    }

    /// Waits for the next chunk from the radio, or from the console while no client is
    /// connected, and handles it.
    pub async fn step<RR, RT, CR, CT>(
        &mut self,
        links: &mut Links<RR, RT, CR, CT>,
    ) -> Result<Activity, LinkError>
    where
        RR: Read,
        RT: Write,
        CR: Read,
        CT: Write,
    {
        let mut radio_buf = [0u8; CHUNK];
        let mut console_buf = [0u8; CHUNK];

        let ready = if self.tracker.is_connected() {
            Either::First(links.radio_rx.read(&mut radio_buf).await)
        } else {
            select(
                links.radio_rx.read(&mut radio_buf),
                links.console_rx.read(&mut console_buf),
            )
            .await
        };

        match ready {
            Either::First(read) => {
                let n = read.map_err(LinkError::radio)?;
                if n == 0 {
                    return Ok(Activity::Idle);
                }
                let bytes = &radio_buf[..n];
                // The bytes are off the UART already; a failed echo must not lose them.
                self.ingest(bytes);
                links
                    .console_tx
                    .write_all(bytes)
                    .await
                    .map_err(LinkError::console)?;
                Ok(Activity::Received(n))
            }
            Either::Second(read) => {
                let n = read.map_err(LinkError::console)?;
                if n == 0 {
                    return Ok(Activity::Idle);
                }
                // Not echoed: the module echoes AT input itself.
                links
                    .radio_tx
                    .write_all(&console_buf[..n])
                    .await
                    .map_err(LinkError::radio)?;
                trace!("forwarded {} console bytes", n);
                Ok(Activity::Forwarded(n))
            }
        }
    }

    /// Runs forever. Transport errors are logged and followed by a short pause.
    pub async fn run<RR, RT, CR, CT, D>(
        &mut self,
        links: &mut Links<RR, RT, CR, CT>,
        delay: &mut D,
        mut on_step: impl FnMut(LinkStatus),
    ) -> !
    where
        RR: Read,
        RT: Write,
        CR: Read,
        CT: Write,
        D: DelayNs,
    {
        loop {
            if let Err(e) = self.step(links).await {
                error!("Link error: {:?}", e);
                delay.delay_ms(ERROR_PAUSE_MS).await;
            }
            on_step(self.status());
        }
    }
}
