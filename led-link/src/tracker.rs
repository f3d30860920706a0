//! Follows the module's `0,CONNECT` / `0,CLOSED` notifications for socket link 0.

pub const CONNECT_MARKER: &[u8] = b"0,CONNECT";
pub const CLOSED_MARKER: &[u8] = b"0,CLOSED";

const WINDOW: usize = max(CONNECT_MARKER.len(), CLOSED_MARKER.len());

const fn max(a: usize, b: usize) -> usize {
    if a > b { a } else { b }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectionEvent {
    Connected,
    Closed,
}

/// Matches markers over a sliding window of the raw stream, so a marker split across
/// reads or sitting mid-line is still seen.
pub struct ConnectionTracker {
    window: [u8; WINDOW],
    filled: usize,
    connected: bool,
}

impl ConnectionTracker {
    pub const fn new() -> Self {
        Self {
            window: [0; WINDOW],
            filled: 0,
            connected: false,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Returns an event each time a marker completes, even if the state does not change.
    pub fn observe(&mut self, byte: u8) -> Option<ConnectionEvent> {
        self.window.copy_within(1.., 0);
        self.window[WINDOW - 1] = byte;
        self.filled = (self.filled + 1).min(WINDOW);

        let seen = &self.window[WINDOW - self.filled..];
        if seen.ends_with(CONNECT_MARKER) {
            self.connected = true;
            info!("Client connected.");
            Some(ConnectionEvent::Connected)
        } else if seen.ends_with(CLOSED_MARKER) {
            self.connected = false;
            info!("Client disconnected.");
            Some(ConnectionEvent::Closed)
        } else {
            None
        }
    }
}

impl Default for ConnectionTracker {
    fn default() -> Self {
        Self::new()
    }
}
