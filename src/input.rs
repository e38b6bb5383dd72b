//! MIDI input transport
//!
//! Connects to a hardware input port via midir and runs every raw byte
//! through the framer; complete messages land on an mpsc channel consumed
//! by the single classification loop. The midir callback thread is the
//! only producer, so framing state never crosses threads.

use midir::{MidiInput, MidiInputConnection, MidiInputPort};
use tokio::sync::mpsc;
use tracing::{debug, trace, warn};

use crate::error::{Error, Result};
use crate::framer::Framer;
use crate::midi::{format_hex, RawMessage};

const CLIENT_NAME: &str = "midish-gw";

/// Open MIDI input connection forwarding framed messages.
///
/// Dropping the adapter closes the port and ends the event stream.
pub struct MidiInputAdapter {
    _conn: MidiInputConnection<Framer>,
}

impl MidiInputAdapter {
    /// Connect to the first input port whose name contains `pattern`
    /// (case-insensitive). Framed messages arrive on the returned
    /// channel.
    pub fn connect(pattern: &str) -> Result<(Self, mpsc::Receiver<RawMessage>)> {
        let midi_in = MidiInput::new(CLIENT_NAME)?;

        let (port, name) = find_input_port(&midi_in, pattern)
            .ok_or_else(|| Error::Transport(format!("input port '{}' not found", pattern)))?;
        debug!("connecting to input port: {}", name);

        let (tx, rx) = mpsc::channel(1000);

        let conn = midi_in.connect(
            &port,
            CLIENT_NAME,
            move |_timestamp, data, framer| {
                trace!("raw midi: {}", format_hex(data));

                for &byte in data {
                    if let Some(msg) = framer.feed(byte) {
                        // never block the midir callback thread
                        if tx.try_send(msg).is_err() {
                            warn!("event queue full, dropping MIDI message");
                        }
                    }
                }
            },
            Framer::new(),
        )?;

        Ok((Self { _conn: conn }, rx))
    }
}

/// Find an input port by substring match
fn find_input_port(midi_in: &MidiInput, pattern: &str) -> Option<(MidiInputPort, String)> {
    for port in midi_in.ports() {
        if let Ok(name) = midi_in.port_name(&port) {
            // Case-insensitive substring match
            if name.to_lowercase().contains(&pattern.to_lowercase()) {
                return Some((port, name));
            }
        }
    }
    None
}

/// List available MIDI input port names.
pub fn list_input_ports() -> Result<Vec<String>> {
    let midi_in = MidiInput::new(CLIENT_NAME)?;

    let mut names = Vec::new();
    for port in midi_in.ports() {
        if let Ok(name) = midi_in.port_name(&port) {
            names.push(name);
        }
    }

    Ok(names)
}
