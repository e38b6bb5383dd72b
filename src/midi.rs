//! MIDI message types
//!
//! The gateway only reacts to the three 3-byte channel voice messages
//! (note on, note off, control change). Everything arrives as a raw
//! status + 2 data byte triple; decoding is for logging and for
//! transports that deliver pre-parsed events.

use std::fmt;

/// A complete 3-byte MIDI message as assembled by the framer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawMessage {
    pub status: u8,
    pub data1: u8,
    pub data2: u8,
}

impl RawMessage {
    pub fn new(status: u8, data1: u8, data2: u8) -> Self {
        Self {
            status,
            data1,
            data2,
        }
    }
}

/// Decoded MIDI message types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiMessage {
    /// Note Off: channel (0-15), note (0-127), velocity (0-127)
    NoteOff { channel: u8, note: u8, velocity: u8 },

    /// Note On: channel (0-15), note (0-127), velocity (0-127)
    NoteOn { channel: u8, note: u8, velocity: u8 },

    /// Control Change: channel (0-15), cc (0-127), value (0-127)
    ControlChange { channel: u8, cc: u8, value: u8 },
}

impl MidiMessage {
    /// Decode a raw triple. Returns `None` for any status outside the three
    /// supported message types; the classifier ignores those anyway.
    ///
    /// A NoteOn with velocity 0 stays a NoteOn here. Collapsing it to
    /// NoteOff would change the status byte on the pre-decoded transport
    /// path and lose learn events sent with zero velocity.
    pub fn decode(raw: RawMessage) -> Option<Self> {
        let channel = raw.status & 0x0F;

        match raw.status & 0xF0 {
            0x80 => Some(MidiMessage::NoteOff {
                channel,
                note: raw.data1 & 0x7F,
                velocity: raw.data2 & 0x7F,
            }),
            0x90 => Some(MidiMessage::NoteOn {
                channel,
                note: raw.data1 & 0x7F,
                velocity: raw.data2 & 0x7F,
            }),
            0xB0 => Some(MidiMessage::ControlChange {
                channel,
                cc: raw.data1 & 0x7F,
                value: raw.data2 & 0x7F,
            }),
            _ => None,
        }
    }

    /// Normalize to the raw triple the classifier consumes, using the
    /// standard status encoding. This is the seam for transports that hand
    /// over already-parsed events instead of a byte stream.
    pub fn to_raw(&self) -> RawMessage {
        match *self {
            MidiMessage::NoteOff {
                channel,
                note,
                velocity,
            } => RawMessage::new(0x80 | (channel & 0x0F), note & 0x7F, velocity & 0x7F),
            MidiMessage::NoteOn {
                channel,
                note,
                velocity,
            } => RawMessage::new(0x90 | (channel & 0x0F), note & 0x7F, velocity & 0x7F),
            MidiMessage::ControlChange { channel, cc, value } => {
                RawMessage::new(0xB0 | (channel & 0x0F), cc & 0x7F, value & 0x7F)
            }
        }
    }

    /// Get the channel (0-15)
    pub fn channel(&self) -> u8 {
        match *self {
            MidiMessage::NoteOff { channel, .. }
            | MidiMessage::NoteOn { channel, .. }
            | MidiMessage::ControlChange { channel, .. } => channel,
        }
    }
}

impl fmt::Display for MidiMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            MidiMessage::NoteOff {
                channel,
                note,
                velocity,
            } => {
                write!(f, "NoteOff ch:{} n:{} v:{}", channel + 1, note, velocity)
            }
            MidiMessage::NoteOn {
                channel,
                note,
                velocity,
            } => {
                write!(f, "NoteOn ch:{} n:{} v:{}", channel + 1, note, velocity)
            }
            MidiMessage::ControlChange { channel, cc, value } => {
                write!(f, "CC ch:{} cc:{} v:{}", channel + 1, cc, value)
            }
        }
    }
}

/// Format MIDI bytes as hex string for debugging
pub fn format_hex(data: &[u8]) -> String {
    data.iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_on_decoding() {
        let raw = RawMessage::new(0x90, 60, 100); // Note On, ch 1, Middle C
        let msg = MidiMessage::decode(raw).unwrap();

        assert_eq!(
            msg,
            MidiMessage::NoteOn {
                channel: 0,
                note: 60,
                velocity: 100,
            }
        );
    }

    #[test]
    fn test_note_on_velocity_zero_stays_note_on() {
        let raw = RawMessage::new(0x92, 60, 0);
        let msg = MidiMessage::decode(raw).unwrap();

        assert_eq!(
            msg,
            MidiMessage::NoteOn {
                channel: 2,
                note: 60,
                velocity: 0,
            }
        );
    }

    #[test]
    fn test_control_change() {
        let raw = RawMessage::new(0xB2, 7, 100); // CC ch 3, volume
        let msg = MidiMessage::decode(raw).unwrap();

        assert_eq!(
            msg,
            MidiMessage::ControlChange {
                channel: 2,
                cc: 7,
                value: 100,
            }
        );
    }

    #[test]
    fn test_unsupported_status_is_none() {
        // Pitch bend and system messages are outside the gateway's domain
        assert_eq!(MidiMessage::decode(RawMessage::new(0xE0, 0, 64)), None);
        assert_eq!(MidiMessage::decode(RawMessage::new(0xF8, 0, 0)), None);
    }

    #[test]
    fn test_to_raw_normalization() {
        let msg = MidiMessage::NoteOn {
            channel: 3,
            note: 36,
            velocity: 127,
        };
        assert_eq!(msg.to_raw(), RawMessage::new(0x93, 36, 127));

        let msg = MidiMessage::ControlChange {
            channel: 0,
            cc: 64,
            value: 0,
        };
        assert_eq!(msg.to_raw(), RawMessage::new(0xB0, 64, 0));
    }

    #[test]
    fn test_decode_roundtrip() {
        let raw = RawMessage::new(0x81, 40, 10);
        let msg = MidiMessage::decode(raw).unwrap();

        assert_eq!(msg.channel(), 1);
        assert_eq!(msg.to_raw(), raw);
    }
}
