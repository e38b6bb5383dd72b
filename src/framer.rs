//! Raw MIDI byte stream framing
//!
//! Reassembles a raw byte stream into fixed 3-byte messages: one status
//! byte (high bit set) followed by two data bytes. This is a deliberate
//! restriction to the note on / note off / control change messages the
//! gateway cares about; 2-byte messages (program change) and variable
//! length sysex are not framed and their bytes fall through harmlessly.

use crate::midi::RawMessage;

/// Incremental framer over a raw MIDI byte stream.
///
/// Owned by whichever transport produces the bytes; not shared.
#[derive(Debug, Default)]
pub struct Framer {
    buf: [u8; 3],
    // 0 means no frame is open and the framer is waiting for a status byte
    len: usize,
}

impl Framer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one byte, returning a complete message when the second data
    /// byte lands.
    ///
    /// A status byte always opens a fresh frame, abandoning any partial
    /// one. Data bytes without an open frame are discarded, so truncated
    /// or malformed runs never produce a spurious message.
    pub fn feed(&mut self, byte: u8) -> Option<RawMessage> {
        if byte >= 0x80 {
            self.buf[0] = byte;
            self.len = 1;
            return None;
        }

        if self.len == 0 {
            // stray data byte, no frame open
            return None;
        }

        self.buf[self.len] = byte;
        self.len += 1;

        if self.len == self.buf.len() {
            self.len = 0;
            Some(RawMessage::new(self.buf[0], self.buf[1], self.buf[2]))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_all(framer: &mut Framer, bytes: &[u8]) -> Vec<RawMessage> {
        bytes.iter().filter_map(|&b| framer.feed(b)).collect()
    }

    #[test]
    fn test_two_messages_back_to_back() {
        let mut framer = Framer::new();
        let messages = feed_all(&mut framer, &[0x90, 10, 20, 0x80, 30, 40]);

        assert_eq!(
            messages,
            vec![
                RawMessage::new(0x90, 10, 20),
                RawMessage::new(0x80, 30, 40),
            ]
        );
    }

    #[test]
    fn test_granularity_does_not_matter() {
        // one byte at a time
        let mut framer = Framer::new();
        let mut single = Vec::new();
        for &b in &[0x90u8, 10, 20, 0x80, 30, 40] {
            single.extend(framer.feed(b));
        }

        // batched
        let mut framer = Framer::new();
        let batched = feed_all(&mut framer, &[0x90, 10, 20, 0x80, 30, 40]);

        assert_eq!(single, batched);
    }

    #[test]
    fn test_stray_data_bytes_are_discarded() {
        let mut framer = Framer::new();
        assert!(feed_all(&mut framer, &[10, 20, 30, 40]).is_empty());

        // the framer still works afterwards
        let messages = feed_all(&mut framer, &[0xB0, 7, 100]);
        assert_eq!(messages, vec![RawMessage::new(0xB0, 7, 100)]);
    }

    #[test]
    fn test_excess_data_bytes_do_not_reemit() {
        let mut framer = Framer::new();
        let messages = feed_all(&mut framer, &[0x90, 1, 2, 3, 4, 5, 0x80, 6, 7]);

        assert_eq!(
            messages,
            vec![RawMessage::new(0x90, 1, 2), RawMessage::new(0x80, 6, 7)]
        );
    }

    #[test]
    fn test_status_byte_restarts_partial_frame() {
        let mut framer = Framer::new();
        let messages = feed_all(&mut framer, &[0x90, 1, 0xB0, 7, 100]);

        assert_eq!(messages, vec![RawMessage::new(0xB0, 7, 100)]);
    }

    #[test]
    fn test_truncated_run_emits_nothing() {
        let mut framer = Framer::new();
        assert!(feed_all(&mut framer, &[0x90, 1]).is_empty());
    }
}
