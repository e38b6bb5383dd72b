//! Non-blocking keyboard input
//!
//! One producer task reads stdin a byte at a time and pushes into a small
//! bounded channel; the main loop is the single consumer. The channel
//! replaces a hand-rolled ring buffer with the same single-writer /
//! single-reader discipline. This feeds the interactive quit key only and
//! is not part of the MIDI data path.

use tokio::io::AsyncReadExt;
use tokio::sync::mpsc;
use tracing::debug;

/// Capacity of the key queue.
const KEY_QUEUE: usize = 16;

/// Spawn the stdin reader task and return the consumer end. The task
/// ends when stdin closes or the receiver is dropped.
pub fn spawn_reader() -> mpsc::Receiver<u8> {
    let (tx, rx) = mpsc::channel(KEY_QUEUE);

    tokio::spawn(async move {
        let mut stdin = tokio::io::stdin();
        let mut buf = [0u8; 1];

        loop {
            match stdin.read(&mut buf).await {
                Ok(0) => break,
                Ok(_) => {
                    if tx.send(buf[0]).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    debug!("stdin read failed: {}", e);
                    break;
                }
            }
        }
    });

    rx
}
