//! Command dispatch to the engine's control channel
//!
//! Each command line is written newline-terminated and flushed on its own
//! so the engine processes commands one at a time instead of receiving a
//! buffered burst.

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, trace};

use crate::error::Result;
use crate::presets::Preset;

/// Writes preset command lines to the engine sink.
///
/// The sink is exclusively owned here; no other component writes to it.
pub struct Dispatcher<W> {
    sink: W,
}

impl<W: AsyncWrite + Unpin> Dispatcher<W> {
    pub fn new(sink: W) -> Self {
        Self { sink }
    }

    /// Send every command line of `preset`, in order.
    ///
    /// A write failure aborts the dispatch and surfaces to the caller;
    /// lines already flushed stay sent.
    pub async fn dispatch(&mut self, preset: &Preset) -> Result<()> {
        debug!(
            preset = %preset.name,
            commands = preset.commands.len(),
            "dispatching preset"
        );

        for command in &preset.commands {
            trace!("engine <- {}", command);
            self.sink.write_all(command.as_bytes()).await?;
            self.sink.write_all(b"\n").await?;
            self.sink.flush().await?;
        }

        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::io;
    use std::pin::Pin;
    use std::task::{Context, Poll};

    fn preset(commands: &[&str]) -> Preset {
        Preset {
            name: "test".to_string(),
            match_key: 36,
            commands: commands.iter().map(|c| c.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_commands_written_in_order_with_newlines() {
        let mut dispatcher = Dispatcher::new(Vec::new());

        dispatcher
            .dispatch(&preset(&["fmap {any {3 0}} {any {0 3}}", "i"]))
            .await
            .unwrap();

        let written = dispatcher.into_inner();
        assert_eq!(written, b"fmap {any {3 0}} {any {0 3}}\ni\n");
    }

    #[tokio::test]
    async fn test_empty_preset_writes_nothing() {
        let mut dispatcher = Dispatcher::new(Vec::new());

        dispatcher.dispatch(&preset(&[])).await.unwrap();

        assert!(dispatcher.into_inner().is_empty());
    }

    #[tokio::test]
    async fn test_commands_pass_through_verbatim() {
        let mut dispatcher = Dispatcher::new(Vec::new());

        dispatcher
            .dispatch(&preset(&["  indented", "print \"* PIANO *\""]))
            .await
            .unwrap();

        let written = dispatcher.into_inner();
        assert_eq!(written, b"  indented\nprint \"* PIANO *\"\n");
    }

    /// Writer that fails every write, for exercising sink failure.
    struct BrokenPipe;

    impl AsyncWrite for BrokenPipe {
        fn poll_write(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            _buf: &[u8],
        ) -> Poll<io::Result<usize>> {
            Poll::Ready(Err(io::Error::from(io::ErrorKind::BrokenPipe)))
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }

    #[tokio::test]
    async fn test_write_failure_is_sink_error() {
        let mut dispatcher = Dispatcher::new(BrokenPipe);

        let err = dispatcher.dispatch(&preset(&["cmd"])).await.unwrap_err();
        assert!(matches!(err, Error::Sink(_)));
    }
}
