//! Error types for the gateway core.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Configuration could not be read or is structurally unusable.
    /// Fatal at startup, before the event loop runs.
    #[error("config error: {0}")]
    Config(String),

    /// MIDI input device or port failure. "No data yet" is not an error
    /// and never surfaces here.
    #[error("MIDI transport error: {0}")]
    Transport(String),

    /// Write failure on the engine's command channel. The engine is
    /// presumed dead; callers should terminate.
    #[error("engine I/O error: {0}")]
    Sink(#[from] std::io::Error),
}

impl From<midir::InitError> for Error {
    fn from(e: midir::InitError) -> Self {
        Error::Transport(e.to_string())
    }
}

impl From<midir::ConnectError<midir::MidiInput>> for Error {
    fn from(e: midir::ConnectError<midir::MidiInput>) -> Self {
        Error::Transport(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
