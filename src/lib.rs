//! Midish GW - bridge an assignable MIDI controller to the midish engine
//!
//! Holding the configured controller arms a learn mode and immediately
//! runs the default preset (typically cutting routing so the learn note
//! stays silent). The last note struck while armed picks the preset that
//! activates when the controller is released. Presets are ordered lists
//! of text commands written one line at a time to the engine's stdin.

pub mod dispatch;
pub mod engine;
pub mod error;
pub mod framer;
pub mod input;
pub mod keys;
pub mod midi;
pub mod presets;
pub mod trigger;

pub use dispatch::Dispatcher;
pub use error::{Error, Result};
pub use framer::Framer;
pub use midi::{MidiMessage, RawMessage};
pub use presets::{Preset, PresetStore};
pub use trigger::{ClassifyConfig, Trigger};
