//! Event classification and the arm/learn state machine
//!
//! Holding the mode controller arms the machine; the last note struck
//! while armed picks the preset that activates when the controller is
//! released. The machine is a plain value driven from a single consumer
//! loop; it is not reentrant and callers must serialize messages into it.

use tracing::{debug, trace};

use crate::midi::RawMessage;
use crate::presets::{Preset, PresetStore};

/// Controller value at or above which the mode controller counts as on.
pub const ARM_THRESHOLD: u8 = 64;

/// Status bytes the classifier reacts to, derived from the configured
/// input channel.
#[derive(Debug, Clone, Copy)]
pub struct ClassifyConfig {
    /// Control change status on the configured channel; arming messages.
    pub mode_status: u8,

    /// Note on status on the configured channel; selection messages.
    pub select_status: u8,
}

impl ClassifyConfig {
    /// Build from a MIDI channel (0-15).
    pub fn for_channel(channel: u8) -> Self {
        let channel = channel & 0x0F;
        Self {
            mode_status: 0xB0 | channel,
            select_status: 0x90 | channel,
        }
    }
}

/// Arm/learn trigger state.
#[derive(Debug)]
pub struct Trigger {
    config: ClassifyConfig,
    armed: bool,
    learned: Option<u8>,
}

impl Trigger {
    /// New trigger in the idle state with no learned note.
    pub fn new(config: ClassifyConfig) -> Self {
        Self {
            config,
            armed: false,
            learned: None,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Classify one message and advance the state machine.
    ///
    /// Returns the preset the transition calls for, if any: the default
    /// preset when the controller arms, the first named preset matching
    /// the learned note when it disarms. A release with no learned note,
    /// or with a note no preset matches, resolves to nothing and the
    /// state still resets. Every other message is a no-op.
    pub fn on_message<'a>(
        &mut self,
        msg: RawMessage,
        presets: &'a PresetStore,
    ) -> Option<&'a Preset> {
        if msg.status == self.config.mode_status {
            if msg.data1 != presets.default_preset().match_key {
                return None;
            }

            if msg.data2 >= ARM_THRESHOLD {
                if self.armed {
                    return None;
                }
                self.armed = true;
                self.learned = None;
                debug!("armed, waiting for a note");
                // the default preset runs eagerly so its commands can cut
                // routing before the learn note is struck
                Some(presets.default_preset())
            } else {
                if !self.armed {
                    return None;
                }
                self.armed = false;
                let learned = self.learned.take()?;

                match presets.find_by_note(learned) {
                    Some(preset) => {
                        debug!(note = learned, preset = %preset.name, "preset selected");
                        Some(preset)
                    }
                    None => {
                        debug!(note = learned, "no preset matches learned note");
                        None
                    }
                }
            }
        } else if msg.status == self.config.select_status {
            if self.armed {
                trace!(note = msg.data1, "note learned");
                self.learned = Some(msg.data1);
            }
            None
        } else {
            None
        }
    }
}
