//! Preset model and configuration file parsing
//!
//! The configuration is a line-oriented text format: `@` lines open a new
//! preset, `#` / `;` / `//` lines are comments, and every other non-blank
//! line is a command forwarded verbatim to the engine when the preset
//! activates. Commands before the first `@` line belong to the implicit
//! default preset that runs on arm.

use std::path::Path;

use tokio::fs;
use tracing::debug;

use crate::error::{Error, Result};

/// A named, ordered list of engine command lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preset {
    /// Display name; not required to be unique.
    pub name: String,

    /// Note number selecting this preset. For the default preset this is
    /// the arming controller number instead.
    pub match_key: u8,

    /// Command lines sent verbatim, in order, on activation.
    pub commands: Vec<String>,
}

/// Ordered preset collection built once at startup.
///
/// Index 0 is always the implicit default preset; named presets follow in
/// declaration order. Nothing is deduplicated or validated beyond the file
/// being readable, matching keys may collide and the first declared wins.
#[derive(Debug, Clone)]
pub struct PresetStore {
    presets: Vec<Preset>,
}

impl PresetStore {
    /// Parse configuration text. `controller` becomes the default preset's
    /// match key. Parsing itself never fails: unknown header tokens and
    /// unparseable values are ignored.
    pub fn parse(text: &str, controller: u8) -> Self {
        let mut presets = vec![Preset {
            name: "default".to_string(),
            match_key: controller,
            commands: Vec::new(),
        }];

        for line in text.lines() {
            let stripped = line.trim_start();

            if stripped.is_empty()
                || stripped.starts_with('#')
                || stripped.starts_with(';')
                || stripped.starts_with("//")
            {
                continue;
            }

            if let Some(header) = stripped.strip_prefix('@') {
                presets.push(parse_header(header));
            } else if let Some(current) = presets.last_mut() {
                // command lines keep their original spelling, leading
                // whitespace included
                current.commands.push(line.to_string());
            }
        }

        Self { presets }
    }

    /// Read and parse a configuration file.
    pub async fn load(path: impl AsRef<Path>, controller: u8) -> Result<Self> {
        let path = path.as_ref();
        debug!("reading preset file {}", path.display());

        let text = fs::read_to_string(path).await.map_err(|e| {
            Error::Config(format!("cannot read preset file {}: {}", path.display(), e))
        })?;

        Ok(Self::parse(&text, controller))
    }

    /// The implicit default preset, dispatched on arm.
    pub fn default_preset(&self) -> &Preset {
        &self.presets[0]
    }

    /// The named presets in declaration order.
    pub fn named(&self) -> &[Preset] {
        &self.presets[1..]
    }

    /// Find the first named preset whose match key equals `note`.
    /// Declaration order decides collisions; the default preset is never
    /// matched by note.
    pub fn find_by_note(&self, note: u8) -> Option<&Preset> {
        self.named().iter().find(|p| p.match_key == note)
    }

    /// All presets, default first.
    pub fn iter(&self) -> impl Iterator<Item = &Preset> {
        self.presets.iter()
    }
}

/// Parse the remainder of an `@` header line. Tokens are whitespace
/// separated `key=value` pairs; `name` and `note` are recognized, anything
/// else is ignored. Absent fields stay empty/zero.
fn parse_header(rest: &str) -> Preset {
    let mut preset = Preset {
        name: String::new(),
        match_key: 0,
        commands: Vec::new(),
    };

    for token in rest.split_whitespace() {
        if let Some((key, value)) = token.split_once('=') {
            match key {
                "name" => preset.name = value.to_string(),
                "note" => {
                    if let Ok(note) = value.parse::<u8>() {
                        preset.match_key = note;
                    }
                }
                _ => {}
            }
        }
    }

    preset
}
