use bevy::log::warn;
use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::theory::{ChordType, GuitarString, ParseError, PitchClass, PositionName, StringRange, StringSet};
use crate::voicing::{ChordSelection, NoteDescriptor, PositionEntry, RootTable, Voicing, VoicingData, VoicingTable};

/// Voicing entry that only records which strings the backend assigned.
const BOOKKEEPING_KEY: &str = "assigned_strings";

#[derive(Debug, Error)]
pub enum DataError {
    #[error("I/O error while reading voicing data: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse voicing data: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid root table entry: {0}")]
    RootTable(#[from] ParseError),
}

/// Content problems found while normalizing a payload. The offending entry is
/// dropped and the rest of the payload is kept.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngestIssue {
    #[error("invalid string range key `{0}`")]
    InvalidRange(String),

    #[error("range `{range}`: unknown position `{label}`")]
    UnknownPosition { range: String, label: String },

    #[error("range `{range}`, {position}: position is not a mapping of strings")]
    MalformedPosition { range: String, position: String },

    #[error("range `{range}`, {position}: unknown string key `{key}`")]
    UnknownString {
        range: String,
        position: String,
        key: String,
    },

    #[error("range `{range}`, {position}: {string} is not on this instrument")]
    StringNotInSet {
        range: String,
        position: String,
        string: GuitarString,
    },

    #[error("range `{range}`, {position}, {string}: {reason}")]
    MalformedNote {
        range: String,
        position: String,
        string: GuitarString,
        reason: String,
    },

    #[error("range `{0}` has no usable positions")]
    EmptyRange(String),
}

#[derive(Debug, Clone)]
pub struct LoadedVoicingData {
    pub data: VoicingData,
    pub issues: Vec<IngestIssue>,
}

#[derive(Debug, Deserialize)]
struct RawVoicingData {
    chord: RawChord,
    #[serde(default)]
    root_table: HashMap<String, String>,
    #[serde(default)]
    voicings: Mapping,
}

#[derive(Debug, Deserialize)]
struct RawChord {
    root: String,
    #[serde(default)]
    quality: String,
}

pub fn load_voicing_data(path: &Path, strings: StringSet) -> Result<LoadedVoicingData, DataError> {
    let content = fs::read_to_string(path)?;
    parse_voicing_data(&content, strings)
}

/// Reads a payload and normalizes every note entry into a [`NoteDescriptor`].
pub fn parse_voicing_data(text: &str, strings: StringSet) -> Result<LoadedVoicingData, DataError> {
    let raw: RawVoicingData = serde_yaml::from_str(text)?;

    let mut root_table = RootTable::new();
    for (root, pitch) in &raw.root_table {
        root_table.insert(root.as_str(), pitch.parse::<PitchClass>()?);
    }

    let mut reader = TableReader {
        strings,
        issues: Vec::new(),
    };
    let table = reader.read_table(&raw.voicings);
    for issue in &reader.issues {
        warn!("Voicing data: {issue}");
    }

    Ok(LoadedVoicingData {
        data: VoicingData {
            chord: ChordSelection {
                root: raw.chord.root,
                chord_type: ChordType::from_quality(&raw.chord.quality),
            },
            root_table,
            table,
        },
        issues: reader.issues,
    })
}

struct TableReader {
    strings: StringSet,
    issues: Vec<IngestIssue>,
}

impl TableReader {
    fn read_table(&mut self, voicings: &Mapping) -> VoicingTable {
        let mut table = VoicingTable::new();

        for (range_key, positions) in voicings {
            let range_label = scalar_text(range_key).unwrap_or_default();
            let Ok(range) = range_label.parse::<StringRange>() else {
                self.issues.push(IngestIssue::InvalidRange(range_label));
                continue;
            };

            let mut inserted = 0;
            if let Value::Mapping(positions) = positions {
                for (position_key, notes) in positions {
                    let label = scalar_text(position_key).unwrap_or_default();
                    let Ok(position) = label.parse::<PositionName>() else {
                        self.issues.push(IngestIssue::UnknownPosition {
                            range: range_label.clone(),
                            label,
                        });
                        continue;
                    };
                    let Some(voicing) = self.read_voicing(&range_label, &label, notes) else {
                        continue;
                    };
                    table.insert(
                        range,
                        PositionEntry {
                            label,
                            position,
                            voicing,
                        },
                    );
                    inserted += 1;
                }
            }

            if inserted == 0 {
                self.issues.push(IngestIssue::EmptyRange(range_label));
            }
        }

        table
    }

    fn read_voicing(&mut self, range: &str, position: &str, notes: &Value) -> Option<Voicing> {
        let Value::Mapping(notes) = notes else {
            self.issues.push(IngestIssue::MalformedPosition {
                range: range.to_string(),
                position: position.to_string(),
            });
            return None;
        };

        let mut voicing = Voicing::new();
        for (key, entry) in notes {
            let key = scalar_text(key).unwrap_or_default();
            if key == BOOKKEEPING_KEY {
                continue;
            }
            let Some(string) = GuitarString::from_data_key(&key) else {
                self.issues.push(IngestIssue::UnknownString {
                    range: range.to_string(),
                    position: position.to_string(),
                    key,
                });
                continue;
            };
            if !self.strings.contains(string) {
                self.issues.push(IngestIssue::StringNotInSet {
                    range: range.to_string(),
                    position: position.to_string(),
                    string,
                });
                continue;
            }

            for parsed in read_note_entry(entry) {
                match parsed {
                    Ok(note) => voicing.push(string, note),
                    Err(reason) => self.issues.push(IngestIssue::MalformedNote {
                        range: range.to_string(),
                        position: position.to_string(),
                        string,
                        reason,
                    }),
                }
            }
        }

        Some(voicing)
    }
}

/// One string's entry: a bare pitch, a `[pitch, tension, name, root]` tuple,
/// a keyed map, or a list of those.
fn read_note_entry(entry: &Value) -> Vec<Result<NoteDescriptor, String>> {
    match entry {
        Value::Sequence(items) if is_note_list(items) => {
            items.iter().flat_map(read_note_entry).collect()
        }
        Value::Sequence(items) => vec![read_tuple(items)],
        Value::Mapping(fields) => vec![read_fields(fields)],
        Value::String(_) => vec![read_pitch(entry).map(NoteDescriptor::new)],
        other => vec![Err(format!("unsupported note entry {other:?}"))],
    }
}

// A list of bare pitches is several notes; a tuple carries a tension label
// or root flag after the pitch. Write tensions that look like pitches ("b3")
// as a full four-item tuple.
fn is_note_list(items: &[Value]) -> bool {
    if items
        .iter()
        .any(|item| matches!(item, Value::Sequence(_) | Value::Mapping(_)))
    {
        return true;
    }
    if items.len() < 2 || items.len() > 4 || items.iter().any(Value::is_bool) {
        return items.len() > 4;
    }
    items[1..].iter().all(|item| read_pitch(item).is_ok())
}

fn read_tuple(items: &[Value]) -> Result<NoteDescriptor, String> {
    let pitch = items
        .first()
        .ok_or_else(|| "empty note tuple".to_string())
        .and_then(read_pitch)?;
    let mut note = NoteDescriptor::new(pitch);
    if let Some(tension) = items.get(1).and_then(scalar_text) {
        note.tension = tension;
    }
    if let Some(name) = items.get(2).and_then(scalar_text) {
        note.display_name = name;
    }
    note.is_root = items.get(3).and_then(Value::as_bool);
    Ok(note)
}

fn read_fields(fields: &Mapping) -> Result<NoteDescriptor, String> {
    let field = |names: &[&str]| names.iter().find_map(|name| fields.get(*name));

    let pitch = field(&["pitch", "pitchClass", "pitch_class"])
        .ok_or_else(|| "note map without a pitch".to_string())
        .and_then(read_pitch)?;
    let mut note = NoteDescriptor::new(pitch);
    if let Some(tension) = field(&["tension", "tensionLabel", "tension_label"]).and_then(scalar_text) {
        note.tension = tension;
    }
    if let Some(name) = field(&["name", "displayName", "display_name"]).and_then(scalar_text) {
        note.display_name = name;
    }
    note.is_root = field(&["root", "isRoot", "is_root"]).and_then(Value::as_bool);
    Ok(note)
}

fn read_pitch(value: &Value) -> Result<PitchClass, String> {
    let text = scalar_text(value).ok_or_else(|| format!("pitch is not text: {value:?}"))?;
    if text.trim().is_empty() {
        return Err("empty pitch".to_string());
    }
    text.parse().map_err(|e: ParseError| e.to_string())
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
