use std::collections::{BTreeMap, HashMap};

use crate::theory::{ChordType, GuitarString, PitchClass, PositionName, StringRange};

/// One note of a voicing, normalized at ingestion.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteDescriptor {
    pub pitch: PitchClass,
    pub tension: String,
    pub display_name: String,
    /// `None` when the source did not tag the note either way.
    pub is_root: Option<bool>,
}

impl NoteDescriptor {
    pub fn new(pitch: PitchClass) -> Self {
        let display_name = pitch.note_name().to_ascii_uppercase();
        Self {
            pitch,
            tension: String::new(),
            display_name,
            is_root: None,
        }
    }

    pub fn with_tension(mut self, tension: impl Into<String>) -> Self {
        self.tension = tension.into();
        self
    }

    pub fn with_root(mut self, is_root: bool) -> Self {
        self.is_root = Some(is_root);
        self
    }
}

/// Notes of a single chord shape, in the order they were listed.
///
/// A string may carry several notes (arpeggio shapes do).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Voicing {
    notes: Vec<(GuitarString, NoteDescriptor)>,
}

impl Voicing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, string: GuitarString, note: NoteDescriptor) {
        self.notes.push((string, note));
    }

    pub fn with_note(mut self, string: GuitarString, note: NoteDescriptor) -> Self {
        self.push(string, note);
        self
    }

    pub fn notes(&self) -> impl Iterator<Item = (GuitarString, &NoteDescriptor)> {
        self.notes.iter().map(|(string, note)| (*string, note))
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Whether any note is explicitly tagged as the root. Voicings whose
    /// flags are all `false` carry no usable tag.
    pub fn has_tagged_root(&self) -> bool {
        self.notes.iter().any(|(_, note)| note.is_root == Some(true))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PositionEntry {
    /// Position name exactly as the source spelled it.
    pub label: String,
    pub position: PositionName,
    pub voicing: Voicing,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VoicingTable {
    ranges: BTreeMap<StringRange, Vec<PositionEntry>>,
}

impl VoicingTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, range: StringRange, entry: PositionEntry) {
        self.ranges.entry(range).or_default().push(entry);
    }

    pub fn with_voicing(mut self, range: StringRange, position: PositionName, voicing: Voicing) -> Self {
        self.insert(
            range,
            PositionEntry {
                label: position.label().to_string(),
                position,
                voicing,
            },
        );
        self
    }

    pub fn entries(&self, range: &StringRange) -> &[PositionEntry] {
        self.ranges.get(range).map(Vec::as_slice).unwrap_or(&[])
    }

    /// First entry listed for `position` under `range`.
    pub fn voicing(&self, range: &StringRange, position: PositionName) -> Option<&Voicing> {
        self.entries(range)
            .iter()
            .find(|entry| entry.position == position)
            .map(|entry| &entry.voicing)
    }

    /// Populated ranges in string order, highest strings first.
    pub fn ranges(&self) -> impl Iterator<Item = &StringRange> {
        self.ranges
            .iter()
            .filter(|(_, entries)| !entries.is_empty())
            .map(|(range, _)| range)
    }

    pub fn contains_range(&self, range: &StringRange) -> bool {
        !self.entries(range).is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges().next().is_none()
    }
}

/// Chord root name to the pitch class that is the root of its voicings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RootTable {
    roots: HashMap<String, PitchClass>,
}

impl RootTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, root: impl Into<String>, pitch: PitchClass) {
        self.roots.insert(normalize_root(&root.into()), pitch);
    }

    pub fn with_root(mut self, root: impl Into<String>, pitch: PitchClass) -> Self {
        self.insert(root, pitch);
        self
    }

    pub fn get(&self, root: &str) -> Option<&PitchClass> {
        self.roots.get(&normalize_root(root))
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

fn normalize_root(root: &str) -> String {
    root.trim().to_ascii_lowercase()
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChordSelection {
    pub root: String,
    pub chord_type: ChordType,
}

/// Everything the page hands the engine for one chord.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VoicingData {
    pub chord: ChordSelection,
    pub root_table: RootTable,
    pub table: VoicingTable,
}
