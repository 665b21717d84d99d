pub mod activator;
pub mod disambiguate;
pub mod fretboard;
pub mod positions;
pub mod result;

use bevy::log::{debug, warn};
use bevy::prelude::{Message, Resource};

use crate::theory::{Direction, NavigationContext, PositionName, StringRange};
use crate::voicing::VoicingData;

pub use activator::activate;
pub use disambiguate::{disambiguate, DisambiguationConfig};
pub use fretboard::{FretCell, FretGrid, FretboardElements};
pub use positions::{next_position, resolve_positions};
pub use result::{ActivationResult, ActiveNote, Diagnostic};

/// Sent after every apply so labels, audio or keyboard helpers can follow
/// the fretboard without the engine knowing about them.
#[derive(Message, Debug, Clone, PartialEq)]
pub struct PositionApplied {
    pub range: Option<StringRange>,
    pub position: Option<PositionName>,
    pub result: ActivationResult,
}

/// Owns the injected voicing data and the current selection.
///
/// All element writes go through [`VoicingEngine::apply`], which resets the
/// fretboard, lights the selected voicing and thins duplicates in one call.
#[derive(Resource, Debug, Clone)]
pub struct VoicingEngine {
    data: VoicingData,
    config: DisambiguationConfig,
    range: Option<StringRange>,
    position: Option<PositionName>,
    chord_root: String,
    context: NavigationContext,
    pending: Vec<Diagnostic>,
}

impl VoicingEngine {
    pub fn new(data: VoicingData, config: DisambiguationConfig) -> Self {
        let mut engine = Self {
            data: VoicingData::default(),
            config,
            range: None,
            position: None,
            chord_root: String::new(),
            context: NavigationContext::default(),
            pending: Vec::new(),
        };
        engine.load(data);
        engine
    }

    /// Swaps in a new payload and selects its first range and position.
    pub fn load(&mut self, data: VoicingData) {
        self.chord_root = data.chord.root.clone();
        self.data = data;
        self.range = self.data.table.ranges().next().copied();
        self.position = self
            .range
            .and_then(|range| self.positions_on(&range).first().copied());
        self.pending.clear();
    }

    pub fn data(&self) -> &VoicingData {
        &self.data
    }

    pub fn range(&self) -> Option<StringRange> {
        self.range
    }

    pub fn position(&self) -> Option<PositionName> {
        self.position
    }

    pub fn chord_root(&self) -> &str {
        &self.chord_root
    }

    pub fn context(&self) -> NavigationContext {
        self.context
    }

    /// Navigable positions of the current range.
    pub fn positions(&self) -> Vec<PositionName> {
        self.range
            .map(|range| self.positions_on(&range))
            .unwrap_or_default()
    }

    fn positions_on(&self, range: &StringRange) -> Vec<PositionName> {
        resolve_positions(&self.data.table, range, &self.data.chord.chord_type)
    }

    pub fn position_changed(&mut self, direction: Direction) {
        let positions = self.positions();
        let Some(&first) = positions.first() else {
            return;
        };

        let current = match self.position {
            Some(position) if positions.contains(&position) => position,
            Some(position) => {
                self.pending
                    .push(Diagnostic::InvalidPosition { requested: position });
                first
            }
            None => first,
        };
        self.position = next_position(current, &positions, direction);
    }

    /// Direct pick from the position selector.
    pub fn position_selected(&mut self, position: PositionName) {
        self.position = Some(position);
    }

    pub fn range_changed(&mut self, range: StringRange) {
        self.range = Some(range);
        let positions = self.positions_on(&range);
        if !positions.is_empty() && !self.position.is_some_and(|p| positions.contains(&p)) {
            self.position = positions.first().copied();
        }
    }

    pub fn root_changed(&mut self, root: impl Into<String>) {
        self.chord_root = root.into();
    }

    pub fn set_context(&mut self, context: NavigationContext) {
        self.context = context;
    }

    /// Resets every element, lights the selected voicing, then switches off
    /// the duplicates the disambiguation pass rejects.
    pub fn apply<E: FretboardElements>(&mut self, elements: &mut E) -> PositionApplied {
        elements.clear_all();

        let mut diagnostics = std::mem::take(&mut self.pending);
        let Some((range, position)) = self.resolve_selection(&mut diagnostics) else {
            debug!("Nothing to apply, fretboard left empty");
            return PositionApplied {
                range: self.range,
                position: self.position,
                result: ActivationResult {
                    diagnostics,
                    ..ActivationResult::default()
                },
            };
        };

        let Some(voicing) = self.data.table.voicing(&range, position) else {
            return PositionApplied {
                range: Some(range),
                position: Some(position),
                result: ActivationResult {
                    diagnostics,
                    ..ActivationResult::default()
                },
            };
        };

        let root_pitch = self.data.root_table.get(&self.chord_root);
        let activation = activator::activate_notes(voicing, root_pitch, elements);
        let off = disambiguate(&activation.notes, &range, self.context, &self.config);

        for &i in &off {
            elements.set_active(activation.handles[i], false);
        }

        let mut root = activation.root;
        if let Some(current) = root.filter(|r| off.contains(r)) {
            let pitch = &activation.notes[current].pitch;
            let survivors = || (0..activation.notes.len()).filter(|i| !off.contains(i));
            root = survivors()
                .find(|&i| activation.notes[i].pitch == *pitch)
                .or_else(|| survivors().next());
            if let Some(moved) = root {
                elements.set_root(activation.handles[moved], true);
            }
        }

        diagnostics.extend(activation.diagnostics);
        for diagnostic in &diagnostics {
            debug!("{range} / {position}: {diagnostic}");
        }

        let mut activated = Vec::with_capacity(activation.notes.len() - off.len());
        let mut suppressed = Vec::with_capacity(off.len());
        for (i, note) in activation.notes.iter().enumerate() {
            if off.contains(&i) {
                suppressed.push(note.clone());
            } else {
                activated.push(note.clone());
            }
        }

        PositionApplied {
            range: Some(range),
            position: Some(position),
            result: ActivationResult {
                activated,
                root_element: root.map(|i| activation.notes[i].clone()),
                skipped_pairs: activation.skipped,
                suppressed,
                diagnostics,
            },
        }
    }

    /// Current range and position, falling back to the first available ones.
    fn resolve_selection(
        &mut self,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Option<(StringRange, PositionName)> {
        let range = match self.range {
            Some(range) if self.data.table.contains_range(&range) => range,
            requested => {
                let fallback = self.data.table.ranges().next().copied();
                if let Some(requested) = requested {
                    warn!("Range `{requested}` has no voicings, falling back to {fallback:?}");
                    diagnostics.push(Diagnostic::RangeMissing {
                        requested,
                        fallback,
                    });
                }
                self.range = fallback;
                fallback?
            }
        };

        let positions = self.positions_on(&range);
        let position = match self.position {
            Some(position) if positions.contains(&position) => position,
            requested => {
                let fallback = positions.first().copied();
                if let Some(requested) = requested {
                    warn!("{requested} is missing under `{range}`, falling back to {fallback:?}");
                    diagnostics.push(Diagnostic::PositionMissing {
                        range,
                        requested,
                        fallback,
                    });
                }
                self.position = fallback;
                fallback?
            }
        };

        Some((range, position))
    }
}
