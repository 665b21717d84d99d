use bevy::log::debug;

use super::fretboard::FretboardElements;
use super::result::{ActivationResult, ActiveNote, Diagnostic};
use crate::theory::{GuitarString, PitchClass};
use crate::voicing::{RootTable, Voicing};

/// Elements lit by one activation, with the handles needed to undo them.
pub(crate) struct Activation<H> {
    pub handles: Vec<H>,
    pub notes: Vec<ActiveNote>,
    pub root: Option<usize>,
    pub skipped: Vec<(GuitarString, PitchClass)>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Lights every note of `voicing` and marks exactly one of them as root.
///
/// The caller resets the fretboard first; [`VoicingEngine::apply`] does both
/// in one step.
///
/// [`VoicingEngine::apply`]: super::VoicingEngine::apply
pub fn activate<E: FretboardElements>(
    voicing: &Voicing,
    root_table: &RootTable,
    chord_root: &str,
    elements: &mut E,
) -> ActivationResult {
    let activation = activate_notes(voicing, root_table.get(chord_root), elements);
    ActivationResult {
        root_element: activation.root.map(|i| activation.notes[i].clone()),
        activated: activation.notes,
        skipped_pairs: activation.skipped,
        suppressed: Vec::new(),
        diagnostics: activation.diagnostics,
    }
}

pub(crate) fn activate_notes<E: FretboardElements>(
    voicing: &Voicing,
    root_pitch: Option<&PitchClass>,
    elements: &mut E,
) -> Activation<E::Handle> {
    let mut activation = Activation {
        handles: Vec::with_capacity(voicing.len()),
        notes: Vec::with_capacity(voicing.len()),
        root: None,
        skipped: Vec::new(),
        diagnostics: Vec::new(),
    };

    // A `true` tag wins over the root table; all-`false` flags fall back to it.
    let tagged = voicing.has_tagged_root();
    let mut candidates = Vec::new();

    for (string, note) in voicing.notes() {
        let Some(handle) = elements.find_element(string, &note.pitch) else {
            debug!("No element for {} on {}, skipping", note.pitch, string);
            activation.skipped.push((string, note.pitch.clone()));
            activation.diagnostics.push(Diagnostic::ElementNotFound {
                string,
                pitch: note.pitch.clone(),
            });
            continue;
        };
        if activation.handles.contains(&handle) {
            continue;
        }

        elements.set_active(handle, true);

        let is_root = if tagged {
            note.is_root == Some(true)
        } else {
            root_pitch == Some(&note.pitch)
        };
        if is_root {
            candidates.push(activation.notes.len());
        }

        activation.handles.push(handle);
        activation.notes.push(ActiveNote {
            string,
            pitch: note.pitch.clone(),
            fret: elements.fret(handle),
        });
    }

    if activation.notes.is_empty() {
        return activation;
    }

    if candidates.len() != 1 {
        activation.diagnostics.push(Diagnostic::AmbiguousRoot {
            candidates: candidates.len(),
        });
    }
    let root = candidates.first().copied().unwrap_or(0);
    elements.set_root(activation.handles[root], true);
    activation.root = Some(root);

    activation
}
