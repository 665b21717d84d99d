use bevy::prelude::*;
use std::collections::HashMap;

use crate::engine::FretboardElements;
use crate::theory::{GuitarString, PitchClass, Tuning};

/// A fretted tone owned by the fretboard view.
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct FretNote {
    pub string: GuitarString,
    pub pitch: PitchClass,
    pub fret: u8,
}

/// Lit state the engine writes and the view reads back.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoteState {
    pub active: bool,
    pub root: bool,
}

pub type FretNoteQuery<'w, 's> = Query<'w, 's, (Entity, &'static FretNote, &'static mut NoteState)>;

pub fn fretboard_bundles(tuning: &Tuning, fret_count: u8) -> Vec<(FretNote, NoteState)> {
    let mut bundles = Vec::new();
    for string in tuning.strings() {
        for fret in 0..=fret_count {
            if let Some(pitch) = tuning.pitch_at(string, fret) {
                bundles.push((FretNote { string, pitch, fret }, NoteState::default()));
            }
        }
    }
    bundles
}

pub fn spawn_fretboard(commands: &mut Commands, tuning: &Tuning, fret_count: u8) {
    let bundles = fretboard_bundles(tuning, fret_count);
    info!("Spawning {} fretboard notes", bundles.len());
    commands.spawn_batch(bundles);
}

/// Exposes the fretboard entities to the engine for one apply.
pub struct QueryFretboard<'q, 'w, 's> {
    query: &'q mut FretNoteQuery<'w, 's>,
    index: HashMap<(GuitarString, PitchClass), Entity>,
}

impl<'q, 'w, 's> QueryFretboard<'q, 'w, 's> {
    pub fn new(query: &'q mut FretNoteQuery<'w, 's>) -> Self {
        let index = query
            .iter()
            .map(|(entity, note, _)| ((note.string, note.pitch.clone()), entity))
            .collect();
        Self { query, index }
    }
}

impl FretboardElements for QueryFretboard<'_, '_, '_> {
    type Handle = Entity;

    fn find_element(&self, string: GuitarString, pitch: &PitchClass) -> Option<Entity> {
        self.index.get(&(string, pitch.clone())).copied()
    }

    fn fret(&self, handle: Entity) -> u8 {
        self.query
            .get(handle)
            .map_or(0, |(_, note, _)| note.fret)
    }

    fn set_active(&mut self, handle: Entity, active: bool) {
        if let Ok((_, _, mut state)) = self.query.get_mut(handle) {
            state.active = active;
            if !active {
                state.root = false;
            }
        }
    }

    fn set_root(&mut self, handle: Entity, root: bool) {
        if let Ok((_, _, mut state)) = self.query.get_mut(handle) {
            state.root = root;
        }
    }

    fn clear_all(&mut self) {
        for (_, _, mut state) in self.query.iter_mut() {
            if state.active || state.root {
                *state = NoteState::default();
            }
        }
    }
}
