use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use crate::theory::{GuitarString, PitchClass, Tuning};

/// Access to the rendered fretboard. The engine toggles element state through
/// this trait and never creates or removes elements.
pub trait FretboardElements {
    type Handle: Copy + Eq + Hash + Debug;

    fn find_element(&self, string: GuitarString, pitch: &PitchClass) -> Option<Self::Handle>;

    fn fret(&self, handle: Self::Handle) -> u8;

    /// Switching an element off also clears its root mark.
    fn set_active(&mut self, handle: Self::Handle, active: bool);

    fn set_root(&mut self, handle: Self::Handle, root: bool);

    /// Clears the active and root marks of every element.
    fn clear_all(&mut self);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FretCell {
    pub string: GuitarString,
    pub pitch: PitchClass,
    pub fret: u8,
    pub active: bool,
    pub root: bool,
}

/// In-memory fretboard: one cell per string and fret.
#[derive(Debug, Clone, Default)]
pub struct FretGrid {
    cells: Vec<FretCell>,
    index: HashMap<(GuitarString, PitchClass), usize>,
}

impl FretGrid {
    /// Frets `0..=fret_count` on every string of `tuning`.
    pub fn new(tuning: &Tuning, fret_count: u8) -> Self {
        let mut grid = Self::default();
        for string in tuning.strings() {
            for fret in 0..=fret_count {
                if let Some(pitch) = tuning.pitch_at(string, fret) {
                    grid.push(string, pitch, fret);
                }
            }
        }
        grid
    }

    pub fn push(&mut self, string: GuitarString, pitch: PitchClass, fret: u8) {
        let key = (string, pitch.clone());
        if self.index.contains_key(&key) {
            return;
        }
        self.index.insert(key, self.cells.len());
        self.cells.push(FretCell {
            string,
            pitch,
            fret,
            active: false,
            root: false,
        });
    }

    pub fn cells(&self) -> &[FretCell] {
        &self.cells
    }

    pub fn cell(&self, string: GuitarString, pitch: &PitchClass) -> Option<&FretCell> {
        self.index
            .get(&(string, pitch.clone()))
            .map(|&i| &self.cells[i])
    }

    pub fn active_cells(&self) -> impl Iterator<Item = &FretCell> {
        self.cells.iter().filter(|cell| cell.active)
    }

    pub fn root_cells(&self) -> impl Iterator<Item = &FretCell> {
        self.cells.iter().filter(|cell| cell.root)
    }
}

impl FretboardElements for FretGrid {
    type Handle = usize;

    fn find_element(&self, string: GuitarString, pitch: &PitchClass) -> Option<usize> {
        self.index.get(&(string, pitch.clone())).copied()
    }

    fn fret(&self, handle: usize) -> u8 {
        self.cells.get(handle).map_or(0, |cell| cell.fret)
    }

    fn set_active(&mut self, handle: usize, active: bool) {
        if let Some(cell) = self.cells.get_mut(handle) {
            cell.active = active;
            if !active {
                cell.root = false;
            }
        }
    }

    fn set_root(&mut self, handle: usize, root: bool) {
        if let Some(cell) = self.cells.get_mut(handle) {
            cell.root = root;
        }
    }

    fn clear_all(&mut self) {
        for cell in &mut self.cells {
            cell.active = false;
            cell.root = false;
        }
    }
}
