pub mod fretboard;

pub use fretboard::{
    fretboard_bundles, spawn_fretboard, FretNote, FretNoteQuery, NoteState, QueryFretboard,
};
