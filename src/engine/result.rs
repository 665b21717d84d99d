use thiserror::Error;

use crate::theory::{GuitarString, PitchClass, PositionName, StringRange};

/// A fretboard element left lit by an activation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveNote {
    pub string: GuitarString,
    pub pitch: PitchClass,
    pub fret: u8,
}

/// Anomalies absorbed while applying a voicing. None of them stop an apply.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Diagnostic {
    #[error("range `{requested}` has no voicings, fell back to {fallback:?}")]
    RangeMissing {
        requested: StringRange,
        fallback: Option<StringRange>,
    },

    #[error("{requested} is not available on `{range}`, fell back to {fallback:?}")]
    PositionMissing {
        range: StringRange,
        requested: PositionName,
        fallback: Option<PositionName>,
    },

    #[error("no fretboard element for {pitch} on {string}")]
    ElementNotFound {
        string: GuitarString,
        pitch: PitchClass,
    },

    #[error("{candidates} root candidates, kept the first activated note")]
    AmbiguousRoot { candidates: usize },

    #[error("{requested} is not in the navigable positions, stepped from the first")]
    InvalidPosition { requested: PositionName },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivationResult {
    /// Elements left active, in activation order.
    pub activated: Vec<ActiveNote>,
    pub root_element: Option<ActiveNote>,
    pub skipped_pairs: Vec<(GuitarString, PitchClass)>,
    /// Elements the disambiguation pass switched back off.
    pub suppressed: Vec<ActiveNote>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ActivationResult {
    pub fn activated_count(&self) -> usize {
        self.activated.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activated.is_empty()
    }

    pub fn ambiguous_root_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| matches!(d, Diagnostic::AmbiguousRoot { .. }))
            .count()
    }
}
