use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::result::ActiveNote;
use crate::theory::{GuitarString, NavigationContext, PitchClass, StringRange};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisambiguationConfig {
    /// A pitch lit on more strings than this keeps a single occurrence.
    pub overcrowd_threshold: usize,
    /// Most notes left lit on either outer string of the range.
    pub outer_string_cap: usize,
}

impl Default for DisambiguationConfig {
    fn default() -> Self {
        Self {
            overcrowd_threshold: 2,
            outer_string_cap: 3,
        }
    }
}

/// Indices into `notes` that should be switched off, in ascending order.
///
/// Overcrowded pitches are thinned first, then the outer strings are capped.
/// The cap is skipped while the selector shows every position at once.
pub fn disambiguate(
    notes: &[ActiveNote],
    range: &StringRange,
    context: NavigationContext,
    config: &DisambiguationConfig,
) -> Vec<usize> {
    let mut live = vec![true; notes.len()];

    thin_overcrowded_pitches(notes, &mut live, config.overcrowd_threshold);
    if context == NavigationContext::Focused {
        cap_outer_strings(notes, range, &mut live, config.outer_string_cap);
    }

    live.iter()
        .enumerate()
        .filter(|(_, lit)| !**lit)
        .map(|(i, _)| i)
        .collect()
}

/// Fret spread of the lit notes on one string.
#[derive(Debug, Clone, Copy)]
struct StringShape {
    span: u8,
    fret_sum: u32,
    count: u32,
}

impl StringShape {
    fn of(notes: &[ActiveNote], live: &[bool], string: GuitarString) -> Self {
        let mut low = u8::MAX;
        let mut high: u8 = 0;
        let mut fret_sum: u32 = 0;
        let mut count: u32 = 0;
        for (note, _) in notes
            .iter()
            .zip(live)
            .filter(|(note, lit)| **lit && note.string == string)
        {
            low = low.min(note.fret);
            high = high.max(note.fret);
            fret_sum += u32::from(note.fret);
            count += 1;
        }
        Self {
            span: high.saturating_sub(low),
            fret_sum,
            count,
        }
    }

    /// Wider span first, then the higher average fret.
    fn rank(&self, other: &Self) -> Ordering {
        self.span.cmp(&other.span).then_with(|| {
            let ours = u64::from(self.fret_sum) * u64::from(other.count.max(1));
            let theirs = u64::from(other.fret_sum) * u64::from(self.count.max(1));
            ours.cmp(&theirs)
        })
    }
}

fn thin_overcrowded_pitches(notes: &[ActiveNote], live: &mut [bool], threshold: usize) {
    let mut pitches: Vec<&PitchClass> = Vec::new();
    for note in notes {
        if !pitches.contains(&&note.pitch) {
            pitches.push(&note.pitch);
        }
    }

    for pitch in pitches {
        let occurrences: Vec<usize> = (0..notes.len())
            .filter(|&i| live[i] && notes[i].pitch == *pitch)
            .collect();

        let mut strings: Vec<GuitarString> = occurrences.iter().map(|&i| notes[i].string).collect();
        strings.sort();
        strings.dedup();
        if strings.len() <= threshold {
            continue;
        }

        let Some((&first, rest)) = occurrences.split_first() else {
            continue;
        };
        let mut keeper = first;
        let mut best = StringShape::of(notes, live, notes[first].string);
        for &i in rest {
            let shape = StringShape::of(notes, live, notes[i].string);
            if shape.rank(&best) == Ordering::Greater {
                keeper = i;
                best = shape;
            }
        }

        for i in occurrences {
            if i != keeper {
                live[i] = false;
            }
        }
    }
}

fn cap_outer_strings(notes: &[ActiveNote], range: &StringRange, live: &mut [bool], cap: usize) {
    let lit_on = |live: &[bool], string: GuitarString| -> Vec<usize> {
        (0..notes.len())
            .filter(|&i| live[i] && notes[i].string == string)
            .collect()
    };

    let high = range.highest();
    let low = range.lowest();

    if low != high {
        let on_low = lit_on(live, low);
        for &i in on_low.iter().skip(cap) {
            live[i] = false;
        }
    }

    // The top string gives up its lowest frets so the higher shapes survive.
    let mut on_high = lit_on(live, high);
    on_high.sort_by_key(|&i| notes[i].fret);
    let excess = on_high.len().saturating_sub(cap);
    for &i in &on_high[..excess] {
        live[i] = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(string: GuitarString, pitch: &str, fret: u8) -> ActiveNote {
        ActiveNote {
            string,
            pitch: pitch.parse().unwrap(),
            fret,
        }
    }

    fn wide_range() -> StringRange {
        StringRange::new(GuitarString::HighE, GuitarString::LowE)
    }

    #[test]
    fn overcrowded_pitch_keeps_the_widest_string() {
        // c3 sits on three strings whose spans are 2, 5 and 1.
        let notes = vec![
            note(GuitarString::HighE, "c3", 8),
            note(GuitarString::HighE, "d3", 10),
            note(GuitarString::B, "c3", 13),
            note(GuitarString::B, "g2", 8),
            note(GuitarString::G, "c3", 17),
            note(GuitarString::G, "db3", 18),
        ];
        let off = disambiguate(
            &notes,
            &wide_range(),
            NavigationContext::Focused,
            &DisambiguationConfig::default(),
        );
        assert_eq!(off, vec![0, 4]);
    }

    #[test]
    fn two_strings_are_not_overcrowded() {
        let notes = vec![
            note(GuitarString::HighE, "c3", 8),
            note(GuitarString::B, "c3", 13),
        ];
        let off = disambiguate(
            &notes,
            &wide_range(),
            NavigationContext::Focused,
            &DisambiguationConfig::default(),
        );
        assert!(off.is_empty());
    }

    #[test]
    fn equal_spans_drop_the_lower_frets() {
        let notes = vec![
            note(GuitarString::D, "a1", 7),
            note(GuitarString::A, "a1", 12),
            note(GuitarString::G, "a1", 2),
        ];
        let off = disambiguate(
            &notes,
            &wide_range(),
            NavigationContext::Focused,
            &DisambiguationConfig::default(),
        );
        assert_eq!(off, vec![0, 2]);
    }

    #[test]
    fn low_outer_string_drops_the_latest_notes() {
        let range = StringRange::new(GuitarString::G, GuitarString::LowE);
        let notes = vec![
            note(GuitarString::LowE, "g0", 3),
            note(GuitarString::LowE, "a0", 5),
            note(GuitarString::LowE, "b0", 7),
            note(GuitarString::LowE, "c1", 8),
            note(GuitarString::LowE, "d1", 10),
        ];
        let off = disambiguate(
            &notes,
            &range,
            NavigationContext::Focused,
            &DisambiguationConfig::default(),
        );
        assert_eq!(off, vec![3, 4]);
    }

    #[test]
    fn high_outer_string_drops_the_lowest_frets() {
        let range = StringRange::new(GuitarString::HighE, GuitarString::G);
        let notes = vec![
            note(GuitarString::HighE, "b2", 7),
            note(GuitarString::HighE, "g2", 3),
            note(GuitarString::HighE, "e2", 0),
            note(GuitarString::HighE, "c3", 8),
            note(GuitarString::B, "d2", 3),
        ];
        let off = disambiguate(
            &notes,
            &range,
            NavigationContext::Focused,
            &DisambiguationConfig::default(),
        );
        assert_eq!(off, vec![2]);
    }

    #[test]
    fn overview_lifts_the_string_cap() {
        let range = StringRange::new(GuitarString::HighE, GuitarString::G);
        let notes: Vec<_> = ["e2", "g2", "a2", "b2", "c3"]
            .iter()
            .zip([0, 3, 5, 7, 8])
            .map(|(pitch, fret)| note(GuitarString::HighE, pitch, fret))
            .collect();

        let focused = disambiguate(
            &notes,
            &range,
            NavigationContext::Focused,
            &DisambiguationConfig::default(),
        );
        assert_eq!(focused, vec![0, 1]);

        let overview = disambiguate(
            &notes,
            &range,
            NavigationContext::Overview,
            &DisambiguationConfig::default(),
        );
        assert!(overview.is_empty());
    }

    #[test]
    fn inner_strings_are_never_capped() {
        let notes: Vec<_> = ["b1", "c2", "d2", "e2", "f2"]
            .iter()
            .zip([0, 1, 3, 5, 6])
            .map(|(pitch, fret)| note(GuitarString::B, pitch, fret))
            .collect();
        let off = disambiguate(
            &notes,
            &wide_range(),
            NavigationContext::Focused,
            &DisambiguationConfig::default(),
        );
        assert!(off.is_empty());
    }
}
