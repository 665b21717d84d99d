use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use super::ParseError;

const FLAT_NAMES: [&str; 12] = [
    "c", "db", "d", "eb", "e", "f", "gb", "g", "ab", "a", "bb", "b",
];

/// A fretted tone: note letter, optional accidental and octave marker
/// (`c1`, `gb2`, `f#0`, `b-1`).
///
/// Two pitch classes compare equal when they sound the same, so `gb2` and
/// `f#2` address the same fretboard element. The original spelling is kept
/// for display.
#[derive(Debug, Clone)]
pub struct PitchClass {
    semitone: i32,
    label: String,
}

impl PitchClass {
    pub fn from_semitone(semitone: i32) -> Self {
        let octave = semitone.div_euclid(12);
        let step = semitone.rem_euclid(12) as usize;
        Self {
            semitone,
            label: format!("{}{}", FLAT_NAMES[step], octave),
        }
    }

    /// Absolute semitone number, `c0` being 0.
    pub fn semitone(&self) -> i32 {
        self.semitone
    }

    /// Note name without the octave marker, as spelled in the source.
    pub fn note_name(&self) -> &str {
        let end = self
            .label
            .find(|c: char| c == '-' || c.is_ascii_digit())
            .unwrap_or(self.label.len());
        &self.label[..end]
    }

    pub fn as_str(&self) -> &str {
        &self.label
    }

    pub fn transpose(&self, semitones: i32) -> Self {
        Self::from_semitone(self.semitone + semitones)
    }
}

fn letter_semitone(letter: char) -> Option<i32> {
    match letter {
        'c' => Some(0),
        'd' => Some(2),
        'e' => Some(4),
        'f' => Some(5),
        'g' => Some(7),
        'a' => Some(9),
        'b' => Some(11),
        _ => None,
    }
}

fn parse_octave(text: &str) -> Option<i32> {
    let digits = text.strip_prefix('-').unwrap_or(text);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

impl FromStr for PitchClass {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim().to_ascii_lowercase();
        let invalid = || ParseError::InvalidPitch(s.to_string());

        let mut chars = label.chars();
        let letter = chars.next().ok_or_else(invalid)?;
        let base = letter_semitone(letter).ok_or_else(invalid)?;
        let rest = chars.as_str();

        // "bb1" is b-flat, "b1" is b natural; the octave must follow either way.
        let (offset, octave_text) = match rest.chars().next() {
            Some('b') if parse_octave(&rest[1..]).is_some() => (-1, &rest[1..]),
            Some('#') => (1, &rest[1..]),
            _ => (0, rest),
        };
        let octave = parse_octave(octave_text).ok_or_else(invalid)?;

        Ok(Self {
            semitone: octave * 12 + base + offset,
            label,
        })
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

impl PartialEq for PitchClass {
    fn eq(&self, other: &Self) -> bool {
        self.semitone == other.semitone
    }
}

impl Eq for PitchClass {}

impl Hash for PitchClass {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.semitone.hash(state);
    }
}

impl PartialOrd for PitchClass {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PitchClass {
    fn cmp(&self, other: &Self) -> Ordering {
        self.semitone.cmp(&other.semitone)
    }
}
