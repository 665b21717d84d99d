use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{ParseError, PitchClass};

/// Guitar strings ordered from the highest pitched to the lowest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GuitarString {
    HighE,
    B,
    G,
    D,
    A,
    LowE,
    LowB,
    LowFSharp,
}

impl GuitarString {
    pub const ALL: [GuitarString; 8] = [
        GuitarString::HighE,
        GuitarString::B,
        GuitarString::G,
        GuitarString::D,
        GuitarString::A,
        GuitarString::LowE,
        GuitarString::LowB,
        GuitarString::LowFSharp,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Key used for this string inside voicing payloads.
    pub fn data_key(self) -> &'static str {
        match self {
            GuitarString::HighE => "eString",
            GuitarString::B => "bString",
            GuitarString::G => "gString",
            GuitarString::D => "dString",
            GuitarString::A => "AString",
            GuitarString::LowE => "ELowString",
            GuitarString::LowB => "BLowString",
            GuitarString::LowFSharp => "FsLowString",
        }
    }

    /// Name used in string range keys such as `e - g`.
    pub fn short_name(self) -> &'static str {
        match self {
            GuitarString::HighE => "e",
            GuitarString::B => "b",
            GuitarString::G => "g",
            GuitarString::D => "d",
            GuitarString::A => "A",
            GuitarString::LowE => "E",
            GuitarString::LowB => "B",
            GuitarString::LowFSharp => "F#",
        }
    }

    pub fn from_data_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.data_key() == key)
    }

    pub fn from_short_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.short_name() == name)
    }
}

impl FromStr for GuitarString {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::from_data_key(s)
            .or_else(|| Self::from_short_name(s))
            .ok_or_else(|| ParseError::UnknownString(s.to_string()))
    }
}

impl fmt::Display for GuitarString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.data_key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub enum StringSet {
    #[default]
    Six,
    Eight,
}

impl StringSet {
    pub fn from_count(count: usize) -> Option<Self> {
        match count {
            6 => Some(StringSet::Six),
            8 => Some(StringSet::Eight),
            _ => None,
        }
    }

    pub fn count(self) -> usize {
        match self {
            StringSet::Six => 6,
            StringSet::Eight => 8,
        }
    }

    pub fn strings(self) -> &'static [GuitarString] {
        &GuitarString::ALL[..self.count()]
    }

    pub fn contains(self, string: GuitarString) -> bool {
        string.index() < self.count()
    }
}

impl TryFrom<usize> for StringSet {
    type Error = String;

    fn try_from(count: usize) -> Result<Self, Self::Error> {
        Self::from_count(count).ok_or_else(|| format!("unsupported string count {count}"))
    }
}

impl From<StringSet> for usize {
    fn from(set: StringSet) -> usize {
        set.count()
    }
}

/// A contiguous run of strings between two boundary strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StringRange {
    high: GuitarString,
    low: GuitarString,
}

impl StringRange {
    pub fn new(a: GuitarString, b: GuitarString) -> Self {
        if a <= b {
            Self { high: a, low: b }
        } else {
            Self { high: b, low: a }
        }
    }

    /// Highest pitched string in play.
    pub fn highest(&self) -> GuitarString {
        self.high
    }

    /// Lowest pitched string in play.
    pub fn lowest(&self) -> GuitarString {
        self.low
    }

    pub fn contains(&self, string: GuitarString) -> bool {
        self.high <= string && string <= self.low
    }

    pub fn strings(&self) -> impl Iterator<Item = GuitarString> + '_ {
        GuitarString::ALL
            .into_iter()
            .filter(move |s| self.contains(*s))
    }
}

impl FromStr for StringRange {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::InvalidRange(s.to_string());
        let (first, second) = s.split_once('-').ok_or_else(invalid)?;
        let first: GuitarString = first.parse().map_err(|_| invalid())?;
        let second: GuitarString = second.parse().map_err(|_| invalid())?;
        Ok(Self::new(first, second))
    }
}

impl fmt::Display for StringRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.high.short_name(), self.low.short_name())
    }
}

/// Open-string pitches of the configured instrument.
#[derive(Debug, Clone, PartialEq)]
pub struct Tuning {
    open: Vec<(GuitarString, PitchClass)>,
}

impl Tuning {
    pub fn standard(set: StringSet) -> Self {
        let open = set
            .strings()
            .iter()
            .map(|string| (*string, PitchClass::from_semitone(standard_open_semitone(*string))))
            .collect();
        Self { open }
    }

    /// Builds a tuning from open pitches listed highest string first.
    pub fn from_pitches(set: StringSet, pitches: &[PitchClass]) -> Option<Self> {
        if pitches.len() != set.count() {
            return None;
        }
        let open = set
            .strings()
            .iter()
            .copied()
            .zip(pitches.iter().cloned())
            .collect();
        Some(Self { open })
    }

    pub fn strings(&self) -> impl Iterator<Item = GuitarString> + '_ {
        self.open.iter().map(|(string, _)| *string)
    }

    pub fn open_pitch(&self, string: GuitarString) -> Option<&PitchClass> {
        self.open
            .iter()
            .find(|(s, _)| *s == string)
            .map(|(_, pitch)| pitch)
    }

    pub fn pitch_at(&self, string: GuitarString, fret: u8) -> Option<PitchClass> {
        self.open_pitch(string)
            .map(|open| open.transpose(i32::from(fret)))
    }
}

// Octave numbering follows the voicing payloads: the high e string is "e2".
fn standard_open_semitone(string: GuitarString) -> i32 {
    match string {
        GuitarString::HighE => 28,
        GuitarString::B => 23,
        GuitarString::G => 19,
        GuitarString::D => 14,
        GuitarString::A => 9,
        GuitarString::LowE => 4,
        GuitarString::LowB => -1,
        GuitarString::LowFSharp => -6,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_keys_ignore_whitespace_and_order() {
        let a: StringRange = "e - g".parse().unwrap();
        let b: StringRange = "e-g".parse().unwrap();
        let c: StringRange = "g-e".parse().unwrap();
        assert_eq!(a, b);
        assert_eq!(a, c);
        assert_eq!(a.highest(), GuitarString::HighE);
        assert_eq!(a.lowest(), GuitarString::G);
        assert_eq!(a.to_string(), "e - g");
    }

    #[test]
    fn range_covers_inner_strings() {
        let range: StringRange = "b - A".parse().unwrap();
        let strings: Vec<_> = range.strings().collect();
        assert_eq!(
            strings,
            vec![GuitarString::B, GuitarString::G, GuitarString::D, GuitarString::A]
        );
        assert!(!range.contains(GuitarString::HighE));
    }

    #[test]
    fn short_names_are_case_sensitive() {
        assert_eq!("e".parse::<GuitarString>().unwrap(), GuitarString::HighE);
        assert_eq!("E".parse::<GuitarString>().unwrap(), GuitarString::LowE);
        assert_eq!("B".parse::<GuitarString>().unwrap(), GuitarString::LowB);
        assert!("x - g".parse::<StringRange>().is_err());
        assert!("eg".parse::<StringRange>().is_err());
    }

    #[test]
    fn standard_tuning_matches_payload_octaves() {
        let tuning = Tuning::standard(StringSet::Six);
        assert_eq!(tuning.strings().count(), 6);
        assert_eq!(tuning.pitch_at(GuitarString::HighE, 3).unwrap().as_str(), "g2");
        assert_eq!(tuning.pitch_at(GuitarString::B, 5).unwrap().as_str(), "e2");
        assert_eq!(tuning.pitch_at(GuitarString::G, 5).unwrap().as_str(), "c2");
        assert!(tuning.pitch_at(GuitarString::LowB, 0).is_none());
    }

    #[test]
    fn eight_string_set_extends_the_six() {
        assert!(StringSet::Eight.contains(GuitarString::LowFSharp));
        assert!(!StringSet::Six.contains(GuitarString::LowB));
        assert_eq!(StringSet::from_count(7), None);
    }
}
