use std::fmt;
use std::str::FromStr;

use super::ParseError;

/// Which chord tone sits lowest in a voicing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PositionName {
    Basic,
    First,
    Second,
    Third,
}

impl PositionName {
    pub const ALL: [PositionName; 4] = [
        PositionName::Basic,
        PositionName::First,
        PositionName::Second,
        PositionName::Third,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PositionName::Basic => "Basic Position",
            PositionName::First => "First Inversion",
            PositionName::Second => "Second Inversion",
            PositionName::Third => "Third Inversion",
        }
    }
}

impl FromStr for PositionName {
    type Err = ParseError;

    /// Accepts the spellings found across voicing sources: `Basic Position`,
    /// `Root Position`, `FirstInversion`, `2nd Inversion`, `third_inversion`...
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();
        let key = key.strip_suffix("position").unwrap_or(&key);
        let key = key.strip_suffix("inversion").unwrap_or(key);

        match key {
            "basic" | "root" => Ok(PositionName::Basic),
            "first" | "1st" => Ok(PositionName::First),
            "second" | "2nd" => Ok(PositionName::Second),
            "third" | "3rd" => Ok(PositionName::Third),
            _ => Err(ParseError::UnknownPosition(s.to_string())),
        }
    }
}

impl fmt::Display for PositionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Chord quality plus the number of distinct tones it stacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChordType {
    quality: String,
    tones: usize,
}

impl ChordType {
    pub fn from_quality(quality: &str) -> Self {
        let quality = quality.trim().to_string();
        let key = quality.replace(' ', "").to_ascii_lowercase();

        let tones = if key.contains("13") {
            7
        } else if key.contains("11") {
            6
        } else if key.contains("add") {
            4
        } else if key.contains('9') {
            5
        } else if key.contains('7') || key.contains('6') {
            4
        } else if key == "5" || key == "power" {
            2
        } else {
            3
        };

        Self { quality, tones }
    }

    pub fn quality(&self) -> &str {
        &self.quality
    }

    pub fn tone_count(&self) -> usize {
        self.tones
    }

    /// Only chords of four or more tones have a note left for the bass of a
    /// third inversion.
    pub fn supports_third_inversion(&self) -> bool {
        self.tones >= 4
    }
}

impl Default for ChordType {
    fn default() -> Self {
        Self::from_quality("major")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Prev,
}

impl FromStr for Direction {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "next" | "right" | "forward" => Ok(Direction::Next),
            "prev" | "previous" | "left" | "back" => Ok(Direction::Prev),
            _ => Err(ParseError::UnknownDirection(s.to_string())),
        }
    }
}

/// State of the position selector: one position, or all of them at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavigationContext {
    #[default]
    Focused,
    Overview,
}
