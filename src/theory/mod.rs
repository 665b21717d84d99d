pub mod chord;
pub mod pitch;
pub mod strings;

use thiserror::Error;

pub use chord::{ChordType, Direction, NavigationContext, PositionName};
pub use pitch::PitchClass;
pub use strings::{GuitarString, StringRange, StringSet, Tuning};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("invalid pitch class `{0}`")]
    InvalidPitch(String),

    #[error("unknown guitar string `{0}`")]
    UnknownString(String),

    #[error("invalid string range `{0}`")]
    InvalidRange(String),

    #[error("unknown position name `{0}`")]
    UnknownPosition(String),

    #[error("unknown navigation direction `{0}`")]
    UnknownDirection(String),
}
