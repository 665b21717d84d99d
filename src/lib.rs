//! Chord voicing selection and fretboard note activation.
//!
//! The [`engine::VoicingEngine`] owns the injected voicing data and applies a
//! selected voicing to any [`engine::FretboardElements`] implementation in one
//! step: reset, activate, disambiguate. [`navigation::VoicingEnginePlugin`]
//! drives it from Bevy messages against [`components::FretNote`] entities.

pub mod components;
pub mod debug;
pub mod engine;
pub mod file;
pub mod inspector;
pub mod navigation;
pub mod theory;
pub mod voicing;
