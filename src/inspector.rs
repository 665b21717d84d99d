use bevy::prelude::*;
use std::collections::VecDeque;
use std::path::PathBuf;

use crate::components::spawn_fretboard;
use crate::engine::{resolve_positions, VoicingEngine};
use crate::file::{load_voicing_data, AppConfig};
use crate::navigation::{apply_navigation, NavigationRequest};
use crate::theory::{Direction, StringRange};

/// Walks every range and position of the configured voicing file once, then
/// exits.
pub struct InspectorPlugin;

impl Plugin for InspectorPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_inspector).add_systems(
            Update,
            advance_tour
                .before(apply_navigation)
                .run_if(resource_exists::<InspectorTour>),
        );
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TourStep {
    Range(StringRange),
    Next,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct InspectorTour {
    steps: VecDeque<TourStep>,
    visited: usize,
}

impl InspectorTour {
    pub fn for_engine(engine: &VoicingEngine) -> Self {
        let data = engine.data();
        let mut steps = VecDeque::new();
        for range in data.table.ranges() {
            let positions = resolve_positions(&data.table, range, &data.chord.chord_type);
            if positions.is_empty() {
                continue;
            }
            steps.push_back(TourStep::Range(*range));
            steps.extend(std::iter::repeat_n(TourStep::Next, positions.len() - 1));
        }
        Self { steps, visited: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.steps.len()
    }
}

fn setup_inspector(
    mut commands: Commands,
    config: Res<AppConfig>,
    mut exit: MessageWriter<AppExit>,
) {
    let tuning = match config.fretboard.tuning() {
        Ok(tuning) => tuning,
        Err(e) => {
            error!("Invalid fretboard config: {e}");
            exit.write(AppExit::error());
            return;
        }
    };

    let path = PathBuf::from(&config.data.voicing_file);
    let loaded = match load_voicing_data(&path, config.fretboard.string_count) {
        Ok(loaded) => loaded,
        Err(e) => {
            error!("Failed to load voicings from '{}': {e}", path.display());
            exit.write(AppExit::error());
            return;
        }
    };
    if !loaded.issues.is_empty() {
        warn!(
            "{} entries dropped while reading '{}'",
            loaded.issues.len(),
            path.display()
        );
    }

    let engine = VoicingEngine::new(loaded.data, config.engine);
    let tour = InspectorTour::for_engine(&engine);
    info!(
        "Touring {} steps for chord {} {}",
        tour.remaining(),
        engine.chord_root(),
        engine.data().chord.chord_type.quality()
    );

    spawn_fretboard(&mut commands, &tuning, config.fretboard.fret_count);
    commands.insert_resource(engine);
    commands.insert_resource(tour);
}

fn advance_tour(
    mut tour: ResMut<InspectorTour>,
    mut requests: MessageWriter<NavigationRequest>,
    mut exit: MessageWriter<AppExit>,
) {
    match tour.steps.pop_front() {
        Some(TourStep::Range(range)) => {
            requests.write(NavigationRequest::Range(range));
        }
        Some(TourStep::Next) => {
            requests.write(NavigationRequest::Step(Direction::Next));
        }
        None => {
            info!("Tour finished, {} positions applied", tour.visited);
            exit.write(AppExit::Success);
            return;
        }
    }
    tour.visited += 1;
}
