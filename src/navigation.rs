use bevy::prelude::*;

use crate::components::{FretNoteQuery, QueryFretboard};
use crate::engine::{PositionApplied, VoicingEngine};
use crate::theory::{Direction, NavigationContext, PositionName, StringRange};

/// One navigation input. Every source writes the same message type so the
/// frame's requests are folded in the order they were sent.
#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub enum NavigationRequest {
    /// Cursor step through the navigable positions.
    Step(Direction),
    /// Pick from the position selector.
    Select(PositionName),
    Range(StringRange),
    Root(String),
    Context(NavigationContext),
    /// Re-applies the current selection, e.g. once the fretboard is spawned.
    Apply,
}

/// Most recent apply, for panels that poll instead of reading messages.
#[derive(Resource, Debug, Clone, Default)]
pub struct LastActivation(pub Option<PositionApplied>);

pub struct VoicingEnginePlugin;

impl Plugin for VoicingEnginePlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<NavigationRequest>()
            .add_message::<PositionApplied>()
            .init_resource::<LastActivation>()
            .add_systems(
                Update,
                apply_navigation.run_if(resource_exists::<VoicingEngine>),
            );
    }
}

/// Folds every navigation request of the frame into the engine in arrival
/// order, then applies once. Later requests override earlier ones.
pub fn apply_navigation(
    mut engine: ResMut<VoicingEngine>,
    mut requests: MessageReader<NavigationRequest>,
    mut notes: FretNoteQuery,
    mut applied: MessageWriter<PositionApplied>,
    mut last: ResMut<LastActivation>,
) {
    let mut dirty = false;
    for request in requests.read() {
        match request {
            NavigationRequest::Step(direction) => engine.position_changed(*direction),
            NavigationRequest::Select(position) => engine.position_selected(*position),
            NavigationRequest::Range(range) => engine.range_changed(*range),
            NavigationRequest::Root(root) => engine.root_changed(root.clone()),
            NavigationRequest::Context(context) => engine.set_context(*context),
            NavigationRequest::Apply => {}
        }
        dirty = true;
    }

    if !dirty {
        return;
    }

    let mut fretboard = QueryFretboard::new(&mut notes);
    let outcome = engine.apply(&mut fretboard);
    last.0 = Some(outcome.clone());
    applied.write(outcome);
}
