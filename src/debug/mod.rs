use bevy::prelude::*;

use crate::engine::PositionApplied;

/// Logs every applied position with its diagnostics.
pub struct DiagnosticsLogPlugin;

impl Plugin for DiagnosticsLogPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<PositionApplied>()
            .add_systems(PostUpdate, log_applied_positions);
    }
}

fn log_applied_positions(mut applied: MessageReader<PositionApplied>) {
    for PositionApplied {
        range,
        position,
        result,
    } in applied.read()
    {
        let (Some(range), Some(position)) = (range, position) else {
            info!("Fretboard cleared: no voicing available");
            continue;
        };

        let root = result
            .root_element
            .as_ref()
            .map(|note| format!("{} on {}", note.pitch, note.string))
            .unwrap_or_else(|| "none".to_string());
        info!(
            "{range} / {position}: {} lit, root {root}, {} suppressed, {} skipped",
            result.activated_count(),
            result.suppressed.len(),
            result.skipped_pairs.len()
        );

        for diagnostic in &result.diagnostics {
            warn!("{range} / {position}: {diagnostic}");
        }
    }
}
