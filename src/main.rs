use bevy::{log::LogPlugin, prelude::*};

use fretboard_voicings::file::ConfigPlugin;
use fretboard_voicings::inspector::InspectorPlugin;
use fretboard_voicings::navigation::VoicingEnginePlugin;

#[cfg(not(feature = "production"))]
use fretboard_voicings::debug::DiagnosticsLogPlugin;

fn main() -> AppExit {
    App::new()
        .add_plugins((
            MinimalPlugins,
            LogPlugin::default(),
            ConfigPlugin,
            VoicingEnginePlugin,
            #[cfg(not(feature = "production"))] DiagnosticsLogPlugin,
            InspectorPlugin,
        ))
        .run()
}
