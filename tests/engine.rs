use fretboard_voicings::engine::{
    resolve_positions, DisambiguationConfig, Diagnostic, FretGrid, VoicingEngine,
};
use fretboard_voicings::file::parse_voicing_data;
use fretboard_voicings::theory::{
    ChordType, Direction, GuitarString, NavigationContext, PitchClass, PositionName, StringRange,
    StringSet, Tuning,
};
use fretboard_voicings::voicing::{
    ChordSelection, NoteDescriptor, RootTable, Voicing, VoicingData, VoicingTable,
};

const SAMPLE: &str = include_str!("../assets/voicings/c_maj7.yaml");

fn pitch(s: &str) -> PitchClass {
    s.parse().unwrap()
}

fn range(s: &str) -> StringRange {
    s.parse().unwrap()
}

fn grid() -> FretGrid {
    FretGrid::new(&Tuning::standard(StringSet::Six), 24)
}

fn lit(grid: &FretGrid) -> Vec<(GuitarString, String)> {
    grid.active_cells()
        .map(|cell| (cell.string, cell.pitch.to_string()))
        .collect()
}

fn roots(grid: &FretGrid) -> Vec<(GuitarString, String)> {
    grid.root_cells()
        .map(|cell| (cell.string, cell.pitch.to_string()))
        .collect()
}

fn sample_engine() -> VoicingEngine {
    let loaded = parse_voicing_data(SAMPLE, StringSet::Six).unwrap();
    assert!(loaded.issues.is_empty(), "{:?}", loaded.issues);
    VoicingEngine::new(loaded.data, DisambiguationConfig::default())
}

fn engine_for(table: VoicingTable, root_table: RootTable, quality: &str) -> VoicingEngine {
    let data = VoicingData {
        chord: ChordSelection {
            root: "C".into(),
            chord_type: ChordType::from_quality(quality),
        },
        root_table,
        table,
    };
    VoicingEngine::new(data, DisambiguationConfig::default())
}

#[test]
fn tagged_triad_lights_three_notes_with_one_root() {
    let mut engine = sample_engine();
    engine.range_changed(range("e - g"));
    engine.position_selected(PositionName::Basic);
    let mut grid = grid();

    let applied = engine.apply(&mut grid);

    assert_eq!(applied.range, Some(range("e-g")));
    assert_eq!(applied.position, Some(PositionName::Basic));
    assert_eq!(
        lit(&grid),
        vec![
            (GuitarString::HighE, "g2".to_string()),
            (GuitarString::B, "e2".to_string()),
            (GuitarString::G, "c2".to_string()),
        ]
    );
    assert_eq!(roots(&grid), vec![(GuitarString::G, "c2".to_string())]);
    let root = applied.result.root_element.unwrap();
    assert_eq!((root.string, root.fret), (GuitarString::G, 5));
}

#[test]
fn stepping_right_from_third_inversion_wraps_to_basic() {
    let mut engine = sample_engine();
    engine.range_changed(range("e - d"));
    assert_eq!(engine.positions(), PositionName::ALL.to_vec());

    engine.position_selected(PositionName::Third);
    engine.position_changed(Direction::Next);
    assert_eq!(engine.position(), Some(PositionName::Basic));

    engine.position_changed(Direction::Prev);
    assert_eq!(engine.position(), Some(PositionName::Third));
}

#[test]
fn untagged_voicing_takes_its_root_from_the_root_table() {
    let voicing = Voicing::new()
        .with_note(GuitarString::D, NoteDescriptor::new(pitch("e1")))
        .with_note(GuitarString::A, NoteDescriptor::new(pitch("c1")));
    let table = VoicingTable::new().with_voicing(range("d - A"), PositionName::Basic, voicing);
    let mut engine = engine_for(table, RootTable::new().with_root("C", pitch("c1")), "major");
    let mut grid = grid();

    let applied = engine.apply(&mut grid);

    assert_eq!(roots(&grid), vec![(GuitarString::A, "c1".to_string())]);
    assert_eq!(applied.result.ambiguous_root_count(), 0);
}

#[test]
fn empty_table_applies_nothing() {
    let mut engine = engine_for(VoicingTable::new(), RootTable::new(), "major");
    assert!(resolve_positions(&engine.data().table, &range("e - g"), &ChordType::default()).is_empty());
    assert!(engine.positions().is_empty());

    let mut grid = grid();
    engine.position_changed(Direction::Next);
    let applied = engine.apply(&mut grid);

    assert_eq!(applied.result.activated_count(), 0);
    assert!(applied.result.root_element.is_none());
    assert_eq!(grid.active_cells().count(), 0);
}

#[test]
fn every_sample_voicing_has_exactly_one_root() {
    let mut engine = sample_engine();
    let ranges: Vec<StringRange> = engine.data().table.ranges().copied().collect();
    let mut grid = grid();

    for r in ranges {
        engine.range_changed(r);
        for position in engine.positions() {
            engine.position_selected(position);
            let applied = engine.apply(&mut grid);
            assert!(applied.result.activated_count() > 0, "{r} / {position}");
            assert_eq!(grid.root_cells().count(), 1, "{r} / {position}");
            assert!(grid.root_cells().all(|cell| cell.active));
        }
    }
}

#[test]
fn reapplying_the_same_voicing_is_idempotent() {
    let mut engine = sample_engine();
    let mut grid = grid();

    let first = engine.apply(&mut grid);
    let lit_once = lit(&grid);
    let second = engine.apply(&mut grid);

    assert_eq!(first, second);
    assert_eq!(lit(&grid), lit_once);
}

#[test]
fn switching_voicings_leaves_no_stale_notes() {
    let mut engine = sample_engine();
    engine.range_changed(range("e - d"));
    let mut grid = grid();

    engine.position_selected(PositionName::Basic);
    engine.apply(&mut grid);
    engine.position_selected(PositionName::First);
    let applied = engine.apply(&mut grid);

    assert_eq!(
        lit(&grid),
        vec![
            (GuitarString::HighE, "g2".to_string()),
            (GuitarString::B, "c2".to_string()),
            (GuitarString::G, "b1".to_string()),
            (GuitarString::D, "e1".to_string()),
        ]
    );
    assert_eq!(roots(&grid), vec![(GuitarString::B, "c2".to_string())]);
    assert_eq!(applied.result.activated_count(), 4);
}

#[test]
fn overcrowded_pitch_moves_the_root_to_the_kept_occurrence() {
    // c3 on three strings; spans are 2 on e, 5 on b and 1 on g.
    let voicing = Voicing::new()
        .with_note(GuitarString::HighE, NoteDescriptor::new(pitch("c3")).with_root(true))
        .with_note(GuitarString::HighE, NoteDescriptor::new(pitch("d3")).with_root(false))
        .with_note(GuitarString::B, NoteDescriptor::new(pitch("c3")).with_root(false))
        .with_note(GuitarString::B, NoteDescriptor::new(pitch("g2")).with_root(false))
        .with_note(GuitarString::G, NoteDescriptor::new(pitch("c3")).with_root(false))
        .with_note(GuitarString::G, NoteDescriptor::new(pitch("db3")).with_root(false));
    let table = VoicingTable::new().with_voicing(range("e - g"), PositionName::Basic, voicing);
    let mut engine = engine_for(table, RootTable::new(), "major");
    let mut grid = grid();

    let applied = engine.apply(&mut grid);

    assert_eq!(
        lit(&grid),
        vec![
            (GuitarString::HighE, "d3".to_string()),
            (GuitarString::B, "g2".to_string()),
            (GuitarString::B, "c3".to_string()),
            (GuitarString::G, "db3".to_string()),
        ]
    );
    assert_eq!(roots(&grid), vec![(GuitarString::B, "c3".to_string())]);
    let suppressed: Vec<_> = applied
        .result
        .suppressed
        .iter()
        .map(|note| (note.string, note.fret))
        .collect();
    assert_eq!(suppressed, vec![(GuitarString::HighE, 8), (GuitarString::G, 17)]);
}

#[test]
fn overview_keeps_crowded_outer_strings() {
    let mut voicing = Voicing::new();
    for p in ["e2", "g2", "a2", "b2", "c3"] {
        voicing.push(GuitarString::HighE, NoteDescriptor::new(pitch(p)));
    }
    voicing.push(GuitarString::G, NoteDescriptor::new(pitch("c2")));
    let table = VoicingTable::new().with_voicing(range("e - g"), PositionName::Basic, voicing);
    let mut engine = engine_for(table, RootTable::new().with_root("C", pitch("c2")), "major");
    let mut grid = grid();

    let focused = engine.apply(&mut grid);
    assert_eq!(focused.result.activated_count(), 4);
    assert_eq!(grid.cell(GuitarString::HighE, &pitch("e2")).map(|c| c.active), Some(false));

    engine.set_context(NavigationContext::Overview);
    let overview = engine.apply(&mut grid);
    assert_eq!(overview.result.activated_count(), 6);
    assert_eq!(roots(&grid), vec![(GuitarString::G, "c2".to_string())]);
}

#[test]
fn missing_range_falls_back_to_the_first_available() {
    let mut engine = sample_engine();
    let mut grid = grid();

    engine.range_changed(range("d - E"));
    let applied = engine.apply(&mut grid);

    assert_eq!(applied.range, Some(range("e - g")));
    assert!(applied.result.diagnostics.contains(&Diagnostic::RangeMissing {
        requested: range("d - E"),
        fallback: Some(range("e - g")),
    }));
    assert!(applied.result.activated_count() > 0);
}

#[test]
fn unnavigable_position_is_clamped_and_reported() {
    let mut engine = sample_engine();
    engine.range_changed(range("e - g"));
    engine.position_selected(PositionName::Third);

    engine.position_changed(Direction::Next);
    assert_eq!(engine.position(), Some(PositionName::First));

    let applied = engine.apply(&mut grid());
    assert!(applied.result.diagnostics.contains(&Diagnostic::InvalidPosition {
        requested: PositionName::Third,
    }));
}

#[test]
fn selected_position_missing_from_range_falls_back() {
    let mut engine = sample_engine();
    engine.range_changed(range("b - A"));
    engine.position_selected(PositionName::Second);

    let applied = engine.apply(&mut grid());

    assert_eq!(applied.position, Some(PositionName::Basic));
    assert!(matches!(
        applied.result.diagnostics[0],
        Diagnostic::PositionMissing {
            requested: PositionName::Second,
            fallback: Some(PositionName::Basic),
            ..
        }
    ));
}
