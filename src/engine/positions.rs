use crate::theory::{ChordType, Direction, PositionName, StringRange};
use crate::voicing::VoicingTable;

/// Positions navigable under `range`, in canonical order without duplicates.
///
/// Aliases were folded into [`PositionName`] when the table was read, so two
/// entries spelled `Root Position` and `Basic Position` collapse here. Third
/// inversions are dropped for chords with fewer than four tones. An unknown
/// range yields an empty list.
pub fn resolve_positions(
    table: &VoicingTable,
    range: &StringRange,
    chord_type: &ChordType,
) -> Vec<PositionName> {
    let mut positions: Vec<PositionName> = table
        .entries(range)
        .iter()
        .map(|entry| entry.position)
        .filter(|position| {
            *position != PositionName::Third || chord_type.supports_third_inversion()
        })
        .collect();
    positions.sort();
    positions.dedup();
    positions
}

/// Cyclic step through `positions`. A `current` missing from the list steps
/// from index 0.
pub fn next_position(
    current: PositionName,
    positions: &[PositionName],
    direction: Direction,
) -> Option<PositionName> {
    let len = positions.len();
    if len == 0 {
        return None;
    }

    let index = positions
        .iter()
        .position(|p| *p == current)
        .unwrap_or(0);
    let next = match direction {
        Direction::Next => (index + 1) % len,
        Direction::Prev => (index + len - 1) % len,
    };
    Some(positions[next])
}
