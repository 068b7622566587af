//! Enumerates every admissible match of a compiled [Pattern] against a
//! [Board] that contains a given move coordinate.

use crate::board::Board;
use crate::coord::{step_position, Coord, PlayerId};

use super::compile::{CellPredicate, Pattern, Polarity};
use super::orientation::orientations;

/// A concrete instantiation of a pattern at an `(orientation, anchor)` pair
/// that contains the move coordinate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Match {
    pub orientation_index: usize,
    /// The coordinate of the pattern's first cell (index 0).
    pub anchor: Coord,
    pub center_coord: Coord,
    pub cell_coords: Vec<Coord>,
    /// One binding per letter (`A`-`Z` / `a`-`z` share a slot), `None` if
    /// that letter never appeared in the pattern.
    pub alias_bindings: [Option<PlayerId>; 26],
}

/// Enumerates every match of `pattern` against `board` that contains `mv`,
/// in canonical `(orientation, anchor)` order. No `(orientation, anchor)`
/// pair appears twice.
pub fn find_matches(pattern: &Pattern, board: &Board, mv: &Coord) -> Vec<Match> {
    let mut out = Vec::new();
    let centers = pattern.candidate_centers();

    for (orientation_index, step) in orientations(board.dimensionality()).iter().enumerate() {
        let mut seen_anchors = Vec::new();
        for &i in &centers {
            let anchor = step_position(mv, step, i, 0);
            if seen_anchors.contains(&anchor) {
                // Same (orientation, anchor) already emitted for a different
                // candidate center; the pattern cannot match twice there.
                continue;
            }

            let positions: Vec<Coord> = (0..pattern.len())
                .map(|k| step_position(mv, step, i, k))
                .collect();

            if positions.iter().any(|p| !board.in_bounds(p)) {
                continue;
            }

            if let Some(bindings) = try_bind(pattern, board, &positions) {
                seen_anchors.push(anchor.clone());
                out.push(Match {
                    orientation_index,
                    anchor,
                    center_coord: positions[i].clone(),
                    cell_coords: positions,
                    alias_bindings: bindings,
                });
            }
        }
    }

    out
}

fn try_bind(
    pattern: &Pattern,
    board: &Board,
    positions: &[Coord],
) -> Option<[Option<PlayerId>; 26]> {
    let mut bindings: [Option<PlayerId>; 26] = [None; 26];

    for (predicate, pos) in pattern.predicates.iter().zip(positions.iter()) {
        let cell = board.get(pos);
        match predicate {
            CellPredicate::Any => {}
            CellPredicate::Empty => {
                if cell.is_some() {
                    return None;
                }
            }
            CellPredicate::AnyStone => {
                if cell.is_none() {
                    return None;
                }
            }
            CellPredicate::Alias { letter, polarity } => {
                let player = cell?;
                match polarity {
                    Polarity::Same => match bindings[*letter as usize] {
                        Some(bound) if bound != player => return None,
                        Some(_) => {}
                        None => bindings[*letter as usize] = Some(player),
                    },
                    Polarity::Opposite => match bindings[*letter as usize] {
                        Some(bound) if bound == player => return None,
                        Some(_) => {}
                        // The uppercase binding for this letter is guaranteed
                        // (by compile-time validation) to appear somewhere in
                        // the pattern, but may be processed after this cell;
                        // a second pass below reconciles that.
                        None => {}
                    },
                }
            }
        }
    }

    // Second pass: now that every uppercase binding is resolved, re-check
    // lowercase (inequality) predicates that were encountered before their
    // uppercase counterpart bound.
    for (predicate, pos) in pattern.predicates.iter().zip(positions.iter()) {
        if let CellPredicate::Alias {
            letter,
            polarity: Polarity::Opposite,
        } = predicate
        {
            let player = board.get(pos)?;
            if bindings[*letter as usize] == Some(player) {
                return None;
            }
        }
    }

    Some(bindings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(board: &mut Board, coords: &[(i64, i64)], player: PlayerId) {
        for &(r, c) in coords {
            board.set(&Coord::new(vec![r, c]), Some(player));
        }
    }

    #[test]
    fn finds_capture_pattern() {
        // . X O O _   -- player 0 (X) plays at the empty cell on the right.
        let mut board = Board::new(vec![1, 5]);
        place(&mut board, &[(0, 1)], 0);
        place(&mut board, &[(0, 2), (0, 3)], 1);

        let pattern = Pattern::compile("[X]OOX").unwrap();
        let mv = Coord::new(vec![0, 4]);
        let matches = find_matches(&pattern, &board, &mv);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].cell_coords[0], mv);
        assert_eq!(
            matches[0].alias_bindings[(b'X' - b'A') as usize],
            Some(0)
        );
    }

    #[test]
    fn rejects_when_alias_inequality_violated() {
        // o must differ from O; board has O O, so Oo pattern never matches.
        let mut board = Board::new(vec![1, 2]);
        place(&mut board, &[(0, 0), (0, 1)], 1);
        let pattern = Pattern::compile("[O]o").unwrap();
        let matches = find_matches(&pattern, &board, &Coord::new(vec![0, 0]));
        assert!(matches.is_empty());
    }

    #[test]
    fn no_orientation_anchor_pair_repeats() {
        let mut board = Board::new(vec![5, 5]);
        place(&mut board, &[(2, 2)], 0);
        let pattern = Pattern::compile(".").unwrap();
        let matches = find_matches(&pattern, &board, &Coord::new(vec![2, 2]));
        let mut keys: Vec<_> = matches
            .iter()
            .map(|m| (m.orientation_index, m.anchor.clone()))
            .collect();
        let before = keys.len();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), before);
    }

    #[test]
    fn out_of_bounds_positions_are_rejected() {
        let board = Board::new(vec![3, 3]);
        let pattern = Pattern::compile("XXXXX").unwrap();
        let matches = find_matches(&pattern, &board, &Coord::new(vec![1, 1]));
        assert!(matches.is_empty());
    }
}
