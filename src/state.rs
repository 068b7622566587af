//! Game state and its JSON save format.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::coord::{Coord, PlayerId};
use crate::error::LoadError;
use crate::ruleset::Ruleset;
use crate::score::ScoreStore;

/// A single game in progress (or finished). Carries its own board and score
/// store; the [Ruleset] it was created from is borrowed by the caller for
/// every operation rather than stored here, since it is immutable and
/// commonly shared across many concurrent games.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    pub board: Board,
    pub scores: ScoreStore,
    pub num_players: u32,
    /// `None` once the game has ended.
    pub active_player: Option<PlayerId>,
    pub winner: Option<PlayerId>,
}

impl GameState {
    pub fn new(ruleset: &Ruleset, num_players: u32) -> Self {
        GameState {
            board: Board::new(ruleset.board_dims.clone()),
            scores: ScoreStore::default(),
            num_players,
            active_player: Some(0),
            winner: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.active_player.is_none()
    }
}

/// The on-disk save format (§6): a dense nested-array board with `-1` as the
/// empty sentinel, scores keyed by qualified memo with one entry per player,
/// `active_player` (`-1` means terminal), and the datapack set the state was
/// loaded under.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SaveDoc {
    pub board: BoardDoc,
    pub scores: HashMap<String, Vec<i64>>,
    pub active_player: i64,
    pub datapacks: Vec<String>,
}

/// A board serialized as nested arrays; `dims.len()` levels of nesting, `-1`
/// marking an empty cell. Represented flat with explicit `dims` here since
/// serde_json has no native notion of "N-dimensional jagged-but-actually-
/// rectangular array" — the nesting is reconstructed on demand.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BoardDoc {
    pub dims: Vec<usize>,
    pub cells: Vec<i64>,
}

const EMPTY_SENTINEL: i64 = -1;

/// Converts a live [GameState] into its save representation.
pub fn serialize(state: &GameState, ruleset: &Ruleset) -> SaveDoc {
    let dims = state.board.dims().to_vec();
    let total: usize = dims.iter().product();
    let mut cells = vec![EMPTY_SENTINEL; total];
    for (coord, player) in state.board.occupied() {
        cells[flat_index(&dims, &coord)] = player as i64;
    }

    let mut scores: HashMap<String, Vec<i64>> = HashMap::new();
    for spec in &ruleset.scores {
        let per_player = (0..state.num_players)
            .map(|p| state.scores.get(p, &spec.qualified_memo))
            .collect();
        scores.insert(spec.qualified_memo.clone(), per_player);
    }

    SaveDoc {
        board: BoardDoc { dims, cells },
        scores,
        active_player: state.active_player.map_or(-1, |p| p as i64),
        datapacks: ruleset.datapack_order.clone(),
    }
}

/// Reconstructs a [GameState] from a save document against an already-loaded
/// [Ruleset]. The caller is responsible for having loaded the ruleset named
/// by `doc.datapacks`; this function does not re-run the loader. A terminal
/// save (`active_player: -1`) has its winner recomputed from the restored
/// scores rather than carried in the document, so `deserialize ∘ serialize`
/// round-trips it exactly.
pub fn deserialize(doc: &SaveDoc, ruleset: &Ruleset) -> Result<GameState, LoadError> {
    if doc.board.dims != ruleset.board_dims {
        return Err(LoadError::SchemaViolation {
            context: "save document board".to_string(),
            reason: format!(
                "save board dims {:?} do not match ruleset dims {:?}",
                doc.board.dims, ruleset.board_dims
            ),
        });
    }

    let mut board = Board::new(doc.board.dims.clone());
    for (idx, &cell) in doc.board.cells.iter().enumerate() {
        if cell != EMPTY_SENTINEL {
            let player = u32::try_from(cell).map_err(|_| LoadError::SchemaViolation {
                context: "save document board cell".to_string(),
                reason: format!("negative non-sentinel player id {cell}"),
            })?;
            let coord = coord_of_flat_index(&doc.board.dims, idx);
            board.set(&coord, Some(player));
        }
    }

    let mut num_players = 0u32;
    let mut scores = ScoreStore::default();
    for (memo, per_player) in &doc.scores {
        num_players = num_players.max(per_player.len() as u32);
        for (player, &value) in per_player.iter().enumerate() {
            scores.apply(player as u32, memo, crate::score::ScoreOp::Set, value);
        }
    }

    let active_player = if doc.active_player < 0 {
        None
    } else {
        Some(doc.active_player as u32)
    };

    let mut state = GameState {
        board,
        scores,
        num_players,
        active_player,
        winner: None,
    };
    if state.is_terminal() {
        state.winner = crate::engine::detect_winner(ruleset, &state);
    }
    Ok(state)
}

fn flat_index(dims: &[usize], coord: &Coord) -> usize {
    let mut idx = 0usize;
    for (axis, &size) in coord.as_unsigned().iter().zip(dims.iter()) {
        idx = idx * size + axis;
    }
    idx
}

fn coord_of_flat_index(dims: &[usize], mut idx: usize) -> Coord {
    let mut axes = vec![0i64; dims.len()];
    for i in (0..dims.len()).rev() {
        let size = dims[i];
        axes[i] = (idx % size) as i64;
        idx /= size;
    }
    Coord(axes)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::ruleset::ScoreSpec;

    fn tiny_ruleset() -> Ruleset {
        Ruleset {
            datapack_order: vec!["pente".to_string()],
            board_dims: vec![2, 2],
            scores: vec![ScoreSpec {
                qualified_memo: "pente.captures".to_string(),
                display_name: None,
                threshold: Some(10),
            }],
            restrictions: vec![],
            rules: vec![],
        }
    }

    #[test]
    fn round_trip_preserves_board_and_scores() {
        let ruleset = tiny_ruleset();
        let mut state = GameState::new(&ruleset, 2);
        state.board.set(&Coord::new(vec![0, 1]), Some(0));
        state.scores.apply(0, "pente.captures", crate::score::ScoreOp::Add, 3);
        state.active_player = Some(1);

        let doc = serialize(&state, &ruleset);
        let restored = deserialize(&doc, &ruleset).unwrap();

        assert_eq!(restored.board, state.board);
        assert_eq!(restored.scores.get(0, "pente.captures"), 3);
        assert_eq!(restored.active_player, Some(1));
    }

    #[test]
    fn terminal_state_round_trips_winner() {
        let ruleset = tiny_ruleset();
        let mut state = GameState::new(&ruleset, 2);
        state.scores.apply(0, "pente.captures", crate::score::ScoreOp::Set, 11);
        state.active_player = None;
        state.winner = Some(0);

        let doc = serialize(&state, &ruleset);
        assert_eq!(doc.active_player, -1);

        let restored = deserialize(&doc, &ruleset).unwrap();
        assert!(restored.is_terminal());
        assert_eq!(restored.winner, Some(0));
    }

    #[test]
    fn mismatched_board_dims_is_rejected() {
        let ruleset = tiny_ruleset();
        let doc = SaveDoc {
            board: BoardDoc {
                dims: vec![3, 3],
                cells: vec![-1; 9],
            },
            scores: HashMap::new(),
            active_player: 0,
            datapacks: vec!["pente".to_string()],
        };
        assert!(deserialize(&doc, &ruleset).is_err());
    }
}
