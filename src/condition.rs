//! Evaluates score- and coordinate-conditions against a [Match].

use crate::board::Board;
use crate::coord::{Coord, PlayerId};
use crate::error::ApplyError;
use crate::pattern::Match;
use crate::score::ScoreStore;

/// A condition attached to a rule or pattern restriction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Condition {
    Score(ScoreCondition),
    Coords(CoordsCondition),
}

/// Requires the resolved player's score for `memo` to fall within
/// `[min, max]` (either bound may be absent, but at least one must be
/// present).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoreCondition {
    /// `>= 0` — owner at `cell_coords[player_index]`. `-1` — owner at the
    /// match center. `-2` — the active player.
    pub player_index: i64,
    pub memo: String,
    pub min: Option<i64>,
    pub max: Option<i64>,
}

/// Requires `move[axis]` to fall within `[min, max]` for every listed axis
/// (bounds optional independently).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoordsCondition {
    pub axes: Vec<usize>,
    pub min: Option<i64>,
    pub max: Option<i64>,
}

/// Resolves a `player_index` against a match, the move coordinate, and the
/// active player, as used by both [ScoreCondition] and [crate::rule::ScoreAction]
/// / [crate::rule::BoardAction].
pub fn resolve_player(
    owner: &str,
    player_index: i64,
    m: &Match,
    board: &Board,
    active_player: PlayerId,
) -> Result<PlayerId, ApplyError> {
    match player_index {
        -2 => Ok(active_player),
        -1 => board
            .get(&m.center_coord)
            .ok_or(ApplyError::DatapackAuthoringError {
                owner: owner.to_string(),
                index: -1,
            }),
        i if i >= 0 => {
            let coord = &m.cell_coords[i as usize];
            board
                .get(coord)
                .ok_or(ApplyError::DatapackAuthoringError {
                    owner: owner.to_string(),
                    index: i,
                })
        }
        other => unreachable!("invalid player_index {other} should have been rejected at load"),
    }
}

impl Condition {
    pub fn evaluate(
        &self,
        owner: &str,
        m: &Match,
        board: &Board,
        scores: &ScoreStore,
        mv: &Coord,
        active_player: PlayerId,
    ) -> Result<bool, ApplyError> {
        match self {
            Condition::Score(c) => c.evaluate(owner, m, board, scores, active_player),
            Condition::Coords(c) => Ok(c.evaluate(mv)),
        }
    }
}

impl ScoreCondition {
    pub fn evaluate(
        &self,
        owner: &str,
        m: &Match,
        board: &Board,
        scores: &ScoreStore,
        active_player: PlayerId,
    ) -> Result<bool, ApplyError> {
        let player = resolve_player(owner, self.player_index, m, board, active_player)?;
        let value = scores.get(player, &self.memo);
        let above_min = self.min.map_or(true, |min| value >= min);
        let below_max = self.max.map_or(true, |max| value <= max);
        Ok(above_min && below_max)
    }
}

impl CoordsCondition {
    pub fn evaluate(&self, mv: &Coord) -> bool {
        self.axes.iter().all(|&axis| {
            let value = mv.axis(axis);
            let above_min = self.min.map_or(true, |min| value >= min);
            let below_max = self.max.map_or(true, |max| value <= max);
            above_min && below_max
        })
    }
}
