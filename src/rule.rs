//! Rules: priority-ordered pattern-triggered score and board mutations.

use crate::board::Board;
use crate::condition::{resolve_player, Condition};
use crate::coord::{Coord, PlayerId};
use crate::error::ApplyError;
use crate::pattern::{find_matches, Match, Pattern};
use crate::score::ScoreStore;

pub use crate::score::ScoreOp;

/// Evaluation/application order bucket. Variant declaration order is the
/// evaluation order (`Earliest` first).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    Earliest,
    Earlier,
    Early,
    Default,
    Late,
    Later,
    Latest,
}

/// How many of a rule's matches get their actions applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MultimatchMode {
    /// Only the first match in orientation order.
    One,
    /// Drop matches whose cell-coord set duplicates an already-retained
    /// match found at the reverse orientation.
    Half,
    /// Every match.
    All,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoreAction {
    pub player_index: i64,
    pub memo: String,
    pub op: ScoreOp,
    pub value: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoardAction {
    /// `-3` removes the stone at the resolved location; `-2` the active
    /// player; `-1` the owner at the match center; `>= 0` the owner at that
    /// match cell.
    pub player_index: i64,
    /// `-1` — the match center. `>= 0` — `cell_coords[location_index]`.
    pub location_index: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rule {
    pub qualified_name: String,
    pub priority: Priority,
    pub pattern: Pattern,
    pub multimatch_mode: MultimatchMode,
    pub conditions: Vec<Condition>,
    pub score_actions: Vec<ScoreAction>,
    pub board_actions: Vec<BoardAction>,
    pub active_player: Option<PlayerId>,
}

impl Rule {
    /// Retains matches per `multimatch_mode`, then runs the two-phase
    /// action execution: every score action for every retained match, in
    /// match order then action order, followed by every board action
    /// likewise. Mutates `board` and `scores` in place.
    pub fn apply(
        &self,
        board: &mut Board,
        scores: &mut ScoreStore,
        mv: &Coord,
        active_player: PlayerId,
    ) -> Result<(), ApplyError> {
        if self.active_player.is_some_and(|p| p != active_player) {
            return Ok(());
        }

        let all_matches = find_matches(&self.pattern, board, mv);
        let mut filtered = Vec::new();
        for m in all_matches {
            let mut ok = true;
            for cond in &self.conditions {
                if !cond.evaluate(&self.qualified_name, &m, board, scores, mv, active_player)? {
                    ok = false;
                    break;
                }
            }
            if ok {
                filtered.push(m);
            }
        }

        let retained = select_multimatch(filtered, self.multimatch_mode);

        for m in &retained {
            for action in &self.score_actions {
                let player =
                    resolve_player(&self.qualified_name, action.player_index, m, board, active_player)?;
                scores.apply(player, &action.memo, action.op, action.value);
            }
        }

        for m in &retained {
            for action in &self.board_actions {
                apply_board_action(&self.qualified_name, action, m, board, active_player)?;
            }
        }

        Ok(())
    }
}

fn apply_board_action(
    owner: &str,
    action: &BoardAction,
    m: &Match,
    board: &mut Board,
    active_player: PlayerId,
) -> Result<(), ApplyError> {
    let location = match action.location_index {
        -1 => m.center_coord.clone(),
        i if i >= 0 => m.cell_coords[i as usize].clone(),
        other => unreachable!("invalid location_index {other} should have been rejected at load"),
    };

    let value = match action.player_index {
        -3 => None,
        -2 => Some(active_player),
        -1 => Some(resolve_player(owner, -1, m, board, active_player)?),
        i if i >= 0 => Some(resolve_player(owner, i, m, board, active_player)?),
        other => unreachable!("invalid player_index {other} should have been rejected at load"),
    };

    board.set(&location, value);
    Ok(())
}

/// Applies the multimatch policy given an already condition-filtered,
/// orientation-ordered list of matches.
pub fn select_multimatch(matches: Vec<Match>, mode: MultimatchMode) -> Vec<Match> {
    match mode {
        MultimatchMode::One => matches.into_iter().take(1).collect(),
        MultimatchMode::All => matches,
        MultimatchMode::Half => {
            let mut seen_cell_sets: Vec<Vec<Coord>> = Vec::new();
            let mut out = Vec::new();
            for m in matches {
                let mut sorted_cells = m.cell_coords.clone();
                sorted_cells.sort();
                if seen_cell_sets.contains(&sorted_cells) {
                    continue;
                }
                seen_cell_sets.push(sorted_cells);
                out.push(m);
            }
            out
        }
    }
}
