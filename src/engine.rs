//! The public API surface: loading datapacks, starting games, checking
//! legality, and applying moves.

use crate::coord::{Coord, PlayerId};
use crate::error::ApplyError;
use crate::loader;
use crate::ruleset::Ruleset;
use crate::state::GameState;

pub use crate::datapack::DatapackDoc;
pub use crate::error::LoadError;
pub use crate::state::{deserialize, serialize, SaveDoc};

/// Merges a set of parsed datapack documents into an immutable [Ruleset].
/// See §4.I for the resolution algorithm.
pub fn load(docs: Vec<DatapackDoc>) -> Result<Ruleset, LoadError> {
    loader::load(docs)
}

/// Starts a fresh game on an empty board sized per the ruleset, with player
/// 0 to move.
pub fn new_game(ruleset: &Ruleset, num_players: u32) -> GameState {
    GameState::new(ruleset, num_players)
}

/// Whether `mv` may legally be placed by the state's active player: in
/// bounds, unoccupied, and not blocked by any top-level restriction
/// evaluated against the post-placement hypothetical.
pub fn is_legal(ruleset: &Ruleset, state: &GameState, mv: &Coord) -> bool {
    check_legal(ruleset, state, mv).is_ok()
}

fn check_legal(
    ruleset: &Ruleset,
    state: &GameState,
    mv: &Coord,
) -> Result<(), ApplyError> {
    let active_player = state.active_player.ok_or(ApplyError::GameOver)?;

    if !state.board.in_bounds(mv) {
        return Err(ApplyError::OutOfBounds { coord: mv.clone() });
    }
    if !state.board.is_empty(mv) {
        return Err(ApplyError::CellOccupied { coord: mv.clone() });
    }

    let mut hypothetical = state.board.clone();
    hypothetical.set(mv, Some(active_player));

    for restriction in &ruleset.restrictions {
        let name = restriction_name(restriction);
        if !restriction.holds(&hypothetical, &state.scores, mv, active_player)? {
            return Err(ApplyError::IllegalMove {
                coord: mv.clone(),
                restriction: name.to_string(),
            });
        }
    }

    Ok(())
}

fn restriction_name(r: &crate::restriction::Restriction) -> &str {
    match r {
        crate::restriction::Restriction::Pattern(p) => p.name.as_deref().unwrap_or("<anonymous>"),
        crate::restriction::Restriction::Disjunction(d) => {
            d.name.as_deref().unwrap_or("<anonymous>")
        }
    }
}

/// Places `mv` for the active player and runs the rule pipeline to
/// completion, transactionally: on any error the returned state is a clone
/// of the input state, unmodified. See §4.F and §7.
pub fn apply(ruleset: &Ruleset, state: &GameState, mv: &Coord) -> Result<GameState, ApplyError> {
    check_legal(ruleset, state, mv)?;
    let active_player = state.active_player.expect("checked by check_legal");

    let mut next = state.clone();
    next.board.set(mv, Some(active_player));

    for rule in &ruleset.rules {
        rule.apply(&mut next.board, &mut next.scores, mv, active_player)?;
    }

    if let Some(winner) = detect_winner(ruleset, &next) {
        next.winner = Some(winner);
        next.active_player = None;
    } else {
        next.active_player = Some((active_player + 1) % next.num_players);
    }

    log::info!(
        "applied move {mv:?}; winner = {:?}",
        next.winner
    );

    Ok(next)
}

/// After a turn, a score memo whose `ScoreSpec.threshold` is set ends the
/// game if any player strictly exceeds it; ties broken by lowest `PlayerId`.
pub(crate) fn detect_winner(ruleset: &Ruleset, state: &GameState) -> Option<PlayerId> {
    for spec in &ruleset.scores {
        let Some(threshold) = spec.threshold else {
            continue;
        };
        for player in 0..state.num_players {
            if state.scores.get(player, &spec.qualified_memo) > threshold {
                return Some(player);
            }
        }
    }
    None
}

/// The winning player, if the game has ended.
pub fn winner(state: &GameState) -> Option<PlayerId> {
    state.winner
}
