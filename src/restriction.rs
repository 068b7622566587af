//! Boolean-composed move-legality checks.

use crate::board::Board;
use crate::condition::Condition;
use crate::coord::{Coord, PlayerId};
use crate::error::ApplyError;
use crate::pattern::{find_matches, Pattern};
use crate::score::ScoreStore;

/// A top-level or nested restriction. Top-level restrictions require a
/// qualified name (so they can be overridden); nested ones inside a
/// [Restriction::Disjunction] are anonymous.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Restriction {
    Pattern(PatternRestriction),
    Disjunction(DisjunctionRestriction),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatternRestriction {
    pub name: Option<String>,
    pub pattern: Pattern,
    pub conditions: Vec<Condition>,
    pub active_player: Option<PlayerId>,
    pub negate: bool,
}

/// DNF over anonymous sub-restrictions: holds iff at least one inner group
/// has every sub-restriction holding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisjunctionRestriction {
    pub name: Option<String>,
    pub conjunctions: Vec<Vec<Restriction>>,
}

impl Restriction {
    /// Whether this restriction holds for the hypothetical placement at
    /// `mv` by `active_player` (the stone is assumed already placed on
    /// `board`).
    pub fn holds(
        &self,
        board: &Board,
        scores: &ScoreStore,
        mv: &Coord,
        active_player: PlayerId,
    ) -> Result<bool, ApplyError> {
        match self {
            Restriction::Pattern(p) => p.holds(board, scores, mv, active_player),
            Restriction::Disjunction(d) => d.holds(board, scores, mv, active_player),
        }
    }
}

impl PatternRestriction {
    fn holds(
        &self,
        board: &Board,
        scores: &ScoreStore,
        mv: &Coord,
        active_player: PlayerId,
    ) -> Result<bool, ApplyError> {
        if self.active_player.is_some_and(|p| p != active_player) {
            return Ok(true);
        }

        let owner = self.name.as_deref().unwrap_or("<anonymous>");
        let matches = find_matches(&self.pattern, board, mv);
        let mut any_matches = false;
        for m in &matches {
            let mut ok = true;
            for cond in &self.conditions {
                if !cond.evaluate(owner, m, board, scores, mv, active_player)? {
                    ok = false;
                    break;
                }
            }
            if ok {
                any_matches = true;
                break;
            }
        }

        Ok(if self.negate { !any_matches } else { any_matches })
    }
}

impl DisjunctionRestriction {
    fn holds(
        &self,
        board: &Board,
        scores: &ScoreStore,
        mv: &Coord,
        active_player: PlayerId,
    ) -> Result<bool, ApplyError> {
        for group in &self.conjunctions {
            let mut all_hold = true;
            for sub in group {
                if !sub.holds(board, scores, mv, active_player)? {
                    all_hold = false;
                    break;
                }
            }
            if all_hold {
                return Ok(true);
            }
        }
        Ok(false)
    }
}
