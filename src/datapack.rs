//! Serde types for the raw JSON datapack document format (see the engine's
//! external interface). These are intentionally "dumb" data holders; schema
//! validation beyond what serde gives for free, and all cross-referential
//! checks (dependency cycles, unresolved memos, pattern well-formedness),
//! happen in [crate::loader].

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DatapackDoc {
    pub name: String,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub load_after: Vec<String>,
    #[serde(default)]
    pub scores: Vec<ScoreSpecDoc>,
    #[serde(default)]
    pub restrictions: Vec<RestrictionDoc>,
    #[serde(default)]
    pub rules: Vec<RuleDoc>,
    #[serde(default)]
    pub board: Option<BoardDoc>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BoardDoc {
    pub dimensions: Vec<usize>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScoreSpecDoc {
    pub qualified_memo: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub threshold: Option<i64>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PriorityDoc {
    Earliest,
    Earlier,
    Early,
    Default,
    Late,
    Later,
    Latest,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MultimatchModeDoc {
    One,
    Half,
    All,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScoreOpDoc {
    Set,
    Add,
    Multiply,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConditionDoc {
    Score(ScoreConditionDoc),
    Coords(CoordsConditionDoc),
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScoreConditionDoc {
    pub player_index: i64,
    pub memo: String,
    #[serde(default)]
    pub min: Option<i64>,
    #[serde(default)]
    pub max: Option<i64>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CoordsConditionDoc {
    pub axes: Vec<usize>,
    #[serde(default)]
    pub min: Option<i64>,
    #[serde(default)]
    pub max: Option<i64>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RestrictionDoc {
    Pattern(PatternRestrictionDoc),
    Disjunction(DisjunctionRestrictionDoc),
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PatternRestrictionDoc {
    #[serde(default)]
    pub name: Option<String>,
    pub pattern: String,
    #[serde(default)]
    pub conditions: Vec<ConditionDoc>,
    #[serde(default)]
    pub active_player: Option<u32>,
    #[serde(default)]
    pub negate: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DisjunctionRestrictionDoc {
    #[serde(default)]
    pub name: Option<String>,
    pub conjunctions: Vec<Vec<RestrictionDoc>>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RuleDoc {
    pub qualified_name: String,
    pub priority: PriorityDoc,
    pub pattern: String,
    pub multimatch_mode: MultimatchModeDoc,
    #[serde(default)]
    pub conditions: Vec<ConditionDoc>,
    #[serde(default)]
    pub score_actions: Vec<ScoreActionDoc>,
    #[serde(default)]
    pub board_actions: Vec<BoardActionDoc>,
    #[serde(default)]
    pub active_player: Option<u32>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScoreActionDoc {
    pub player_index: i64,
    pub memo: String,
    pub op: ScoreOpDoc,
    pub value: i64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BoardActionDoc {
    pub player_index: i64,
    pub location_index: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_minimal_datapack() {
        let json = r#"{
            "name": "pente",
            "board": { "dimensions": [19, 19] },
            "scores": [{ "qualified_memo": "pente.wins", "threshold": 0 }],
            "restrictions": [],
            "rules": [{
                "qualified_name": "pente.win",
                "priority": "default",
                "pattern": "[X]XXXX",
                "multimatch_mode": "one",
                "score_actions": [{ "player_index": -2, "memo": "pente.wins", "op": "set", "value": 1 }],
                "board_actions": []
            }]
        }"#;
        let doc: DatapackDoc = serde_json::from_str(json).unwrap();
        assert_eq!(doc.name, "pente");
        assert_eq!(doc.board.unwrap().dimensions, vec![19, 19]);
        assert_eq!(doc.rules.len(), 1);
        assert_eq!(doc.rules[0].priority, PriorityDoc::Default);
    }

    #[test]
    fn parses_disjunction_restriction() {
        let json = r#"{
            "type": "disjunction",
            "name": "house.blocked",
            "conjunctions": [
                [{ "type": "pattern", "pattern": "XX", "negate": false }],
                [{ "type": "pattern", "pattern": "OO", "negate": false }]
            ]
        }"#;
        let doc: RestrictionDoc = serde_json::from_str(json).unwrap();
        match doc {
            RestrictionDoc::Disjunction(d) => assert_eq!(d.conjunctions.len(), 2),
            _ => panic!("expected disjunction"),
        }
    }
}
