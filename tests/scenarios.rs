//! End-to-end scenario tests driving the public engine API against small
//! inline JSON datapacks, exercising the loader's JSON deserialization in
//! combination with real pattern matching and rule/restriction evaluation.

use lib_pente::prelude::*;

fn load_one(json: &str) -> Ruleset {
    let doc: DatapackDoc = serde_json::from_str(json).unwrap();
    load(vec![doc]).unwrap()
}

fn load_many(jsons: &[&str]) -> Ruleset {
    let docs = jsons
        .iter()
        .map(|j| serde_json::from_str(j).unwrap())
        .collect();
    load(docs).unwrap()
}

#[test]
fn scenario_five_in_a_row_win() {
    let ruleset = load_one(
        r#"{
            "name": "pente",
            "board": { "dimensions": [19, 19] },
            "scores": [{ "qualified_memo": "pente.wins", "threshold": 0 }],
            "rules": [{
                "qualified_name": "pente.win",
                "priority": "default",
                "pattern": "[X]XXXX",
                "multimatch_mode": "one",
                "score_actions": [
                    { "player_index": -2, "memo": "pente.wins", "op": "set", "value": 1 }
                ]
            }]
        }"#,
    );

    let mut state = new_game(&ruleset, 2);
    let p0_moves = [(0, 0), (0, 1), (0, 2), (0, 3), (0, 4)];
    let p1_moves = [(5, 0), (5, 1), (5, 2), (5, 3)];
    for i in 0..p0_moves.len() {
        let (r, c) = p0_moves[i];
        state = apply(&ruleset, &state, &Coord::new(vec![r, c])).unwrap();
        if i < p1_moves.len() {
            let (r, c) = p1_moves[i];
            state = apply(&ruleset, &state, &Coord::new(vec![r, c])).unwrap();
        }
    }

    assert!(state.is_terminal());
    assert_eq!(winner(&state), Some(0));
}

#[test]
fn scenario_pente_capture() {
    let ruleset = load_one(
        r#"{
            "name": "pente",
            "board": { "dimensions": [1, 20] },
            "scores": [{ "qualified_memo": "pente.captures" }],
            "rules": [{
                "qualified_name": "pente.capture",
                "priority": "default",
                "pattern": "[X]OOX",
                "multimatch_mode": "all",
                "score_actions": [
                    { "player_index": -2, "memo": "pente.captures", "op": "add", "value": 2 }
                ],
                "board_actions": [
                    { "player_index": -3, "location_index": 1 },
                    { "player_index": -3, "location_index": 2 }
                ]
            }]
        }"#,
    );

    let mut state = new_game(&ruleset, 2);
    // .XOO_ with the move at the trailing empty: X(1) O(2) O(3) [X(4)].
    state = apply(&ruleset, &state, &Coord::new(vec![0, 1])).unwrap(); // P0 X
    state = apply(&ruleset, &state, &Coord::new(vec![0, 2])).unwrap(); // P1 O
    state = apply(&ruleset, &state, &Coord::new(vec![0, 15])).unwrap(); // P0 filler
    state = apply(&ruleset, &state, &Coord::new(vec![0, 3])).unwrap(); // P1 O
    state = apply(&ruleset, &state, &Coord::new(vec![0, 4])).unwrap(); // P0 completes capture

    assert_eq!(state.board.get(&Coord::new(vec![0, 2])), None);
    assert_eq!(state.board.get(&Coord::new(vec![0, 3])), None);
    assert_eq!(state.board.get(&Coord::new(vec![0, 1])), Some(0));
    assert_eq!(state.board.get(&Coord::new(vec![0, 4])), Some(0));
    assert_eq!(state.scores.get(0, "pente.captures"), 2);
}

#[test]
fn scenario_overline_prohibition() {
    let ruleset = load_one(
        r#"{
            "name": "renju",
            "board": { "dimensions": [1, 20] },
            "restrictions": [{
                "type": "pattern",
                "name": "renju.no_overline",
                "pattern": "XXXXXX",
                "negate": true
            }]
        }"#,
    );

    let mut state = new_game(&ruleset, 2);
    for col in 0..5 {
        state = apply(&ruleset, &state, &Coord::new(vec![0, col])).unwrap(); // P0
        state = apply(&ruleset, &state, &Coord::new(vec![0, col + 10])).unwrap(); // P1 filler
    }

    assert!(!is_legal(&ruleset, &state, &Coord::new(vec![0, 5])));
    let err = apply(&ruleset, &state, &Coord::new(vec![0, 5])).unwrap_err();
    assert!(matches!(err, ApplyError::IllegalMove { .. }));
}

const PENTE_WITH_CAPTURE: &str = r#"{
    "name": "pente",
    "board": { "dimensions": [1, 20] },
    "scores": [{ "qualified_memo": "pente.captures" }],
    "rules": [{
        "qualified_name": "pente.capture",
        "priority": "default",
        "pattern": "[X]OOX",
        "multimatch_mode": "all",
        "score_actions": [
            { "player_index": -2, "memo": "pente.captures", "op": "add", "value": 2 }
        ],
        "board_actions": [
            { "player_index": -3, "location_index": 1 },
            { "player_index": -3, "location_index": 2 }
        ]
    }]
}"#;

fn house_rules_doc(with_dependency: bool) -> String {
    let dependencies = if with_dependency { r#"["pente"]"# } else { "[]" };
    format!(
        r#"{{
            "name": "house_rules",
            "dependencies": {dependencies},
            "scores": [{{ "qualified_memo": "house_rules.points" }}],
            "rules": [{{
                "qualified_name": "pente.capture",
                "priority": "default",
                "pattern": "[X]OOX",
                "multimatch_mode": "all",
                "score_actions": [
                    {{ "player_index": -2, "memo": "pente.captures", "op": "add", "value": 2 }},
                    {{ "player_index": -2, "memo": "house_rules.points", "op": "add", "value": 5 }}
                ],
                "board_actions": [
                    {{ "player_index": -3, "location_index": 1 }},
                    {{ "player_index": -3, "location_index": 2 }}
                ]
            }}]
        }}"#
    )
}

fn run_capture_sequence(ruleset: &Ruleset) -> lib_pente::prelude::GameState {
    let mut state = new_game(ruleset, 2);
    state = apply(ruleset, &state, &Coord::new(vec![0, 1])).unwrap(); // P0 X
    state = apply(ruleset, &state, &Coord::new(vec![0, 2])).unwrap(); // P1 O
    state = apply(ruleset, &state, &Coord::new(vec![0, 15])).unwrap(); // P0 filler
    state = apply(ruleset, &state, &Coord::new(vec![0, 3])).unwrap(); // P1 O
    apply(ruleset, &state, &Coord::new(vec![0, 4])).unwrap() // P0 completes capture
}

#[test]
fn scenario_override_applies_only_with_declared_dependency() {
    let with_dep = house_rules_doc(true);
    let ruleset = load_many(&[PENTE_WITH_CAPTURE, &with_dep]);
    let state = run_capture_sequence(&ruleset);
    assert_eq!(state.scores.get(0, "pente.captures"), 2);
    assert_eq!(state.scores.get(0, "house_rules.points"), 5);

    let without_dep = house_rules_doc(false);
    let ruleset = load_many(&[PENTE_WITH_CAPTURE, &without_dep]);
    let state = run_capture_sequence(&ruleset);
    assert_eq!(state.scores.get(0, "pente.captures"), 2);
    assert_eq!(state.scores.get(0, "house_rules.points"), 0);
}

fn multimatch_ruleset(mode: &str) -> Ruleset {
    let json = format!(
        r#"{{
            "name": "symmetry",
            "board": {{ "dimensions": [1, 5] }},
            "scores": [{{ "qualified_memo": "symmetry.hits" }}],
            "rules": [{{
                "qualified_name": "symmetry.center",
                "priority": "default",
                "pattern": "X[.]X",
                "multimatch_mode": "{mode}",
                "score_actions": [
                    {{ "player_index": -2, "memo": "symmetry.hits", "op": "add", "value": 1 }}
                ]
            }}]
        }}"#
    );
    load_one(&json)
}

#[test]
fn scenario_multimatch_half_vs_all() {
    // "X.X" centered on the move: both the forward and reverse orientation
    // see the same two flanking stones, so `all` double-counts while `half`
    // collapses the reverse-orientation duplicate.
    for (mode, expected) in [("all", 2), ("half", 1)] {
        let ruleset = multimatch_ruleset(mode);
        let mut state = new_game(&ruleset, 2);
        state = apply(&ruleset, &state, &Coord::new(vec![0, 0])).unwrap(); // P0 X
        state = apply(&ruleset, &state, &Coord::new(vec![0, 3])).unwrap(); // P1 filler
        state = apply(&ruleset, &state, &Coord::new(vec![0, 2])).unwrap(); // P0 X
        state = apply(&ruleset, &state, &Coord::new(vec![0, 4])).unwrap(); // P1 filler
        state = apply(&ruleset, &state, &Coord::new(vec![0, 1])).unwrap(); // P0 completes X.X

        assert_eq!(
            state.scores.get(0, "symmetry.hits"),
            expected,
            "multimatch_mode {mode:?}"
        );
    }
}

#[test]
fn scenario_disjunction_restriction_covers_every_combination() {
    // A, B, C are each gated by an independent score threshold on the active
    // player rather than board geometry, so every truth combination of
    // `(A & B) | C` is reachable without the conjuncts' preconditions
    // entangling each other.
    let ruleset = load_one(
        r#"{
            "name": "demo",
            "scores": [
                { "qualified_memo": "demo.a" },
                { "qualified_memo": "demo.b" },
                { "qualified_memo": "demo.c" }
            ],
            "restrictions": [{
                "type": "disjunction",
                "name": "demo.combo",
                "conjunctions": [
                    [
                        {
                            "type": "pattern", "pattern": ".",
                            "conditions": [{ "type": "score", "player_index": -2, "memo": "demo.a", "min": 1 }]
                        },
                        {
                            "type": "pattern", "pattern": ".",
                            "conditions": [{ "type": "score", "player_index": -2, "memo": "demo.b", "min": 1 }]
                        }
                    ],
                    [
                        {
                            "type": "pattern", "pattern": ".",
                            "conditions": [{ "type": "score", "player_index": -2, "memo": "demo.c", "min": 1 }]
                        }
                    ]
                ]
            }]
        }"#,
    );
    let restriction = &ruleset.restrictions[0];
    let board = Board::new(vec![3, 3]);
    let mv = Coord::new(vec![1, 1]);

    let set_abc = |a: i64, b: i64, c: i64| {
        let mut scores = ScoreStore::default();
        scores.apply(0, "demo.a", ScoreOp::Set, a);
        scores.apply(0, "demo.b", ScoreOp::Set, b);
        scores.apply(0, "demo.c", ScoreOp::Set, c);
        scores
    };

    // Neither A, B, nor C.
    let scores = set_abc(0, 0, 0);
    assert!(!restriction.holds(&board, &scores, &mv, 0).unwrap());

    // A alone: neither conjunct is fully satisfied.
    let scores = set_abc(1, 0, 0);
    assert!(!restriction.holds(&board, &scores, &mv, 0).unwrap());

    // A and B together satisfy the first conjunction.
    let scores = set_abc(1, 1, 0);
    assert!(restriction.holds(&board, &scores, &mv, 0).unwrap());

    // C alone satisfies the second conjunction.
    let scores = set_abc(1, 0, 1);
    assert!(restriction.holds(&board, &scores, &mv, 0).unwrap());
}
