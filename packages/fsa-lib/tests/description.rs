use std::io::Write;

use fsa_lib::{
    automaton::{
        Alphabet, FiniteAutomaton, Language,
        description::{AutomatonDescription, StateTag},
        node::StateLabel,
    },
    error::{AutomatonError, StateReference},
};

const ONE_A: &str = r#"{
    "states": { "q0": "I", "q1": "F" },
    "alphabet": ["a"],
    "transitions": {
        "q0": { "a": ["q1"] },
        "q1": { "a": [] }
    }
}"#;

fn validate(json: &str) -> Result<FiniteAutomaton<char>, AutomatonError> {
    AutomatonDescription::<char>::from_json(json)?.validate()
}

#[test]
fn test_valid_description() {
    let automaton = validate(ONE_A).unwrap();

    assert_eq!(automaton.state_count(), 2);
    assert_eq!(automaton.transition_count(), 1);

    let q0 = automaton.find_state(&StateLabel::named("q0")).unwrap();
    let q1 = automaton.find_state(&StateLabel::named("q1")).unwrap();
    assert_eq!(automaton.initial_states(), vec![q0]);
    assert_eq!(automaton.final_states(), vec![q1]);
    assert_eq!(automaton.targets(q0, &'a'), vec![q1]);
    assert!(automaton.targets(q1, &'a').is_empty());

    assert!(automaton.accepts(&['a']));
    assert!(!automaton.accepts(&['a', 'a']));
}

#[test]
fn test_tag_lists() {
    let automaton = validate(
        r#"{
            "states": { "s": ["I", "F"] },
            "alphabet": ["x", "y"],
            "transitions": { "s": { "x": ["s"], "y": [] } }
        }"#,
    )
    .unwrap();

    let s = automaton.find_state(&StateLabel::named("s")).unwrap();
    assert!(automaton.is_initial(s));
    assert!(automaton.is_final(s));
    assert!(automaton.accepts(&[]));
    assert!(automaton.accepts(&['x', 'x']));
    assert!(!automaton.accepts(&['y']));
}

#[test]
fn test_missing_initial_state() {
    let result = validate(
        r#"{
            "states": { "q0": "", "q1": "F" },
            "alphabet": ["a"],
            "transitions": { "q0": { "a": ["q1"] }, "q1": { "a": [] } }
        }"#,
    );

    assert_eq!(
        result.unwrap_err(),
        AutomatonError::MissingInitialOrFinal(StateTag::Initial)
    );
}

#[test]
fn test_missing_final_state() {
    let result = validate(
        r#"{
            "states": { "q0": "I", "q1": [] },
            "alphabet": ["a"],
            "transitions": { "q0": { "a": ["q1"] }, "q1": { "a": [] } }
        }"#,
    );

    assert_eq!(
        result.unwrap_err(),
        AutomatonError::MissingInitialOrFinal(StateTag::Final)
    );
}

#[test]
fn test_missing_transition_row() {
    let result = validate(
        r#"{
            "states": { "q0": "I", "q1": "F" },
            "alphabet": ["a"],
            "transitions": { "q0": { "a": ["q1"] } }
        }"#,
    );

    assert_eq!(
        result.unwrap_err(),
        AutomatonError::MissingTransition {
            state: "q1".to_string()
        }
    );
}

#[test]
fn test_incomplete_transition_row() {
    let result = validate(
        r#"{
            "states": { "q0": "I", "q1": "F" },
            "alphabet": ["a", "b"],
            "transitions": {
                "q0": { "a": ["q1"], "b": [] },
                "q1": { "a": [] }
            }
        }"#,
    );

    assert_eq!(
        result.unwrap_err(),
        AutomatonError::IncompleteTransition {
            state: "q1".to_string(),
            symbol: "b".to_string()
        }
    );
}

#[test]
fn test_unknown_symbol() {
    let result = validate(
        r#"{
            "states": { "q0": "I", "q1": "F" },
            "alphabet": ["a"],
            "transitions": {
                "q0": { "a": ["q1"], "c": ["q0"] },
                "q1": { "a": [] }
            }
        }"#,
    );

    assert_eq!(
        result.unwrap_err(),
        AutomatonError::UnknownSymbol {
            state: "q0".to_string(),
            symbol: "c".to_string()
        }
    );
}

#[test]
fn test_unknown_source_state() {
    let result = validate(
        r#"{
            "states": { "q0": "I", "q1": "F" },
            "alphabet": ["a"],
            "transitions": {
                "q0": { "a": ["q1"] },
                "q1": { "a": [] },
                "q9": { "a": [] }
            }
        }"#,
    );

    assert_eq!(
        result.unwrap_err(),
        AutomatonError::UnknownState {
            state: "q9".to_string(),
            reference: StateReference::TransitionSource
        }
    );
}

#[test]
fn test_unknown_target_state() {
    let result = validate(
        r#"{
            "states": { "q0": "I", "q1": "F" },
            "alphabet": ["a"],
            "transitions": {
                "q0": { "a": ["q1", "q7"] },
                "q1": { "a": [] }
            }
        }"#,
    );

    let error = result.unwrap_err();
    assert_eq!(
        error,
        AutomatonError::UnknownState {
            state: "q7".to_string(),
            reference: StateReference::TransitionTarget {
                from: "q0".to_string(),
                symbol: "a".to_string()
            }
        }
    );
    assert!(error.to_string().contains("q7"));
}

#[test]
fn test_malformed_input() {
    assert!(matches!(
        validate("{ \"states\": "),
        Err(AutomatonError::MalformedInput(_))
    ));

    // symbols are single characters
    assert!(matches!(
        validate(
            r#"{
                "states": { "q0": "IF" },
                "alphabet": ["ab"],
                "transitions": { "q0": { "ab": [] } }
            }"#
        ),
        Err(AutomatonError::MalformedInput(_))
    ));

    assert!(matches!(
        validate(
            r#"{
                "states": { "q0": ["I", "F", "X"] },
                "alphabet": ["a"],
                "transitions": { "q0": { "a": [] } }
            }"#
        ),
        Err(AutomatonError::MalformedInput(_))
    ));
}

#[test]
fn test_missing_top_level_field() {
    let without_alphabet = validate(
        r#"{
            "states": { "q0": "IF" },
            "transitions": { "q0": { "a": [] } }
        }"#,
    );
    assert!(matches!(
        without_alphabet,
        Err(AutomatonError::MalformedInput(message)) if message.contains("alphabet")
    ));

    let without_transitions = validate(
        r#"{
            "states": { "q0": "IF" },
            "alphabet": ["a"]
        }"#,
    );
    assert!(matches!(
        without_transitions,
        Err(AutomatonError::MalformedInput(message)) if message.contains("transitions")
    ));

    let without_states = validate(
        r#"{
            "alphabet": ["a"],
            "transitions": { "q0": { "a": [] } }
        }"#,
    );
    assert!(matches!(
        without_states,
        Err(AutomatonError::MalformedInput(_))
    ));
}

#[test]
fn test_duplicate_symbols_are_merged() {
    let automaton = validate(
        r#"{
            "states": { "q0": "I", "q1": "F" },
            "alphabet": ["a", "a"],
            "transitions": {
                "q0": { "a": ["q1"] },
                "q1": { "a": ["q1"] }
            }
        }"#,
    )
    .unwrap();

    assert_eq!(automaton.alphabet(), &['a']);
    assert!(automaton.is_deterministic());
    assert!(automaton.accepts(&['a', 'a']));
}

#[test]
fn test_first_violation_is_reported() {
    // both an unknown tag and a missing row, the tags are checked first
    let result = validate(
        r#"{
            "states": { "q0": "IZ" },
            "alphabet": ["a"],
            "transitions": {}
        }"#,
    );

    assert!(matches!(result, Err(AutomatonError::MalformedInput(_))));
}

#[test]
fn test_try_from_description() {
    let description = AutomatonDescription::<char>::from_json(ONE_A).unwrap();
    let automaton = FiniteAutomaton::try_from(&description).unwrap();
    assert_eq!(automaton.state_count(), 2);

    let json = description.to_json().unwrap();
    assert_eq!(
        AutomatonDescription::<char>::from_json(&json).unwrap(),
        description
    );
}

#[test]
fn test_from_file() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    file.write_all(ONE_A.as_bytes()).unwrap();

    let path = file.path().to_str().unwrap();
    let description = AutomatonDescription::<char>::from_file(path).unwrap();
    assert_eq!(description.alphabet, vec!['a']);
    assert_eq!(description.states.len(), 2);
}

#[test]
fn test_from_file_unsupported_extension() {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    file.write_all(ONE_A.as_bytes()).unwrap();

    let path = file.path().to_str().unwrap();
    let error = AutomatonDescription::<char>::from_file(path).unwrap_err();
    assert!(error.to_string().contains("Unsupported file extension"));
}

#[test]
fn test_from_missing_file() {
    assert!(AutomatonDescription::<char>::from_file("does/not/exist.json").is_err());
}
