use fsa_lib::{
    automaton::{
        DisplayMarkers, FiniteAutomaton, Language, description::AutomatonDescription,
        minimization::Minimizable, node::StateLabel,
    },
    validation::{
        isomorphism::{assert_isomorphic, is_isomorphic},
        same_language::assert_same_language,
    },
};

fn automaton(json: &str) -> FiniteAutomaton<char> {
    AutomatonDescription::<char>::from_json(json)
        .unwrap()
        .validate()
        .unwrap()
}

/// q1 and q2 are final and behave the same on every letter.
fn twin_finals() -> FiniteAutomaton<char> {
    automaton(
        r#"{
            "states": { "q0": "I", "q1": "F", "q2": "F" },
            "alphabet": ["a", "b"],
            "transitions": {
                "q0": { "a": ["q1"], "b": ["q2"] },
                "q1": { "a": ["q1"], "b": ["q2"] },
                "q2": { "a": ["q1"], "b": ["q2"] }
            }
        }"#,
    )
}

#[test]
fn test_merge_equivalent_final_states() {
    let dfa = twin_finals();
    assert!(dfa.is_deterministic());

    let minimal = dfa.minimize();

    assert!(minimal.is_deterministic());
    assert_eq!(minimal.state_count(), 2);
    assert!(minimal.state_count() < dfa.state_count());
    assert_eq!(minimal.final_states().len(), 1);
    assert_same_language(&dfa, &minimal, 6);
}

#[test]
fn test_minimize_is_idempotent() {
    let minimal = twin_finals().minimize();
    let again = minimal.minimize();

    assert_eq!(again.state_count(), minimal.state_count());
    assert_isomorphic(&minimal, &again);
}

#[test]
fn test_unreachable_states_are_dropped() {
    let dfa = automaton(
        r#"{
            "states": { "q0": "I", "q1": "F", "q2": "F", "q3": "" },
            "alphabet": ["a", "b"],
            "transitions": {
                "q0": { "a": ["q1"], "b": ["q2"] },
                "q1": { "a": ["q1"], "b": ["q2"] },
                "q2": { "a": ["q1"], "b": ["q2"] },
                "q3": { "a": ["q3"], "b": ["q0"] }
            }
        }"#,
    );

    let minimal = dfa.minimize();

    assert_eq!(minimal.state_count(), 2);
    assert_isomorphic(&minimal, &twin_finals().minimize());
}

#[test]
fn test_minimize_determinizes_first() {
    let nfa = automaton(
        r#"{
            "states": { "q0": "I", "q1": "F" },
            "alphabet": ["a"],
            "transitions": {
                "q0": { "a": ["q0", "q1"] },
                "q1": { "a": [] }
            }
        }"#,
    );
    assert!(!nfa.is_deterministic());

    let minimal = nfa.minimize();

    assert!(minimal.is_deterministic());
    assert_eq!(minimal.state_count(), 2);
    assert_same_language(&nfa, &minimal, 6);
}

#[test]
fn test_dead_state_survives_minimization() {
    let nfa = automaton(
        r#"{
            "states": { "q0": "I", "q1": "F" },
            "alphabet": ["a"],
            "transitions": {
                "q0": { "a": ["q1"] },
                "q1": { "a": [] }
            }
        }"#,
    );

    let minimal = nfa.minimize();

    assert_eq!(minimal.state_count(), 3);
    let dead = minimal.dead_state().unwrap();
    assert!(!minimal.is_final(dead));
    assert!(minimal.accepts(&['a']));
    assert!(!minimal.accepts(&['a', 'a', 'a']));
}

#[test]
fn test_equivalence_classes_reach_fixed_point() {
    let dfa = twin_finals();
    let classes = dfa.equivalence_classes();

    assert_eq!(classes.len(), 2);
    assert_eq!(classes.refine(&dfa), classes);

    let q1 = dfa.final_states()[0];
    let q2 = dfa.final_states()[1];
    assert_eq!(classes.block_of(q1), classes.block_of(q2));
}

#[test]
fn test_same_language_gives_isomorphic_minimal_automata() {
    // (a|b)+ with one final state
    let small = automaton(
        r#"{
            "states": { "p": "I", "r": "F" },
            "alphabet": ["a", "b"],
            "transitions": {
                "p": { "a": ["r"], "b": ["r"] },
                "r": { "a": ["r"], "b": ["r"] }
            }
        }"#,
    );

    assert!(is_isomorphic(&small.minimize(), &twin_finals().minimize()));
    assert!(!is_isomorphic(&small, &twin_finals()));
}

#[test]
fn test_minimize_single_state() {
    let dfa = automaton(
        r#"{
            "states": { "s": "IF" },
            "alphabet": ["a"],
            "transitions": { "s": { "a": ["s"] } }
        }"#,
    );

    let minimal = dfa.minimize();

    assert_eq!(minimal.state_count(), 1);
    assert!(minimal.accepts(&['a', 'a']));
    assert!(minimal.dead_state().is_none());
}

#[test]
fn test_loaded_sink_becomes_dead_state() {
    let dfa = automaton(
        r#"{
            "states": { "q0": "I", "q1": "F", "q3": "" },
            "alphabet": ["a", "b"],
            "transitions": {
                "q0": { "a": ["q1"], "b": ["q3"] },
                "q1": { "a": ["q1"], "b": ["q3"] },
                "q3": { "a": ["q3"], "b": ["q3"] }
            }
        }"#,
    );
    assert!(dfa.dead_state().is_none());

    let minimal = dfa.minimize();

    assert_eq!(minimal.state_count(), 3);
    let dead = minimal.dead_state().unwrap();
    assert_eq!(minimal.label(dead), &StateLabel::Dead);
    assert!(minimal.find_state(&StateLabel::named("q3")).is_none());

    let markers = DisplayMarkers {
        dead_state: "sink".to_string(),
        empty_word: "eps".to_string(),
    };
    let shown = minimal.render(&markers);
    assert!(shown.contains("with b => [sink]"));
    assert!(!shown.contains("q3"));

    let run = minimal.read(&['b', 'a']).run;
    assert_eq!(run.last_state(), &StateLabel::Dead);
    assert_eq!(run.trace(&markers)[1], "(sink, a) => (sink, eps)");
    assert_same_language(&dfa, &minimal, 5);
}
