use std::collections::BTreeMap;

use fsa_lib::{
    automaton::{
        FiniteAutomaton,
        description::{AutomatonDescription, StateTag, StateTags},
        minimization::Minimizable,
    },
    validation::{
        isomorphism::assert_isomorphic,
        same_language::{assert_same_language, same_language},
    },
};
use rand::{RngExt, SeedableRng, rngs::StdRng};

const ALPHABET: [char; 3] = ['a', 'b', 'c'];

/// Generates a random description with `state_count` states. State `s0` is
/// always initial and the last state always final, every other tag and every
/// transition is chosen at random.
fn random_description(rng: &mut StdRng, state_count: usize) -> AutomatonDescription<char> {
    let name = |i: usize| format!("s{i}");
    let mut states = BTreeMap::new();
    let mut transitions = BTreeMap::new();

    for i in 0..state_count {
        let mut tags = vec![];
        if i == 0 || rng.random_range(0..4) == 0 {
            tags.push(StateTag::Initial);
        }
        if i == state_count - 1 || rng.random_range(0..3) == 0 {
            tags.push(StateTag::Final);
        }
        states.insert(name(i), StateTags::set(&tags));

        let mut row = BTreeMap::new();
        for letter in ALPHABET {
            let target_count = rng.random_range(0..3);
            let targets: Vec<String> = (0..target_count)
                .map(|_| name(rng.random_range(0..state_count)))
                .collect();
            row.insert(letter, targets);
        }
        transitions.insert(name(i), row);
    }

    AutomatonDescription {
        states,
        alphabet: ALPHABET.to_vec(),
        transitions,
    }
}

fn random_automata(seed: u64, count: usize) -> Vec<FiniteAutomaton<char>> {
    let mut rng = StdRng::seed_from_u64(seed);

    (0..count)
        .map(|_| {
            let state_count = rng.random_range(1..7);
            random_description(&mut rng, state_count)
                .validate()
                .unwrap()
        })
        .collect()
}

#[test]
fn test_random_determinization() {
    for nfa in random_automata(1, 40) {
        let dfa = nfa.determinize();

        assert!(dfa.is_deterministic());
        assert!(dfa.dead_state().is_none_or(|dead| !dfa.is_final(dead)));
        assert_same_language(&nfa, &dfa, 5);
    }
}

#[test]
fn test_random_minimization() {
    for nfa in random_automata(2, 40) {
        let dfa = nfa.determinize();
        let minimal = nfa.minimize();

        assert!(minimal.is_deterministic());
        assert!(minimal.state_count() <= dfa.state_count());
        assert_same_language(&nfa, &minimal, 5);

        // a minimal automaton has no equivalent states left
        assert_eq!(minimal.equivalence_classes().len(), minimal.state_count());
        assert_isomorphic(&minimal, &minimal.minimize());
    }
}

/// The same description with states renamed in reverse order, so the states
/// are created in a different order.
fn reversed(description: &AutomatonDescription<char>) -> AutomatonDescription<char> {
    let count = description.states.len();
    let rename = |name: &String| {
        let i: usize = name[1..].parse().unwrap();
        format!("t{}", count - 1 - i)
    };

    AutomatonDescription {
        states: description
            .states
            .iter()
            .map(|(name, tags)| (rename(name), tags.clone()))
            .collect(),
        alphabet: description.alphabet.clone(),
        transitions: description
            .transitions
            .iter()
            .map(|(name, row)| {
                let row: BTreeMap<char, Vec<String>> = row
                    .iter()
                    .map(|(letter, targets)| (*letter, targets.iter().map(rename).collect()))
                    .collect();
                (rename(name), row)
            })
            .collect(),
    }
}

#[test]
fn test_random_canonical_minimal_automata() {
    let mut rng = StdRng::seed_from_u64(3);

    for _ in 0..30 {
        let state_count = rng.random_range(1..7);
        let description = random_description(&mut rng, state_count);

        let a = description.validate().unwrap();
        let b = reversed(&description).validate().unwrap();

        assert!(same_language(&a, &b, 5));
        assert_isomorphic(&a.minimize(), &b.minimize());
    }
}
