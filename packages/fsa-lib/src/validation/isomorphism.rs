use std::collections::VecDeque;

use petgraph::graph::NodeIndex;

use crate::automaton::{Alphabet, FiniteAutomaton, Letter, state_map::StateMap};

/// Tries to match the states of two deterministic automata one to one, so
/// that initial states, final states and transitions correspond. Returns the
/// pairing as a map from the states of `a` to the states of `b`.
///
/// Labels are ignored. Both automata have to be deterministic and every state
/// has to be reachable for the pairing to cover them.
pub fn isomorphism<L: Letter>(
    a: &FiniteAutomaton<L>,
    b: &FiniteAutomaton<L>,
) -> Option<StateMap<NodeIndex>> {
    if a.alphabet() != b.alphabet()
        || a.state_count() != b.state_count()
        || !a.is_deterministic()
        || !b.is_deterministic()
    {
        return None;
    }

    let mut a_to_b = StateMap::new(a.state_count());
    let mut b_to_a = StateMap::new(b.state_count());
    let mut queue = VecDeque::new();

    let start = (a.initial_state()?, b.initial_state()?);
    a_to_b.insert(start.0, start.1);
    b_to_a.insert(start.1, start.0);
    queue.push_back(start);

    while let Some((x, y)) = queue.pop_front() {
        if a.is_final(x) != b.is_final(y) {
            return None;
        }

        for letter in a.alphabet() {
            let (next_x, next_y) = (a.successor(x, letter)?, b.successor(y, letter)?);

            match (a_to_b.get(next_x), b_to_a.get(next_y)) {
                (None, None) => {
                    a_to_b.insert(next_x, next_y);
                    b_to_a.insert(next_y, next_x);
                    queue.push_back((next_x, next_y));
                }
                (Some(&mapped_y), Some(&mapped_x)) if mapped_y == next_y && mapped_x == next_x => {}
                _ => return None,
            }
        }
    }

    (a_to_b.len() == a.state_count()).then_some(a_to_b)
}

pub fn is_isomorphic<L: Letter>(a: &FiniteAutomaton<L>, b: &FiniteAutomaton<L>) -> bool {
    isomorphism(a, b).is_some()
}

pub fn assert_isomorphic<L: Letter>(a: &FiniteAutomaton<L>, b: &FiniteAutomaton<L>) {
    if isomorphism(a, b).is_none() {
        panic!(
            "Automata are not isomorphic.\n`a` has {} states:\n{}\n`b` has {} states:\n{}",
            a.state_count(),
            a.render(&Default::default()),
            b.state_count(),
            b.render(&Default::default())
        );
    }
}
