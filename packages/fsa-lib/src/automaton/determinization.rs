use std::collections::VecDeque;

use hashbrown::HashMap;
use itertools::Itertools;
use petgraph::graph::NodeIndex;

use crate::automaton::{
    FiniteAutomaton, Letter,
    node::{StateLabel, StateNode},
};

/// State of one subset construction run.
///
/// Sets of source states are kept as sorted, duplicate free vectors so that
/// equal sets are equal keys regardless of the order they were found in.
struct SubsetConstruction<'a, L: Letter> {
    source: &'a FiniteAutomaton<L>,
    dfa: FiniteAutomaton<L>,
    state_map: HashMap<Vec<NodeIndex>, NodeIndex>,
    queue: VecDeque<Vec<NodeIndex>>,
    dead: Option<NodeIndex>,
}

impl<'a, L: Letter> SubsetConstruction<'a, L> {
    fn new(source: &'a FiniteAutomaton<L>) -> Self {
        SubsetConstruction {
            source,
            dfa: FiniteAutomaton::new(source.alphabet.iter().cloned()),
            state_map: HashMap::new(),
            queue: VecDeque::new(),
            dead: None,
        }
    }

    /// Returns the sink for the empty set, creating it on first use.
    fn dead_state(&mut self) -> NodeIndex {
        if let Some(dead) = self.dead {
            return dead;
        }

        let dead = self.dfa.add_state(StateNode::dead());
        for letter in self.source.alphabet.iter() {
            self.dfa.add_transition(dead, dead, letter.clone());
        }

        tracing::debug!("Created the dead state");
        self.dead = Some(dead);
        dead
    }

    /// Returns the DFA state for a set of source states, queueing it if it has
    /// not been seen before.
    fn state_for(&mut self, set: Vec<NodeIndex>, initial: bool) -> NodeIndex {
        if set.is_empty() {
            let dead = self.dead_state();
            if initial {
                self.dfa.graph[dead].initial = true;
            }
            return dead;
        }

        if let Some(&state) = self.state_map.get(&set) {
            return state;
        }

        let label = StateLabel::subset(set.iter().map(|&s| self.source.label(s).clone()));
        let accepting = set.iter().any(|&s| self.source.is_final(s));

        tracing::debug!("Discovered composite state {}", label);

        let state = self.dfa.add_state(StateNode::new(label, initial, accepting));
        self.state_map.insert(set.clone(), state);
        self.queue.push_back(set);
        state
    }

    /// Union of the targets of every state in `set` reading `letter`.
    ///
    /// Sinks left over from an earlier determinization contribute nothing, so
    /// they fold into the dead state of this run.
    fn step(&self, set: &[NodeIndex], letter: &L) -> Vec<NodeIndex> {
        set.iter()
            .flat_map(|&state| self.source.targets(state, letter))
            .filter(|&target| !self.source.node(target).dead)
            .sorted()
            .dedup()
            .collect()
    }

    fn run(mut self) -> FiniteAutomaton<L> {
        let source = self.source;

        let start_set = source
            .initial_states()
            .into_iter()
            .filter(|&state| !source.node(state).dead)
            .collect_vec();
        self.state_for(start_set, true);

        while let Some(set) = self.queue.pop_front() {
            let from = self.state_map[&set];

            for letter in source.alphabet.iter() {
                let target_set = self.step(&set, letter);
                let to = self.state_for(target_set, false);
                self.dfa.add_transition(from, to, letter.clone());
            }
        }

        self.dfa
    }
}

impl<L: Letter> FiniteAutomaton<L> {
    /// Converts self into an equivalent deterministic automaton by breadth
    /// first subset construction.
    ///
    /// Only subsets reachable from the set of initial states are built. The
    /// states of the result are labelled with [`StateLabel::Subset`], the
    /// empty subset becomes a single non-final [`StateLabel::Dead`] sink.
    pub fn determinize(&self) -> FiniteAutomaton<L> {
        let span = tracing::span!(tracing::Level::DEBUG, "FiniteAutomaton::determinize");
        let _enter = span.enter();

        let dfa = SubsetConstruction::new(self).run();

        tracing::info!(
            "Determinized automaton with {} states into {} states",
            self.state_count(),
            dfa.state_count()
        );

        dfa
    }

    /// Replaces every label except the dead state's with a short
    /// [`StateLabel::Fresh`] label, numbered in state order. Tags and
    /// transitions are kept as they are.
    pub fn simplify_labels(&self) -> FiniteAutomaton<L> {
        let mut next = 0;

        self.map_states(|_, node| {
            if node.dead {
                return node.clone();
            }

            let label = StateLabel::Fresh(next);
            next += 1;
            node.relabel(label)
        })
    }
}
