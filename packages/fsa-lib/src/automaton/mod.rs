use std::{
    collections::VecDeque,
    fmt::{Debug, Display},
    hash::Hash,
};

use itertools::Itertools;
use petgraph::{
    Direction,
    graph::{DiGraph, NodeIndex},
    visit::EdgeRef,
};

use crate::automaton::{
    node::{StateLabel, StateNode},
    state_map::StateSet,
};

pub mod description;
pub mod determinization;
pub mod minimization;
pub mod node;
pub mod simulation;
pub mod state_map;

/// Input symbols of an automaton. Symbols are opaque tokens, they only need to
/// be comparable and printable.
pub trait Letter: Debug + Display + Clone + PartialEq + Eq + Hash + Ord {}

impl<T: Debug + Display + Clone + PartialEq + Eq + Hash + Ord> Letter for T {}

pub trait Alphabet {
    type Letter: Letter;

    fn alphabet(&self) -> &[Self::Letter];
}

/// The basic trait for anything that defines a language over a set alphabet.
pub trait Language: Alphabet {
    fn accepts<'a>(&self, input: impl IntoIterator<Item = &'a Self::Letter>) -> bool
    where
        Self::Letter: 'a;
}

/// Strings printed in place of the dead state and of an exhausted word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayMarkers {
    pub dead_state: String,
    pub empty_word: String,
}

impl Default for DisplayMarkers {
    fn default() -> Self {
        DisplayMarkers {
            dead_state: "∅".to_string(),
            empty_word: "λ".to_string(),
        }
    }
}

/// A finite automaton over the letters `L`.
///
/// States are the nodes of a petgraph graph, a transition `s --a--> t` is an
/// edge with weight `a`. The target set of `(s, a)` is the set of targets of
/// all `a` edges leaving `s`, so a missing edge denotes the empty set and the
/// relation is total over `states × alphabet` by construction. Descriptions
/// that omit an entry are rejected before an automaton is ever built.
///
/// The alphabet is kept sorted and duplicate free.
///
/// Values are never changed after construction. Determinization and
/// minimization return new automata.
#[derive(Debug, Clone)]
pub struct FiniteAutomaton<L: Letter> {
    graph: DiGraph<StateNode, L>,
    alphabet: Vec<L>,
}

impl<L: Letter> FiniteAutomaton<L> {
    pub(crate) fn new(alphabet: impl IntoIterator<Item = L>) -> Self {
        let mut alphabet = alphabet.into_iter().collect_vec();
        alphabet.sort();
        alphabet.dedup();

        FiniteAutomaton {
            graph: DiGraph::new(),
            alphabet,
        }
    }

    pub(crate) fn add_state(&mut self, node: StateNode) -> NodeIndex {
        self.graph.add_node(node)
    }

    /// Adds `from --letter--> to` unless that exact transition already exists.
    pub(crate) fn add_transition(&mut self, from: NodeIndex, to: NodeIndex, letter: L) {
        debug_assert!(
            self.has_symbol(&letter),
            "Letter {letter:?} is not part of the alphabet"
        );

        let exists = self
            .graph
            .edges_connecting(from, to)
            .any(|edge| *edge.weight() == letter);

        if !exists {
            self.graph.add_edge(from, to, letter);
        }
    }

    /// Returns a copy of self with every node replaced by `f(index, node)`.
    pub(crate) fn map_states<F>(&self, mut f: F) -> Self
    where
        F: FnMut(NodeIndex, &StateNode) -> StateNode,
    {
        FiniteAutomaton {
            graph: self
                .graph
                .map(|index, node| f(index, node), |_, letter| letter.clone()),
            alphabet: self.alphabet.clone(),
        }
    }

    pub fn state_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn transition_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn states(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    pub fn node(&self, state: NodeIndex) -> &StateNode {
        &self.graph[state]
    }

    pub fn label(&self, state: NodeIndex) -> &StateLabel {
        &self.graph[state].label
    }

    pub fn find_state(&self, label: &StateLabel) -> Option<NodeIndex> {
        self.graph
            .node_indices()
            .find(|&state| self.graph[state].label == *label)
    }

    pub fn is_initial(&self, state: NodeIndex) -> bool {
        self.graph[state].initial
    }

    pub fn is_final(&self, state: NodeIndex) -> bool {
        self.graph[state].accepting
    }

    pub fn initial_states(&self) -> Vec<NodeIndex> {
        self.states().filter(|&s| self.is_initial(s)).collect()
    }

    pub fn final_states(&self) -> Vec<NodeIndex> {
        self.states().filter(|&s| self.is_final(s)).collect()
    }

    /// Returns the initial state if there is exactly one.
    pub fn initial_state(&self) -> Option<NodeIndex> {
        self.initial_states().into_iter().exactly_one().ok()
    }

    pub fn dead_state(&self) -> Option<NodeIndex> {
        self.states().find(|&s| self.graph[s].dead)
    }

    pub fn has_symbol(&self, letter: &L) -> bool {
        self.alphabet.binary_search(letter).is_ok()
    }

    /// The target set of `(state, letter)`, sorted and duplicate free.
    pub fn targets(&self, state: NodeIndex, letter: &L) -> Vec<NodeIndex> {
        let mut targets = self
            .graph
            .edges_directed(state, Direction::Outgoing)
            .filter(|edge| edge.weight() == letter)
            .map(|edge| edge.target())
            .collect_vec();
        targets.sort();
        targets.dedup();
        targets
    }

    /// Returns some target of `(state, letter)`. For deterministic automata
    /// this is the unique successor.
    pub fn successor(&self, state: NodeIndex, letter: &L) -> Option<NodeIndex> {
        self.graph
            .edges_directed(state, Direction::Outgoing)
            .find(|edge| edge.weight() == letter)
            .map(|edge| edge.target())
    }

    /// An automaton is deterministic if it has exactly one initial state and
    /// every state has exactly one target for every letter.
    pub fn is_deterministic(&self) -> bool {
        if self.initial_states().len() != 1 {
            return false;
        }

        self.states().all(|state| {
            self.alphabet
                .iter()
                .all(|letter| self.targets(state, letter).len() == 1)
        })
    }

    /// States reachable from some initial state, in breadth first order.
    pub fn reachable_states(&self) -> Vec<NodeIndex> {
        let mut visited = StateSet::new(self.state_count());
        let mut queue = VecDeque::new();
        let mut order = vec![];

        for state in self.initial_states() {
            if visited.insert(state, ()) {
                queue.push_back(state);
            }
        }

        while let Some(state) = queue.pop_front() {
            order.push(state);

            for target in self.graph.neighbors_directed(state, Direction::Outgoing) {
                if visited.insert(target, ()) {
                    queue.push_back(target);
                }
            }
        }

        order
    }

    /// Renders the automaton as a list of its states, initial and final
    /// states, and the transitions of every state.
    pub fn render(&self, markers: &DisplayMarkers) -> String {
        let set = |states: Vec<NodeIndex>| {
            states
                .into_iter()
                .map(|s| self.label(s).display(markers).to_string())
                .join(", ")
        };

        let mut out = String::new();
        out.push_str(&format!(
            "    States => {{{}}}\n",
            set(self.states().collect())
        ));
        out.push_str(&format!(
            "    Initial states => {{{}}}\n",
            set(self.initial_states())
        ));
        out.push_str(&format!(
            "    Final states => {{{}}}\n",
            set(self.final_states())
        ));
        out.push_str("\n    Transitions map =>\n");

        for state in self.states() {
            out.push_str(&format!("        {} =>\n", self.label(state).display(markers)));
            for letter in &self.alphabet {
                out.push_str(&format!(
                    "            with {} => [{}]\n",
                    letter,
                    set(self.targets(state, letter))
                ));
            }
        }

        out
    }

    pub fn to_graphviz(&self) -> String {
        let mut dot = String::new();
        dot.push_str("digraph finite_state_machine {\n");
        dot.push_str("fontname=\"Helvetica,Arial,sans-serif\"\n");
        dot.push_str("node [fontname=\"Helvetica,Arial,sans-serif\"]\n");
        dot.push_str("edge [fontname=\"Helvetica,Arial,sans-serif\"]\n");
        dot.push_str("rankdir=LR;\n");
        dot.push_str("node [shape=point,label=\"\"]START\n");

        dot.push_str(&format!(
            "node [shape = doublecircle]; {};\n",
            self.final_states().iter().map(|s| s.index()).join(" ")
        ));
        dot.push_str("node [shape = circle];\n");

        for state in self.states() {
            dot.push_str(&format!(
                "{} [ label = \"{}\" ];\n",
                state.index(),
                escape_dot(&self.label(state).to_string())
            ));
        }

        for state in self.initial_states() {
            dot.push_str(&format!("START -> {};\n", state.index()));
        }

        for edge in self.graph.edge_references() {
            dot.push_str(&format!(
                "{} -> {} [ label = \"{}\" ];\n",
                edge.source().index(),
                edge.target().index(),
                escape_dot(&edge.weight().to_string())
            ));
        }

        dot.push_str("}\n");

        dot
    }
}

fn escape_dot(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

impl<L: Letter> Alphabet for FiniteAutomaton<L> {
    type Letter = L;

    fn alphabet(&self) -> &[L] {
        self.alphabet.as_slice()
    }
}

/// Runs the subset simulation directly, so this also works for automata that
/// are not deterministic. Letters outside the alphabet reject the word.
impl<L: Letter> Language for FiniteAutomaton<L> {
    fn accepts<'a>(&self, input: impl IntoIterator<Item = &'a L>) -> bool
    where
        L: 'a,
    {
        let mut current_states = self.initial_states();

        for symbol in input {
            if !self.has_symbol(symbol) {
                return false;
            }

            let mut next_states = current_states
                .iter()
                .flat_map(|&state| self.targets(state, symbol))
                .collect_vec();

            if next_states.is_empty() {
                return false;
            }

            next_states.sort();
            next_states.dedup();
            current_states = next_states;
        }

        current_states.iter().any(|&state| self.is_final(state))
    }
}
