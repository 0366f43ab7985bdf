use hashbrown::{HashMap, hash_map::Entry};
use itertools::Itertools;
use petgraph::graph::NodeIndex;

use crate::automaton::{FiniteAutomaton, Letter, node::StateLabel, state_map::StateMap};

/// A partition of (a subset of) the states of a deterministic automaton into
/// disjoint blocks.
///
/// Blocks list their states in ascending order and the first state of a block
/// is its representative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    blocks: Vec<Vec<NodeIndex>>,
    block_of: StateMap<usize>,
}

impl Partition {
    fn from_blocks(blocks: Vec<Vec<NodeIndex>>, state_count: usize) -> Self {
        let mut block_of = StateMap::new(state_count);
        for (index, block) in blocks.iter().enumerate() {
            for &state in block {
                block_of.insert(state, index);
            }
        }

        Partition { blocks, block_of }
    }

    /// Splits `states` into final and non-final states, dropping an empty
    /// block.
    pub fn initial<L: Letter>(automaton: &FiniteAutomaton<L>, states: &[NodeIndex]) -> Self {
        let (accepting, rejecting): (Vec<_>, Vec<_>) = states
            .iter()
            .copied()
            .sorted()
            .partition(|&state| automaton.is_final(state));

        let blocks = [accepting, rejecting]
            .into_iter()
            .filter(|block| !block.is_empty())
            .collect();

        Partition::from_blocks(blocks, automaton.state_count())
    }

    pub fn blocks(&self) -> &[Vec<NodeIndex>] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn block_of(&self, state: NodeIndex) -> Option<usize> {
        self.block_of.get(state).copied()
    }

    /// The blocks of the successors of `state`, one entry per letter.
    fn signature<L: Letter>(
        &self,
        automaton: &FiniteAutomaton<L>,
        state: NodeIndex,
    ) -> Vec<Option<usize>> {
        automaton
            .alphabet
            .iter()
            .map(|letter| {
                automaton
                    .successor(state, letter)
                    .and_then(|target| self.block_of(target))
            })
            .collect()
    }

    /// Splits every block so that two states stay together only if their
    /// successors lie in the same block of self for every letter.
    pub fn refine<L: Letter>(&self, automaton: &FiniteAutomaton<L>) -> Partition {
        let mut blocks = vec![];

        for block in &self.blocks {
            let mut groups: Vec<Vec<NodeIndex>> = vec![];
            let mut by_signature: HashMap<Vec<Option<usize>>, usize> = HashMap::new();

            for &state in block {
                match by_signature.entry(self.signature(automaton, state)) {
                    Entry::Occupied(entry) => groups[*entry.get()].push(state),
                    Entry::Vacant(entry) => {
                        entry.insert(groups.len());
                        groups.push(vec![state]);
                    }
                }
            }

            blocks.extend(groups);
        }

        Partition::from_blocks(blocks, automaton.state_count())
    }
}

pub trait Minimizable {
    fn minimize(&self) -> Self;
}

impl<L: Letter> FiniteAutomaton<L> {
    /// Refines the final/non-final split of the reachable states until it no
    /// longer changes. The result groups exactly the states that no word can
    /// tell apart.
    ///
    /// Self must be deterministic.
    pub fn equivalence_classes(&self) -> Partition {
        let reachable = self.reachable_states();
        let mut partition = Partition::initial(self, &reachable);
        let mut round = 0;

        loop {
            let refined = partition.refine(self);
            round += 1;

            tracing::debug!(
                "Refinement round {}: {} blocks -> {} blocks",
                round,
                partition.len(),
                refined.len()
            );

            // Refining only ever splits blocks, so an equal block count means
            // an equal partition.
            if refined.len() == partition.len() {
                return refined;
            }

            partition = refined;
        }
    }

    /// Builds the quotient automaton with one state per block. Transitions
    /// are taken from each block's representative.
    fn collapse(&self, partition: &Partition) -> FiniteAutomaton<L> {
        let mut minimal = FiniteAutomaton::new(self.alphabet.iter().cloned());

        let states = partition
            .blocks()
            .iter()
            .map(|block| {
                let representative = block[0];
                let initial = block.iter().any(|&state| self.is_initial(state));
                let node = self.node(representative).clone().with_initial(initial);
                minimal.add_state(node)
            })
            .collect_vec();

        for (block, &from) in partition.blocks().iter().zip(&states) {
            let representative = block[0];

            for letter in self.alphabet.iter() {
                let target = self
                    .successor(representative, letter)
                    .and_then(|target| partition.block_of(target));

                if let Some(target) = target {
                    minimal.add_transition(from, states[target], letter.clone());
                }
            }
        }

        // a surviving non-final state that only loops on itself is the dead state
        for &state in &states {
            let sink = !minimal.is_final(state)
                && minimal
                    .alphabet
                    .iter()
                    .all(|letter| minimal.successor(state, letter) == Some(state));

            if sink && !minimal.node(state).dead {
                let node = minimal
                    .node(state)
                    .relabel(StateLabel::Dead)
                    .with_dead(true);
                minimal.graph[state] = node;
            }
        }

        minimal
    }
}

impl<L: Letter> Minimizable for FiniteAutomaton<L> {
    /// Returns the minimal automaton accepting the same language.
    ///
    /// Non-deterministic automata are determinized first. States that cannot
    /// be reached from the initial state are dropped, the remaining ones are
    /// merged along [`FiniteAutomaton::equivalence_classes`].
    fn minimize(&self) -> Self {
        if !self.is_deterministic() {
            tracing::info!("Automaton is non-deterministic, determinizing before minimization");
            return self.determinize().minimize();
        }

        let span = tracing::span!(tracing::Level::DEBUG, "FiniteAutomaton::minimize");
        let _enter = span.enter();

        let partition = self.equivalence_classes();
        let minimal = self.collapse(&partition);

        tracing::info!(
            "Minimized automaton with {} states into {} states",
            self.state_count(),
            minimal.state_count()
        );

        minimal
    }
}
