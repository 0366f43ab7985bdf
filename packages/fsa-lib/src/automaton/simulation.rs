use std::fmt::Display;

use itertools::Itertools;

use crate::automaton::{DisplayMarkers, FiniteAutomaton, Letter, node::StateLabel};

/// One move of a run: reading the letter at `position` took the automaton
/// from `from` to `to`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step<L: Letter> {
    pub from: StateLabel,
    pub symbol: L,
    pub to: StateLabel,
    pub position: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome<L: Letter> {
    Accepted,
    Rejected,
    /// The letter at `position` is not part of the alphabet. The run stopped
    /// there and the word is rejected.
    UnrecognizedSymbol { symbol: L, position: usize },
}

impl<L: Letter> Display for RunOutcome<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunOutcome::Accepted => write!(f, "WORD ACCEPTED"),
            RunOutcome::Rejected => write!(f, "WORD NOT ACCEPTED"),
            RunOutcome::UnrecognizedSymbol { symbol, .. } => {
                write!(f, "SYMBOL {symbol} NOT RECOGNIZED => WORD NOT ACCEPTED")
            }
        }
    }
}

/// The result of reading a word with a deterministic automaton.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run<L: Letter> {
    word: Vec<L>,
    start: StateLabel,
    steps: Vec<Step<L>>,
    outcome: RunOutcome<L>,
    determinized_first: bool,
}

impl<L: Letter> Run<L> {
    pub fn word(&self) -> &[L] {
        &self.word
    }

    pub fn start(&self) -> &StateLabel {
        &self.start
    }

    pub fn steps(&self) -> &[Step<L>] {
        &self.steps
    }

    pub fn outcome(&self) -> &RunOutcome<L> {
        &self.outcome
    }

    pub fn is_accepted(&self) -> bool {
        self.outcome == RunOutcome::Accepted
    }

    /// The state the run ended in.
    pub fn last_state(&self) -> &StateLabel {
        self.steps.last().map(|step| &step.to).unwrap_or(&self.start)
    }

    /// Whether the automaton had to be determinized before this run.
    pub fn determinized_first(&self) -> bool {
        self.determinized_first
    }

    pub(crate) fn mark_determinized_first(&mut self) {
        self.determinized_first = true;
    }

    fn rest(&self, position: usize, markers: &DisplayMarkers) -> String {
        if position >= self.word.len() {
            markers.empty_word.clone()
        } else {
            self.word[position..].iter().join("")
        }
    }

    /// One line per step in the form `(state, rest) => (state, rest)`.
    pub fn trace(&self, markers: &DisplayMarkers) -> Vec<String> {
        self.steps
            .iter()
            .map(|step| {
                format!(
                    "({}, {}) => ({}, {})",
                    step.from.display(markers),
                    self.rest(step.position, markers),
                    step.to.display(markers),
                    self.rest(step.position + 1, markers)
                )
            })
            .collect()
    }
}

/// A run together with the automaton that had to be built for it.
#[derive(Debug, Clone)]
pub struct Read<L: Letter> {
    pub run: Run<L>,
    /// Set when self was not deterministic. The run was made on this
    /// automaton, callers keeping a current automaton should switch to it.
    pub determinized: Option<FiniteAutomaton<L>>,
}

impl<L: Letter> FiniteAutomaton<L> {
    /// Reads `word`, determinizing first if self is not deterministic.
    pub fn read(&self, word: &[L]) -> Read<L> {
        if self.is_deterministic() {
            return Read {
                run: self.walk(word),
                determinized: None,
            };
        }

        let dfa = self.determinize();
        let mut run = dfa.walk(word);
        run.mark_determinized_first();

        Read {
            run,
            determinized: Some(dfa),
        }
    }

    /// Follows `word` letter by letter from the initial state. Self must be
    /// deterministic.
    fn walk(&self, word: &[L]) -> Run<L> {
        let span = tracing::span!(tracing::Level::DEBUG, "FiniteAutomaton::walk");
        let _enter = span.enter();

        let mut current = self.initial_state();
        let mut run = Run {
            word: word.to_vec(),
            start: current
                .map(|state| self.label(state).clone())
                .unwrap_or(StateLabel::Dead),
            steps: vec![],
            outcome: RunOutcome::Rejected,
            determinized_first: false,
        };

        for (position, symbol) in word.iter().enumerate() {
            if !self.has_symbol(symbol) {
                tracing::debug!("Symbol {} at {} is not in the alphabet", symbol, position);
                run.outcome = RunOutcome::UnrecognizedSymbol {
                    symbol: symbol.clone(),
                    position,
                };
                return run;
            }

            let Some(from) = current else {
                return run;
            };

            current = self.successor(from, symbol);

            if let Some(to) = current {
                tracing::debug!(
                    "({}, {}) => {}",
                    self.label(from),
                    symbol,
                    self.label(to)
                );

                run.steps.push(Step {
                    from: self.label(from).clone(),
                    symbol: symbol.clone(),
                    to: self.label(to).clone(),
                    position,
                });
            }
        }

        if current.is_some_and(|state| self.is_final(state)) {
            run.outcome = RunOutcome::Accepted;
        }

        run
    }
}
