//! Raw automaton descriptions and the checks that turn them into
//! [`FiniteAutomaton`] values.
//!
//! A description is a map of states to their tags, an alphabet and a
//! transitions table. In JSON:
//!
//! ```json
//! {
//!     "states": { "q0": ["I"], "q1": ["F"] },
//!     "alphabet": ["a"],
//!     "transitions": {
//!         "q0": { "a": ["q1"] },
//!         "q1": { "a": [] }
//!     }
//! }
//! ```
//!
//! Tags may also be given as a single string such as `"I"` or `"IF"`.

use std::{collections::BTreeMap, fmt::Display};

use hashbrown::HashMap;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{
    automaton::{FiniteAutomaton, Letter, node::StateLabel, node::StateNode},
    error::{AutomatonError, StateReference},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateTag {
    Initial,
    Final,
}

impl StateTag {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "I" => Some(StateTag::Initial),
            "F" => Some(StateTag::Final),
            _ => None,
        }
    }
}

impl Display for StateTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StateTag::Initial => write!(f, "initial (I)"),
            StateTag::Final => write!(f, "final (F)"),
        }
    }
}

/// The tags of one declared state, either a list (`["I", "F"]`) or a single
/// string whose characters are tags (`"IF"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StateTags {
    Value(String),
    Set(Vec<String>),
}

impl StateTags {
    pub fn set(tags: &[StateTag]) -> Self {
        StateTags::Set(
            tags.iter()
                .map(|tag| match tag {
                    StateTag::Initial => "I".to_string(),
                    StateTag::Final => "F".to_string(),
                })
                .collect(),
        )
    }

    /// Returns `(initial, final)`.
    pub fn flags(&self, state: &str) -> Result<(bool, bool), AutomatonError> {
        let tags: Vec<String> = match self {
            StateTags::Value(value) => value.chars().map(String::from).collect(),
            StateTags::Set(set) => set.clone(),
        };

        let mut initial = false;
        let mut accepting = false;

        for tag in tags {
            match StateTag::from_tag(&tag) {
                Some(StateTag::Initial) => initial = true,
                Some(StateTag::Final) => accepting = true,
                None => {
                    return Err(AutomatonError::MalformedInput(format!(
                        "state {state:?} has the unknown tag {tag:?}, only \"I\" and \"F\" are allowed"
                    )));
                }
            }
        }

        Ok((initial, accepting))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutomatonDescription<L: Letter> {
    pub states: BTreeMap<String, StateTags>,
    pub alphabet: Vec<L>,
    pub transitions: BTreeMap<String, BTreeMap<L, Vec<String>>>,
}

impl<L: Letter + DeserializeOwned> AutomatonDescription<L> {
    pub fn from_json(json: &str) -> Result<Self, AutomatonError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let path = std::path::Path::new(path);
        match path.extension() {
            Some(ext) if ext == "json" => {
                let json_str = std::fs::read_to_string(path)?;
                Ok(Self::from_json(&json_str)?)
            }
            _ => Err(anyhow::anyhow!(
                "Unsupported file extension for {}, expected a .json file",
                path.display()
            )),
        }
    }
}

impl<L: Letter + Serialize> AutomatonDescription<L> {
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl<L: Letter> AutomatonDescription<L> {
    /// Checks the description and builds the automaton it describes. Checks
    /// run in a fixed order and stop at the first violation.
    pub fn validate(&self) -> Result<FiniteAutomaton<L>, AutomatonError> {
        let flags = self.check_states()?;
        self.check_transitions()?;

        let mut automaton = FiniteAutomaton::new(self.alphabet.iter().cloned());
        let mut state_map = HashMap::new();

        for (name, (initial, accepting)) in &flags {
            let state = automaton.add_state(StateNode::new(
                StateLabel::named(name.as_str()),
                *initial,
                *accepting,
            ));
            state_map.insert(name.as_str(), state);
        }

        for (from, row) in &self.transitions {
            for (symbol, targets) in row {
                for to in targets {
                    automaton.add_transition(
                        state_map[from.as_str()],
                        state_map[to.as_str()],
                        symbol.clone(),
                    );
                }
            }
        }

        tracing::debug!(
            "Validated automaton with {} states, {} symbols and {} transitions",
            automaton.state_count(),
            self.alphabet.len(),
            automaton.transition_count()
        );

        Ok(automaton)
    }

    fn check_states(&self) -> Result<BTreeMap<&String, (bool, bool)>, AutomatonError> {
        let mut flags = BTreeMap::new();
        for (state, tags) in &self.states {
            flags.insert(state, tags.flags(state)?);
        }

        if !flags.values().any(|(initial, _)| *initial) {
            return Err(AutomatonError::MissingInitialOrFinal(StateTag::Initial));
        }

        if !flags.values().any(|(_, accepting)| *accepting) {
            return Err(AutomatonError::MissingInitialOrFinal(StateTag::Final));
        }

        Ok(flags)
    }

    fn check_transitions(&self) -> Result<(), AutomatonError> {
        for state in self.states.keys() {
            if !self.transitions.contains_key(state) {
                return Err(AutomatonError::MissingTransition {
                    state: state.clone(),
                });
            }
        }

        for (state, row) in &self.transitions {
            if !self.states.contains_key(state) {
                return Err(AutomatonError::UnknownState {
                    state: state.clone(),
                    reference: StateReference::TransitionSource,
                });
            }

            for symbol in &self.alphabet {
                if !row.contains_key(symbol) {
                    return Err(AutomatonError::IncompleteTransition {
                        state: state.clone(),
                        symbol: symbol.to_string(),
                    });
                }
            }

            for (symbol, targets) in row {
                if !self.alphabet.contains(symbol) {
                    return Err(AutomatonError::UnknownSymbol {
                        state: state.clone(),
                        symbol: symbol.to_string(),
                    });
                }

                for target in targets {
                    if !self.states.contains_key(target) {
                        return Err(AutomatonError::UnknownState {
                            state: target.clone(),
                            reference: StateReference::TransitionTarget {
                                from: state.clone(),
                                symbol: symbol.to_string(),
                            },
                        });
                    }
                }
            }
        }

        Ok(())
    }
}

impl<L: Letter> TryFrom<&AutomatonDescription<L>> for FiniteAutomaton<L> {
    type Error = AutomatonError;

    fn try_from(value: &AutomatonDescription<L>) -> Result<Self, Self::Error> {
        value.validate()
    }
}

#[test]
fn test_single_value_tags() {
    assert_eq!(StateTags::Value("IF".into()).flags("q0"), Ok((true, true)));
    assert_eq!(StateTags::Value("F".into()).flags("q0"), Ok((false, true)));
    assert_eq!(StateTags::Set(vec![]).flags("q0"), Ok((false, false)));
    assert!(matches!(
        StateTags::Value("IX".into()).flags("q0"),
        Err(AutomatonError::MalformedInput(_))
    ));
}
