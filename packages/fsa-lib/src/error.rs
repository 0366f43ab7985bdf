use std::fmt::Display;

use thiserror::Error;

use crate::automaton::description::StateTag;

/// Where an undeclared state name was found in a description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateReference {
    /// The state is a key of the transitions table.
    TransitionSource,
    /// The state is a destination of `from` reading `symbol`.
    TransitionTarget { from: String, symbol: String },
}

impl Display for StateReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StateReference::TransitionSource => write!(f, "in the transitions table"),
            StateReference::TransitionTarget { from, symbol } => {
                write!(f, "reached from {from:?} with {symbol}")
            }
        }
    }
}

/// Errors raised while turning a description into an automaton. None of them
/// leave a partially built automaton behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AutomatonError {
    #[error("malformed automaton description: {0}")]
    MalformedInput(String),
    #[error("no state in the states map is tagged {0}")]
    MissingInitialOrFinal(StateTag),
    #[error("state {state:?} is not defined in the transitions table")]
    MissingTransition { state: String },
    #[error(
        "symbol {symbol} behaviour is not defined in state {state:?}, each symbol has to be defined even if its value is an empty list"
    )]
    IncompleteTransition { state: String, symbol: String },
    #[error("state {state:?} {reference} is not defined in the states map")]
    UnknownState {
        state: String,
        reference: StateReference,
    },
    #[error("symbol {symbol} in the transitions of state {state:?} is not in the alphabet")]
    UnknownSymbol { state: String, symbol: String },
}

impl From<serde_json::Error> for AutomatonError {
    fn from(value: serde_json::Error) -> Self {
        AutomatonError::MalformedInput(value.to_string())
    }
}
