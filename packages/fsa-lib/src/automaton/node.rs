use std::{collections::BTreeSet, fmt::Display};

use itertools::Itertools;

use crate::automaton::DisplayMarkers;

/// Identifies a state of a [`FiniteAutomaton`](crate::automaton::FiniteAutomaton).
///
/// States loaded from a description are [`StateLabel::Named`]. Subset
/// construction produces [`StateLabel::Subset`] labels, which compare and hash
/// by the set of original labels they contain, and the sink for the empty
/// subset is [`StateLabel::Dead`]. Renaming after determinization produces
/// [`StateLabel::Fresh`] labels. Since every kind is its own variant, a loaded
/// name can never collide with a generated one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StateLabel {
    Named(String),
    Subset(BTreeSet<StateLabel>),
    Fresh(usize),
    Dead,
}

impl StateLabel {
    pub fn named(name: impl Into<String>) -> Self {
        StateLabel::Named(name.into())
    }

    pub fn subset(labels: impl IntoIterator<Item = StateLabel>) -> Self {
        StateLabel::Subset(labels.into_iter().collect())
    }

    pub fn is_dead(&self) -> bool {
        matches!(self, StateLabel::Dead)
    }

    /// Formats the label, printing the dead state with the given markers.
    pub fn display<'a>(&'a self, markers: &'a DisplayMarkers) -> LabelDisplay<'a> {
        LabelDisplay {
            label: self,
            markers,
        }
    }
}

impl Display for StateLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display(&DisplayMarkers::default()))
    }
}

pub struct LabelDisplay<'a> {
    label: &'a StateLabel,
    markers: &'a DisplayMarkers,
}

impl Display for LabelDisplay<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.label {
            StateLabel::Named(name) => write!(f, "{name}"),
            StateLabel::Subset(labels) => write!(
                f,
                "{{{}}}",
                labels.iter().map(|l| l.display(self.markers)).join(", ")
            ),
            StateLabel::Fresh(n) => write!(f, "q{n}"),
            StateLabel::Dead => write!(f, "{}", self.markers.dead_state),
        }
    }
}

/// A state of an automaton together with its tags.
///
/// Invariant: A node cannot be both accepting and dead.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StateNode {
    pub label: StateLabel,
    pub initial: bool,
    pub accepting: bool,
    /// Set on the sink created for the empty subset, and on sinks that survive
    /// minimization. Loaded states are never marked, even if they behave like
    /// a sink.
    pub dead: bool,
}

impl StateNode {
    pub fn new(label: StateLabel, initial: bool, accepting: bool) -> Self {
        StateNode {
            label,
            initial,
            accepting,
            dead: false,
        }
    }

    pub fn dead() -> Self {
        StateNode {
            label: StateLabel::Dead,
            initial: false,
            accepting: false,
            dead: true,
        }
    }

    pub fn with_dead(mut self, dead: bool) -> Self {
        assert!(
            !(dead && self.accepting),
            "A node cannot be both accepting and dead"
        );
        self.dead = dead;
        self
    }

    pub fn with_initial(mut self, initial: bool) -> Self {
        self.initial = initial;
        self
    }

    pub fn relabel(&self, label: StateLabel) -> Self {
        StateNode {
            label,
            ..self.clone()
        }
    }
}

#[test]
fn test_subset_labels_ignore_order() {
    let a = StateLabel::subset([StateLabel::named("q1"), StateLabel::named("q0")]);
    let b = StateLabel::subset([StateLabel::named("q0"), StateLabel::named("q1")]);
    assert_eq!(a, b);
    assert_eq!(a.to_string(), "{q0, q1}");
}

#[test]
fn test_dead_label_never_equals_named() {
    let markers = DisplayMarkers::default();
    let named = StateLabel::named(markers.dead_state.clone());
    assert_ne!(named, StateLabel::Dead);
    assert_eq!(named.to_string(), StateLabel::Dead.to_string());
}
