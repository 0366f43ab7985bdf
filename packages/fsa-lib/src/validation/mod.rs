//! Helpers for checking automata against each other, used by the tests.

pub mod isomorphism;
pub mod same_language;
