use crate::{
    automaton::{
        DisplayMarkers, FiniteAutomaton, Letter,
        description::AutomatonDescription,
        minimization::Minimizable,
        simulation::Run,
    },
    config::SessionConfig,
    error::AutomatonError,
    logger::Logger,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Determinized {
    AlreadyDeterministic,
    Replaced { states: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinimizeReport {
    /// The automaton was not deterministic and got determinized first.
    pub determinized_first: bool,
    pub states_before: usize,
    pub states_after: usize,
}

/// Holds the current automaton of an interactive session.
///
/// Every transforming command replaces the current automaton with its result.
/// Reading a word with a non-deterministic automaton determinizes it, and the
/// determinized automaton stays current afterwards.
pub struct Session<'l, L: Letter> {
    current: FiniteAutomaton<L>,
    config: SessionConfig,
    logger: Option<&'l Logger>,
}

impl<'l, L: Letter> Session<'l, L> {
    pub fn new(
        automaton: FiniteAutomaton<L>,
        config: SessionConfig,
        logger: Option<&'l Logger>,
    ) -> Self {
        Session {
            current: automaton,
            config,
            logger,
        }
    }

    pub fn from_description(
        description: &AutomatonDescription<L>,
        config: SessionConfig,
        logger: Option<&'l Logger>,
    ) -> Result<Self, AutomatonError> {
        let automaton = description.validate()?;

        if let Some(l) = logger {
            l.info(&format!(
                "Loaded automaton with {} states over {} symbols",
                automaton.state_count(),
                description.alphabet.len()
            ));
        }

        Ok(Session::new(automaton, config, logger))
    }

    pub fn current(&self) -> &FiniteAutomaton<L> {
        &self.current
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn markers(&self) -> DisplayMarkers {
        self.config.markers()
    }

    pub fn is_deterministic(&self) -> bool {
        self.current.is_deterministic()
    }

    pub fn determinize(&mut self) -> Determinized {
        if self.current.is_deterministic() {
            if let Some(l) = self.logger {
                l.info("This automaton is already determinized");
            }
            return Determinized::AlreadyDeterministic;
        }

        if let Some(l) = self.logger {
            l.info("Determinizing automaton...");
        }

        let mut dfa = self.current.determinize();
        if *self.config.get_simplify_labels() {
            dfa = dfa.simplify_labels();
        }

        let states = dfa.state_count();
        self.current = dfa;

        if let Some(l) = self.logger {
            l.info(&format!("Automaton determinized into {} states", states));
        }

        Determinized::Replaced { states }
    }

    pub fn minimize(&mut self) -> MinimizeReport {
        let states_before = self.current.state_count();
        let determinized_first = !self.current.is_deterministic();

        if determinized_first {
            if let Some(l) = self.logger {
                l.warn("This automaton is non-deterministic");
            }
            self.determinize();
        }

        self.current = self.current.minimize();
        let states_after = self.current.state_count();

        if let Some(l) = self.logger {
            l.info(&format!(
                "Automaton minimized from {} to {} states",
                states_before, states_after
            ));
        }

        MinimizeReport {
            determinized_first,
            states_before,
            states_after,
        }
    }

    /// Reads `word` with the current automaton, determinizing it first if
    /// necessary.
    pub fn read(&mut self, word: &[L]) -> Run<L> {
        let determinized_first = !self.current.is_deterministic();

        if determinized_first {
            if let Some(l) = self.logger {
                l.warn("This automaton is non-deterministic");
            }
            self.determinize();
        }

        let mut run = self.current.read(word).run;
        if determinized_first {
            run.mark_determinized_first();
        }

        if let Some(l) = self.logger {
            l.debug(&format!("Read {} symbols: {}", run.word().len(), run.outcome()));
        }

        run
    }

    pub fn show(&self) -> String {
        self.current.render(&self.markers())
    }
}
