use fsa_macros::config;

use crate::{automaton::DisplayMarkers, logger::LogLevel};

pub trait IntoOr<T> {
    fn into_or(self, or: T) -> T;
}

impl<T> IntoOr<Option<T>> for Option<T> {
    fn into_or(self, or: Option<T>) -> Option<T> {
        match self {
            Some(t) => Some(t),
            None => or,
        }
    }
}

impl<T> IntoOr<T> for Option<T> {
    fn into_or(self, or: T) -> T {
        self.unwrap_or(or)
    }
}

pub trait GeneralConfig {
    fn logger(&self) -> &LoggerConfig;
}

config! {
    pub struct LoggerConfig {
        enabled: bool = false,
        log_file: bool = false,
        log_level: LogLevel = LogLevel::Warn,
    }
}

config! {
    /// Settings of an interactive [`Session`](crate::session::Session).
    pub struct SessionConfig {
        /// Rename composite states to short fresh names after determinizing.
        simplify_labels: bool = true,
        /// Print the configuration trace of every read.
        show_trace: bool = true,
        empty_word_marker: String = "λ".to_string(),
        dead_state_marker: String = "∅".to_string(),
        logger: LoggerConfig (Option<PartialLoggerConfig> = LoggerConfig::default()),
    }
}

impl SessionConfig {
    pub fn markers(&self) -> DisplayMarkers {
        DisplayMarkers {
            dead_state: self.dead_state_marker.clone(),
            empty_word: self.empty_word_marker.clone(),
        }
    }
}

impl GeneralConfig for SessionConfig {
    fn logger(&self) -> &LoggerConfig {
        &self.logger
    }
}

#[test]
fn test_partial_session_config() {
    let config = SessionConfig::from_toml_str(
        r#"
        simplify_labels = false
        dead_state_marker = "dead"

        [logger]
        enabled = true
        "#,
    )
    .unwrap();

    assert!(!*config.get_simplify_labels());
    assert!(*config.get_show_trace());
    assert_eq!(config.markers().dead_state, "dead");
    assert_eq!(config.markers().empty_word, "λ");
    assert!(*config.logger().get_enabled());
    assert_eq!(*config.logger().get_log_level(), LogLevel::Warn);
}
