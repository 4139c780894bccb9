//! Table settings: play mode and think budget.

use std::path::Path;
use std::time::Duration;

use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_new::new;
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::table::PlayMode;

/// Ply budget used when none is configured.
pub const DEFAULT_THINK_DEPTH: u32 = 999;

/// Wall-clock budget used when none is configured.
pub const DEFAULT_THINK_SECONDS: u64 = 30;

/// Number of progress ticks a search is expected to take.
const TICKS_PER_SEARCH: u32 = 100;

/// Floor for the tick period, so a zero think time still ticks.
const MIN_TICK_PERIOD: Duration = Duration::from_millis(1);

/// Ceiling for the tick period, so the first tick stays on the clock.
const MAX_TICK_PERIOD: Duration = Duration::from_secs(24 * 60 * 60);

/// Starting configuration for a table.
///
/// Every key is optional in TOML; omitted keys take the defaults.
///
/// ```toml
/// play_mode = "ComputerGoesFirst"
/// think_depth = 6
/// think_seconds = 10
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
#[serde(default)]
pub struct TableSettings {
    /// Who plays which side.
    play_mode: PlayMode,
    /// Maximum search depth in plies.
    think_depth: u32,
    /// Maximum search time in whole seconds.
    think_seconds: u64,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            play_mode: PlayMode::default(),
            think_depth: DEFAULT_THINK_DEPTH,
            think_seconds: DEFAULT_THINK_SECONDS,
        }
    }
}

impl TableSettings {
    /// Loads settings from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading table settings from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read settings file: {}", e)))?;
        let settings = Self::from_toml(&content)?;
        info!(
            play_mode = ?settings.play_mode,
            think_depth = settings.think_depth,
            think_seconds = settings.think_seconds,
            "Table settings loaded"
        );
        Ok(settings)
    }

    /// Parses settings from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse settings: {}", e)))
    }

    /// Wall-clock budget as a duration.
    pub fn think_time(&self) -> Duration {
        Duration::from_secs(self.think_seconds)
    }
}

/// Bounds on one best-turn search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, new)]
pub struct ThinkBudget {
    /// Maximum depth in plies.
    pub max_depth: u32,
    /// Maximum wall-clock time.
    pub max_time: Duration,
}

impl ThinkBudget {
    /// Interval between progress ticks: a hundredth of the think time.
    pub fn tick_period(&self) -> Duration {
        (self.max_time / TICKS_PER_SEARCH).clamp(MIN_TICK_PERIOD, MAX_TICK_PERIOD)
    }
}

/// Describes a think time in minutes and seconds, e.g. "1 minute 30 seconds".
///
/// Hours are not shown; think times are expected to stay under one.
#[instrument]
pub fn describe_think_time(think_time: Duration) -> String {
    let total = think_time.as_secs();
    let minutes = (total / 60) % 60;
    let seconds = total % 60;
    match (minutes, seconds) {
        (0, 1) => "1 second".to_string(),
        (0, s) => format!("{} seconds", s),
        (1, 0) => "1 minute".to_string(),
        (1, s) => format!("1 minute {} seconds", s),
        (m, 0) => format!("{} minutes", m),
        (m, s) => format!("{} minutes {} seconds", m, s),
    }
}

/// Failure loading [`TableSettings`].
#[derive(Debug, Clone, Display, Error)]
#[display("Settings error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// What went wrong.
    pub message: String,
    /// Line that raised the error.
    pub line: u32,
    /// File that raised the error.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates an error stamped with the caller's location.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = TableSettings::default();
        assert_eq!(*settings.play_mode(), PlayMode::HumanGoesFirst);
        assert_eq!(*settings.think_depth(), 999);
        assert_eq!(settings.think_time(), Duration::from_secs(30));
    }

    #[test]
    fn test_tick_period_is_a_hundredth() {
        let budget = ThinkBudget::new(4, Duration::from_secs(30));
        assert_eq!(budget.tick_period(), Duration::from_millis(300));
    }

    #[test]
    fn test_zero_think_time_still_ticks() {
        let budget = ThinkBudget::new(4, Duration::ZERO);
        assert_eq!(budget.tick_period(), Duration::from_millis(1));
    }

    #[test]
    fn test_huge_think_time_caps_tick_period() {
        let budget = ThinkBudget::new(4, Duration::MAX);
        assert_eq!(budget.tick_period(), MAX_TICK_PERIOD);
    }

    #[test]
    fn test_describe_think_time() {
        assert_eq!(describe_think_time(Duration::from_secs(1)), "1 second");
        assert_eq!(describe_think_time(Duration::from_secs(30)), "30 seconds");
        assert_eq!(describe_think_time(Duration::from_secs(60)), "1 minute");
        assert_eq!(describe_think_time(Duration::from_secs(90)), "1 minute 30 seconds");
        assert_eq!(describe_think_time(Duration::from_secs(120)), "2 minutes");
        assert_eq!(describe_think_time(Duration::from_secs(185)), "3 minutes 5 seconds");
    }

    #[test]
    fn test_builder_setters() {
        let settings = TableSettings::default()
            .with_play_mode(PlayMode::HumanVersusHuman)
            .with_think_seconds(5);
        assert_eq!(*settings.play_mode(), PlayMode::HumanVersusHuman);
        assert_eq!(settings.think_time(), Duration::from_secs(5));
    }
}
