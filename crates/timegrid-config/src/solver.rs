//! Solver settings: termination, acceptor, sampling and threading.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Environment mode affecting solver behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvironmentMode {
    /// Non-reproducible mode with minimal overhead.
    #[default]
    NonReproducible,

    /// Reproducible mode with deterministic behavior (requires a seed).
    Reproducible,

    /// Full assert mode: the incremental score is cross-checked against a
    /// from-scratch recalculation after every applied move. Slow; for
    /// tests and debugging only.
    FullAssert,
}

/// Move-evaluation thread count configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveThreadCount {
    /// Use the available hardware concurrency.
    #[default]
    Auto,

    /// No parallel move evaluation.
    None,

    /// Specific number of worker threads.
    Count(usize),
}

impl MoveThreadCount {
    /// Resolves to an actual worker count (>= 1).
    pub fn resolve(&self) -> usize {
        match self {
            MoveThreadCount::Auto => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            MoveThreadCount::None => 1,
            MoveThreadCount::Count(n) => (*n).max(1),
        }
    }
}

/// Termination configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", default)]
pub struct TerminationSettings {
    /// Maximum seconds to spend solving.
    pub seconds_spent_limit: Option<u64>,

    /// Maximum milliseconds to spend solving (combined with seconds).
    pub millis_spent_limit: Option<u64>,

    /// Maximum number of local-search steps.
    pub step_count_limit: Option<u64>,

    /// Stop as soon as the incumbent reaches hard score 0.
    #[serde(default)]
    pub stop_on_first_feasible: bool,
}

impl Default for TerminationSettings {
    fn default() -> Self {
        TerminationSettings {
            seconds_spent_limit: Some(30),
            millis_spent_limit: None,
            step_count_limit: None,
            stop_on_first_feasible: false,
        }
    }
}

impl TerminationSettings {
    /// Returns the wall-clock budget as a Duration, if any.
    pub fn time_limit(&self) -> Option<Duration> {
        let millis = self.seconds_spent_limit.unwrap_or(0) * 1000
            + self.millis_spent_limit.unwrap_or(0);
        if millis > 0 {
            Some(Duration::from_millis(millis))
        } else {
            None
        }
    }
}

/// Local-search configuration.
///
/// The acceptor is the dual tabu/late-acceptance criterion: a candidate
/// move passes when its assignment is outside the tabu window or its score
/// beats the score from `late_acceptance_size` steps ago.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", default)]
pub struct LocalSearchSettings {
    /// Recency window of the assignment tabu list.
    pub tabu_tenure: usize,

    /// Ring-buffer length of the late-acceptance score history.
    pub late_acceptance_size: usize,

    /// Candidate moves sampled per step.
    pub sample_size: usize,
}

impl Default for LocalSearchSettings {
    fn default() -> Self {
        LocalSearchSettings {
            tabu_tenure: 7,
            late_acceptance_size: 400,
            sample_size: 512,
        }
    }
}

/// Main solver settings.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SolverSettings {
    /// Environment mode affecting reproducibility and assertions.
    #[serde(default)]
    pub environment_mode: EnvironmentMode,

    /// Random seed for reproducible results.
    #[serde(default)]
    pub random_seed: Option<u64>,

    /// Number of threads for parallel move evaluation.
    #[serde(default)]
    pub move_thread_count: MoveThreadCount,

    /// Termination configuration.
    #[serde(default)]
    pub termination: TerminationSettings,

    /// Local-search configuration.
    #[serde(default)]
    pub local_search: LocalSearchSettings,
}

impl SolverSettings {
    /// Creates default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads settings from a TOML or YAML file, chosen by extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&contents),
            _ => Self::from_toml_str(&contents),
        }
    }

    /// Parses settings from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Parses settings from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Sets the wall-clock budget in seconds.
    pub fn with_termination_seconds(mut self, seconds: u64) -> Self {
        self.termination.seconds_spent_limit = Some(seconds);
        self.termination.millis_spent_limit = None;
        self
    }

    /// Sets the random seed.
    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self.environment_mode = EnvironmentMode::Reproducible;
        self
    }

    /// Stops the solver on the first feasible incumbent.
    pub fn with_stop_on_first_feasible(mut self, stop: bool) -> Self {
        self.termination.stop_on_first_feasible = stop;
        self
    }

    /// Sets the local-search step limit.
    pub fn with_step_count_limit(mut self, steps: u64) -> Self {
        self.termination.step_count_limit = Some(steps);
        self
    }

    /// Returns the wall-clock budget, if configured.
    pub fn time_limit(&self) -> Option<Duration> {
        self.termination.time_limit()
    }
}
