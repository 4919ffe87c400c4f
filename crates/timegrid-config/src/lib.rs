//! Configuration system for timegrid.
//!
//! Two configuration surfaces live here:
//!
//! - [`ProblemConfig`]: the read-only lookup tables the constraint
//!   catalogue consumes (department→block preference, department→workday
//!   policy, course→priority-lab mapping, batching constants). The
//!   original deployment kept these as process-wide static maps; here they
//!   are explicit values handed to the constraints at construction time.
//! - [`SolverSettings`]: termination, acceptor, sampling and threading
//!   knobs for the solver, loadable from TOML or YAML without code
//!   changes.
//!
//! # Examples
//!
//! ```
//! use timegrid_config::SolverSettings;
//! use std::time::Duration;
//!
//! let settings = SolverSettings::from_toml_str(r#"
//!     [termination]
//!     seconds_spent_limit = 30
//!     stop_on_first_feasible = true
//!
//!     [local_search]
//!     tabu_tenure = 9
//!     late_acceptance_size = 400
//! "#).unwrap();
//!
//! assert_eq!(settings.time_limit(), Some(Duration::from_secs(30)));
//! assert_eq!(settings.local_search.tabu_tenure, 9);
//! ```
//!
//! Use defaults when no file is present:
//!
//! ```
//! use timegrid_config::SolverSettings;
//!
//! let settings = SolverSettings::load("solver.toml").unwrap_or_default();
//! ```

use thiserror::Error;

mod grid;
mod problem;
mod solver;

pub use grid::SlotGrid;
pub use problem::{
    BatchingPolicy, DepartmentBlocks, DepartmentWorkdays, PriorityLabs, ProblemConfig,
    WorkdaySeverity,
};
pub use solver::{
    EnvironmentMode, LocalSearchSettings, MoveThreadCount, SolverSettings, TerminationSettings,
};

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
