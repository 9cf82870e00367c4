pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;
pub use crate::config::TomlConfig;

pub use crate::adapters::storage::LocalStorage;
pub use crate::core::{
    balancer::{BalanceReport, RoleBalancer, ScoreWeights},
    distributor::Distributor,
    metrics::Metrics,
    splitter::{FinalizedTeam, SplitOutcome, SplitSettings, TeamSplitter},
};
pub use crate::domain::model::{Player, Role, Team, TeamCount};
pub use crate::utils::error::{Result, SplitterError};
