use crate::core::balancer::{ScoreWeights, DEFAULT_MAX_ITERATIONS};
use crate::core::splitter::default_team_labels;
use crate::domain::model::TeamCount;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{Result, SplitterError};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_OUTPUT_PATH: &str = "final_teams.txt";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub seed: Option<u64>,
    pub input: InputConfig,
    pub teams: TeamsConfig,
    pub balancer: BalancerConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub roster: Option<String>,
    pub players: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamsConfig {
    pub labels: Vec<String>,
    pub four_team_threshold: usize,
}

impl Default for TeamsConfig {
    fn default() -> Self {
        Self {
            labels: default_team_labels(),
            four_team_threshold: TeamCount::DEFAULT_FOUR_TEAM_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BalancerConfig {
    pub max_iterations: usize,
    pub defender_penalty: u32,
    pub striker_penalty: u32,
    pub role_tolerance: u32,
}

impl Default for BalancerConfig {
    fn default() -> Self {
        let weights = ScoreWeights::default();
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            defender_penalty: weights.defender_penalty,
            striker_penalty: weights.striker_penalty,
            role_tolerance: weights.role_tolerance,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: String,
    pub summary_path: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_OUTPUT_PATH.to_string(),
            summary_path: None,
        }
    }
}

impl TomlConfig {
    /// Loads and parses a TOML config file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SplitterError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parses config from a TOML string after env substitution.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);
        Ok(toml::from_str(&processed_content)?)
    }

    /// Replaces `${VAR}` with its environment value; unset variables stay as written.
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        use std::sync::LazyLock;

        static ENV_VAR: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .to_string()
    }

    /// Roster and players file paths, both of which must be set by now.
    pub fn input_paths(&self) -> Result<(&str, &str)> {
        let roster = validation::validate_required_field("input.roster", &self.input.roster)?;
        let players = validation::validate_required_field("input.players", &self.input.players)?;

        validation::validate_path("input.roster", roster)?;
        validation::validate_file_extension("input.roster", roster, &["json"])?;
        validation::validate_path("input.players", players)?;

        Ok((roster.as_str(), players.as_str()))
    }

    pub fn output_path(&self) -> &str {
        &self.output.path
    }

    pub fn summary_path(&self) -> Option<&str> {
        self.output.summary_path.as_deref()
    }
}

impl ConfigProvider for TomlConfig {
    fn team_labels(&self) -> &[String] {
        &self.teams.labels
    }

    fn four_team_threshold(&self) -> usize {
        self.teams.four_team_threshold
    }

    fn max_iterations(&self) -> usize {
        self.balancer.max_iterations
    }

    fn score_weights(&self) -> ScoreWeights {
        ScoreWeights {
            defender_penalty: self.balancer.defender_penalty,
            striker_penalty: self.balancer.striker_penalty,
            role_tolerance: self.balancer.role_tolerance,
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_labels("teams.labels", &self.teams.labels, 2)?;
        validation::validate_positive_number(
            "teams.four_team_threshold",
            self.teams.four_team_threshold,
            2,
        )?;
        validation::validate_positive_number(
            "balancer.max_iterations",
            self.balancer.max_iterations,
            1,
        )?;
        validation::validate_path("output.path", &self.output.path)?;
        if let Some(summary) = &self.output.summary_path {
            validation::validate_path("output.summary_path", summary)?;
            validation::validate_file_extension("output.summary_path", summary, &["json"])?;
        }
        Ok(())
    }
}
