use crate::core::balancer::{BalanceReport, RoleBalancer, ScoreWeights, DEFAULT_MAX_ITERATIONS};
use crate::core::distributor::Distributor;
use crate::domain::model::{Player, Team, TeamCount};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{Result, SplitterError};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::collections::HashSet;

pub const MIN_PLAYERS: usize = 2;

/// In-memory settings, for callers that do not read a config file.
#[derive(Debug, Clone)]
pub struct SplitSettings {
    pub team_labels: Vec<String>,
    pub four_team_threshold: usize,
    pub max_iterations: usize,
    pub weights: ScoreWeights,
}

impl Default for SplitSettings {
    fn default() -> Self {
        Self {
            team_labels: default_team_labels(),
            four_team_threshold: TeamCount::DEFAULT_FOUR_TEAM_THRESHOLD,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            weights: ScoreWeights::default(),
        }
    }
}

pub fn default_team_labels() -> Vec<String> {
    ["Red", "Blue", "White", "Green"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl ConfigProvider for SplitSettings {
    fn team_labels(&self) -> &[String] {
        &self.team_labels
    }

    fn four_team_threshold(&self) -> usize {
        self.four_team_threshold
    }

    fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    fn score_weights(&self) -> ScoreWeights {
        self.weights
    }
}

#[derive(Debug, Clone)]
pub struct SplitOutcome {
    pub teams: Vec<Team>,
    pub seed: u64,
    pub report: BalanceReport,
}

/// A team's roster in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinalizedTeam {
    pub name: String,
    pub players: Vec<String>,
}

/// Runs one session split: validate, distribute, balance, check.
pub struct TeamSplitter<C: ConfigProvider> {
    roster: Vec<Player>,
    config: C,
    seed: u64,
    rng: ChaCha8Rng,
}

impl<C: ConfigProvider> TeamSplitter<C> {
    /// Without a seed a random one is drawn; either way it is logged so the
    /// run can be repeated.
    pub fn new(roster: Vec<Player>, config: C, seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(rand::random);
        tracing::info!("Using seed: {}", seed);
        Self {
            roster,
            config,
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn roster(&self) -> &[Player] {
        &self.roster
    }

    /// Looks every name up in the roster and returns the players sorted by
    /// descending skill. Fails on the first unknown name.
    pub fn validate_players(&self, names: &[String]) -> Result<Vec<Player>> {
        let mut seen = HashSet::new();
        let mut validated = Vec::with_capacity(names.len());

        for name in names {
            if !seen.insert(name.as_str()) {
                tracing::warn!("Player '{}' selected twice, ignoring the repeat", name);
                continue;
            }
            let player = self
                .roster
                .iter()
                .find(|p| &p.name == name)
                .ok_or_else(|| SplitterError::UnknownPlayer { name: name.clone() })?;
            validated.push(player.clone());
        }

        validated.sort_by(|a, b| b.skill.cmp(&a.skill));
        Ok(validated)
    }

    pub fn split(&mut self, names: &[String]) -> Result<SplitOutcome> {
        let players = self.validate_players(names)?;
        tracing::info!("Number of actual players: {}", players.len());

        if players.len() < MIN_PLAYERS {
            return Err(SplitterError::NotEnoughPlayers {
                required: MIN_PLAYERS,
                actual: players.len(),
            });
        }

        let team_count =
            TeamCount::for_player_count(players.len(), self.config.four_team_threshold());
        tracing::info!("Splitting into {} teams", team_count.get());

        let mut teams = Distributor::new(&mut self.rng).distribute(
            &players,
            self.config.team_labels(),
            team_count,
        )?;

        tracing::info!("Teams after distribution:");
        for team in &teams {
            tracing::info!("{}", team);
        }

        let report = RoleBalancer::from_config(&self.config).balance(&mut teams)?;
        validate_team_size_balance(&teams)?;

        Ok(SplitOutcome {
            teams,
            seed: self.seed,
            report,
        })
    }

    /// Display orderings, drawn from the same generator as the split.
    pub fn finalize(&mut self, teams: &[Team]) -> Vec<FinalizedTeam> {
        teams
            .iter()
            .map(|team| FinalizedTeam {
                name: team.name().to_string(),
                players: team.finalized(&mut self.rng),
            })
            .collect()
    }
}

/// Team sizes may differ by at most one player.
pub fn validate_team_size_balance(teams: &[Team]) -> Result<()> {
    let sizes = teams.iter().map(Team::size);
    let (Some(min), Some(max)) = (sizes.clone().min(), sizes.max()) else {
        return Ok(());
    };

    if max - min > 1 {
        tracing::error!("Team size imbalance: {} to {}", min, max);
        return Err(SplitterError::TeamSizeImbalance { min, max });
    }
    Ok(())
}
