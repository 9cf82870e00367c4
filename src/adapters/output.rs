use crate::core::splitter::{FinalizedTeam, SplitOutcome};
use crate::domain::model::Player;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Plain-text sheet: a `Team <name>` header, one name per line, blank line
/// between teams.
pub fn render_finalized(teams: &[FinalizedTeam]) -> String {
    let mut out = String::new();
    for team in teams {
        out.push_str(&format!("Team {}\n", team.name));
        for name in &team.players {
            out.push_str(name);
            out.push('\n');
        }
        out.push('\n');
    }
    out
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamSummary {
    pub name: String,
    pub total_skill: u64,
    pub players: Vec<Player>,
    pub finalized: Vec<String>,
}

/// JSON record of a run, enough to reproduce it from the seed.
#[derive(Debug, Clone, Serialize)]
pub struct TeamSheet {
    pub generated_at: DateTime<Utc>,
    pub seed: u64,
    pub team_count: usize,
    pub initial_score: u64,
    pub final_score: u64,
    pub swaps: usize,
    pub teams: Vec<TeamSummary>,
}

impl TeamSheet {
    pub fn new(outcome: &SplitOutcome, finalized: &[FinalizedTeam]) -> Self {
        let teams = outcome
            .teams
            .iter()
            .zip(finalized)
            .map(|(team, sheet)| TeamSummary {
                name: team.name().to_string(),
                total_skill: team.total_skill(),
                players: team.players().to_vec(),
                finalized: sheet.players.clone(),
            })
            .collect();

        Self {
            generated_at: Utc::now(),
            seed: outcome.seed,
            team_count: outcome.teams.len(),
            initial_score: outcome.report.initial_score,
            final_score: outcome.report.final_score,
            swaps: outcome.report.swaps.len(),
            teams,
        }
    }
}
