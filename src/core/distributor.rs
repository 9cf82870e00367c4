use crate::domain::model::{Player, Team, TeamCount};
use crate::utils::error::{Result, SplitterError};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::VecDeque;

/// Builds the initial teams: field players by draft, then goalies one at a
/// time to the smallest, weakest team.
pub struct Distributor<'a, R: Rng + ?Sized> {
    rng: &'a mut R,
}

impl<'a, R: Rng + ?Sized> Distributor<'a, R> {
    pub fn new(rng: &'a mut R) -> Self {
        Self { rng }
    }

    /// One pick order per round: a fresh random order, then its reverse,
    /// then a new random order, then its reverse, and so on.
    pub fn pick_order(&mut self, num_teams: usize, num_rounds: usize) -> Vec<Vec<usize>> {
        let rng = &mut *self.rng;
        snake_pick_order(num_rounds, || {
            let mut order: Vec<usize> = (0..num_teams).collect();
            order.shuffle(&mut *rng);
            order
        })
    }

    /// `players` must already be sorted by descending skill.
    pub fn distribute(
        &mut self,
        players: &[Player],
        labels: &[String],
        team_count: TeamCount,
    ) -> Result<Vec<Team>> {
        let num_teams = team_count.get();
        if labels.len() < num_teams {
            return Err(SplitterError::NotEnoughTeamLabels {
                required: num_teams,
                available: labels.len(),
            });
        }

        let mut teams: Vec<Team> = labels[..num_teams]
            .iter()
            .map(|label| Team::new(label.as_str()))
            .collect();

        let (goalies, field): (Vec<&Player>, Vec<&Player>) =
            players.iter().partition(|p| p.is_goalie());
        let mut field: VecDeque<&Player> = field.into();
        let num_rounds = field.len().div_ceil(num_teams);

        tracing::info!("Starting field player distribution via snake draft");
        tracing::info!("Total field players: {}, Rounds: {}", field.len(), num_rounds);

        let pick_orders = self.pick_order(num_teams, num_rounds);
        for (round_idx, mut order) in pick_orders.into_iter().enumerate() {
            let is_final_round = round_idx + 1 == num_rounds;
            let remaining = field.len();

            // a short final round goes to the weakest teams
            if is_final_round && remaining < num_teams {
                order = teams_by_skill(&teams);
                tracing::info!(
                    "Round {} (final, {} players left): Pick order by skill {:?}",
                    round_idx + 1,
                    remaining,
                    team_names(&teams, &order)
                );
            } else {
                tracing::info!(
                    "Round {}: Pick order {:?}",
                    round_idx + 1,
                    team_names(&teams, &order)
                );
            }

            for team_idx in order {
                let Some(player) = field.pop_front() else {
                    break;
                };
                tracing::info!(
                    "  {} picks {} (skill={}, role={})",
                    teams[team_idx].name(),
                    player.name,
                    player.skill,
                    player.role
                );
                teams[team_idx].add_player(player.clone())?;
            }

            tracing::info!(
                "  After round {}: Team skills [{}]",
                round_idx + 1,
                team_skills(&teams)
            );
        }

        tracing::info!("Starting goalie distribution");
        tracing::info!("Total goalies: {}", goalies.len());
        place_goalies(&mut teams, goalies)?;

        Ok(teams)
    }
}

/// Gives each goalie, in order, to the currently smallest then weakest team.
/// The ranking is recomputed after every goalie, not once per pass.
fn place_goalies<'p>(
    teams: &mut [Team],
    goalies: impl IntoIterator<Item = &'p Player>,
) -> Result<()> {
    for (goalie_round, goalie) in goalies.into_iter().enumerate() {
        let team_idx = smallest_weakest_team(teams);
        tracing::info!(
            "Goalie round {}: Team {} ({}, size={}, skill={}) gets goalie {} (skill={})",
            goalie_round + 1,
            team_idx,
            teams[team_idx].name(),
            teams[team_idx].size(),
            teams[team_idx].total_skill(),
            goalie.name,
            goalie.skill
        );
        teams[team_idx].add_player(goalie.clone())?;
    }
    Ok(())
}

/// Alternates `random_round()` with the reverse of the round before it.
pub fn snake_pick_order<F>(num_rounds: usize, mut random_round: F) -> Vec<Vec<usize>>
where
    F: FnMut() -> Vec<usize>,
{
    let mut orders: Vec<Vec<usize>> = Vec::with_capacity(num_rounds);
    for round in 0..num_rounds {
        let current = match orders.last() {
            Some(last) if round % 2 == 1 => last.iter().rev().copied().collect(),
            _ => random_round(),
        };
        orders.push(current);
    }
    orders
}

fn teams_by_skill(teams: &[Team]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..teams.len()).collect();
    order.sort_by_key(|&idx| teams[idx].total_skill());
    order
}

// first minimum wins, so ties fall to the earlier team
fn smallest_weakest_team(teams: &[Team]) -> usize {
    (0..teams.len())
        .min_by_key(|&idx| (teams[idx].size(), teams[idx].total_skill()))
        .unwrap_or(0)
}

fn team_names<'t>(teams: &'t [Team], order: &[usize]) -> Vec<&'t str> {
    order.iter().map(|&idx| teams[idx].name()).collect()
}

fn team_skills(teams: &[Team]) -> String {
    teams
        .iter()
        .map(|t| format!("{}={}", t.name(), t.total_skill()))
        .collect::<Vec<_>>()
        .join(", ")
}
