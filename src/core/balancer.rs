use crate::core::metrics::{team_pairs, Metrics};
use crate::domain::model::Team;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// Weights of the aggregate balance score, lower is better:
/// `skill_diff + max(0, defender_diff - tolerance) * defender_penalty
///  + max(0, striker_diff - tolerance) * striker_penalty`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub defender_penalty: u32,
    pub striker_penalty: u32,
    pub role_tolerance: u32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            defender_penalty: 15,
            striker_penalty: 10,
            role_tolerance: 1,
        }
    }
}

impl ScoreWeights {
    pub fn score(&self, metrics: &Metrics) -> u64 {
        let penalty = |diff: u32, weight: u32| {
            u64::from(diff.saturating_sub(self.role_tolerance)) * u64::from(weight)
        };
        metrics
            .skill_diff()
            .saturating_add(penalty(metrics.defender_diff(), self.defender_penalty))
            .saturating_add(penalty(metrics.striker_diff(), self.striker_penalty))
    }
}

/// Exchange of `players[first_player]` of team `first_team` with
/// `players[second_player]` of team `second_team`, where `first_team < second_team`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Swap {
    pub first_team: usize,
    pub first_player: usize,
    pub second_team: usize,
    pub second_player: usize,
}

fn apply_swap(teams: &mut [Team], swap: Swap) {
    let (left, right) = teams.split_at_mut(swap.second_team);
    left[swap.first_team].exchange(swap.first_player, &mut right[0], swap.second_player);
}

/// A trial swap: applied on creation, undone on drop unless committed.
struct SwapTransaction<'t> {
    teams: &'t mut [Team],
    swap: Swap,
    committed: bool,
}

impl<'t> SwapTransaction<'t> {
    fn begin(teams: &'t mut [Team], swap: Swap) -> Self {
        apply_swap(teams, swap);
        Self {
            teams,
            swap,
            committed: false,
        }
    }

    fn teams(&self) -> &[Team] {
        &*self.teams
    }

    fn commit(mut self) {
        self.committed = true;
    }
}

impl Drop for SwapTransaction<'_> {
    fn drop(&mut self) {
        if !self.committed {
            apply_swap(self.teams, self.swap);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SwapRecord {
    pub first_team: String,
    pub first_player: String,
    pub second_team: String,
    pub second_player: String,
    pub score_after: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceReport {
    /// Search passes run, including a final pass that found nothing.
    pub iterations: usize,
    pub initial_score: u64,
    pub final_score: u64,
    /// `false` when the iteration cap stopped the search.
    pub converged: bool,
    pub swaps: Vec<SwapRecord>,
}

/// Greedy best-swap local search over the whole team set.
#[derive(Debug, Clone)]
pub struct RoleBalancer {
    max_iterations: usize,
    weights: ScoreWeights,
}

impl Default for RoleBalancer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ITERATIONS, ScoreWeights::default())
    }
}

impl RoleBalancer {
    pub fn new(max_iterations: usize, weights: ScoreWeights) -> Self {
        Self {
            max_iterations,
            weights,
        }
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Self {
        Self::new(config.max_iterations(), config.score_weights())
    }

    pub fn score(&self, teams: &[Team]) -> Result<u64> {
        Ok(self.weights.score(&Metrics::compute(teams)?))
    }

    /// Applies the best improving swap until none is left or the cap is hit.
    /// Goalies are only ever exchanged for goalies, so per-team goalie counts
    /// and team sizes never change.
    pub fn balance(&self, teams: &mut [Team]) -> Result<BalanceReport> {
        let initial_score = self.score(teams)?;
        let mut current = initial_score;
        let mut report = BalanceReport {
            iterations: 0,
            initial_score,
            final_score: initial_score,
            converged: false,
            swaps: Vec::new(),
        };

        tracing::info!("Starting rebalancing, initial score: {}", initial_score);

        while report.iterations < self.max_iterations {
            report.iterations += 1;

            let Some((swap, score)) = self.find_best_swap(teams, current)? else {
                report.converged = true;
                break;
            };

            SwapTransaction::begin(teams, swap).commit();
            let record = SwapRecord {
                first_team: teams[swap.first_team].name().to_string(),
                // players already moved, so each name now sits on the other team
                first_player: teams[swap.second_team].players()[swap.second_player]
                    .name
                    .clone(),
                second_team: teams[swap.second_team].name().to_string(),
                second_player: teams[swap.first_team].players()[swap.first_player]
                    .name
                    .clone(),
                score_after: score,
            };
            tracing::info!(
                "Iteration {}: swapped {} ({}) <-> {} ({}), score {} -> {}",
                report.iterations,
                record.first_player,
                record.first_team,
                record.second_player,
                record.second_team,
                current,
                score
            );

            current = score;
            report.swaps.push(record);
        }

        if !report.converged {
            tracing::warn!(
                "Rebalancing stopped at the iteration cap ({})",
                self.max_iterations
            );
        }

        report.final_score = current;
        tracing::info!(
            "Rebalancing finished after {} iterations, {} swaps, final score: {}",
            report.iterations,
            report.swaps.len(),
            current
        );
        Ok(report)
    }

    fn find_best_swap(&self, teams: &mut [Team], current: u64) -> Result<Option<(Swap, u64)>> {
        let mut best: Option<(Swap, u64)> = None;

        for pair in team_pairs(teams.len()) {
            for first_player in 0..teams[pair.first].size() {
                for second_player in 0..teams[pair.second].size() {
                    let first_is_goalie = teams[pair.first].players()[first_player].is_goalie();
                    let second_is_goalie = teams[pair.second].players()[second_player].is_goalie();
                    if first_is_goalie != second_is_goalie {
                        continue;
                    }

                    let swap = Swap {
                        first_team: pair.first,
                        first_player,
                        second_team: pair.second,
                        second_player,
                    };
                    let score = {
                        let trial = SwapTransaction::begin(teams, swap);
                        let score = self.score(trial.teams())?;
                        score
                    };

                    let best_score = best.map_or(current, |(_, s)| s);
                    if score < best_score {
                        tracing::debug!("Candidate {:?} improves score to {}", swap, score);
                        best = Some((swap, score));
                    }
                }
            }
        }

        Ok(best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Player, Role};
    use crate::utils::error::SplitterError;

    fn team(name: &str, members: &[(&str, Role, u32)]) -> Team {
        let mut team = Team::new(name);
        for (player, role, skill) in members {
            team.add_player(Player::new(*player, *role, *skill)).unwrap();
        }
        team
    }

    #[test]
    fn test_fixes_defender_imbalance_at_no_skill_cost() {
        let mut teams = vec![
            team(
                "A",
                &[
                    ("D1", Role::Defender, 80),
                    ("D2", Role::Defender, 80),
                    ("D3", Role::Defender, 80),
                    ("S1", Role::Striker, 80),
                ],
            ),
            team(
                "B",
                &[
                    ("D4", Role::Defender, 80),
                    ("S2", Role::Striker, 80),
                    ("S3", Role::Striker, 80),
                    ("S4", Role::Striker, 80),
                ],
            ),
        ];

        let report = RoleBalancer::default().balance(&mut teams).unwrap();

        for t in &teams {
            assert_eq!(t.role_count(Role::Defender), 2);
            assert_eq!(t.role_count(Role::Striker), 2);
        }
        let metrics = Metrics::compute(&teams).unwrap();
        assert_eq!(metrics.skill_diff(), 0);
        assert_eq!(report.initial_score, 25);
        assert_eq!(report.final_score, 0);
        assert_eq!(report.swaps.len(), 1);
        assert!(report.converged);
    }

    #[test]
    fn test_accepts_small_skill_cost() {
        let mut teams = vec![
            team(
                "A",
                &[
                    ("D1", Role::Defender, 90),
                    ("D2", Role::Defender, 90),
                    ("D3", Role::Defender, 90),
                    ("S1", Role::Striker, 80),
                ],
            ),
            team(
                "B",
                &[
                    ("D4", Role::Defender, 80),
                    ("S2", Role::Striker, 80),
                    ("S3", Role::Striker, 80),
                    ("S4", Role::Striker, 80),
                ],
            ),
        ];

        RoleBalancer::default().balance(&mut teams).unwrap();

        assert_eq!(teams[0].role_count(Role::Defender), 2);
        assert_eq!(teams[1].role_count(Role::Defender), 2);
        assert_eq!(Metrics::compute(&teams).unwrap().skill_diff(), 10);
    }

    #[test]
    fn test_large_skill_cost_keeps_defender_imbalance() {
        let mut teams = vec![
            team(
                "A",
                &[
                    ("D1", Role::Defender, 95),
                    ("D2", Role::Defender, 95),
                    ("D3", Role::Defender, 95),
                    ("S1", Role::Striker, 80),
                ],
            ),
            team(
                "B",
                &[
                    ("D4", Role::Defender, 60),
                    ("S2", Role::Striker, 80),
                    ("S3", Role::Striker, 80),
                    ("S4", Role::Striker, 80),
                ],
            ),
        ];

        let report = RoleBalancer::default().balance(&mut teams).unwrap();

        // only the like-for-like defender swap pays off, D-for-S never does
        assert_eq!(teams[0].role_count(Role::Defender), 3);
        assert_eq!(teams[1].role_count(Role::Defender), 1);
        assert_eq!(report.initial_score, 90);
        assert_eq!(report.final_score, 30);
        assert_eq!(report.swaps.len(), 1);
        let swap = &report.swaps[0];
        assert_eq!(swap.first_player, "D1");
        assert_eq!(swap.second_player, "D4");
        for record in &report.swaps {
            assert!(record.first_player.starts_with('D'));
            assert!(record.second_player.starts_with('D'));
        }
    }

    #[test]
    fn test_huge_skills_do_not_overflow_score() {
        let mut teams = vec![
            team(
                "A",
                &[
                    ("M1", Role::Midfielder, u32::MAX),
                    ("M2", Role::Midfielder, u32::MAX),
                ],
            ),
            team(
                "B",
                &[("M3", Role::Midfielder, 0), ("M4", Role::Midfielder, 0)],
            ),
        ];

        let report = RoleBalancer::default().balance(&mut teams).unwrap();

        assert_eq!(report.initial_score, 2 * u64::from(u32::MAX));
        assert_eq!(report.final_score, 0);
        assert_eq!(teams[0].total_skill(), u64::from(u32::MAX));
    }

    #[test]
    fn test_iteration_cap_limits_swaps() {
        let build = || {
            vec![
                team(
                    "A",
                    &[
                        ("D1", Role::Defender, 80),
                        ("D2", Role::Defender, 80),
                        ("D3", Role::Defender, 80),
                        ("D4", Role::Defender, 80),
                    ],
                ),
                team(
                    "B",
                    &[
                        ("S1", Role::Striker, 80),
                        ("S2", Role::Striker, 80),
                        ("S3", Role::Striker, 80),
                        ("S4", Role::Striker, 80),
                    ],
                ),
            ]
        };

        let mut capped = build();
        let report = RoleBalancer::new(1, ScoreWeights::default())
            .balance(&mut capped)
            .unwrap();
        assert_eq!(report.initial_score, 75);
        assert_eq!(report.iterations, 1);
        assert_eq!(report.swaps.len(), 1);
        assert_eq!(report.final_score, 25);
        assert!(!report.converged);

        let mut free = build();
        let report = RoleBalancer::default().balance(&mut free).unwrap();
        assert_eq!(report.swaps.len(), 2);
        assert_eq!(report.final_score, 0);
        assert_eq!(report.iterations, 3);
        assert!(report.converged);
    }

    #[test]
    fn test_scores_never_increase() {
        let mut teams = vec![
            team(
                "A",
                &[
                    ("D1", Role::Defender, 99),
                    ("D2", Role::Defender, 91),
                    ("M1", Role::Midfielder, 85),
                    ("S1", Role::Striker, 40),
                ],
            ),
            team(
                "B",
                &[
                    ("D3", Role::Defender, 30),
                    ("M2", Role::Midfielder, 35),
                    ("S2", Role::Striker, 77),
                    ("S3", Role::Striker, 64),
                ],
            ),
        ];

        let report = RoleBalancer::default().balance(&mut teams).unwrap();
        let mut previous = report.initial_score;
        for swap in &report.swaps {
            assert!(swap.score_after < previous);
            previous = swap.score_after;
        }
        assert_eq!(previous, report.final_score);
    }

    #[test]
    fn test_goalies_only_swap_with_goalies() {
        let mut teams = vec![
            team("A", &[("G1", Role::Goalie, 90), ("M1", Role::Midfielder, 50)]),
            team(
                "B",
                &[("M2", Role::Midfielder, 60), ("M3", Role::Midfielder, 40)],
            ),
        ];

        RoleBalancer::default().balance(&mut teams).unwrap();

        assert_eq!(teams[0].role_count(Role::Goalie), 1);
        assert_eq!(teams[1].role_count(Role::Goalie), 0);
        assert!(teams[0].players().iter().any(|p| p.name == "G1"));
    }

    #[test]
    fn test_swap_record_names_moved_players() {
        let mut teams = vec![
            team("A", &[("D1", Role::Defender, 80), ("D2", Role::Defender, 80)]),
            team("B", &[("S1", Role::Striker, 80), ("S2", Role::Striker, 80)]),
        ];

        let report = RoleBalancer::default().balance(&mut teams).unwrap();

        let first = &report.swaps[0];
        assert_eq!(first.first_team, "A");
        assert_eq!(first.second_team, "B");
        assert!(first.first_player.starts_with('D'));
        assert!(first.second_player.starts_with('S'));
        assert!(teams[1].players().iter().any(|p| p.name == first.first_player));
    }

    #[test]
    fn test_single_team_is_rejected() {
        let mut teams = vec![team("A", &[("D1", Role::Defender, 80)])];
        let err = RoleBalancer::default().balance(&mut teams).unwrap_err();
        assert!(matches!(err, SplitterError::NotEnoughTeams { actual: 1 }));
    }
}
