use crate::domain::model::{Role, RoleCounts, Team};
use crate::utils::error::{Result, SplitterError};

pub const DEFENDER_IMPORTANCE_COEF: f64 = 1.3;
pub const STRIKER_IMPORTANCE_COEF: f64 = 1.2;

/// Two distinct teams by position in the team list, `first < second`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TeamPair {
    pub first: usize,
    pub second: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairDelta {
    pub pair: TeamPair,
    pub skill: u64,
    pub roles: RoleCounts,
}

/// Snapshot of how far apart the teams are. Built from scratch for every
/// composition; nothing here is updated incrementally.
#[derive(Debug, Clone)]
pub struct Metrics {
    team_count: usize,
    pairs: Vec<PairDelta>,
    max_skill: (u64, TeamPair),
    max_role: (u32, Role, TeamPair),
    min_player_skill: Option<u32>,
    role_targets: RoleCounts,
}

impl Metrics {
    pub fn compute(teams: &[Team]) -> Result<Self> {
        if teams.len() < 2 {
            return Err(SplitterError::NotEnoughTeams {
                actual: teams.len(),
            });
        }

        let pairs = pairwise_deltas(teams);

        // strict comparisons keep the first pair in enumeration order on ties
        let mut max_skill = (pairs[0].skill, pairs[0].pair);
        for delta in &pairs[1..] {
            if delta.skill > max_skill.0 {
                max_skill = (delta.skill, delta.pair);
            }
        }

        let mut max_role: Option<(u32, Role, TeamPair)> = None;
        for delta in &pairs {
            for (role, diff) in delta.roles.iter() {
                if max_role.map_or(true, |(best, _, _)| diff > best) {
                    max_role = Some((diff, role, delta.pair));
                }
            }
        }
        let max_role = max_role.unwrap_or((0, Role::Goalie, pairs[0].pair));

        let min_player_skill = teams
            .iter()
            .flat_map(|team| team.players())
            .map(|p| p.skill)
            .min();

        let mut role_targets = RoleCounts::default();
        for role in Role::ALL {
            let total: u32 = teams.iter().map(|t| t.role_count(role)).sum();
            role_targets.set(role, round_half_even(total, teams.len() as u32));
        }

        Ok(Self {
            team_count: teams.len(),
            pairs,
            max_skill,
            max_role,
            min_player_skill,
            role_targets,
        })
    }

    pub fn team_count(&self) -> usize {
        self.team_count
    }

    pub fn pairs(&self) -> &[PairDelta] {
        &self.pairs
    }

    /// Global maximum difference in total skill between any two teams.
    pub fn skill_diff(&self) -> u64 {
        self.max_skill.0
    }

    pub fn teams_for_max_skill_diff(&self) -> TeamPair {
        self.max_skill.1
    }

    /// Global maximum difference in role count, over every role and pair.
    pub fn max_role_diff(&self) -> u32 {
        self.max_role.0
    }

    pub fn role_for_max_role_diff(&self) -> Role {
        self.max_role.1
    }

    pub fn teams_for_max_role_diff(&self) -> TeamPair {
        self.max_role.2
    }

    /// Weakest individual rating on any team, `None` when every team is empty.
    pub fn min_player_skill(&self) -> Option<u32> {
        self.min_player_skill
    }

    /// The pair with the largest count difference for `role`, and that difference.
    pub fn max_role_imbalance(&self, role: Role) -> (TeamPair, u32) {
        let mut best = (self.pairs[0].pair, self.pairs[0].roles.get(role));
        for delta in &self.pairs[1..] {
            let diff = delta.roles.get(role);
            if diff > best.1 {
                best = (delta.pair, diff);
            }
        }
        best
    }

    pub fn defender_diff(&self) -> u32 {
        self.max_role_imbalance(Role::Defender).1
    }

    pub fn striker_diff(&self) -> u32 {
        self.max_role_imbalance(Role::Striker).1
    }

    /// Average number of `role` players per team, rounded half to even.
    pub fn role_target(&self, role: Role) -> u32 {
        self.role_targets.get(role)
    }

    /// Role-weighted comparison of a single pair. Defenders and strikers count
    /// extra on top of total skill; the result is the gap between the two
    /// weighted totals.
    pub fn team_pair_score(team_one: &Team, team_two: &Team) -> f64 {
        (weighted_total(team_one) - weighted_total(team_two)).abs()
    }

    /// The pair whose weighted totals are furthest apart.
    pub fn pair_with_max_score_diff(teams: &[Team]) -> Result<(TeamPair, f64)> {
        let mut best: Option<(TeamPair, f64)> = None;
        for pair in team_pairs(teams.len()) {
            let score = Self::team_pair_score(&teams[pair.first], &teams[pair.second]);
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((pair, score));
            }
        }

        best.ok_or(SplitterError::NotEnoughTeams {
            actual: teams.len(),
        })
    }
}

/// Every unordered pair, outer index ascending, inner index ascending.
pub fn team_pairs(team_count: usize) -> impl Iterator<Item = TeamPair> {
    (0..team_count).flat_map(move |first| {
        (first + 1..team_count).map(move |second| TeamPair { first, second })
    })
}

fn pairwise_deltas(teams: &[Team]) -> Vec<PairDelta> {
    team_pairs(teams.len())
        .map(|pair| {
            let (one, two) = (&teams[pair.first], &teams[pair.second]);
            let (one_roles, two_roles) = (one.role_counts(), two.role_counts());
            let mut roles = RoleCounts::default();
            for role in Role::ALL {
                roles.set(role, one_roles.get(role).abs_diff(two_roles.get(role)));
            }
            PairDelta {
                pair,
                skill: one.total_skill().abs_diff(two.total_skill()),
                roles,
            }
        })
        .collect()
}

fn weighted_total(team: &Team) -> f64 {
    let role_score = team.skill_by_role(Role::Defender) as f64 * DEFENDER_IMPORTANCE_COEF
        + team.skill_by_role(Role::Striker) as f64 * STRIKER_IMPORTANCE_COEF;
    role_score + team.total_skill() as f64
}

fn round_half_even(total: u32, count: u32) -> u32 {
    let (quotient, remainder) = (total / count, total % count);
    match (remainder * 2).cmp(&count) {
        std::cmp::Ordering::Less => quotient,
        std::cmp::Ordering::Greater => quotient + 1,
        std::cmp::Ordering::Equal => quotient + quotient % 2,
    }
}
