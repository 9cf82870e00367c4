use crate::utils::error::{Result, SplitterError};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Player's position on the team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "G", alias = "Goalie", alias = "GOALIE")]
    Goalie,
    #[serde(rename = "D", alias = "Defender", alias = "DEFENDER")]
    Defender,
    #[serde(rename = "M", alias = "Midfielder", alias = "MIDFIELDER")]
    Midfielder,
    #[serde(rename = "S", alias = "Striker", alias = "STRIKER")]
    Striker,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Goalie, Role::Defender, Role::Midfielder, Role::Striker];

    pub fn code(self) -> char {
        match self {
            Role::Goalie => 'G',
            Role::Defender => 'D',
            Role::Midfielder => 'M',
            Role::Striker => 'S',
        }
    }

    fn index(self) -> usize {
        match self {
            Role::Goalie => 0,
            Role::Defender => 1,
            Role::Midfielder => 2,
            Role::Striker => 3,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Goalie => "Goalie",
            Role::Defender => "Defender",
            Role::Midfielder => "Midfielder",
            Role::Striker => "Striker",
        };
        f.write_str(name)
    }
}

/// A per-role tally, indexed by [`Role`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoleCounts([u32; 4]);

impl RoleCounts {
    pub fn get(&self, role: Role) -> u32 {
        self.0[role.index()]
    }

    pub fn set(&mut self, role: Role, value: u32) {
        self.0[role.index()] = value;
    }

    pub fn iter(&self) -> impl Iterator<Item = (Role, u32)> + '_ {
        Role::ALL.iter().map(move |role| (*role, self.get(*role)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub role: Role,
    pub skill: u32,
}

impl Player {
    pub fn new(name: impl Into<String>, role: Role, skill: u32) -> Self {
        Self {
            name: name.into(),
            role,
            skill,
        }
    }

    pub fn is_goalie(&self) -> bool {
        self.role == Role::Goalie
    }

    /// Copy of this player with a different rating; players themselves are never mutated.
    pub fn with_skill(&self, skill: u32) -> Self {
        Self {
            name: self.name.clone(),
            role: self.role,
            skill,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.name, self.role.code(), self.skill)
    }
}

/// How many teams a session is split into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeamCount {
    Two,
    Four,
}

impl TeamCount {
    pub const DEFAULT_FOUR_TEAM_THRESHOLD: usize = 24;

    pub fn for_player_count(player_count: usize, four_team_threshold: usize) -> Self {
        if player_count >= four_team_threshold {
            TeamCount::Four
        } else {
            TeamCount::Two
        }
    }

    pub fn get(self) -> usize {
        match self {
            TeamCount::Two => 2,
            TeamCount::Four => 4,
        }
    }
}


#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    name: String,
    players: Vec<Player>,
}

impl Team {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            players: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn size(&self) -> usize {
        self.players.len()
    }

    /// Summed in `u64` so that large skills cannot overflow.
    pub fn total_skill(&self) -> u64 {
        self.players.iter().map(|p| u64::from(p.skill)).sum()
    }

    pub fn role_count(&self, role: Role) -> u32 {
        self.players.iter().filter(|p| p.role == role).count() as u32
    }

    pub fn role_counts(&self) -> RoleCounts {
        let mut counts = RoleCounts::default();
        for role in Role::ALL {
            counts.set(role, self.role_count(role));
        }
        counts
    }

    /// Summed skill of the members playing `role`.
    pub fn skill_by_role(&self, role: Role) -> u64 {
        self.players
            .iter()
            .filter(|p| p.role == role)
            .map(|p| u64::from(p.skill))
            .sum()
    }

    pub fn contains(&self, player: &Player) -> bool {
        self.players.contains(player)
    }

    pub fn add_player(&mut self, player: Player) -> Result<()> {
        if self.contains(&player) {
            return Err(SplitterError::DuplicatePlayer {
                name: player.name,
                team: self.name.clone(),
            });
        }
        self.players.push(player);
        Ok(())
    }

    /// Exchanges `self.players[mine]` with `other.players[theirs]` in place.
    /// Applying the same exchange twice restores both teams exactly.
    pub(crate) fn exchange(&mut self, mine: usize, other: &mut Team, theirs: usize) {
        std::mem::swap(&mut self.players[mine], &mut other.players[theirs]);
    }

    /// Display order for the final sheet: goalies first in assignment order,
    /// then every other player shuffled.
    pub fn finalized<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<String> {
        let (goalies, mut others): (Vec<&Player>, Vec<&Player>) =
            self.players.iter().partition(|p| p.is_goalie());
        others.shuffle(rng);

        goalies
            .into_iter()
            .chain(others)
            .map(|p| p.name.clone())
            .collect()
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Team {}, total skill: {}", self.name, self.total_skill())?;
        for player in &self.players {
            writeln!(f, "{}", player)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn sample_team() -> Team {
        let mut team = Team::new("Red");
        team.add_player(Player::new("Keeper", Role::Goalie, 70)).unwrap();
        team.add_player(Player::new("Back", Role::Defender, 80)).unwrap();
        team.add_player(Player::new("Wing", Role::Striker, 90)).unwrap();
        team.add_player(Player::new("Anchor", Role::Defender, 60)).unwrap();
        team
    }

    #[test]
    fn test_player_json_uses_role_codes() {
        let player = Player::new("David Beckham", Role::Midfielder, 82);
        let json = serde_json::to_value(&player).unwrap();
        assert_eq!(json["name"], "David Beckham");
        assert_eq!(json["role"], "M");
        assert_eq!(json["skill"], 82);

        let parsed: Player = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, player);
    }

    #[test]
    fn test_role_accepts_full_names() {
        let parsed: Player =
            serde_json::from_str(r#"{"name": "Diego", "role": "Striker", "skill": 100}"#).unwrap();
        assert_eq!(parsed.role, Role::Striker);
    }

    #[test]
    fn test_player_display() {
        assert_eq!(Player::new("Rodri", Role::Midfielder, 91).to_string(), "Rodri M 91");
    }

    #[test]
    fn test_team_aggregates() {
        let team = sample_team();
        assert_eq!(team.size(), 4);
        assert_eq!(team.total_skill(), 300);
        assert_eq!(team.role_count(Role::Defender), 2);
        assert_eq!(team.role_count(Role::Midfielder), 0);
        assert_eq!(team.skill_by_role(Role::Defender), 140);
        assert_eq!(team.role_counts().get(Role::Striker), 1);
    }

    #[test]
    fn test_add_duplicate_player_fails() {
        let mut team = sample_team();
        let err = team
            .add_player(Player::new("Back", Role::Defender, 80))
            .unwrap_err();
        assert!(matches!(err, SplitterError::DuplicatePlayer { .. }));
        assert_eq!(team.size(), 4);
    }

    #[test]
    fn test_exchange_twice_restores_teams() {
        let mut red = sample_team();
        let mut blue = Team::new("Blue");
        blue.add_player(Player::new("Nine", Role::Striker, 85)).unwrap();
        let (red_before, blue_before) = (red.clone(), blue.clone());

        red.exchange(1, &mut blue, 0);
        assert_eq!(red.players()[1].name, "Nine");
        assert_eq!(blue.players()[0].name, "Back");

        red.exchange(1, &mut blue, 0);
        assert_eq!(red, red_before);
        assert_eq!(blue, blue_before);
    }

    #[test]
    fn test_finalized_lists_goalies_first() {
        let team = sample_team();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let finalized = team.finalized(&mut rng);

        assert_eq!(finalized.len(), 4);
        assert_eq!(finalized[0], "Keeper");
        let mut rest = finalized[1..].to_vec();
        rest.sort();
        assert_eq!(rest, vec!["Anchor", "Back", "Wing"]);
    }

    #[test]
    fn test_finalized_is_reproducible_for_a_seed() {
        let team = sample_team();
        let first = team.finalized(&mut ChaCha8Rng::seed_from_u64(11));
        let second = team.finalized(&mut ChaCha8Rng::seed_from_u64(11));
        assert_eq!(first, second);
    }

    #[test]
    fn test_team_count_selection() {
        assert_eq!(TeamCount::for_player_count(23, 24), TeamCount::Two);
        assert_eq!(TeamCount::for_player_count(24, 24), TeamCount::Four);
        assert_eq!(TeamCount::for_player_count(30, 24).get(), 4);
    }
}
