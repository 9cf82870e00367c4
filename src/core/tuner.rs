use crate::domain::model::{Player, Role};
use crate::utils::error::{Result, SplitterError};
use rand::seq::{index, SliceRandom};
use rand::Rng;
use std::collections::BTreeMap;
use std::str::FromStr;

/// What the person tuning the roster said about a pair of players.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Judgement {
    FirstStronger,
    SecondStronger,
    Equal,
    NoChange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TunerCommand {
    Judge(Judgement),
    Save,
    Quit,
}

impl FromStr for TunerCommand {
    type Err = SplitterError;

    fn from_str(input: &str) -> Result<Self> {
        match input.trim().to_lowercase().as_str() {
            "a" => Ok(TunerCommand::Judge(Judgement::FirstStronger)),
            "b" => Ok(TunerCommand::Judge(Judgement::SecondStronger)),
            "eq" => Ok(TunerCommand::Judge(Judgement::Equal)),
            "no" => Ok(TunerCommand::Judge(Judgement::NoChange)),
            "save" => Ok(TunerCommand::Save),
            "quit" | "q" | "exit" => Ok(TunerCommand::Quit),
            other => Err(SplitterError::TuningError {
                message: format!(
                    "Incorrect cmd '{}'. Usage: a / b / eq / no / save / quit",
                    other
                ),
            }),
        }
    }
}

pub fn group_by_role(players: &[Player]) -> BTreeMap<Role, Vec<usize>> {
    let mut by_role: BTreeMap<Role, Vec<usize>> =
        Role::ALL.iter().map(|r| (*r, Vec::new())).collect();
    for (idx, player) in players.iter().enumerate() {
        by_role.entry(player.role).or_default().push(idx);
    }
    by_role
}

/// Indices of two different players sharing a randomly chosen role.
pub fn pick_pair_same_role<R: Rng + ?Sized>(
    players: &[Player],
    rng: &mut R,
) -> Result<(usize, usize)> {
    let by_role = group_by_role(players);
    let candidates: Vec<&Vec<usize>> = by_role.values().filter(|idxs| idxs.len() >= 2).collect();

    let indices = candidates
        .choose(rng)
        .ok_or_else(|| SplitterError::TuningError {
            message: "Need at least 2 players per role.".to_string(),
        })?;

    let picked = index::sample(rng, indices.len(), 2);
    Ok((indices[picked.index(0)], indices[picked.index(1)]))
}

/// Applies a judgement to `players[i]` and `players[j]`. Returns whether
/// anything changed; changed players are replaced, never mutated.
pub fn apply_judgement(players: &mut [Player], i: usize, j: usize, judgement: Judgement) -> bool {
    let (first, second) = (players[i].skill, players[j].skill);

    let updated = match judgement {
        Judgement::FirstStronger if first < second => Some((second, first)),
        Judgement::SecondStronger if second < first => Some((second, first)),
        Judgement::Equal => {
            let avg = mean_half_even(first, second);
            (avg != first || avg != second).then_some((avg, avg))
        }
        _ => None,
    };

    match updated {
        Some((new_first, new_second)) => {
            players[i] = players[i].with_skill(new_first);
            players[j] = players[j].with_skill(new_second);
            true
        }
        None => false,
    }
}

/// Never above `max(a, b)`, so the result always fits back into `u32`.
fn mean_half_even(a: u32, b: u32) -> u32 {
    let sum = u64::from(a) + u64::from(b);
    let half = sum / 2;
    let mean = if sum % 2 == 1 && half % 2 == 1 {
        half + 1
    } else {
        half
    };
    u32::try_from(mean).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn roster() -> Vec<Player> {
        vec![
            Player::new("A", Role::Defender, 60),
            Player::new("B", Role::Defender, 80),
            Player::new("C", Role::Goalie, 70),
        ]
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            "A".parse::<TunerCommand>().unwrap(),
            TunerCommand::Judge(Judgement::FirstStronger)
        );
        assert_eq!(" eq ".parse::<TunerCommand>().unwrap(), TunerCommand::Judge(Judgement::Equal));
        assert_eq!("q".parse::<TunerCommand>().unwrap(), TunerCommand::Quit);
        assert_eq!("save".parse::<TunerCommand>().unwrap(), TunerCommand::Save);
        assert!("maybe".parse::<TunerCommand>().is_err());
    }

    #[test]
    fn test_first_stronger_swaps_lower_skill() {
        let mut players = roster();
        assert!(apply_judgement(&mut players, 0, 1, Judgement::FirstStronger));
        assert_eq!(players[0].skill, 80);
        assert_eq!(players[1].skill, 60);
        assert_eq!(players[0].name, "A");

        // already consistent
        assert!(!apply_judgement(&mut players, 0, 1, Judgement::FirstStronger));
    }

    #[test]
    fn test_second_stronger_mirrors() {
        let mut players = roster();
        assert!(!apply_judgement(&mut players, 0, 1, Judgement::SecondStronger));
        assert!(apply_judgement(&mut players, 1, 0, Judgement::SecondStronger));
        assert_eq!(players[0].skill, 80);
        assert_eq!(players[1].skill, 60);
    }

    #[test]
    fn test_equal_uses_rounded_mean() {
        let mut players = roster();
        assert!(apply_judgement(&mut players, 0, 1, Judgement::Equal));
        assert_eq!(players[0].skill, 70);
        assert_eq!(players[1].skill, 70);
        assert!(!apply_judgement(&mut players, 0, 1, Judgement::Equal));

        assert_eq!(mean_half_even(70, 71), 70);
        assert_eq!(mean_half_even(71, 72), 72);
        assert_eq!(mean_half_even(u32::MAX, u32::MAX), u32::MAX);
        assert_eq!(mean_half_even(u32::MAX, u32::MAX - 1), u32::MAX - 1);
    }

    #[test]
    fn test_no_change() {
        let mut players = roster();
        assert!(!apply_judgement(&mut players, 0, 1, Judgement::NoChange));
        assert_eq!(players, roster());
    }

    #[test]
    fn test_pick_pair_same_role() {
        let players = roster();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        for _ in 0..10 {
            let (i, j) = pick_pair_same_role(&players, &mut rng).unwrap();
            assert_ne!(i, j);
            assert_eq!(players[i].role, Role::Defender);
            assert_eq!(players[j].role, Role::Defender);
        }
    }

    #[test]
    fn test_pick_pair_needs_two_of_a_role() {
        let players = vec![
            Player::new("A", Role::Defender, 60),
            Player::new("C", Role::Goalie, 70),
        ];
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        assert!(matches!(
            pick_pair_same_role(&players, &mut rng),
            Err(SplitterError::TuningError { .. })
        ));
    }
}
