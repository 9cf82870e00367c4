use crate::domain::model::Player;
use crate::domain::ports::Storage;
use crate::utils::error::Result;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static LIST_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.?\s*").expect("list number pattern is valid"));

pub fn parse_players(json: &[u8]) -> Result<Vec<Player>> {
    Ok(serde_json::from_slice(json)?)
}

pub fn load_players<S: Storage + ?Sized>(storage: &S, path: &str) -> Result<Vec<Player>> {
    let data = storage.read_file(path)?;
    parse_players(&data)
}

pub fn save_players<S: Storage + ?Sized>(
    storage: &S,
    path: &str,
    players: &[Player],
) -> Result<()> {
    let json = serde_json::to_vec_pretty(players)?;
    storage.write_file(path, &json)
}

/// Names from a session list, one per line. Leading list numbers such as
/// `12.` are stripped, blank lines skipped and repeats dropped.
pub fn parse_player_names(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names = Vec::new();

    for line in text.lines() {
        let name = LIST_NUMBER.replace(line.trim_start(), "").trim().to_string();
        if !name.is_empty() && seen.insert(name.clone()) {
            names.push(name);
        }
    }

    names
}

pub fn read_player_names<S: Storage + ?Sized>(storage: &S, path: &str) -> Result<Vec<String>> {
    let data = storage.read_file(path)?;
    Ok(parse_player_names(&String::from_utf8_lossy(&data)))
}
