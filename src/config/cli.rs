use crate::config::toml_config::TomlConfig;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "team-splitter")]
#[command(about = "Split players into 2 or 4 balanced teams")]
#[command(version)]
pub struct CliConfig {
    /// The roster of all players with skill (JSON)
    #[arg(short, long)]
    pub roster: Option<String>,

    /// Text file with player names for today's game
    #[arg(short, long)]
    pub players: Option<String>,

    /// Output file for finalized lists [default: final_teams.txt]
    #[arg(short, long)]
    pub output: Option<String>,

    /// Also write a JSON summary of the run
    #[arg(long)]
    pub summary: Option<String>,

    /// Seed for a reproducible split
    #[arg(long)]
    pub seed: Option<u64>,

    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    /// Log as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    /// Print the teams without writing any file
    #[arg(long)]
    pub dry_run: bool,
}

impl CliConfig {
    /// Command line flags win over the config file.
    pub fn apply_to(&self, config: &mut TomlConfig) {
        if let Some(roster) = &self.roster {
            config.input.roster = Some(roster.clone());
        }
        if let Some(players) = &self.players {
            config.input.players = Some(players.clone());
        }
        if let Some(output) = &self.output {
            config.output.path = output.clone();
        }
        if let Some(summary) = &self.summary {
            config.output.summary_path = Some(summary.clone());
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
    }
}
