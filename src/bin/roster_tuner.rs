use anyhow::{bail, Context};
use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::io::{self, BufRead, Write};
use std::path::Path;
use team_splitter::adapters::roster;
use team_splitter::core::tuner::{apply_judgement, pick_pair_same_role, TunerCommand};
use team_splitter::utils::logger;
use team_splitter::{LocalStorage, Player};

#[derive(Parser)]
#[command(name = "roster-tuner")]
#[command(about = "Interactive skill tuning for roster.json")]
struct Args {
    /// Path to roster.json
    roster: String,

    /// Seed for the pair selection
    #[arg(long)]
    seed: Option<u64>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn print_pair(a: &Player, b: &Player) {
    println!("\nCompare:");
    println!(" A) {} [{}] skill={}", a.name, a.role.code(), a.skill);
    println!(" B) {} [{}] skill={}", b.name, b.role.code(), b.skill);
    println!("Choose: a / b / eq / no / save / quit");
}

fn save(storage: &LocalStorage, path: &str, players: &[Player]) -> anyhow::Result<()> {
    roster::save_players(storage, path, players)
        .with_context(|| format!("failed to save roster to {}", path))
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    if !Path::new(&args.roster).exists() {
        bail!("File not found: {}", args.roster);
    }

    let storage = LocalStorage::default();
    let mut players = roster::load_players(&storage, &args.roster)
        .with_context(|| format!("failed to load roster from {}", args.roster))?;
    if players.is_empty() {
        bail!("The roster is empty.");
    }

    let mut rng = match args.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };

    println!("Loaded players: {} of {}", players.len(), args.roster);
    println!("Teams: a, b, eq (equal), no (no change), save, quit");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        let (i, j) = match pick_pair_same_role(&players, &mut rng) {
            Ok(pair) => pair,
            Err(e) => {
                println!("Error: {}", e);
                break;
            }
        };

        print_pair(&players[i], &players[j]);
        print!("> ");
        io::stdout().flush().context("failed to flush stdout")?;

        let Some(line) = lines.next() else {
            save(&storage, &args.roster, &players)?;
            println!("Saved and exit: {}", args.roster);
            break;
        };
        let line = line.context("failed to read command")?;

        match line.parse::<TunerCommand>() {
            Ok(TunerCommand::Quit) => {
                save(&storage, &args.roster, &players)?;
                println!("Saved and exit: {}", args.roster);
                break;
            }
            Ok(TunerCommand::Save) => {
                save(&storage, &args.roster, &players)?;
                println!("Saved: {}", args.roster);
            }
            Ok(TunerCommand::Judge(judgement)) => {
                let before = (players[i].skill, players[j].skill);
                if apply_judgement(&mut players, i, j, judgement) {
                    tracing::info!(
                        "{}: {} -> {}, {}: {} -> {}",
                        players[i].name,
                        before.0,
                        players[i].skill,
                        players[j].name,
                        before.1,
                        players[j].skill
                    );
                    println!(
                        "→ Updated: A is now {}, B is now {}.",
                        players[i].skill, players[j].skill
                    );
                    save(&storage, &args.roster, &players)?;
                    println!("Autosave: {}", args.roster);
                } else {
                    println!("→ All good, no changes.");
                }
            }
            Err(e) => println!("{}", e),
        }
    }

    Ok(())
}
