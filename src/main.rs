use clap::Parser;
use team_splitter::adapters::output::{render_finalized, TeamSheet};
use team_splitter::adapters::roster;
use team_splitter::domain::ports::Storage;
use team_splitter::utils::{logger, validation::Validate};
use team_splitter::{CliConfig, LocalStorage, SplitterError, TeamSplitter, TomlConfig};

fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    logger::init_logger(cli.verbose, cli.json_logs);

    tracing::info!("Team Splitter, version {}", env!("CARGO_PKG_VERSION"));
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            match TomlConfig::from_file(path) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("❌ Failed to load config file '{}': {}", path, e);
                    eprintln!("💡 {}", e.recovery_suggestion());
                    std::process::exit(e.exit_code());
                }
            }
        }
        None => TomlConfig::default(),
    };
    cli.apply_to(&mut config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }

    match run(&cli, &config) {
        Ok(()) => Ok(()),
        Err(e) => {
            tracing::error!(
                "❌ Split failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = e.exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
            Ok(())
        }
    }
}

fn run(cli: &CliConfig, config: &TomlConfig) -> Result<(), SplitterError> {
    let (roster_path, players_path) = config.input_paths()?;
    let storage = LocalStorage::default();

    let roster = roster::load_players(&storage, roster_path)?;
    tracing::info!("Loaded roster: {} players", roster.len());

    let names = roster::read_player_names(&storage, players_path)?;

    let mut splitter = TeamSplitter::new(roster, config.clone(), config.seed);
    let outcome = splitter.split(&names)?;

    for team in &outcome.teams {
        println!("{}", team);
    }

    let finalized = splitter.finalize(&outcome.teams);
    let sheet = render_finalized(&finalized);

    if cli.dry_run {
        tracing::info!("🔍 DRY RUN MODE - nothing is written");
        print!("{}", sheet);
        return Ok(());
    }

    storage.write_file(config.output_path(), sheet.as_bytes())?;

    if let Some(summary_path) = config.summary_path() {
        let summary = TeamSheet::new(&outcome, &finalized);
        storage.write_file(summary_path, &serde_json::to_vec_pretty(&summary)?)?;
        tracing::info!("📁 Summary saved to: {}", summary_path);
    }

    tracing::info!(
        "✅ Split completed with seed {} (score {} -> {})",
        outcome.seed,
        outcome.report.initial_score,
        outcome.report.final_score
    );
    println!("Done. Teams are saved as {}", config.output_path());
    Ok(())
}
