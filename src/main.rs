use bonspiel::dataset::{
    load_dataset_file, parse_hex_color, read_dataset_file, save_dataset_file, MatchStore,
    StoreError, TiePolicy,
};
use bonspiel::head_to_head::{category_matrices, head_to_head, HeadToHead};
use bonspiel::output;
use bonspiel::schedule::{draw_schedule, playoff_draws, team_schedule};
use bonspiel::session::{get_session_path, load_session_state, save_session_state, SessionState};
use bonspiel::standings::{division_tables, standings_for_category, Category};
use bonspiel::{buffered_eprintln, verbose_eprintln};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Instant;

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_DATASET: i32 = 1;
const EXIT_NOT_FOUND: i32 = 2;
const EXIT_IO: i32 = 3;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Interactive scoreboard (default if no subcommand)
    Tui,
    /// Print standings, ranked by wins, then differential, then points for
    Standings {
        /// Tab-separated output for scripting
        #[arg(long)]
        tsv: bool,
    },
    /// Print the draw schedule grouped by date
    Schedule,
    /// Print each team's matches, pinned teams first
    Teams,
    /// Print the bracket draws and their noted matches
    Playoffs,
    /// Print the round-robin head-to-head grid for each pool
    Matrix,
    /// Record a score for the match on a sheet in a draw
    Score {
        draw: u32,
        sheet: String,
        /// Score of the first listed team (negative values are stored as 0)
        #[arg(allow_negative_numbers = true)]
        score1: i64,
        /// Score of the second listed team
        #[arg(allow_negative_numbers = true)]
        score2: i64,
        /// Mark the match as completed
        #[arg(long = "final")]
        completed: bool,
    },
    /// Mark a match as not completed, keeping its scores
    Reopen { draw: u32, sheet: String },
    /// Show the result of the first completed meeting between two teams
    H2h { team: String, opponent: String },
    /// Set a team's display color (#rrggbb); omit the color to clear it
    Color { team: String, color: Option<String> },
    /// Pin a team to the top of the teams view
    Pin { team: String },
    /// Unpin a team
    Unpin { team: String },
    /// Replace the dataset with the contents of a JSON file
    Import { file: PathBuf },
    /// Write the current dataset to a JSON file
    Export { file: PathBuf },
    /// Interactive setup of the config file
    Init,
}

#[derive(Parser, Debug)]
#[command(name = "bonspiel")]
#[command(about = "Curling bonspiel scoreboard and standings", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/bonspiel/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Path to the dataset file (overrides data_path from the config)
    #[arg(short, long, global = true)]
    data: Option<PathBuf>,

    /// Category filter: A (all), M (men) or W (women)
    #[arg(long, global = true)]
    category: Option<Category>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Map an error to an exit code: store errors by kind, everything else is I/O
fn exit_code_for(e: &anyhow::Error) -> i32 {
    match e.downcast_ref::<StoreError>() {
        Some(se) if se.is_not_found() => EXIT_NOT_FOUND,
        Some(_) => EXIT_DATASET,
        None => EXIT_IO,
    }
}

fn fail(context: &str, e: anyhow::Error) -> ! {
    eprintln!("{}: {:#}", context, e);
    std::process::exit(exit_code_for(&e));
}

fn load_store(path: &Path, tie_policy: TiePolicy) -> MatchStore {
    verbose_eprintln!("Loading dataset from {}", path.display());
    match load_dataset_file(path, tie_policy) {
        Ok(store) => {
            verbose_eprintln!(
                "Loaded {} teams, {} draws, {} pools",
                store.teams().len(),
                store.draws().len(),
                store.pools().len()
            );
            store
        }
        Err(e) => {
            if !path.exists() {
                eprintln!("No dataset at {}.", path.display());
                eprintln!("Run `bonspiel init` or `bonspiel import <file>` first.");
                std::process::exit(EXIT_IO);
            }
            fail("Dataset error", e);
        }
    }
}

fn save_store(path: &Path, store: &MatchStore) {
    if let Err(e) = save_dataset_file(path, store.dataset()) {
        fail("Failed to save dataset", e);
    }
    verbose_eprintln!("Saved dataset to {}", path.display());
}

fn load_session(path: &Path) -> SessionState {
    match load_session_state(path) {
        Ok(state) => state,
        Err(e) => {
            buffered_eprintln!("Warning: ignoring session state: {:#}", e);
            SessionState::new()
        }
    }
}

fn require_team(store: &MatchStore, team_id: &str) {
    if store.get_team(team_id).is_none() {
        fail(
            "Lookup failed",
            StoreError::TeamNotFound(team_id.to_string()).into(),
        );
    }
}

/// Completed ties are accepted under the preserve policy; make them visible
fn warn_tied_finals(store: &MatchStore) {
    let tied = store.tied_finals();
    if tied.is_empty() {
        return;
    }
    eprintln!(
        "Note: {} completed match(es) tied; each counts as a loss for both teams:",
        tied.len()
    );
    for (draw_id, sheet) in tied {
        eprintln!("  draw {} sheet {}", draw_id, sheet);
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Tui);
    let start_time = Instant::now();
    bonspiel::stderr_buffer::set_verbose(cli.verbose);

    let config_path = cli.config.map(PathBuf::from);

    // Init runs before config loading so a broken config can be replaced
    if let Commands::Init = command {
        if let Err(e) = bonspiel::config::init::run_init_wizard(config_path) {
            eprintln!("Init failed: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
        std::process::exit(EXIT_SUCCESS);
    }

    // Load config
    let config = match bonspiel::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate config at startup
    if let Err(errors) = bonspiel::config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let data_path = cli.data.unwrap_or_else(|| config.data_path());
    let session_path = get_session_path();
    let tie_policy = config.tie_policy;
    verbose_eprintln!(
        "Dataset: {} (ties: {:?})",
        data_path.display(),
        tie_policy
    );

    let use_colors = output::should_use_colors();

    match command {
        Commands::Tui => {
            let save_debounce = match config.save_debounce() {
                Ok(d) => d,
                Err(e) => {
                    eprintln!("Config error: {:#}", e);
                    std::process::exit(EXIT_CONFIG);
                }
            };
            let store = load_store(&data_path, tie_policy);
            let mut session = load_session(&session_path);
            if let Some(category) = cli.category {
                session.category = Some(category);
            }
            let theme = bonspiel::tui::resolve_theme(config.theme);
            let app = bonspiel::tui::App::new(
                store,
                data_path,
                save_debounce,
                session,
                session_path,
                config,
                theme,
            );

            if let Err(e) = bonspiel::tui::run_tui(app).await {
                eprintln!("TUI error: {:#}", e);
                std::process::exit(EXIT_IO);
            }
        }
        Commands::Standings { tsv } => {
            let store = load_store(&data_path, tie_policy);
            let category = cli.category.unwrap_or(config.default_category);

            if tsv {
                let rows = standings_for_category(&store, category);
                println!("{}", output::format_standings_tsv(&rows));
            } else {
                let session = load_session(&session_path);
                let tables = division_tables(&store, category);
                println!(
                    "{}",
                    output::format_standings(&tables, &session.pinned, use_colors)
                );
            }
            warn_tied_finals(&store);
        }
        Commands::Schedule => {
            let store = load_store(&data_path, tie_policy);
            let category = cli.category.unwrap_or(config.default_category);
            let groups = draw_schedule(&store, category);
            println!("{}", output::format_schedule(&store, &groups, use_colors));
        }
        Commands::Playoffs => {
            let store = load_store(&data_path, tie_policy);
            let category = cli.category.unwrap_or(config.default_category);
            let draws = playoff_draws(&store, category);
            println!("{}", output::format_playoffs(&store, &draws, use_colors));
        }
        Commands::Teams => {
            let store = load_store(&data_path, tie_policy);
            let category = cli.category.unwrap_or(config.default_category);
            let session = load_session(&session_path);
            let schedules = team_schedule(&store, category, &session.pinned);
            println!(
                "{}",
                output::format_team_schedule(&store, &schedules, use_colors)
            );
        }
        Commands::Matrix => {
            let store = load_store(&data_path, tie_policy);
            let category = cli.category.unwrap_or(config.default_category);
            let matrices = category_matrices(&store, category);
            println!("{}", output::format_matrices(&matrices, use_colors));
        }
        Commands::Score {
            draw,
            sheet,
            score1,
            score2,
            completed,
        } => {
            let mut store = load_store(&data_path, tie_policy);
            if let Err(e) = store.commit_score(draw, &sheet, score1, score2, completed) {
                fail("Score rejected", e.into());
            }
            save_store(&data_path, &store);

            if let Some(m) = store.find_match(draw, &sheet) {
                println!(
                    "Draw {}: {}",
                    draw,
                    output::format_match_line(&store, m, use_colors)
                );
                if m.is_tied_final() {
                    eprintln!("Note: a tied final counts as a loss for both teams.");
                }
            }
        }
        Commands::Reopen { draw, sheet } => {
            let mut store = load_store(&data_path, tie_policy);
            let (score1, score2) = match store.find_match(draw, &sheet) {
                Some(m) => (i64::from(m.score1), i64::from(m.score2)),
                None => fail(
                    "Lookup failed",
                    StoreError::MatchNotFound {
                        draw_id: draw,
                        sheet: sheet.clone(),
                    }
                    .into(),
                ),
            };
            if let Err(e) = store.commit_score(draw, &sheet, score1, score2, false) {
                fail("Reopen failed", e.into());
            }
            save_store(&data_path, &store);
            println!("Draw {} sheet {} reopened ({}-{})", draw, sheet, score1, score2);
        }
        Commands::H2h { team, opponent } => {
            let store = load_store(&data_path, tie_policy);
            require_team(&store, &team);
            require_team(&store, &opponent);

            let result = head_to_head(&store, &team, &opponent);
            let name = |id: &str| {
                store
                    .get_team(id)
                    .map(|t| t.name.clone())
                    .unwrap_or_else(|| id.to_string())
            };
            let verdict = match result {
                HeadToHead::Win => "won",
                HeadToHead::Loss => "lost",
                HeadToHead::NoResult => "no completed meeting",
            };
            println!("{} vs {}: {}", name(&team), name(&opponent), verdict);
        }
        Commands::Color { team, color } => {
            let mut store = load_store(&data_path, tie_policy);
            let color = match color {
                Some(c) => match parse_hex_color(&c) {
                    Some((r, g, b)) => Some(format!("#{:02x}{:02x}{:02x}", r, g, b)),
                    None => {
                        eprintln!("Invalid color '{}': expected #rrggbb", c);
                        std::process::exit(EXIT_DATASET);
                    }
                },
                None => None,
            };
            if let Err(e) = store.set_team_color(&team, color.clone()) {
                fail("Lookup failed", e.into());
            }
            save_store(&data_path, &store);
            match color {
                Some(c) => println!("{} color set to {}", team, c),
                None => println!("{} color cleared", team),
            }
        }
        Commands::Pin { team } => {
            let store = load_store(&data_path, tie_policy);
            require_team(&store, &team);
            let mut session = load_session(&session_path);
            if session.pin(&team) {
                if let Err(e) = save_session_state(&session_path, &session) {
                    fail("Failed to save session state", e);
                }
                println!("Pinned {}", team);
            } else {
                println!("{} is already pinned", team);
            }
        }
        Commands::Unpin { team } => {
            let mut session = load_session(&session_path);
            if session.unpin(&team) {
                if let Err(e) = save_session_state(&session_path, &session) {
                    fail("Failed to save session state", e);
                }
                println!("Unpinned {}", team);
            } else {
                println!("{} was not pinned", team);
            }
        }
        Commands::Import { file } => {
            let dataset = match read_dataset_file(&file, tie_policy) {
                Ok(d) => d,
                Err(e) => fail("Import failed", e),
            };
            if let Err(e) = save_dataset_file(&data_path, &dataset) {
                fail("Import failed", e);
            }
            println!(
                "Imported {} teams, {} draws, {} pools into {}",
                dataset.teams.len(),
                dataset.draws.len(),
                dataset.pools.len(),
                data_path.display()
            );
        }
        Commands::Export { file } => {
            let store = load_store(&data_path, tie_policy);
            if let Err(e) = save_dataset_file(&file, store.dataset()) {
                fail("Export failed", e);
            }
            println!("Exported dataset to {}", file.display());
        }
        // Handled before config loading
        Commands::Init => {}
    }

    verbose_eprintln!("Done in {:?}", start_time.elapsed());
    std::process::exit(EXIT_SUCCESS);
}
