use clap::{Parser, Subcommand, ValueEnum};
use kyotei_rank::race::session::{Board, RankSettings};
use kyotei_rank::race::RaceOutcome;
use kyotei_rank::scoring::Normalization;
use std::path::PathBuf;

const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(ValueEnum, Clone, Copy, Debug, Default)]
enum Format {
    /// Rank cards and tables
    #[default]
    Cards,
    /// Tab-separated rows for scripting
    Tsv,
    /// Pretty-printed JSON
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Rank every race in a race sheet
    Rank {
        /// Race sheet (YAML)
        sheet: PathBuf,

        /// Which ranking to show
        #[arg(short, long, value_enum, default_value_t = Board::All)]
        board: Board,

        /// Percentage mode for detail scoring (overrides config)
        #[arg(short, long, value_enum)]
        normalize: Option<Normalization>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Cards)]
        format: Format,

        /// Also write the rankings as JSON to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show the exhibition comparison table for each race
    Compare {
        /// Race sheet (YAML)
        sheet: PathBuf,
    },
    /// Process a race sheet and show the venue bias it leaves behind
    Bias {
        /// Race sheet (YAML)
        sheet: PathBuf,
    },
    /// Write a config file
    Init {
        /// Write the defaults without asking
        #[arg(long)]
        defaults: bool,

        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Parser, Debug)]
#[command(name = "kyotei-rank")]
#[command(
    about = "Boat-race entrant ranking from marks, stats and exhibition times",
    long_about = None
)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/kyotei-rank/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

fn main() {
    let cli = Cli::parse();
    kyotei_rank::logging::init(cli.verbose);

    let config_path = cli.config.map(PathBuf::from);

    if let Commands::Init { defaults, force } = cli.command {
        if let Err(e) = kyotei_rank::config::init::run_init(config_path, defaults, force) {
            eprintln!("Init failed: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
        std::process::exit(EXIT_SUCCESS);
    }

    // Load config
    let config = match kyotei_rank::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate config at startup
    if let Err(errors) = kyotei_rank::config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let marks = match config.mark_table() {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Config error: {}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    let (sheet_path, board, normalize) = match cli.command {
        Commands::Rank {
            ref sheet,
            board,
            normalize,
            ..
        } => (sheet.clone(), board, normalize),
        Commands::Compare { ref sheet } | Commands::Bias { ref sheet } => {
            (sheet.clone(), Board::Corrected, None)
        }
        Commands::Init { .. } => unreachable!("handled above"),
    };

    let sheet = match kyotei_rank::race::load_sheet(&sheet_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Race sheet error: {:#}", e);
            std::process::exit(EXIT_INPUT);
        }
    };

    let today = chrono::Local::now().date_naive();
    if let Err(errors) = kyotei_rank::race::validate_sheet(&sheet, &config.venues(), today) {
        eprintln!("Race sheet errors in {}:", sheet_path.display());
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_INPUT);
    }

    let settings = RankSettings {
        marks,
        weights: config.weights(),
        normalization: normalize.unwrap_or_else(|| config.normalization()),
        board,
        today,
    };

    // One bias store per invocation: it lives exactly as long as the session
    let mut store = config.bias_store();
    let mut outcomes: Vec<RaceOutcome> = Vec::with_capacity(sheet.races.len());
    for (i, entry) in sheet.races.iter().enumerate() {
        match kyotei_rank::race::process_race(entry, &settings, &mut store) {
            Ok(outcome) => outcomes.push(outcome),
            Err(e) => {
                eprintln!("races[{}] ({} {}R): {}", i, entry.venue, entry.race, e);
                std::process::exit(EXIT_INPUT);
            }
        }
    }

    let use_colors = !cli.no_color && kyotei_rank::output::should_use_colors();

    match cli.command {
        Commands::Rank { format, output, .. } => {
            match format {
                Format::Cards => print_cards(&outcomes, &sheet, use_colors),
                Format::Tsv => print_tsv(&outcomes),
                Format::Json => match kyotei_rank::output::to_json(&outcomes) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("Export failed: {:#}", e);
                        std::process::exit(EXIT_INPUT);
                    }
                },
            }

            if let Some(path) = output {
                if let Err(e) = kyotei_rank::output::save_export(&path, &outcomes) {
                    eprintln!("Export failed: {:#}", e);
                    std::process::exit(EXIT_INPUT);
                }
                eprintln!("Rankings written to {}", path.display());
            }
        }
        Commands::Compare { .. } => {
            for outcome in &outcomes {
                println!(
                    "{}",
                    kyotei_rank::output::format_race_header(&outcome.context, use_colors)
                );
                match outcome.comparison {
                    Some(ref rows) => println!(
                        "{}",
                        kyotei_rank::output::format_comparison_table(rows, use_colors)
                    ),
                    None => println!("No exhibition data."),
                }
            }
        }
        Commands::Bias { .. } => {
            let venues = store.venues();
            if venues.is_empty() {
                println!("No confirmed races in {}.", sheet_path.display());
            }
            for venue in venues {
                let retained = store.history(venue).map_or(0, |h| h.len());
                println!(
                    "{}\tbias {:+.4}\t{} deltas (window {})",
                    venue,
                    store.current_bias(venue),
                    retained,
                    store.window()
                );
            }
        }
        Commands::Init { .. } => unreachable!("handled above"),
    }

    std::process::exit(EXIT_SUCCESS);
}

fn print_cards(outcomes: &[RaceOutcome], sheet: &kyotei_rank::race::RaceSheet, use_colors: bool) {
    for (outcome, entry) in outcomes.iter().zip(&sheet.races) {
        println!(
            "{}",
            kyotei_rank::output::format_race_header(&outcome.context, use_colors)
        );
        if let Some(ref ranked) = outcome.simple {
            println!(
                "{}",
                kyotei_rank::output::format_rank_cards("簡易ランキング", ranked, None, use_colors)
            );
        }
        if let Some(ref ranked) = outcome.detail {
            println!(
                "{}",
                kyotei_rank::output::format_rank_cards(
                    "詳細ランキング",
                    ranked,
                    entry.detail.as_ref(),
                    use_colors
                )
            );
        }
        if let Some(ref ranked) = outcome.corrected {
            println!(
                "{}",
                kyotei_rank::output::format_corrected(ranked, outcome.bias, use_colors)
            );
        }
        if outcome.recorded {
            println!("(result recorded for {})", outcome.context.venue);
        }
    }
}

fn print_tsv(outcomes: &[RaceOutcome]) {
    for outcome in outcomes {
        let mut blocks = Vec::new();
        if let Some(ref ranked) = outcome.simple {
            blocks.push(kyotei_rank::output::format_tsv("simple", ranked));
        }
        if let Some(ref ranked) = outcome.detail {
            blocks.push(kyotei_rank::output::format_tsv("detail", ranked));
        }
        if let Some(ref ranked) = outcome.corrected {
            blocks.push(kyotei_rank::output::format_corrected_tsv(ranked));
        }
        for block in blocks {
            for line in block.lines() {
                println!(
                    "{}\t{}\t{}\t{}",
                    outcome.context.date, outcome.context.venue, outcome.context.race, line
                );
            }
        }
    }
}
