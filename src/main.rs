use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::info;

use codebreaker::error::Result;
use codebreaker::game::{
    format_clue_file, generate_clues, read_clue_file, ClueConvention, GeneratorConfig, Settings,
};
use codebreaker::model::{Secret, Symbol};
use codebreaker::solver::{BacktrackingBackend, MastermindModel, SolutionEnumerator};

#[derive(Parser)]
#[command(name = "codebreaker", version, about = "Find every secret consistent with Mastermind clues")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print every secret consistent with a clue file.
    Solve {
        clue_file: PathBuf,

        /// How the middle column of the clue file is scored.
        #[arg(long, value_enum)]
        convention: Option<ClueConvention>,

        /// JSON settings file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Write the constraint model in LP format before solving.
        #[arg(long)]
        dump_model: Option<PathBuf>,

        /// Give up on a single solve after this many search nodes.
        #[arg(long)]
        node_limit: Option<u64>,

        /// Stop after this many secrets.
        #[arg(long)]
        limit: Option<usize>,

        /// Print the secrets as one JSON array.
        #[arg(long)]
        json: bool,
    },
    /// Print a random clue file with a hidden secret.
    Generate {
        #[arg(long, default_value_t = 4)]
        length: usize,

        #[arg(long, default_value = "ABCDEF")]
        symbols: String,

        /// Maximum number of clues.
        #[arg(long, default_value_t = 12)]
        clues: usize,

        #[arg(long)]
        seed: Option<u64>,

        #[arg(long, value_enum, default_value_t = ClueConvention::WhitePegs)]
        convention: ClueConvention,
    },
}

fn init_logging() {
    env_logger::init();
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Solve {
            clue_file,
            convention,
            config,
            dump_model,
            node_limit,
            limit,
            json,
        } => Settings::load(config.as_deref()).and_then(|mut settings| {
            if let Some(convention) = convention {
                settings.convention = convention;
            }
            if dump_model.is_some() {
                settings.dump_model = dump_model;
            }
            if node_limit.is_some() {
                settings.node_limit = node_limit;
            }
            solve(&clue_file, &settings, limit, json)
        }),
        Command::Generate {
            length,
            symbols,
            clues,
            seed,
            convention,
        } => generate(
            GeneratorConfig {
                code_length: length,
                symbols: Symbol::sequence(&symbols),
                max_clues: clues,
                seed,
            },
            convention,
        ),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn solve(path: &Path, settings: &Settings, limit: Option<usize>, json: bool) -> Result<()> {
    let clue_set = read_clue_file(path, settings)?;
    info!(
        "{} clues, code length {}, alphabet {}",
        clue_set.len(),
        clue_set.code_length(),
        clue_set.alphabet()
    );

    let model = MastermindModel::from_clue_set(&clue_set)?;
    if let Some(dump) = &settings.dump_model {
        let mut writer = BufWriter::new(File::create(dump)?);
        model.constraints().write_lp(&mut writer)?;
        writer.flush()?;
        info!("Wrote model to {}", dump.display());
    }

    let backend = BacktrackingBackend::with_node_limit(settings.node_limit);
    let enumerator = SolutionEnumerator::new(model, backend).take(limit.unwrap_or(usize::MAX));

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut count = 0;
    if json {
        let secrets = enumerator.collect::<Result<Vec<Secret>>>()?;
        count = secrets.len();
        let strings: Vec<String> = secrets.iter().map(Secret::to_string).collect();
        serde_json::to_writer(&mut out, &strings)?;
        writeln!(out)?;
    } else {
        for secret in enumerator {
            writeln!(out, "{}", secret?)?;
            count += 1;
        }
    }
    info!("Found {} secrets", count);
    Ok(())
}

fn generate(config: GeneratorConfig, convention: ClueConvention) -> Result<()> {
    let puzzle = generate_clues(&config)?;
    info!(
        "Secret {} (seed {}, {})",
        puzzle.secret,
        puzzle.seed,
        if puzzle.unique { "unique" } else { "not unique" }
    );
    print!("{}", format_clue_file(&puzzle.clue_set, convention)?);
    Ok(())
}
