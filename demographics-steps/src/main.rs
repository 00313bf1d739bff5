mod demographics;
mod inspect;
mod progress;
mod utils;

use {
    std::path::PathBuf,
    anyhow::Result,
    clap::{Parser, Subcommand},
    tracing::info,
    demographics_core::config::Config,
    crate::{
        demographics::run_demographics_step,
        inspect::run_inspect_step,
        utils::init_logging,
    },
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Predicts user demographics from tweets")]
struct Cli {
    /// Config file, instead of ./config.toml or /config/config.toml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log at debug level, including confusion matrices
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Aggregate features, evaluate models and write per-schema reports
    Run,
    /// Print the text features of one line of text
    Inspect {
        text: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load(),
    };

    match &cli.command {
        Command::Run => {
            info!("running demographics prediction");
            run_demographics_step(&config)
        },
        Command::Inspect { text } => run_inspect_step(&config, text),
    }
}
