use clap::{Parser, Subcommand};
use credbridge_cli::commands::{diff, inspect, verify};
use credbridge_kernel::config::DEFAULT_MIN_DIFFERENTIAL;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "credbridge")]
#[command(about = "Operator tool for the cred score oracle bridge", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the persisted score history joined with the identity cache
    Inspect {
        #[arg(long, default_value = "cached-identities.json")]
        cache: PathBuf,

        #[arg(long, default_value = "credScores.json.old")]
        history: PathBuf,
    },
    /// Verify a proof document offline and print the address it proves.
    /// Accepts the raw {payload, signature} file or a contents-API response.
    VerifyProof {
        identity: String,
        file: PathBuf,
    },
    /// Dry-run a reconciliation using cached identities only
    Diff {
        /// Score snapshot of the last pass
        #[arg(long)]
        old: PathBuf,

        /// Freshly computed score snapshot
        #[arg(long)]
        new: PathBuf,

        #[arg(long)]
        cache: PathBuf,

        /// JSON array of feed names currently on the oracle
        #[arg(long)]
        feeds: Option<PathBuf>,

        #[arg(long, default_value_t = DEFAULT_MIN_DIFFERENTIAL, allow_negative_numbers = true)]
        min_differential: f64,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Inspect { cache, history } => inspect::run(&cache, &history),
        Commands::VerifyProof { identity, file } => verify::run(&identity, &file),
        Commands::Diff {
            old,
            new,
            cache,
            feeds,
            min_differential,
        } => diff::run(&old, &new, &cache, feeds.as_deref(), min_differential),
    }
}
