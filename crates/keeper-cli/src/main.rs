//! CLI frontend for the Keeper percentile dice engine.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "keeper",
    about = "Keeper: percentile skill checks and character sheets",
    version,
    propagate_version = true
)]
struct Cli {
    /// Rules config (TOML) overriding the default constants
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log engine decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command that rolls a check.
#[derive(Args)]
struct DiceArgs {
    /// Difficulty: normal, hard, extreme
    #[arg(short = 'D', long, default_value = "normal")]
    difficulty: String,

    /// Number of bonus dice
    #[arg(short, long, default_value = "0")]
    bonus: i64,

    /// Number of penalty dice
    #[arg(short, long, default_value = "0")]
    penalty: i64,

    /// Push the roll if it fails
    #[arg(long)]
    push: bool,

    /// RNG seed for a reproducible roll
    #[arg(short, long)]
    seed: Option<u64>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a character's identity, characteristics and weapons
    Sheet {
        /// Character sheet (JSON)
        file: PathBuf,
    },

    /// List a character's skills
    Skills {
        /// Character sheet (JSON)
        file: PathBuf,
    },

    /// Show every place a key appears on the sheet
    Find {
        /// Character sheet (JSON)
        file: PathBuf,

        /// Key to search for (e.g. Current, Brawl)
        key: String,
    },

    /// Roll a skill check for a character
    Check {
        /// Character sheet (JSON)
        file: PathBuf,

        /// Skill key or dotted path (e.g. "Spot Hidden", Skills.Fighting.Brawl)
        skill: String,

        #[command(flatten)]
        dice: DiceArgs,
    },

    /// Roll a check against a bare skill value
    Roll {
        /// Skill value (0-100)
        #[arg(allow_negative_numbers = true)]
        value: i64,

        #[command(flatten)]
        dice: DiceArgs,
    },

    /// Apply a delta to hit points, magic points, sanity or luck
    Adjust {
        /// Character sheet (JSON)
        file: PathBuf,

        /// Resource: hp, mp, san, luck
        resource: String,

        /// Signed change (e.g. -3, +5)
        #[arg(allow_negative_numbers = true)]
        delta: i64,

        /// Write the change back to the sheet
        #[arg(short, long)]
        write: bool,
    },

    /// Roll weapon damage including the damage bonus
    Damage {
        /// Character sheet (JSON)
        file: PathBuf,

        /// Weapon name (default: unarmed)
        #[arg(short, long)]
        weapon: Option<String>,

        /// RNG seed for a reproducible roll
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Start an interactive session with a character
    Play {
        /// Character sheet (JSON)
        file: PathBuf,

        /// RNG seed for a reproducible session
        #[arg(short, long)]
        seed: Option<u64>,

        /// Save resource changes to the sheet on exit
        #[arg(long)]
        save: bool,
    },
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose {
        "keeper_mechanics=debug,keeper=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = cli.config.as_deref();

    let result = match cli.command {
        Commands::Sheet { file } => commands::sheet::run(&file),
        Commands::Skills { file } => commands::skills::run(&file),
        Commands::Find { file, key } => commands::find::run(&file, &key),
        Commands::Check { file, skill, dice } => {
            commands::check::run(&file, &skill, &dice.into(), config)
        }
        Commands::Roll { value, dice } => commands::roll::run(value, &dice.into(), config),
        Commands::Adjust {
            file,
            resource,
            delta,
            write,
        } => commands::adjust::run(&file, &resource, delta, write),
        Commands::Damage { file, weapon, seed } => {
            commands::damage::run(&file, weapon.as_deref(), seed, config)
        }
        Commands::Play { file, seed, save } => commands::play::run(&file, seed, save, config),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

impl From<DiceArgs> for commands::RollOptions {
    fn from(args: DiceArgs) -> Self {
        Self {
            difficulty: args.difficulty,
            bonus: args.bonus,
            penalty: args.penalty,
            push: args.push,
            seed: args.seed,
            json: args.json,
        }
    }
}
