mod commands;
mod logging;
mod progress;

use anyhow::Result;
use availsync_core::config::ConfigOverrides;
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "availsync")]
#[command(
    about = "Mirror busy time from your primary calendar into an availability calendar",
    long_about = "Without a subcommand, deletes every event in the availability calendar over \
                  the next days and re-creates one \"Busy\" block per busy event of the source \
                  calendar."
)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    sync: SyncArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Authenticate with Google and save the session
    Auth,
    /// List your calendars and their ids
    Calendars,
}

#[derive(Args, Default)]
struct SyncArgs {
    /// Number of days ahead to mirror (default 7)
    #[arg(short, long)]
    days: Option<i64>,

    /// Calendar to fill with busy blocks (overrides config and environment)
    #[arg(short, long = "mirror-calendar")]
    mirror_calendar: Option<String>,

    /// Calendar to read busy time from (default "primary")
    #[arg(short, long = "source-calendar")]
    source_calendar: Option<String>,

    /// Stop at the first failed delete or create
    #[arg(long)]
    fail_fast: bool,

    /// Show what would be deleted and created without changing anything
    #[arg(long)]
    dry_run: bool,
}

impl From<SyncArgs> for ConfigOverrides {
    fn from(args: SyncArgs) -> Self {
        ConfigOverrides {
            mirror_calendar_id: args.mirror_calendar,
            source_calendar_id: args.source_calendar,
            days: args.days,
            fail_fast: args.fail_fast,
            dry_run: args.dry_run,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init();

    match cli.command {
        Some(Commands::Auth) => commands::auth::run().await,
        Some(Commands::Calendars) => commands::calendars::run().await,
        None => commands::sync::run(cli.sync.into()).await,
    }
}
