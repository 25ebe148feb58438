mod commands;
mod logging;
mod source;

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "eventhub")]
#[command(about = "Export EventHub calendar events to iCalendar or CSV")]
struct Cli {
    /// Increase log output (-v for info, -vv for debug). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export events to an .ics or .csv document
    Export {
        /// Output format: "ics" or "csv"
        #[arg(short, long)]
        format: String,

        /// Events file (JSON array or .ics). Reads stdin when omitted or "-"
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file, or "-" for stdout. Defaults to <output_dir>/events.<format>
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Only export events starting on or after this date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Only export events starting on or before this date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Length of events without an end time (e.g. "2h", "90m")
        #[arg(long)]
        duration: Option<String>,

        /// Time zone for timestamps without an offset and for CSV dates
        #[arg(long)]
        timezone: Option<String>,
    },
    /// Show the config file location and effective export settings
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Commands::Export {
            format,
            input,
            output,
            from,
            to,
            duration,
            timezone,
        } => {
            commands::export::run(commands::export::ExportArgs {
                format,
                input,
                output,
                from,
                to,
                duration,
                timezone,
            })
            .await
        }
        Commands::Config => commands::config::run(),
    }
}
