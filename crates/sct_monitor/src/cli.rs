use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(
    name = "sct_monitor",
    about = "Replay a mini-sct message stream and watch status, test results and console"
)]
pub struct Cli {
    /// Replay file: a JSON array of messages or newline-delimited JSON.
    pub replay: PathBuf,

    /// RON configuration file. Defaults are used when it does not exist.
    #[arg(long, default_value = crate::config::CONFIG_FILENAME)]
    pub config: PathBuf,

    /// Write the console log into this directory once the stream drains.
    #[arg(long)]
    pub export_dir: Option<PathBuf>,

    /// Clear the console after exporting it.
    #[arg(long)]
    pub clear_console: bool,
}
