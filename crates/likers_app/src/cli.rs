use std::path::PathBuf;

use clap::Parser;

/// Interact with the users who liked the posts listed in a file.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Campaign configuration file (RON).
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// File with one post link per line. Overrides the configuration.
    #[arg(long = "custom-post-likers", value_name = "FILE")]
    pub targets: Option<PathBuf>,
    /// Device agent endpoint, e.g. http://192.168.1.20:9008. Overrides the configuration.
    #[arg(long, value_name = "URL")]
    pub device: Option<String>,
    /// Seed for the target order. Random when omitted.
    #[arg(long)]
    pub seed: Option<u64>,
    /// Also write the log to this file.
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
    /// Log debug messages.
    #[arg(short, long)]
    pub verbose: bool,
}
