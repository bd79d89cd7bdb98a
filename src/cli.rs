use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Debug, Default, Parser)]
#[command(name = "pine")]
#[command(version)]
#[command(about = "A small modal terminal text editor")]
#[command(disable_version_flag = true)]
pub struct CliArgs {
    /// File or directory to open
    pub file: Option<PathBuf>,

    /// Log at debug level and show key diagnostics in the status bar
    #[arg(long)]
    pub debug: bool,

    /// Print version
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    version: Option<bool>,
}

pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}
