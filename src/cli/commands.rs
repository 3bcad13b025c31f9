use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tk", about = concat!("\u{25CF} tickle v", env!("CARGO_PKG_VERSION"), " - a task list that asks if you're focused"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Task document to open (default: tasks.txt in the data directory)
    #[arg(short = 'f', long = "file", global = true)]
    pub file: Option<PathBuf>,

    /// Config file to use (default: config.toml in the config directory)
    #[arg(long = "config", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the active task
    Active,
    /// List task lines
    List(ListArgs),
    /// Cycle a line through pending, active and closed
    Toggle(ToggleArgs),
    /// Look for marker problems in the document
    Check,
    /// Print a focus reminder for the active task
    Remind(RemindArgs),
    /// Show or change the reminder interval
    Interval(IntervalArgs),
}

#[derive(Args)]
pub struct ListArgs {
    /// Filter by status (pending, active, closed, comment)
    #[arg(long)]
    pub status: Option<String>,
    /// Filter by regex on the line body
    #[arg(long)]
    pub grep: Option<String>,
}

#[derive(Args)]
pub struct ToggleArgs {
    /// Line number, counting from 1
    pub line: usize,
}

#[derive(Args)]
pub struct RemindArgs {
    /// Keep running and print a reminder every interval
    #[arg(long)]
    pub watch: bool,
}

#[derive(Args)]
pub struct IntervalArgs {
    /// New interval in minutes (at least 1)
    pub minutes: Option<u32>,
}
