mod graph;
mod layout;
mod logging;
mod parser;
mod tui;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use tui::canvas::{self, SessionOptions};

#[derive(Parser)]
#[command(
    name = "graphos",
    about = "An interactive terminal graph visualizer and editor"
)]
struct Cli {
    /// Edge-list file to load and save (`nodeA nodeB [weight]` per line)
    file: Option<PathBuf>,
    /// Launch with a built-in sample graph (no file required)
    #[arg(long)]
    demo: bool,
    /// Treat edges as directed
    #[arg(long)]
    directed: bool,
    /// Session event log destination
    #[arg(long, default_value = "graphos.log")]
    log_file: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log_file)?;
    canvas::run(SessionOptions {
        file: cli.file,
        demo: cli.demo,
        directed: cli.directed,
    })
}
