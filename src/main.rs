use clap::Parser;
use tickle::cli::commands::Cli;
use tickle::cli::handlers::{self, Paths};
use tickle::io::logging;

fn main() {
    let cli = Cli::parse();

    match cli.command {
        None => {
            // No subcommand → launch TUI
            let paths = Paths::from_cli(&cli);
            if let Err(e) = logging::init_tui_logging(&logging::log_file_path()) {
                eprintln!("warning: logging disabled: {}", e);
            }
            if let Err(e) = tickle::tui::run(&paths.document, &paths.config) {
                tracing::error!(error = %e, "editor exited with an error");
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
        Some(_) => {
            logging::init_cli_logging();
            if let Err(e) = handlers::dispatch(cli) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
    }
}
