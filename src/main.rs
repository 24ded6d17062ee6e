use clap::Parser;
use env_logger::Env;
use log::error;

use uniprot_ru::cli::{Cli, Commands};
use uniprot_ru::commands;

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Uniprot(cmd) => commands::uniprot::command(cmd),
    };

    if let Err(e) = result {
        error!("{}", e);
        std::process::exit(1);
    }
}
