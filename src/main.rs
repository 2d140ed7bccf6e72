use clap::Parser;

mod cli;
mod command_handler;
mod commands;
mod index;
mod objects;
mod refs;
mod repo;
mod worktree;

use cli::Cli;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = command_handler::handle_command(cli.command) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
