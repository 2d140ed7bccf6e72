use crate::cli::Commands;
use crate::commands::{
    add::add_command,
    branch::branch_command,
    cat_file::cat_file_command,
    checkout::checkout_command,
    commit::commit_command,
    init::init_command,
    log::log_command,
    ls_files::ls_files_command,
    status::status_command,
};
use anyhow::Result;

pub fn handle_command(command: Commands) -> Result<()> {
    match command {
        Commands::Init => {
            init_command()?;
        }
        Commands::Add { paths } => {
            add_command(&paths)?;
        }
        Commands::Commit { message, author } => {
            commit_command(&message, author)?;
        }
        Commands::Checkout { create, branch } => {
            checkout_command(&branch, create)?;
        }
        Commands::Branch { name, delete } => {
            branch_command(name, delete)?;
        }
        Commands::Log { count } => {
            log_command(count)?;
        }
        Commands::Status => {
            status_command()?;
        }
        Commands::CatFile {
            pretty_print,
            show_type,
            show_size,
            object_hash,
        } => {
            cat_file_command(pretty_print, show_type, show_size, &object_hash)?;
        }
        Commands::LsFiles { stage } => {
            ls_files_command(stage)?;
        }
    }
    Ok(())
}
