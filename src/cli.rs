use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[clap(version, about, long_about = None)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create an empty repository in the current directory
    Init,

    /// Stage files or directories
    Add {
        #[clap(required = true)]
        paths: Vec<String>,
    },

    /// Record the staged snapshot on the current branch
    Commit {
        #[clap(short, long)]
        message: String,

        #[clap(long)]
        author: Option<String>,
    },

    /// Switch branches, restoring the working tree
    Checkout {
        #[clap(short = 'b')]
        create: bool,

        branch: String,
    },

    /// List, create or delete branches
    Branch {
        name: Option<String>,

        #[clap(short = 'd')]
        delete: bool,
    },

    /// Show commit history of the current branch
    Log {
        #[clap(short = 'n', default_value_t = 10)]
        count: usize,
    },

    /// Show staged, modified, deleted and untracked files
    Status,

    /// Print a stored object
    CatFile {
        #[clap(short = 'p')]
        pretty_print: bool,

        #[clap(short = 't')]
        show_type: bool,

        #[clap(short = 's')]
        show_size: bool,

        object_hash: String,
    },

    /// List staged paths
    LsFiles {
        #[clap(long)]
        stage: bool,
    },
}
