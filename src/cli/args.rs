//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Inspect accessibility hierarchies described in TOML fixtures
#[derive(Parser, Debug)]
#[command(name = "a11yh")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Insert every node as a root (flat element list), overriding settings
    #[arg(long, global = true)]
    pub flatten: bool,

    /// Print author and version
    #[arg(long)]
    pub info: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render the hierarchy as a tree
    Tree {
        /// Fixture file
        #[arg(value_hint = ValueHint::FilePath)]
        fixture: PathBuf,
        /// Show node frames
        #[arg(long)]
        frames: bool,
    },

    /// Lowest common ancestor of two nodes
    Lca {
        #[arg(value_hint = ValueHint::FilePath)]
        fixture: PathBuf,
        /// First node key
        a: String,
        /// Second node key
        b: String,
    },

    /// First node whose frame contains a point
    #[command(allow_negative_numbers = true)]
    Hit {
        #[arg(value_hint = ValueHint::FilePath)]
        fixture: PathBuf,
        x: f32,
        y: f32,
    },

    /// Reparent a node and print the result
    Move {
        #[arg(value_hint = ValueHint::FilePath)]
        fixture: PathBuf,
        /// Node key
        node: String,
        /// New parent key (default: make it a root)
        #[arg(short, long)]
        parent: Option<String>,
        /// Position among the new siblings (default: append)
        #[arg(short, long)]
        index: Option<usize>,
    },

    /// Remove a node and print the result
    Remove {
        #[arg(value_hint = ValueHint::FilePath)]
        fixture: PathBuf,
        /// Node key
        node: String,
        /// Graft the children onto the removed node's parent
        #[arg(long)]
        keep_children: bool,
    },

    /// Node count, roots and depth
    Stats {
        #[arg(value_hint = ValueHint::FilePath)]
        fixture: PathBuf,
    },

    /// Show effective settings
    Config,

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
