//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// PLaTOn - Edit, synchronize and preview PLaTOn resources
#[derive(Parser, Debug)]
#[command(name = "platon")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory holding config.toml, the credentials and the session
    #[arg(long, global = true, env = "PLATON_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Log in to PLaTOn through the browser
    ///
    /// The login page redirects to a callback URI; pass it to
    /// `platon callback` to finish the authentication.
    Connect {
        /// Only print the login URL
        #[arg(long)]
        no_browser: bool,
    },

    /// Finish the authentication from the redirect URI
    Callback {
        /// URI carrying access-token, refresh-token and optionally resource
        uri: String,
    },

    /// Open a resource as a local working copy
    ///
    /// Examples:
    ///   platon open 01234567-89ab-cdef-aaaa-0123456789ab
    Open {
        /// Resource ID
        id: String,
    },

    /// Synchronize working copies with PLaTOn
    ///
    /// With a path, syncs the resource containing it. Without, syncs every
    /// registered workspace folder.
    Sync {
        /// File or directory inside a working copy
        path: Option<PathBuf>,

        /// Output the reports as JSON
        #[arg(long)]
        json: bool,
    },

    /// Sync a resource and write its live preview
    Preview {
        /// File or directory inside a working copy (defaults to the current directory)
        path: Option<PathBuf>,

        /// Open the preview in the browser
        #[arg(long)]
        open: bool,
    },

    /// List the links of a .ple file
    Links {
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show keyword documentation at a position (zero-based)
    Hover {
        file: PathBuf,
        line: u32,
        column: u32,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List completion items for .ple files
    Complete {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List registered workspace folders
    Folders {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
