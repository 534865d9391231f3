//! Command-line interface for mazebound.

use clap::{Parser, Subcommand};

/// Mazebound - local-first maze game
#[derive(Parser, Debug)]
#[command(name = "mazebound")]
#[command(about = "Local-first maze game with remote levels", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play against a remote level server
    Play {
        /// Level server base URL (overrides SERVER_URL)
        #[arg(long)]
        server_url: Option<String>,

        /// Player identifier stamped on analytics (overrides PLAYER_ID)
        #[arg(long)]
        player: Option<String>,

        /// Follow directions from the server's movement queue as well
        #[arg(long)]
        remote_feed: bool,
    },

    /// Play offline against the embedded database (no network, no analytics)
    Local {
        /// Path to the SQLite database (created and seeded if missing)
        #[arg(long, default_value = "mazebound.db")]
        db_path: String,

        /// Player name used for saved progress
        #[arg(long, default_value = "anonymous")]
        player: String,
    },

    /// Run the level server
    Serve {
        /// Port to bind to
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Path to the SQLite database
        #[arg(long, default_value = "mazebound.db")]
        db_path: String,

        /// Seed the built-in sample stages if the database is empty
        #[arg(long)]
        seed: bool,
    },
}
