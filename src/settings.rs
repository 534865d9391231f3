//! Environment-backed runtime configuration.

use derive_getters::Getters;
use tracing::debug;

/// Default database file when none is configured.
pub const DEFAULT_DB_PATH: &str = "mazebound.db";

/// Player id used when none is configured.
pub const DEFAULT_PLAYER_ID: &str = "anonymous";

/// Runtime settings sourced from the process environment.
///
/// `.env` files are honored when the binary loads them via `dotenvy` at
/// startup. Command-line flags override these values.
#[derive(Debug, Clone, Getters)]
pub struct Settings {
    /// Base URL of the level server (`SERVER_URL`).
    server_url: Option<String>,
    /// Player identifier stamped on analytics (`PLAYER_ID`).
    player_id: String,
    /// SQLite database path for the offline client and server (`DB_PATH`).
    db_path: String,
}

impl Settings {
    /// Reads settings from the process environment.
    pub fn from_env() -> Self {
        let settings = Self {
            server_url: std::env::var("SERVER_URL").ok(),
            player_id: std::env::var("PLAYER_ID")
                .unwrap_or_else(|_| DEFAULT_PLAYER_ID.to_string()),
            db_path: std::env::var("DB_PATH").unwrap_or_else(|_| DEFAULT_DB_PATH.to_string()),
        };
        debug!(?settings, "Settings loaded from environment");
        settings
    }
}
