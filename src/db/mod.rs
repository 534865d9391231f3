//! Database persistence layer for maze stages and player progress.

use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

mod error;
mod handle;
mod models;
mod repository;
mod schema;
mod seed;

pub use error::DbError;
pub use handle::DbHandle;
pub use models::{NewProgressRow, NewStageRow, ProgressRow, StageRow};
pub use repository::MazeRepository;
pub use seed::sample_stages;

/// Schema migrations compiled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Applies any pending schema migrations to the database at `db_path`,
/// creating the file if it does not exist.
///
/// # Errors
///
/// Returns [`DbError`] if the database cannot be opened or a migration
/// fails.
pub fn run_migrations(db_path: &str) -> Result<(), DbError> {
    let mut conn = SqliteConnection::establish(db_path)
        .map_err(|e| DbError::new(format!("Failed to connect to '{}': {}", db_path, e)))?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| DbError::new(format!("Migrations failed: {}", e)))?;
    Ok(())
}
