//! In-memory entity store.
//!
//! The datastore is loaded once at startup, either from a JSON file or from
//! the built-in sample data, and then owned by the [`Repository`].

mod repository;
mod seed;

pub use repository::*;
pub use seed::sample_datastore;

use std::path::Path;

use crate::errors::AppError;
use crate::models::Datastore;

/// Load the datastore from `seed_path`, or fall back to the sample data.
pub async fn load_datastore(seed_path: Option<&Path>) -> Result<Datastore, AppError> {
    let Some(path) = seed_path else {
        tracing::info!("No seed file configured, using built-in sample data");
        return Ok(sample_datastore());
    };

    tracing::info!("Reading seed file {}", path.display());
    let raw = tokio::fs::read_to_string(path).await?;
    let datastore: Datastore = serde_json::from_str(&raw)?;

    tracing::info!(
        "Loaded seed file {} ({} communities, {} quizzes, {} sessions)",
        path.display(),
        datastore.communities.len(),
        datastore.quizzes.len(),
        datastore.sessions.len()
    );
    Ok(datastore)
}
