//! JSON backup/restore of the review mapping.
//! Files use the same shape as the stored value, so a backup can be restored verbatim.

use crate::error::PersistenceError;
use crate::models::CardMap;
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;
use tracing::info;

/// Exports the mapping to a pretty-printed JSON file at `path`.
pub fn export_json_to_path(cards: &CardMap, path: impl AsRef<Path>) -> Result<(), PersistenceError> {
    let path = path.as_ref();
    let json_string = serde_json::to_string_pretty(cards)?;
    let mut file = File::create(path)?;
    file.write_all(json_string.as_bytes())?;
    info!(path = %path.display(), cards = cards.len(), "review mapping exported");
    Ok(())
}

/// Imports a mapping from a JSON file.
/// Returns an error if the file doesn't exist or contains invalid JSON.
pub fn import_json(path: impl AsRef<Path>) -> Result<CardMap, PersistenceError> {
    let file = File::open(path.as_ref())?;
    let cards: CardMap = serde_json::from_reader(BufReader::new(file))?;
    Ok(cards)
}
