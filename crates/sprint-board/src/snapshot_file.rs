//! JSON snapshot files, for offline analysis and reproducible reports.

use std::path::Path;

use sprint_core::board::BoardSnapshot;

use crate::error::BoardError;

/// Read a snapshot previously written by [`save_snapshot_file`] or by hand.
///
/// # Errors
///
/// Returns [`BoardError::Io`] when the file cannot be read and
/// [`BoardError::Malformed`] when it is not a valid snapshot.
pub fn load_snapshot_file(path: &Path) -> Result<BoardSnapshot, BoardError> {
    let contents = std::fs::read_to_string(path).map_err(|source| BoardError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let snapshot: BoardSnapshot = serde_json::from_str(&contents)
        .map_err(|e| BoardError::Malformed(format!("{}: {e}", path.display())))?;
    tracing::debug!(path = %path.display(), cards = snapshot.cards.len(), "loaded snapshot file");
    Ok(snapshot)
}

/// Write `snapshot` as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`BoardError::Io`] when the file cannot be written.
pub fn save_snapshot_file(snapshot: &BoardSnapshot, path: &Path) -> Result<(), BoardError> {
    let json = serde_json::to_string_pretty(snapshot)?;
    std::fs::write(path, json).map_err(|source| BoardError::Io {
        path: path.to_path_buf(),
        source,
    })
}
