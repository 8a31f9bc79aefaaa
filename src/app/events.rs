// LogTally - app/events.rs
//
// Loads the events configuration file from disk and hands its content to
// the core filter-set parser. Any failure here is fatal for the run.

use crate::core::events;
use crate::core::filter::EventFilter;
use crate::util::error::ConfigError;
use std::path::Path;

/// Read and parse the events file at `path`, preserving line order.
pub fn load_events_file(path: &Path) -> Result<Vec<EventFilter>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::EventsFileIo {
        path: path.to_path_buf(),
        source,
    })?;

    let filters = events::parse_events(&content)?;

    if filters.is_empty() {
        tracing::warn!(path = %path.display(), "Events file defines no filters");
    } else {
        tracing::info!(path = %path.display(), filters = filters.len(), "Loaded event filters");
    }

    Ok(filters)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loads_filters_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.txt");
        std::fs::write(&path, "GNMI --level ERROR\nTELEMETRY --count\n").unwrap();

        let filters = load_events_file(&path).unwrap();
        assert_eq!(filters.len(), 2);
        assert_eq!(filters[0].event_type, "GNMI");
        assert!(filters[1].count_only);
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_events_file(&dir.path().join("absent.txt")).unwrap_err();
        assert!(matches!(err, ConfigError::EventsFileIo { .. }));
    }
}
