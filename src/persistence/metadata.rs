use crate::domain::View;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// UI preferences stored in meta.json
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppMetadata {
    #[serde(default)]
    pub active_date: Option<String>,
    #[serde(default)]
    pub active_branch: Option<String>,
    #[serde(default)]
    pub view: View,
}

/// Load app metadata from meta.json file
pub fn load_metadata<P: AsRef<Path>>(path: P) -> Result<AppMetadata> {
    let path = path.as_ref();

    if !path.exists() {
        return Ok(AppMetadata::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read metadata: {}", path.display()))?;
    let metadata: AppMetadata = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse metadata: {}", path.display()))?;
    Ok(metadata)
}

/// Save app metadata to meta.json file
pub fn save_metadata<P: AsRef<Path>>(path: P, metadata: &AppMetadata) -> Result<()> {
    let json = serde_json::to_string_pretty(metadata)?;
    crate::persistence::atomic_write(path, &json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_nonexistent_metadata() {
        let temp_dir = tempdir().unwrap();
        let meta_path = temp_dir.path().join("meta.json");

        let metadata = load_metadata(&meta_path).unwrap();
        assert_eq!(metadata, AppMetadata::default());
        assert_eq!(metadata.view, View::Itinerary);
    }

    #[test]
    fn test_save_and_load_metadata() {
        let temp_dir = tempdir().unwrap();
        let meta_path = temp_dir.path().join("meta.json");

        let metadata = AppMetadata {
            active_date: Some("08/08".to_string()),
            active_branch: Some("B".to_string()),
            view: View::Toolbox,
        };
        save_metadata(&meta_path, &metadata).unwrap();

        let loaded = load_metadata(&meta_path).unwrap();
        assert_eq!(loaded, metadata);
    }

    #[test]
    fn test_corrupt_metadata_is_an_error() {
        let temp_dir = tempdir().unwrap();
        let meta_path = temp_dir.path().join("meta.json");
        std::fs::write(&meta_path, "{{").unwrap();

        assert!(load_metadata(&meta_path).is_err());
    }
}
