//! Tag map persisted as a JSON object on disk

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::domain::model::TagMap;
use crate::error::{QuadError, QuadResult};
use crate::ports::TagStorePort;

/// JSON file tag store; every save rewrites the whole file
pub struct JsonTagStore {
    path: PathBuf,
}

impl JsonTagStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn error(&self, message: impl Into<String>) -> QuadError {
        QuadError::TagStore {
            path: self.path.display().to_string(),
            message: message.into(),
        }
    }
}

impl TagStorePort for JsonTagStore {
    fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn load(&self) -> QuadResult<TagMap> {
        if !self.exists() {
            return Ok(TagMap::new());
        }

        let content = fs::read_to_string(&self.path).map_err(|e| self.error(e.to_string()))?;
        if content.trim().is_empty() {
            return Ok(TagMap::new());
        }

        serde_json::from_str(&content).map_err(|e| self.error(e.to_string()))
    }

    fn save(&self, tags: &TagMap) -> QuadResult<()> {
        let parent = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent).map_err(|e| self.error(e.to_string()))?;

        let mut content = serde_json::to_string_pretty(tags)?;
        content.push('\n');

        // Write next to the target and rename so readers never see a partial file
        let mut tmp = NamedTempFile::new_in(&parent).map_err(|e| self.error(e.to_string()))?;
        tmp.write_all(content.as_bytes())
            .map_err(|e| self.error(e.to_string()))?;
        tmp.persist(&self.path)
            .map_err(|e| self.error(e.error.to_string()))?;

        debug!("Saved {} tag records to {}", tags.len(), self.path.display());
        Ok(())
    }

    fn location(&self) -> PathBuf {
        self.path.clone()
    }
}
