// Resource path resolution and loading

use super::ResourceError;
use log::debug;
use std::path::{Path, PathBuf};

/// Resource loader responsible for finding and reading resource documents
#[derive(Debug, Clone)]
pub struct ResourceLoader {
    base_path: PathBuf,
}

impl ResourceLoader {
    /// Create a new resource loader rooted at the given directory
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Get the full path a resource would have, whether or not it exists
    pub fn resolve_path(&self, name: &str) -> PathBuf {
        self.base_path.join(name)
    }

    /// Locate a resource on disk
    ///
    /// Returns `None` if the resource is not present in the resource directory.
    pub fn locate(&self, name: &str) -> Option<PathBuf> {
        let path = self.resolve_path(name);
        if path.is_file() {
            Some(path)
        } else {
            None
        }
    }

    /// Read a resource into a string
    pub fn load_string(&self, name: &str) -> Result<String, ResourceError> {
        let path = self
            .locate(name)
            .ok_or_else(|| ResourceError::NotFound(name.to_string()))?;

        debug!("Reading resource \"{}\"", path.display());

        Ok(std::fs::read_to_string(&path)?)
    }
}
