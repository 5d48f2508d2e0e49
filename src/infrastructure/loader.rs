//! Fixture loading through the filesystem abstraction.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::Fixture;
use crate::infrastructure::traits::FileSystem;
use crate::infrastructure::{InfraError, InfraResult};

pub struct FixtureLoader {
    fs: Arc<dyn FileSystem>,
    base_dir: Option<PathBuf>,
}

impl FixtureLoader {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs, base_dir: None }
    }

    /// Resolve relative fixture paths against `dir` instead of the cwd.
    pub fn with_base_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.base_dir = dir;
        self
    }

    pub fn resolve(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(base) if path.is_relative() && !self.fs.exists(path) => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, path: &Path) -> InfraResult<Fixture> {
        let path = self.resolve(path);
        if !self.fs.is_file(&path) {
            return Err(InfraError::FixtureNotFound(path));
        }
        let content = self
            .fs
            .read_to_string(&path)
            .map_err(|e| InfraError::io(format!("read fixture {}", path.display()), e))?;
        let fixture = Fixture::parse(&content).map_err(|e| InfraError::Fixture {
            path: path.clone(),
            message: e.to_string(),
        })?;
        debug!(path = %path.display(), nodes = fixture.nodes.len(), "fixture loaded");
        Ok(fixture)
    }
}
