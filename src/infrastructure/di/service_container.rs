//! Service container for dependency injection
//!
//! Wires up the fixture loader and hierarchy builder from settings.

use std::sync::Arc;

use crate::application::HierarchyBuilder;
use crate::config::Settings;
use crate::infrastructure::loader::FixtureLoader;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        let settings = Arc::new(settings);

        Self { settings, fs }
    }

    pub fn loader(&self) -> FixtureLoader {
        FixtureLoader::new(Arc::clone(&self.fs)).with_base_dir(self.settings.fixture_dir.clone())
    }

    pub fn builder(&self) -> HierarchyBuilder {
        HierarchyBuilder::new().flatten(self.settings.flatten)
    }
}
