//! Store management for somnio
//!
//! The store is the directory holding the dream database and configuration.
//! Default location: `.somnio/`

mod collaborator;
pub mod paths;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::EngineConfig;
use crate::db::Database;
use crate::error::{Result, SomnioError};

pub use collaborator::{
    NetworkConnection, NetworkLink, NetworkNode, PublicNetwork, SimilarDream, SimilarityEdge,
    SimilarityStore,
};
pub use paths::{CONFIG_FILE, DB_FILE, DEFAULT_STORE_DIR};

/// The somnio store
#[derive(Debug)]
pub struct Store {
    /// Root path of the store
    root: PathBuf,
    /// Engine configuration
    config: EngineConfig,
    /// SQLite database, shared with background similarity tasks
    db: Arc<Database>,
}

impl Store {
    /// Discover a store by walking up from the given root directory
    pub fn discover(root: &Path) -> Result<Self> {
        let store_path = paths::discover_store(root)?;
        Self::open(&store_path)
    }

    /// Open an existing store at the given path
    #[tracing::instrument(skip(path), fields(path = %path.display()))]
    pub fn open(path: &Path) -> Result<Self> {
        if !path.is_dir() {
            return Err(SomnioError::StoreNotFound {
                search_root: path.to_path_buf(),
            });
        }

        let config = EngineConfig::load_or_default(&path.join(CONFIG_FILE))?;
        let db = Database::open(&path.join(DB_FILE))?;

        Ok(Store {
            root: path.to_path_buf(),
            config,
            db: Arc::new(db),
        })
    }

    /// Initialize a new store under the given project root
    pub fn init(project_root: &Path) -> Result<Self> {
        Self::init_at(&project_root.join(DEFAULT_STORE_DIR))
    }

    /// Initialize a store at an explicit path
    ///
    /// Re-initializing an existing store keeps its data and configuration.
    pub fn init_at(store_root: &Path) -> Result<Self> {
        fs::create_dir_all(store_root)?;

        let config_path = store_root.join(CONFIG_FILE);
        if !config_path.exists() {
            EngineConfig::default().save(&config_path)?;
        }

        tracing::info!(path = %store_root.display(), "Initialized store");
        Self::open(store_root)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    /// The database as a shareable similarity collaborator
    pub fn collaborator(&self) -> Arc<dyn SimilarityStore> {
        self.db.clone()
    }
}
