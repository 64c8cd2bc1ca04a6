//! Composition root: turns configuration into concrete services.

use anyhow::{Context as _, Result};
use staffdesk_application::{SearchAggregator, SearchController, SessionManager};
use staffdesk_core::config::RootConfig;
use staffdesk_infrastructure::paths::StaffdeskPaths;
use staffdesk_infrastructure::{
    ApiClient, ConfigService, HttpDirectoryService, HttpIdentityProvider, SharedStorage,
};
use std::path::PathBuf;
use std::sync::Arc;

pub struct Context {
    pub config: RootConfig,
    client: ApiClient,
    storage: SharedStorage,
}

impl Context {
    pub fn load(config_path: Option<PathBuf>) -> Result<Self> {
        let config = ConfigService::new(config_path)
            .get_config()
            .context("Failed to load configuration")?;

        let session_file = match &config.session.storage_file {
            Some(path) => path.clone(),
            None => StaffdeskPaths::session_file()?,
        };
        let storage = SharedStorage::persistent(&session_file)
            .with_context(|| format!("Failed to open session file {}", session_file.display()))?;
        let client = ApiClient::new(&config.api)?;

        Ok(Self {
            config,
            client,
            storage,
        })
    }

    /// A session for this invocation, backed by the persisted token record.
    pub fn session(&self) -> Arc<SessionManager> {
        Arc::new(SessionManager::new(
            Arc::new(self.storage.open_tab()),
            Arc::new(HttpIdentityProvider::new(self.client.clone())),
            &self.config.session,
        ))
    }

    pub fn search(&self, session: Arc<SessionManager>) -> SearchController {
        let directory = Arc::new(HttpDirectoryService::new(self.client.clone()));
        SearchController::new(
            SearchAggregator::new(directory, self.config.search.clone()),
            session,
        )
    }
}
