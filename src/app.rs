use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;
use crate::quotes::renderer::Renderer;
use crate::quotes::store::QuoteStore;
use crate::storage::database::Database;
use crate::storage::session::SessionStorage;
use crate::sync::api_client::ApiClient;
use crate::sync::manager::SyncManager;

/// Everything one session needs, wired together at startup.
pub struct App {
    pub config: Config,
    pub store: Arc<QuoteStore>,
    pub session: Arc<SessionStorage>,
    pub renderer: Renderer,
    pub sync: Arc<SyncManager<ApiClient>>,
}

impl App {
    pub fn init(config: Config) -> Result<Self> {
        crate::logging::init(&config.data_dir);

        let db = Arc::new(Database::open(&config.data_dir)?);

        let store = Arc::new(QuoteStore::load(db));
        let session = Arc::new(SessionStorage::new());
        let renderer = Renderer::new(store.clone(), session.clone());

        let api = ApiClient::new(&config.remote_url, config.http_timeout)?;
        qlog!("Remote endpoint: {}", api.endpoint());
        let sync = Arc::new(SyncManager::new(api, store.clone(), config.remote_limit));

        Ok(Self {
            config,
            store,
            session,
            renderer,
            sync,
        })
    }

    /// Stop background sync and end the session.
    pub async fn shutdown(&self) {
        self.sync.shutdown().await;
        self.session.clear();
        qlog!("Session ended");
    }
}
