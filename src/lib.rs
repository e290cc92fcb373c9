pub mod client;
pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;

use crate::config::{Config, ResultStoreKind};
use crate::services::{
    catalog_service::QuizCatalog,
    code_runner_service::CodeRunnerService,
    result_store::{MemoryResultStore, ResultRepository, ResultStore, SqliteResultStore},
    session_service::SessionService,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub catalog: Arc<QuizCatalog>,
    pub session_service: SessionService,
    pub code_runner: CodeRunnerService,
}

impl AppState {
    pub fn new(
        config: Config,
        catalog: QuizCatalog,
        store: Arc<dyn ResultStore>,
    ) -> error::Result<Self> {
        let catalog = Arc::new(catalog);
        let code_runner = CodeRunnerService::from_config(&config)?;
        let session_service =
            SessionService::new(Arc::clone(&catalog), ResultRepository::new(store));

        Ok(Self {
            config: Arc::new(config),
            catalog,
            session_service,
            code_runner,
        })
    }
}

/// Opens the result store selected by `config.result_store`.
pub async fn open_result_store(config: &Config) -> error::Result<Arc<dyn ResultStore>> {
    match config.result_store {
        ResultStoreKind::Memory => {
            tracing::warn!("Using in-memory result store; results are lost on restart");
            Ok(Arc::new(MemoryResultStore::new()))
        }
        ResultStoreKind::Sqlite => {
            let pool = database::pool::create_pool(&config.database_url, 5).await?;
            Ok(Arc::new(SqliteResultStore::new(pool)))
        }
    }
}
