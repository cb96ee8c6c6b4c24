use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::Config;
use crate::error::AppResult;
use crate::security::TokenService;
use crate::services::resume_parser::ResumeParserClient;
use crate::services::storage::ResumeStorage;

/// Shared handles passed to every handler. Cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<Config>,
    pub tokens: TokenService,
    pub storage: ResumeStorage,
    pub resume_parser: ResumeParserClient,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: Config) -> AppResult<Self> {
        let tokens = TokenService::new(&config.secret_key, config.access_token_ttl);
        let storage = ResumeStorage::under_uploads(config.resume_upload_dir.clone());
        let resume_parser = ResumeParserClient::from_config(&config)?;
        Ok(Self {
            db,
            config: Arc::new(config),
            tokens,
            storage,
            resume_parser,
        })
    }
}
