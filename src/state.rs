use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{config::AppConfig, services::file_service::FileService};

#[derive(Clone)]
pub struct AppState {
    pub orm: DatabaseConnection,
    pub files: FileService,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(orm: DatabaseConnection, config: AppConfig) -> Self {
        Self {
            orm,
            files: FileService::new(config.file_dir.clone()),
            config: Arc::new(config),
        }
    }
}
