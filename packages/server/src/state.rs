use std::sync::Arc;

use common::storage::PhotoStore;
use sea_orm::DatabaseConnection;

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: AppConfig,
    pub photos: Arc<dyn PhotoStore>,
}
