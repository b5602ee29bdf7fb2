//! Shared application state.
//!
//! Built once at startup and cloned into every request. The database handle
//! is passed down explicitly; nothing lives in a global.

use std::sync::Arc;

use forkful_db::Database;

use crate::auth::JwtManager;
use crate::config::ApiConfig;
use crate::services::{
    catalog::CatalogService, delivery::DeliveryService, identity::IdentityService,
    order::OrderService, report::ReportService,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<ApiConfig>,
    pub jwt: Arc<JwtManager>,
}

impl AppState {
    pub fn new(db: Database, config: ApiConfig) -> Self {
        let jwt = JwtManager::new(config.jwt_secret.clone(), config.jwt_lifetime_secs);
        AppState {
            db,
            config: Arc::new(config),
            jwt: Arc::new(jwt),
        }
    }

    pub fn identity(&self) -> IdentityService {
        IdentityService::new(self.db.clone(), self.jwt.clone())
    }

    pub fn catalog(&self) -> CatalogService {
        CatalogService::new(self.db.clone())
    }

    pub fn orders(&self) -> OrderService {
        OrderService::new(self.db.clone(), self.config.default_delivery_minutes)
    }

    pub fn deliveries(&self) -> DeliveryService {
        DeliveryService::new(self.db.clone())
    }

    pub fn reports(&self) -> ReportService {
        ReportService::new(self.db.clone())
    }
}
