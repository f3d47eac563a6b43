//! # State Module
//!
//! Shared state handed to every handler.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐  ┌────────────┐  │
//! │  │   Database   │  │  CartState   │  │  JwtManager  │  │ ApiConfig  │  │
//! │  │              │  │              │  │              │  │            │  │
//! │  │  tables      │  │  Arc<Mutex<  │  │  secret,     │  │  port,     │  │
//! │  │  (RwLock) +  │  │   HashMap<   │  │  revoked     │  │  threshold │  │
//! │  │  SQLite pool │  │   user, ..>>>│  │  jti set     │  │            │  │
//! │  └──────────────┘  └──────────────┘  └──────────────┘  └────────────┘  │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • Database: one RwLock over the tables, pooled SQLite connections     │
//! │  • CartState: tokio Mutex, held across the checkout                    │
//! │  • ApiConfig: read-only after startup                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cart;

use std::sync::Arc;

use autoparts_db::{Database, DbResult};
use axum::extract::FromRef;

use crate::auth::JwtManager;
use crate::config::ApiConfig;

pub use cart::CartState;

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<ApiConfig>,
    pub jwt: Arc<JwtManager>,
    pub carts: CartState,
}

impl AppState {
    /// Opens the data layer described by `config`.
    pub async fn new(config: ApiConfig) -> DbResult<Self> {
        let db = Database::new(config.db_config()).await?;
        Ok(Self::with_database(db, config))
    }

    pub fn with_database(db: Database, config: ApiConfig) -> Self {
        let jwt = JwtManager::new(config.jwt_secret.clone(), config.jwt_access_lifetime_secs);
        AppState {
            db,
            config: Arc::new(config),
            jwt: Arc::new(jwt),
            carts: CartState::new(),
        }
    }
}

impl FromRef<AppState> for Arc<JwtManager> {
    fn from_ref(state: &AppState) -> Self {
        state.jwt.clone()
    }
}
