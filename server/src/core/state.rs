use std::sync::Arc;
use std::time::Instant;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::JwtService;
use crate::core::{Config, Result};
use crate::db::DbService;
use crate::db::models::Account;
use crate::message::ShopBroadcast;
use rand::Rng;
use shared::client::ShopEvent;

/// Shared application state, cloned into every handler
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: Surreal<Db>,
    pub jwt_service: Arc<JwtService>,
    pub shop_broadcast: Arc<ShopBroadcast>,
    pub started_at: Instant,
}

impl ServerState {
    pub fn new(
        config: Config,
        db: Surreal<Db>,
        jwt_service: Arc<JwtService>,
        shop_broadcast: Arc<ShopBroadcast>,
    ) -> Self {
        Self {
            config,
            db,
            jwt_service,
            shop_broadcast,
            started_at: Instant::now(),
        }
    }

    pub async fn initialize(config: &Config) -> Result<Self> {
        // 1. Work directory layout (database/, logs/)
        config.ensure_work_dir_structure()?;

        // 2. Initialize DB
        let db_path = config.database_dir();
        let db_service = DbService::new(&db_path.to_string_lossy()).await?;

        // 3. Initialize Services
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let shop_broadcast = Arc::new(ShopBroadcast::new());

        Ok(Self::new(
            config.clone(),
            db_service.db,
            jwt_service,
            shop_broadcast,
        ))
    }

    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    pub fn shop_broadcast(&self) -> &Arc<ShopBroadcast> {
        &self.shop_broadcast
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    /// Announce a vendor's shop on the broadcast stream
    ///
    /// Accounts without shop details are skipped; returns how many
    /// subscribers received the event.
    pub fn broadcast_shop(&self, account: &Account) -> usize {
        let (Some(shop_name), Some(shop_address)) = (&account.shop_name, &account.shop_address)
        else {
            return 0;
        };

        let event = ShopEvent {
            vendor_id: account.id_string(),
            name: shop_name.clone(),
            address: shop_address.clone(),
            eta: random_eta(),
        };
        let receivers = self.shop_broadcast.publish(&event);
        tracing::info!(shop = %event.name, receivers, "New shop announced");
        receivers
    }
}

/// Display ETA for a shop, "10 mins" to "20 mins"
pub fn random_eta() -> String {
    let mut rng = rand::thread_rng();
    format!("{} mins", rng.gen_range(10..=20))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_eta_stays_in_range() {
        for _ in 0..50 {
            let eta = random_eta();
            let minutes: u32 = eta
                .strip_suffix(" mins")
                .expect("eta should end with ' mins'")
                .parse()
                .expect("eta should start with a number");
            assert!((10..=20).contains(&minutes));
        }
    }
}
