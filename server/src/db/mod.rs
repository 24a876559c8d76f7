//! Database Module
//!
//! Handles the embedded SurrealDB instance and schema definitions

pub mod models;
pub mod repository;

use crate::utils::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

/// Database service that owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the RocksDB-backed database at `db_path`
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db: Surreal<Db> = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        db.use_ns("voltmart")
            .use_db("voltmart")
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        tracing::info!("Database connection established (SurrealDB RocksDB at {db_path})");

        let service = Self { db };
        service.define_schema().await?;
        tracing::info!("Database schema applied");

        Ok(service)
    }

    /// Idempotent schema setup
    ///
    /// Tables stay schemaless; the unique indexes on `account.email` and
    /// `order.order_id` back the duplicate checks in the repositories.
    async fn define_schema(&self) -> Result<(), AppError> {
        self.db
            .query(
                r#"
                DEFINE TABLE IF NOT EXISTS account SCHEMALESS;
                DEFINE INDEX IF NOT EXISTS account_email ON TABLE account COLUMNS email UNIQUE;
                DEFINE TABLE IF NOT EXISTS order SCHEMALESS;
                DEFINE INDEX IF NOT EXISTS order_order_id ON TABLE order COLUMNS order_id UNIQUE;
                "#,
            )
            .await
            .map_err(|e| AppError::database(format!("Failed to define schema: {e}")))?
            .check()
            .map_err(|e| AppError::database(format!("Schema definition rejected: {e}")))?;
        Ok(())
    }
}
