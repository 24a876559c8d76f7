//! Account Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Account, AccountCreate};
use shared::util::now_millis;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

#[derive(Clone)]
pub struct AccountRepository {
    base: BaseRepository,
}

impl AccountRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Normalize an email into its identity-key form
    pub fn normalize_email(email: &str) -> String {
        email.trim().to_lowercase()
    }

    /// Find account by email (exact match on the normalized form)
    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<Account>> {
        let email = Self::normalize_email(email);
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM account WHERE email = $email LIMIT 1")
            .bind(("email", email))
            .await?;
        let accounts: Vec<Account> = result.take(0)?;
        Ok(accounts.into_iter().next())
    }

    /// Find account by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Account>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let account: Option<Account> = self.base.db().select(thing).await?;
        Ok(account)
    }

    /// Create a new account
    ///
    /// Emails are stored normalized; the unique index on `email` is the
    /// backstop for creations racing past the pre-check.
    pub async fn create(&self, data: AccountCreate) -> RepoResult<Account> {
        let email = Self::normalize_email(&data.email);

        // Check duplicate email
        if self.find_by_email(&email).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Email '{}' is already registered",
                email
            )));
        }

        // Hash password
        let hash_pass = Account::hash_password(&data.password)
            .map_err(|e| RepoError::Database(format!("Failed to hash password: {}", e)))?;

        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE account SET
                    email = $email,
                    hash_pass = $hash_pass,
                    role = $role,
                    name = $name,
                    phone = $phone,
                    shop_name = $shop_name,
                    shop_address = $shop_address,
                    delivery_radius_km = $delivery_radius_km,
                    vehicle_type = $vehicle_type,
                    is_available = true,
                    created_at = $created_at
                RETURN AFTER"#,
            )
            .bind(("email", email.clone()))
            .bind(("hash_pass", hash_pass))
            .bind(("role", data.role))
            .bind(("name", data.name))
            .bind(("phone", data.phone))
            .bind(("shop_name", data.shop_name))
            .bind(("shop_address", data.shop_address))
            .bind(("delivery_radius_km", data.delivery_radius_km))
            .bind(("vehicle_type", data.vehicle_type))
            .bind(("created_at", now_millis()))
            .await?;

        let created: Option<Account> = result.take(0).map_err(|e| {
            let msg = e.to_string();
            if msg.contains("already contains") {
                RepoError::Duplicate(format!("Email '{}' is already registered", email))
            } else {
                RepoError::Database(msg)
            }
        })?;
        created.ok_or_else(|| RepoError::Database("Failed to create account".to_string()))
    }

    /// Set a delivery partner's availability flag
    ///
    /// Scoped to delivery-role records; returns `None` when the id does not
    /// exist or does not belong to a delivery account.
    pub async fn set_availability(
        &self,
        id: &str,
        is_available: bool,
    ) -> RepoResult<Option<Account>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $thing SET is_available = $is_available WHERE role = 'delivery' RETURN AFTER",
            )
            .bind(("thing", thing))
            .bind(("is_available", is_available))
            .await?;
        let updated: Option<Account> = result.take(0)?;
        Ok(updated)
    }

    /// All delivery partners currently flagged available
    pub async fn find_available_partners(&self) -> RepoResult<Vec<Account>> {
        let partners: Vec<Account> = self
            .base
            .db()
            .query("SELECT * FROM account WHERE role = 'delivery' AND is_available = true ORDER BY name")
            .await?
            .take(0)?;
        Ok(partners)
    }

    /// All vendor accounts with a non-empty shop name
    pub async fn find_vendors_with_shops(&self) -> RepoResult<Vec<Account>> {
        let vendors: Vec<Account> = self
            .base
            .db()
            .query(
                "SELECT * FROM account WHERE role = 'vendor' AND shop_name != NONE AND shop_name != '' ORDER BY name",
            )
            .await?
            .take(0)?;
        Ok(vendors)
    }

    /// Resolve a vendor by shop name, trimmed and case-insensitive
    pub async fn find_vendor_by_shop_name(&self, shop_name: &str) -> RepoResult<Option<Account>> {
        let needle = shop_name.trim().to_lowercase();
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM account WHERE role = 'vendor' AND string::lowercase(string::trim(shop_name)) = $shop LIMIT 1",
            )
            .bind(("shop", needle))
            .await?;
        let vendors: Vec<Account> = result.take(0)?;
        Ok(vendors.into_iter().next())
    }
}
