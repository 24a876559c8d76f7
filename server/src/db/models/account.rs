//! Account Model

use argon2::Argon2;
use argon2::password_hash::{
    self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
};
use serde::{Deserialize, Serialize};
use shared::client::AccountInfo;
use std::fmt;
use std::str::FromStr;
use surrealdb::RecordId;

use super::serde_helpers;

/// Account ID type
pub type AccountId = RecordId;

/// Account role, closed set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Customer,
    Vendor,
    Delivery,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Vendor => "vendor",
            Role::Delivery => "delivery",
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Role::Customer),
            "vendor" => Ok(Role::Vendor),
            "delivery" => Ok(Role::Delivery),
            other => Err(format!(
                "unknown role '{other}', expected customer, vendor or delivery"
            )),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account model matching the SurrealDB schema
///
/// One record per credentialed identity. Vendor and delivery extras live on
/// the same table; which of them are set depends on `role`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<AccountId>,
    pub email: String,
    #[serde(skip_serializing)]
    pub hash_pass: String,
    pub role: Role,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    // Vendor fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shop_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shop_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_radius_km: Option<u32>,

    // Delivery fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_type: Option<String>,
    #[serde(
        default = "serde_helpers::default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_available: bool,

    pub created_at: i64,
}

/// Create account payload (password still in plaintext, hashed by the repo)
#[derive(Debug, Clone)]
pub struct AccountCreate {
    pub email: String,
    pub password: String,
    pub role: Role,
    pub name: String,
    pub phone: Option<String>,
    pub shop_name: Option<String>,
    pub shop_address: Option<String>,
    pub delivery_radius_km: Option<u32>,
    pub vehicle_type: Option<String>,
}

impl Account {
    /// Argon2id 散列口令, 盐随机, 参数取 crate 默认
    pub fn hash_password(password: &str) -> Result<String, password_hash::Error> {
        let salt = SaltString::generate(&mut OsRng);
        let hashed = Argon2::default().hash_password(password.as_bytes(), &salt)?;
        Ok(hashed.to_string())
    }

    /// 用存储的散列校验口令, 散列本身损坏才返回 Err
    pub fn verify_password(&self, password: &str) -> Result<bool, password_hash::Error> {
        let parsed = PasswordHash::new(&self.hash_pass)?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }

    /// Record id as "account:..." string, empty when not yet persisted
    pub fn id_string(&self) -> String {
        self.id.as_ref().map(|t| t.to_string()).unwrap_or_default()
    }

    /// Wire-level view of this account, credential stripped
    pub fn to_info(&self) -> AccountInfo {
        AccountInfo {
            id: self.id_string(),
            email: self.email.clone(),
            role: self.role.to_string(),
            name: self.name.clone(),
            phone: self.phone.clone(),
            shop_name: self.shop_name.clone(),
            shop_address: self.shop_address.clone(),
            delivery_radius_km: self.delivery_radius_km,
            vehicle_type: self.vehicle_type.clone(),
            is_available: self.is_available,
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_strings() {
        for role in [Role::Customer, Role::Vendor, Role::Delivery] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!("admin".parse::<Role>().is_err());
        assert!("".parse::<Role>().is_err());
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Delivery).unwrap(), "\"delivery\"");
        let parsed: Role = serde_json::from_str("\"vendor\"").unwrap();
        assert_eq!(parsed, Role::Vendor);
    }

    #[test]
    fn password_hash_round_trip() {
        let hash = Account::hash_password("hunter42").unwrap();
        let account = Account {
            id: None,
            email: "a@b.com".into(),
            hash_pass: hash,
            role: Role::Customer,
            name: "A".into(),
            phone: None,
            shop_name: None,
            shop_address: None,
            delivery_radius_km: None,
            vehicle_type: None,
            is_available: true,
            created_at: 0,
        };
        assert!(account.verify_password("hunter42").unwrap());
        assert!(!account.verify_password("hunter43").unwrap());
    }
}
