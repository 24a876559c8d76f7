//! Authentication Handlers
//!
//! Handles account signup and login

use std::time::Duration;

use axum::{Json, extract::State};

use crate::core::ServerState;
use crate::db::models::{AccountCreate, Role};
use crate::db::repository::AccountRepository;
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_email, validate_optional_text,
    validate_password, validate_required_text,
};
use crate::utils::{AppError, AppResult};

// Re-use shared DTOs for API consistency
use shared::client::{AuthResponse, LoginRequest, SignupRequest};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

/// Vendor shops default to this delivery radius when none is given
const DEFAULT_DELIVERY_RADIUS_KM: u32 = 5;

/// Signup handler
///
/// Creates an account in one of the three roles and returns a JWT token.
/// Vendor signups announce the new shop on the broadcast stream.
pub async fn signup(
    State(state): State<ServerState>,
    Json(req): Json<SignupRequest>,
) -> AppResult<Json<AuthResponse>> {
    let role: Role = req.role.parse().map_err(AppError::validation)?;

    validate_email(&req.email)?;
    validate_password(&req.password)?;
    validate_required_text(&req.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&req.phone, "phone", MAX_SHORT_TEXT_LEN)?;

    // Role-specific fields; anything outside the role is dropped, not stored
    if role == Role::Vendor {
        let shop_name = req.shop_name.as_deref().unwrap_or_default();
        validate_required_text(shop_name, "shop_name", MAX_NAME_LEN)?;
        let shop_address = req.shop_address.as_deref().unwrap_or_default();
        validate_required_text(shop_address, "shop_address", MAX_ADDRESS_LEN)?;
    }
    if role == Role::Delivery {
        validate_optional_text(&req.vehicle_type, "vehicle_type", MAX_SHORT_TEXT_LEN)?;
    }

    let data = AccountCreate {
        email: req.email,
        password: req.password,
        role,
        name: req.name,
        phone: req.phone,
        shop_name: if role == Role::Vendor {
            req.shop_name
        } else {
            None
        },
        shop_address: if role == Role::Vendor {
            req.shop_address
        } else {
            None
        },
        delivery_radius_km: if role == Role::Vendor {
            Some(req.delivery_radius_km.unwrap_or(DEFAULT_DELIVERY_RADIUS_KM))
        } else {
            None
        },
        vehicle_type: if role == Role::Delivery {
            req.vehicle_type
        } else {
            None
        },
    };

    let repo = AccountRepository::new(state.db.clone());
    let account = repo.create(data).await?;

    let jwt_service = state.get_jwt_service();
    let token = jwt_service
        .generate_token(&account.id_string(), &account.email, &account.name, account.role)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;

    // New vendors show up on the live shop stream immediately
    if account.role == Role::Vendor {
        state.broadcast_shop(&account);
    }

    tracing::info!(
        account_id = %account.id_string(),
        email = %account.email,
        role = %account.role,
        "Account created"
    );

    Ok(Json(AuthResponse {
        token,
        account: account.to_info(),
    }))
}

/// Login handler
///
/// Authenticates credentials and returns a JWT token
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let repo = AccountRepository::new(state.db.clone());
    let email = AccountRepository::normalize_email(&req.email);

    let account = repo.find_by_email(&email).await?;

    // Fixed delay to prevent timing attacks (before checking result)
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    // Unified error message to prevent email enumeration
    let account = match account {
        Some(a) => {
            let password_valid = a
                .verify_password(&req.password)
                .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;

            if !password_valid {
                tracing::warn!(email = %email, "Login failed - invalid credentials");
                return Err(AppError::invalid_credentials());
            }

            a
        }
        None => {
            tracing::warn!(email = %email, "Login failed - account not found");
            return Err(AppError::invalid_credentials());
        }
    };

    // Delivery partners come back online when they log in
    let account = if account.role == Role::Delivery {
        repo.set_availability(&account.id_string(), true)
            .await?
            .unwrap_or(account)
    } else {
        account
    };

    let jwt_service = state.get_jwt_service();
    let token = jwt_service
        .generate_token(&account.id_string(), &account.email, &account.name, account.role)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;

    tracing::info!(
        account_id = %account.id_string(),
        email = %account.email,
        role = %account.role,
        "Login successful"
    );

    Ok(Json(AuthResponse {
        token,
        account: account.to_info(),
    }))
}
