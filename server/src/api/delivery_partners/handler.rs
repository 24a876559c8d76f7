//! Delivery Partner API Handlers

use axum::{Extension, Json, extract::State};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::Role;
use crate::db::repository::AccountRepository;
use crate::utils::{AppError, AppResult};
use shared::client::{AccountInfo, AvailabilityRequest, PartnerSummary};

/// List available delivery partners (vendor only)
///
/// Backs the assignment picker: delivery accounts currently flagged
/// available, ordered by name.
pub async fn available(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<PartnerSummary>>> {
    user.require_role(Role::Vendor)?;

    let repo = AccountRepository::new(state.db.clone());
    let partners = repo.find_available_partners().await?;

    let summaries = partners
        .into_iter()
        .map(|partner| PartnerSummary {
            id: partner.id_string(),
            name: partner.name.clone(),
            email: partner.email.clone(),
            phone: partner.phone.clone(),
            vehicle_type: partner.vehicle_type.clone(),
            is_available: partner.is_available,
        })
        .collect();

    Ok(Json(summaries))
}

/// Toggle own availability (delivery only)
pub async fn set_availability(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<AvailabilityRequest>,
) -> AppResult<Json<AccountInfo>> {
    user.require_role(Role::Delivery)?;

    let repo = AccountRepository::new(state.db.clone());
    let account = repo
        .set_availability(&user.id, req.is_available)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Account {} not found", user.id)))?;

    tracing::info!(
        account_id = %account.id_string(),
        is_available = account.is_available,
        "Delivery partner availability updated"
    );

    Ok(Json(account.to_info()))
}
