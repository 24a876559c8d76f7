//! Shop API Handlers
//!
//! Public shop directory: a snapshot endpoint plus a live SSE stream fed by
//! the shop broadcast.

use std::collections::HashSet;
use std::convert::Infallible;

use axum::{
    Json,
    extract::State,
    response::{
        Sse,
        sse::{Event, KeepAlive},
    },
};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::{self, StreamExt};

use crate::core::ServerState;
use crate::core::state::random_eta;
use crate::db::repository::AccountRepository;
use crate::utils::AppResult;
use shared::client::ShopSummary;

/// List open shops (public)
///
/// Vendor accounts with a shop name, deduplicated by trimmed name. The ETA
/// is a fresh display value per request, not stored anywhere.
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<ShopSummary>>> {
    let repo = AccountRepository::new(state.db.clone());
    let vendors = repo.find_vendors_with_shops().await?;

    let mut seen: HashSet<String> = HashSet::new();
    let mut shops = Vec::new();
    for vendor in vendors {
        let Some(name) = vendor.shop_name.clone() else {
            continue;
        };
        // First vendor wins for a duplicated shop name
        if !seen.insert(name.trim().to_lowercase()) {
            continue;
        }
        shops.push(ShopSummary {
            id: vendor.id_string(),
            name,
            address: vendor.shop_address.clone().unwrap_or_default(),
            eta: random_eta(),
        });
    }

    Ok(Json(shops))
}

/// Live shop stream (public, SSE)
///
/// Emits a connection acknowledgement, then every shop broadcast event as
/// JSON. The subscription guard rides inside the stream so disconnecting
/// clients deregister themselves.
pub async fn stream(
    State(state): State<ServerState>,
) -> Sse<impl futures::Stream<Item = Result<Event, Infallible>>> {
    let (guard, rx) = state.shop_broadcast.subscribe();
    tracing::debug!(subscriber = guard.id(), "Shop stream connected");

    let connected = tokio_stream::once(Ok(Event::default().data(r#"{"message":"connected"}"#)));

    let events = BroadcastStream::new(rx).filter_map(move |result| {
        // Guard lives as long as this closure, i.e. as long as the stream
        let _guard = &guard;
        match result {
            Ok(event) => serde_json::to_string(&event)
                .ok()
                .map(|json| Ok(Event::default().data(json))),
            // Lagged receivers skip what they missed and keep going
            Err(_) => None,
        }
    });

    Sse::new(connected.chain(events)).keep_alive(KeepAlive::default())
}
