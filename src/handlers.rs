use crate::errors::AppError;
use crate::models::{AnalyticsSnapshot, NewOrder, OrderRequest, OrderResponse, PriceInput};
use crate::state::AppState;
use crate::ui::{render_dashboard, render_storefront};
use crate::whatsapp::{chat_link, order_message};
use axum::{
    Json,
    extract::State,
    response::{
        Html,
        sse::{Event, KeepAlive, Sse},
    },
};
use futures::{Stream, stream};
use tokio::sync::broadcast::error::RecvError;
use tracing::warn;

pub const UPDATE_EVENT: &str = "analytics-updated";

const DEFAULT_PLATFORM: &str = "منصة غير محددة";
const DEFAULT_TITLE: &str = "باقة مخصصة";
const DEFAULT_PRICE: &str = "0";

pub async fn index() -> Html<String> {
    Html(render_storefront())
}

pub async fn dashboard(State(state): State<AppState>) -> Html<String> {
    let snapshot = state.store.snapshot().await;
    Html(render_dashboard(snapshot.as_ref()))
}

pub async fn get_analytics(State(state): State<AppState>) -> Json<Option<AnalyticsSnapshot>> {
    Json(state.store.snapshot().await)
}

pub async fn put_analytics(
    State(state): State<AppState>,
    Json(snapshot): Json<AnalyticsSnapshot>,
) -> Result<Json<AnalyticsSnapshot>, AppError> {
    state.store.persist(&snapshot).await?;
    Ok(Json(snapshot))
}

/// Records a buy click and hands back the chat link. Analytics failures
/// never block the link.
pub async fn record_order(
    State(state): State<AppState>,
    Json(payload): Json<OrderRequest>,
) -> Json<OrderResponse> {
    let platform = non_empty(payload.platform).unwrap_or_else(|| DEFAULT_PLATFORM.to_string());
    let title = non_empty(payload.title).unwrap_or_else(|| DEFAULT_TITLE.to_string());
    let price = match payload.price {
        Some(PriceInput::Text(text)) if text.is_empty() => PriceInput::from(DEFAULT_PRICE),
        Some(price) => price,
        None => PriceInput::from(DEFAULT_PRICE),
    };
    let price_display = match &price {
        PriceInput::Text(text) => text.clone(),
        PriceInput::Number(value) => value.to_string(),
    };

    let order = NewOrder {
        platform: platform.clone(),
        package_name: title.clone(),
        price: Some(price),
        customer_name: non_empty(payload.customer),
        source: non_empty(payload.source),
    };

    let analytics = match state.store.record_order(order).await {
        Ok(snapshot) => Some(snapshot),
        Err(err) => {
            warn!("order not recorded in analytics: {err}");
            None
        }
    };

    let message = order_message(&platform, &title, &price_display);
    Json(OrderResponse {
        recorded: analytics.is_some(),
        whatsapp_url: chat_link(&state.whatsapp_number, &message),
        analytics,
    })
}

pub async fn analytics_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let updates = state.store.subscribe();
    let events = stream::unfold(updates, |mut updates| async move {
        loop {
            match updates.recv().await {
                Ok(snapshot) => {
                    let event = Event::default().event(UPDATE_EVENT).json_data(&snapshot);
                    return Some((event, updates));
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!("analytics listener skipped {skipped} updates");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}
