//! Webhook listener: Telegram POSTs updates to `/TG<hook_token>`; a few GET routes proxy the
//! Bot API calls that manage the webhook and return the JSON result as plain text.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use conversation::ConversationDispatcher;
use lizbot_core::{ToInboundEvent, Transport};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::{error, info, instrument, warn};

use crate::runner::process_event;
use crate::update::WebhookUpdate;

/// Shared state for the webhook routes.
#[derive(Clone)]
pub struct WebhookState {
    pub dispatcher: Arc<ConversationDispatcher>,
    pub transport: Arc<dyn Transport>,
    pub bot: teloxide::Bot,
    /// URL registered by `/set_webhook`; `None` when PUBLIC_BASE_URL or HOOK_TOKEN is unset.
    pub webhook_url: Option<String>,
}

/// Routes: `POST /TG<hook_token>`, `GET /me`, `/get_webhook`, `/set_webhook`, `/del_webhook`.
/// Any other request is a 404 and is logged as arriving without the hook token.
pub fn create_router(state: WebhookState, hook_token: &str) -> Router {
    Router::new()
        .route(&format!("/TG{}", hook_token), post(receive_update))
        .route("/me", get(get_me))
        .route("/get_webhook", get(get_webhook))
        .route("/set_webhook", get(set_webhook))
        .route("/del_webhook", get(delete_webhook))
        .fallback(unmatched)
        .with_state(state)
}

/// Binds `addr` and serves `router` until the process is stopped.
pub async fn serve(addr: SocketAddr, router: Router) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %addr, "Webhook listener started");
    axum::serve(listener, router).await?;
    Ok(())
}

/// Handles one update. Anything parseable is acknowledged with 200, even when handling
/// fails, so Telegram does not redeliver it.
#[instrument(skip_all)]
async fn receive_update(State(state): State<WebhookState>, body: Bytes) -> StatusCode {
    let update: WebhookUpdate = match serde_json::from_slice(&body) {
        Ok(update) => update,
        Err(e) => {
            warn!(error = %e, "Webhook body is not a Telegram update");
            return StatusCode::BAD_REQUEST;
        }
    };
    let Some(message) = update.message else {
        info!(update_id = update.update_id, "Update without message, ignored");
        return StatusCode::OK;
    };
    let event = match message.to_inbound() {
        Ok(event) => event,
        Err(e) => {
            warn!(update_id = update.update_id, error = %e, "Discarding update");
            return StatusCode::OK;
        }
    };
    info!(
        update_id = update.update_id,
        chat_id = %event.chat_id,
        payload = ?event.payload,
        "Received update"
    );

    if let Err(e) = process_event(&state.dispatcher, state.transport.as_ref(), &event).await {
        error!(error = %e, chat_id = %event.chat_id, "Event handling failed");
    }
    StatusCode::OK
}

async fn get_me(State(state): State<WebhookState>) -> Response {
    pretty_json(state.bot.get_me().await)
}

async fn get_webhook(State(state): State<WebhookState>) -> Response {
    pretty_json(state.bot.get_webhook_info().await)
}

async fn set_webhook(State(state): State<WebhookState>) -> Response {
    let Some(ref hook_url) = state.webhook_url else {
        return (
            StatusCode::BAD_REQUEST,
            "PUBLIC_BASE_URL and HOOK_TOKEN must be set to register a webhook",
        )
            .into_response();
    };
    let url = match reqwest::Url::parse(hook_url) {
        Ok(url) => url,
        Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    };
    info!(url = %hook_url, "Setting new webhook");
    pretty_json(state.bot.set_webhook(url).await)
}

async fn delete_webhook(State(state): State<WebhookState>) -> Response {
    info!("Deleting webhook");
    pretty_json(state.bot.delete_webhook().await)
}

async fn unmatched(uri: Uri) -> StatusCode {
    error!(uri = %uri, "Request without hook token");
    StatusCode::NOT_FOUND
}

/// Bot API result as sorted, indented JSON in a text/plain body; API failures are 502.
fn pretty_json<T: Serialize>(result: Result<T, teloxide::RequestError>) -> Response {
    let value = match result {
        Ok(value) => value,
        Err(e) => {
            error!(error = %e, "Bot API call failed");
            return (StatusCode::BAD_GATEWAY, e.to_string()).into_response();
        }
    };
    match serde_json::to_value(&value).and_then(|v| serde_json::to_string_pretty(&v)) {
        Ok(body) => ([(header::CONTENT_TYPE, "text/plain")], body).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}
