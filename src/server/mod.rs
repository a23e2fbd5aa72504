//! HTTP Server
//!
//! Hosts both edge handlers behind one axum router: the card resolver at the
//! configured card route, the agent negotiator for every other path.

use crate::card::CardResolver;
use crate::config::EdgeConfig;
use crate::error::EdgeError;
use crate::negotiator::AgentNegotiator;
use crate::origin::{build_origin, Origin};
use crate::types::EdgeResponse;
use axum::body::Body;
use axum::extract::{Request, State};
use axum::response::Response;
use axum::routing::any;
use axum::Router;
use http::request::Parts;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared handler state. Both handlers are stateless per request.
#[derive(Clone)]
pub struct EdgeState {
    pub negotiator: Arc<AgentNegotiator>,
    pub card: Arc<CardResolver>,
}

impl EdgeState {
    pub fn new(negotiator: AgentNegotiator, card: CardResolver) -> Self {
        Self {
            negotiator: Arc::new(negotiator),
            card: Arc::new(card),
        }
    }

    /// Build both handlers with the origins named in `config`.
    pub fn from_config(config: &EdgeConfig) -> Result<Self, EdgeError> {
        let site_origin = build_origin(&config.origin, config.origin_base_url())?;
        let card_origin = build_origin(&config.origin, config.card_origin_url())?;
        Self::with_origins(config, site_origin, card_origin)
    }

    pub fn with_origins(
        config: &EdgeConfig,
        site_origin: Arc<dyn Origin>,
        card_origin: Arc<dyn Origin>,
    ) -> Result<Self, EdgeError> {
        let negotiator = AgentNegotiator::from_config(config, site_origin)?;
        let card = CardResolver::new(card_origin, config.card.route.clone());
        Ok(Self::new(negotiator, card))
    }

    /// Route a request the same way [`router`] does, without axum.
    pub async fn dispatch(&self, request: &Parts) -> EdgeResponse {
        if request.uri.path() == self.card.route() {
            self.card.handle(request).await
        } else {
            self.negotiator.handle(request).await
        }
    }
}

pub fn router(state: EdgeState) -> Router {
    let card_route = state.card.route().to_string();
    Router::new()
        .route(&card_route, any(card_handler))
        .fallback(negotiate_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn card_handler(State(state): State<EdgeState>, request: Request) -> Response {
    let (parts, _body) = request.into_parts();
    into_axum(state.card.handle(&parts).await)
}

async fn negotiate_handler(State(state): State<EdgeState>, request: Request) -> Response {
    let (parts, _body) = request.into_parts();
    into_axum(state.negotiator.handle(&parts).await)
}

fn into_axum(response: EdgeResponse) -> Response {
    response.map(Body::from)
}

/// Bind and serve until ctrl-c.
pub async fn serve(config: &EdgeConfig, bind: Option<SocketAddr>) -> Result<(), EdgeError> {
    let addr = match bind {
        Some(addr) => addr,
        None => config.bind_addr()?,
    };
    let state = EdgeState::from_config(config)?;
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(
        %addr,
        origin = config.origin_base_url(),
        card_route = %config.card.route,
        "Edge server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
