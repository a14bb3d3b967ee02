//! HTTP routes for the catalog API
//!
//! - `POST /graphql`: GraphQL endpoint, authenticated per request
//! - `GET /graphql/playground`: GraphQL Playground
//! - `GET /health`, `/health/live`, `/health/ready`: health checks

pub mod graphql;
pub mod health;

use axum::{extract::Extension, Router};
use tower_http::trace::TraceLayer;

use crate::graphql::CatalogSchema;
use crate::middleware::AuthContextBuilder;
use crate::services::HealthService;

pub use graphql::{graphql_handler, graphql_playground, graphql_router};
pub use health::{health_router, HealthState};

/// Everything the router hands to its handlers
#[derive(Clone)]
pub struct AppState {
    pub schema: CatalogSchema,
    pub auth_context: AuthContextBuilder,
    pub health: HealthService,
}

/// Build the application router (without CORS, which depends on deployment)
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(graphql_router())
        .nest("/health", health_router(HealthState::new(state.health)))
        // Services as extensions for handlers and extractors
        .layer(Extension(state.schema))
        .layer(Extension(state.auth_context))
        .layer(TraceLayer::new_for_http())
}
