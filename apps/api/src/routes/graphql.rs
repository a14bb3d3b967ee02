//! GraphQL HTTP handlers

use async_graphql::http::{playground_source, GraphQLPlaygroundConfig};
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    extract::Extension,
    response::{Html, IntoResponse},
    routing::{get, post},
    Router,
};

use crate::graphql::CatalogSchema;
use crate::middleware::AuthContext;

/// Create the GraphQL router
pub fn graphql_router() -> Router {
    Router::new()
        .route("/graphql", post(graphql_handler))
        .route("/graphql/playground", get(graphql_playground))
}

/// Execute a GraphQL request
///
/// The [`AuthContext`] extractor runs first; an unverifiable bearer token
/// rejects the request with 401 before the schema sees it.
pub async fn graphql_handler(
    Extension(schema): Extension<CatalogSchema>,
    auth: AuthContext,
    req: GraphQLRequest,
) -> GraphQLResponse {
    let request = req.into_inner().data(auth);
    schema.execute(request).await.into()
}

/// GraphQL Playground pointed at the endpoint
pub async fn graphql_playground() -> impl IntoResponse {
    Html(playground_source(GraphQLPlaygroundConfig::new("/graphql")))
}
