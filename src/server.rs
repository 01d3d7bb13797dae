use anyhow::{anyhow, Result};
use async_graphql::http::{playground_source, GraphQLPlaygroundConfig};
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    extract::State,
    response::{Html, IntoResponse},
    routing::get,
    Router,
};
use log::info;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

use crate::config::Config;
use crate::graphql::ContactSchema;

async fn graphql_handler(
    State(schema): State<ContactSchema>,
    request: GraphQLRequest,
) -> GraphQLResponse {
    schema.execute(request.into_inner()).await.into()
}

async fn graphql_playground() -> impl IntoResponse {
    Html(playground_source(GraphQLPlaygroundConfig::new("/graphql")))
}

// Health check endpoint
async fn health_check() -> &'static str {
    "Rolodex API is running"
}

/// Create and start the GraphQL server.
pub async fn start_server(config: &Config, schema: ContactSchema) -> Result<()> {
    // Permissive CORS so browser-based GraphQL clients can reach us
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(health_check))
        .route("/graphql", get(graphql_playground).post(graphql_handler))
        .layer(cors)
        .with_state(schema);

    let addr = config.bind_addr;
    info!("GraphQL server starting on http://{}", addr);
    info!("Playground available at http://{}/graphql", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| anyhow!("Failed to bind to address: {}", e))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow!("Failed to start GraphQL server: {}", e))?;

    Ok(())
}
