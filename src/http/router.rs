use crate::app_context::AppContext;
use crate::cli::Args;
use crate::{health, http::cors, http::middleware, resize};
use axum::extract::DefaultBodyLimit;
use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;

pub fn new(args: &Args, app_context: AppContext) -> Router {
    let cors_policy = cors::layer(&args.allowed_origins)
        .unwrap_or_else(|err| panic!("Failed to configure CORS: {}", err));
    let body_limit = app_context.resize.body_limit();
    tracing::info!("Initialized HTTP configuration.");

    let health_routes = Router::new().route("/check", get(health::handlers::healthcheck));
    let api_routes = Router::new()
        .route("/resize", post(resize::handlers::resize))
        .layer(DefaultBodyLimit::max(body_limit));

    Router::new()
        .nest("/health", health_routes)
        .nest("/api", api_routes)
        .with_state(app_context)
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(middleware::log_requests))
                .layer(cors_policy),
        )
}
