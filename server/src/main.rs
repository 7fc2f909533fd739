mod handlers;
mod state;

use axum::{
    routing::{get, post},
    Router,
};
use handlers::battle;
use state::AppState;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let state = AppState::new();
    tracing::info!(skills = ?state.registry.skill("setia_attack_1").is_some(), "battle registry built");

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &axum::http::Request<_>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|_request: &axum::http::Request<_>, _span: &tracing::Span| {
            tracing::info!("Incoming request");
        })
        .on_response(|_response: &axum::http::Response<_>, latency: std::time::Duration, _span: &tracing::Span| {
            tracing::info!("Response sent in {:?}", latency);
        });

    let app = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/battles", post(battle::start_battle))
        .route("/battles/:id", get(battle::get_battle))
        .route("/battles/:id/command", post(battle::submit_command))
        .route("/battles/:id/tick", post(battle::tick_battle))
        .route("/battles/:id/outcome", get(battle::get_outcome))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state);

    let bind_address = std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse::<u16>()
        .expect("PORT must be a valid number");

    let bind_addr = format!("{}:{}", bind_address, port);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await.expect("failed to bind address");

    tracing::info!("Server listening on http://{}", listener.local_addr().unwrap());
    axum::serve(listener, app).await.expect("server failed");
}

async fn root() -> &'static str {
    "battle-core server is running"
}

async fn health() -> &'static str {
    "OK"
}
