use axum::{
    Json, Router,
    extract::Query,
    routing::get,
};
use rand::Rng;
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use fincast_core::{
    DEFAULT_BASE_REVENUE, MarketContext, ParameterBundle, ProjectionConfig, Scenario,
    generate_scenarios,
};

mod error;

use error::ApiResult;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let app = Router::new()
        .route("/", get(|| async { "Fincast API Server" }))
        .route(
            "/api/enhanced-scenarios",
            get(get_enhanced_scenarios).post(post_enhanced_scenarios),
        )
        .route("/api/market-data/regime", get(get_market_regime))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3001").await.unwrap();
    tracing::info!("listening on {}", listener.local_addr().unwrap());
    axum::serve(listener, app).await.unwrap();
}

#[derive(Debug, Deserialize)]
struct ScenarioQuery {
    base_revenue: Option<f64>,
    seed: Option<u64>,
}

/// Generate the three market-aware scenarios from the fallback parameter
/// bundle. An explicit seed makes the response reproducible; otherwise a
/// fresh seed is drawn per request.
async fn get_enhanced_scenarios(
    Query(query): Query<ScenarioQuery>,
) -> ApiResult<Json<Vec<Scenario>>> {
    let config = ProjectionConfig {
        base_revenue: query.base_revenue.unwrap_or(DEFAULT_BASE_REVENUE),
        issue_date: None,
    };
    let bundle = ParameterBundle::fallback();
    let seed = query.seed.unwrap_or_else(|| rand::rng().random());

    let scenarios = generate_scenarios(&config, &bundle, seed)?;
    tracing::info!(
        count = scenarios.len(),
        regime = %bundle.market_context.regime,
        seed,
        "generated market-aware scenarios"
    );
    Ok(Json(scenarios))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScenarioRequest {
    #[serde(default = "default_base_revenue")]
    base_revenue: f64,
    seed: Option<u64>,
    /// Pin the projection start; omitted means today.
    issue_date: Option<jiff::civil::Date>,
    /// Derive the parameter bundle from these market observations.
    market_context: Option<MarketContext>,
    /// Explicit bundle; takes precedence over `marketContext`.
    bundle: Option<ParameterBundle>,
}

fn default_base_revenue() -> f64 {
    DEFAULT_BASE_REVENUE
}

/// Generate scenarios from a caller-supplied market context or an explicit
/// parameter bundle.
async fn post_enhanced_scenarios(
    Json(request): Json<ScenarioRequest>,
) -> ApiResult<Json<Vec<Scenario>>> {
    let bundle = match (request.bundle, request.market_context) {
        (Some(bundle), _) => bundle,
        (None, Some(context)) => ParameterBundle::from_context(context),
        (None, None) => ParameterBundle::fallback(),
    };
    let config = ProjectionConfig {
        base_revenue: request.base_revenue,
        issue_date: request.issue_date,
    };
    let seed = request.seed.unwrap_or_else(|| rand::rng().random());

    let scenarios = generate_scenarios(&config, &bundle, seed)?;
    tracing::info!(
        count = scenarios.len(),
        regime = %bundle.market_context.regime,
        seed,
        "generated market-aware scenarios"
    );
    Ok(Json(scenarios))
}

/// Market context currently used for parameter derivation. Live market data
/// retrieval belongs to the upstream collaborator; this surface reports the
/// fallback context the engine would run with.
async fn get_market_regime() -> Json<MarketContext> {
    Json(MarketContext::fallback())
}
