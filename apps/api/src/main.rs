use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use merit_assessor::annotation::LexiconAnnotator;
use merit_assessor::assessment::Assessor;
use merit_assessor::config::Config;
use merit_assessor::matching::PatternRuleSet;
use merit_assessor::routes::build_router;
use merit_assessor::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting merit assessor v{}", env!("CARGO_PKG_VERSION"));

    // Scoring weights and thresholds are validated here; a bad override aborts startup.
    let scoring = config.load_scoring()?;
    info!(
        "Scoring config: low_cut={} medium_cut={} weight_sum={:.6}",
        scoring.thresholds().low_cut(),
        scoring.thresholds().medium_cut(),
        scoring.weights().sum()
    );

    let assessor = Assessor::new(
        Arc::new(LexiconAnnotator::new()),
        PatternRuleSet::standard(),
        scoring,
    );

    let state = AppState {
        config: config.clone(),
        assessor: Arc::new(assessor),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
