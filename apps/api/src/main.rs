mod auth;
mod config;
mod db;
mod errors;
mod extract;
mod hunters;
mod models;
mod rate_limit;
mod resumes;
mod routes;
mod state;
mod store;
mod validation;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use axum::http::HeaderValue;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::TokenIssuer;
use crate::config::Config;
use crate::db::{create_pool, run_migrations};
use crate::hunters::avatar::S3AvatarStore;
use crate::rate_limit::RateLimiter;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::PgStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ResuMeUp API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;
    run_migrations(&db).await?;
    let store = Arc::new(PgStore::new(db));

    // Initialize Redis (connections are opened lazily by the limiter)
    let redis = redis::Client::open(config.redis_url.clone())?;
    let rate_limiter = (config.rate_limit_max > 0).then(|| {
        RateLimiter::new(redis, config.rate_limit_max, config.rate_limit_window)
    });
    match &rate_limiter {
        Some(_) => info!(
            "Rate limiting: {} requests per {}s",
            config.rate_limit_max,
            config.rate_limit_window.as_secs()
        ),
        None => info!("Rate limiting disabled"),
    }

    // Initialize S3 / MinIO
    let s3 = build_s3_client(&config).await;
    info!("S3 client initialized");

    let tokens = TokenIssuer::new(config.jwt_secret.as_bytes(), config.token_ttl)?;

    // Build app state
    let state = AppState {
        hunters: store.clone(),
        resumes: store,
        tokens,
        avatars: Arc::new(S3AvatarStore::new(s3, config.s3_bucket.clone())),
        rate_limiter,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config)?);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Permissive unless `CORS_ORIGIN` pins a single allowed origin.
fn cors_layer(config: &Config) -> Result<CorsLayer> {
    match &config.cors_origin {
        None => Ok(CorsLayer::permissive()),
        Some(origin) => {
            let origin: HeaderValue = origin
                .parse()
                .with_context(|| format!("CORS_ORIGIN '{origin}' is not a valid header value"))?;
            Ok(CorsLayer::very_permissive().allow_origin(origin))
        }
    }
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "resumeup-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    // MinIO serves buckets by path, not by virtual host.
    let s3_config = aws_sdk_s3::config::Builder::from(&s3_config)
        .force_path_style(true)
        .build();

    aws_sdk_s3::Client::from_conf(s3_config)
}
