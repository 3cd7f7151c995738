//! saas-starter HTTP Server
//!
//! Axum-based server hosting the two checkout functions and the static
//! login/dashboard frontend.

mod config;
mod cors;
mod handlers;
mod routes;
mod state;

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use saas_payments::{StripeClient, SupabaseStore};

use crate::config::ServerConfig;
use crate::routes::{CREATE_CHECKOUT_PATH, VERIFY_CHECKOUT_PATH, router};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env();

    let stripe = StripeClient::new(&config.stripe_secret_key);
    if stripe.is_configured() {
        tracing::info!("✓ Stripe configured");
    } else {
        tracing::warn!("⚠ STRIPE_SECRET_KEY not set - checkout requests will be rejected by Stripe");
    }

    let store = SupabaseStore::new(&config.supabase_url, &config.service_role_key);
    if store.is_configured() {
        tracing::info!(url = %config.supabase_url, "✓ Supabase configured");
    } else {
        tracing::warn!("⚠ SUPABASE_URL or SERVICE_ROLE_KEY not set - subscription writes will fail");
    }

    let state = AppState {
        stripe_configured: stripe.is_configured(),
        store_configured: store.is_configured(),
        provider: Arc::new(stripe),
        store: Arc::new(store),
    };

    let app = router(state, &config.static_dir);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

    tracing::info!("saas-starter server running on http://{}", config.bind_addr);
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health");
    tracing::info!("  POST {CREATE_CHECKOUT_PATH}");
    tracing::info!("  POST {VERIFY_CHECKOUT_PATH}");
    tracing::info!("  GET  /*  - static files from {}", config.static_dir.display());

    axum::serve(listener, app).await?;

    Ok(())
}
