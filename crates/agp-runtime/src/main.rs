//! # AgriPortal Runtime
//!
//! The entry point for the portal back end.
//!
//! ## Startup Sequence
//!
//! 1. Initialize tracing
//! 2. Load configuration from `AGP_*` environment variables
//! 3. Validate the HMAC secret and operator token
//! 4. Open the file-backed record store
//! 5. Wire codec, session gate, service, and resolver
//! 6. Serve the HTTP dispatch surface
//!
//! ## Request Flow
//!
//! ```text
//! POST /api/records/:kind/:action  { "tokenized": "agp1.<hex>.<hex>" }
//!        │
//!        ▼
//!   RecordResolver ── open envelope ── session gate ── RecordService
//!        │                                                   │
//!   receipt / sealed result                      atomic commit: row + audit
//! ```

mod config;
mod http;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use agp_envelope::PayloadCodec;
use agp_records::{
    FileBackedRecordStore, RecordResolver, RecordService, RegistryConfig, StaticSessionGate,
    SystemTimeSource, UuidGenerator,
};
use shared_types::{current_timestamp, ActorId, Session};

use crate::config::PortalConfig;
use crate::http::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    let config = PortalConfig::from_env().context("Failed to load configuration")?;
    config.validate_for_production()?;

    info!("===========================================");
    info!("  AgriPortal Record Registry v0.1.0");
    info!("===========================================");
    info!("Data Dir: {:?}", config.storage.data_dir);
    info!("HTTP Port: {}", config.http.port);
    info!(
        "Payload freshness window: {:?}s",
        config.security.max_payload_age_secs
    );

    let store = FileBackedRecordStore::open(config.storage.data_dir.join("records.json"))
        .context("Failed to open record store")?;

    let service = RecordService::new(
        store,
        SystemTimeSource,
        UuidGenerator,
        RegistryConfig::default(),
    );

    let codec = PayloadCodec::new(config.codec_config());

    let token = config
        .session
        .operator_token
        .clone()
        .context("operator token missing after validation")?;
    let session = Session::new(
        ActorId::new(config.session.operator_name.clone()),
        current_timestamp() + config.session.session_ttl_secs,
    );
    let gate = StaticSessionGate::new(SystemTimeSource).with_session(token, session);

    let resolver = RecordResolver::new(service, codec, gate);
    let state = Arc::new(AppState::new(resolver));

    let app = http::router(state);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.http.port))
        .await
        .with_context(|| format!("Failed to bind port {}", config.http.port))?;

    info!("Registry ready, serving requests");
    axum::serve(listener, app)
        .await
        .context("HTTP server terminated")?;

    Ok(())
}
