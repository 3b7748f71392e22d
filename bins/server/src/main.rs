//! OMNIGEST API server.
//!
//! Main entry point for the e-invoicing backend.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use omnigest_api::{AppState, EmailWorker, create_router, worker::email_channel};
use omnigest_core::{
    authority::SimulatedTaxAuthority, books::parse_timezone, receipt::HandlebarsReceiptRenderer,
};
use omnigest_db::{
    connect_with,
    migration::{Migrator, MigratorTrait},
};
use omnigest_shared::{AppConfig, EmailService, JwtService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "omnigest=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load()?;
    let timezone = parse_timezone(&config.app.timezone)?;

    let db = connect_with(&config.database).await?;
    info!("Connected to database");
    Migrator::up(&db, None).await?;
    info!("Migrations applied");

    let jwt_service = JwtService::new(config.jwt.clone());

    let email_service = EmailService::new(config.email.clone());
    info!(
        smtp_host = %config.email.smtp_host,
        smtp_port = %config.email.smtp_port,
        enabled = config.email.enabled,
        "Email service configured"
    );

    let (email_queue, email_receiver) = email_channel(config.email.queue_capacity);
    let worker = EmailWorker::new(
        db.clone(),
        Arc::new(email_service),
        Arc::new(HandlebarsReceiptRenderer::new(timezone)?),
        timezone,
    );
    let _worker = worker.spawn(email_queue.clone(), email_receiver);

    let state = AppState {
        db: Arc::new(db),
        jwt_service: Arc::new(jwt_service),
        authority: Arc::new(SimulatedTaxAuthority),
        email_queue,
        timezone,
        recent_limit: config.app.recent_limit,
        default_page_size: config.app.default_page_size,
    };

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, %timezone, "Server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
