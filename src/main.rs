use portfolio_api::{
    AppState,
    config::{AppConfig, Env},
    create_router,
    notify::{NotifierState, SmtpNotifier},
    repository::{self, MemoryRepository, PostgresRepository, RepositoryState},
};
use std::{process, sync::Arc};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// Loads configuration, initializes logging, connects the store, builds the
/// optional notifier and serves the router. Any startup failure exits non-zero.
#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            // Logging is not initialized yet.
            eprintln!("FATAL: invalid configuration: {e}");
            process::exit(1);
        }
    };

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "portfolio_api=debug,tower_http=info".into());

    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Application starting in {:?} mode", config.env);

    let repo = match init_repository(&config).await {
        Ok(repo) => repo,
        Err(e) => {
            tracing::error!(error = %e, "FATAL: could not initialize the store");
            process::exit(1);
        }
    };

    let notifier = match config.mail.clone().map(SmtpNotifier::new).transpose() {
        Ok(Some(smtp)) => {
            tracing::info!("Owner notifications enabled");
            Some(Arc::new(smtp) as NotifierState)
        }
        Ok(None) => {
            tracing::warn!("SMTP_HOST not set; owner notifications disabled");
            None
        }
        Err(e) => {
            tracing::error!(error = %e, "FATAL: invalid SMTP configuration");
            process::exit(1);
        }
    };

    let address = config.bind_address();
    let app = create_router(AppState {
        repo,
        notifier,
        config,
    });

    let listener = match TcpListener::bind(&address).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, %address, "FATAL: could not bind");
            process::exit(1);
        }
    };

    tracing::info!("Listening on {address}");
    tracing::info!("API Documentation (Swagger UI) available at: http://{address}/swagger-ui");

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "server terminated");
        process::exit(1);
    }
}

/// Postgres when `DATABASE_URL` is set (migrations applied first), otherwise
/// the in-memory store. `AppConfig::load` already refused the latter in production.
async fn init_repository(config: &AppConfig) -> Result<RepositoryState, Box<dyn std::error::Error>> {
    match &config.database_url {
        Some(url) => {
            let pool = repository::connect(url).await?;
            repository::run_migrations(&pool).await?;
            tracing::info!("Connected to Postgres; migrations applied");
            Ok(Arc::new(PostgresRepository::new(pool)) as RepositoryState)
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using the in-memory store (data is not persisted)");
            Ok(Arc::new(MemoryRepository::new()) as RepositoryState)
        }
    }
}
