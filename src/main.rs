#![forbid(unsafe_code)]

mod handlers;
mod models;
mod repository;
mod utils;

use std::{future::IntoFuture, process::exit, str::FromStr, sync::Arc};

use repository::{ensure_schema, SubmissionRepository, TableName};
use serde::Deserialize;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use thiserror::Error;
use time::Duration;
use tokio::{net::TcpListener, select, signal};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utils::nonce::FormTokens;

const DEFAULT_LISTEN_ADDRESS: &str = "0.0.0.0:8080";
const DEFAULT_TABLE_PREFIX: &str = "intake_";
const DEFAULT_TOKEN_LIFETIME_HOURS: i64 = 24;
const MAX_TOKEN_LIFETIME_HOURS: i64 = 24 * 366;

#[derive(Debug, Deserialize)]
struct AppConfig {
    database_url: String,
    form_secret: String,
    admin_token: String,
    listen_address: Option<String>,
    table_prefix: Option<String>,
    form_token_lifetime_hours: Option<i64>,
}

#[derive(Debug, Error)]
#[error(
    "FORM_TOKEN_LIFETIME_HOURS must be between 1 and {max}, got {0}",
    max = MAX_TOKEN_LIFETIME_HOURS
)]
struct InvalidTokenLifetime(i64);

#[derive(Clone)]
pub struct AppState {
    pub submission_repository: Arc<SubmissionRepository>,
    pub form_tokens: Arc<FormTokens>,
    pub admin_token: Arc<str>,
}

#[tokio::main]
async fn main() {
    if let Err(err) = dotenvy::dotenv() {
        warn!("Could not load config from .env file: {err}");
    }

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(
                    "collab_intake=info"
                        .parse()
                        .expect("Hard-coded default directive should be correct"),
                )
                .from_env_lossy(),
        )
        .init();

    let app_config = match envy::from_env::<AppConfig>() {
        Ok(config) => config,
        Err(err) => {
            error!("Could not load app config: {err}");
            exit(255);
        }
    };

    if app_config.form_secret.trim().is_empty() || app_config.admin_token.trim().is_empty() {
        error!("FORM_SECRET and ADMIN_TOKEN must not be empty");
        exit(255);
    }

    let table = match TableName::with_prefix(
        app_config
            .table_prefix
            .as_deref()
            .unwrap_or(DEFAULT_TABLE_PREFIX),
    ) {
        Ok(table) => table,
        Err(err) => {
            error!("Could not load app config: {err}");
            exit(255);
        }
    };

    let token_lifetime = match token_lifetime(app_config.form_token_lifetime_hours) {
        Ok(lifetime) => lifetime,
        Err(err) => {
            error!("Could not load app config: {err}");
            exit(255);
        }
    };

    let db_pool = match setup_database(&app_config.database_url, &table).await {
        Ok(pool) => pool,
        Err(err) => {
            error!("Could not setup database: {err}");
            exit(255);
        }
    };

    let app_state = AppState {
        submission_repository: Arc::new(SubmissionRepository::new(db_pool.clone(), table)),
        form_tokens: Arc::new(FormTokens::new(app_config.form_secret, token_lifetime)),
        admin_token: Arc::from(app_config.admin_token),
    };

    let address = app_config
        .listen_address
        .unwrap_or_else(|| DEFAULT_LISTEN_ADDRESS.to_string());

    let listener = match TcpListener::bind(&address).await {
        Ok(listener) => listener,
        Err(err) => {
            error!("Could not listen at {address}: {err}");
            exit(255);
        }
    };

    info!("Listening at {address}");

    select! {
        _ = signal::ctrl_c() => {
            info!("Ctrl-C received, shutting down");
        },

        result = axum::serve(listener, handlers::router(app_state)).into_future() => {
            if let Err(err) = result {
                error!("Server stopped unexpectedly: {err}");
            }
        },
    };

    db_pool.close().await;
}

#[tracing::instrument(skip(url))]
async fn setup_database(url: &str, table: &TableName) -> anyhow::Result<SqlitePool> {
    info!("Connecting to SQLite database at {url}");
    let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new().connect_with(options).await?;
    info!("Preparing the schema");
    ensure_schema(&pool, table).await?;
    info!("Done!");
    Ok(pool)
}

fn token_lifetime(hours: Option<i64>) -> Result<Duration, InvalidTokenLifetime> {
    let hours = hours.unwrap_or(DEFAULT_TOKEN_LIFETIME_HOURS);

    if (1..=MAX_TOKEN_LIFETIME_HOURS).contains(&hours) {
        Ok(Duration::hours(hours))
    } else {
        Err(InvalidTokenLifetime(hours))
    }
}
