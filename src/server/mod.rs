use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::{delete, get, post},
};
use tokio::{
    net::TcpListener,
    signal::{self, ctrl_c},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

pub(crate) mod error;
mod routes;
pub(crate) mod session;
pub(crate) mod state;


use crate::{config::Config, db::Database};

use error::ServerError;
use routes::{
    auth::{login_handler, logout_handler, register_handler},
    charts::{
        chart_data_handler, crypto_data_handler, multiline_crypto_data_handler,
        multiline_stock_data_handler,
    },
    health_handler,
    trends::{add_trend_handler, delete_trend_handler, get_trend_handler, list_trends_handler},
    users::{add_user_handler, delete_user_handler, list_users_handler, update_user_handler},
};
use state::AppState;

/// Builds the application router over `state`.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/health", get(health_handler))
        .route("/register", post(register_handler))
        .route("/login", post(login_handler))
        .route("/logout", post(logout_handler))
        .route("/api/chart-data", get(chart_data_handler))
        .route("/api/crypto-data", get(crypto_data_handler))
        .route(
            "/api/multiline-stock-data",
            get(multiline_stock_data_handler),
        )
        .route(
            "/api/multiline-crypto-data",
            get(multiline_crypto_data_handler),
        )
        .route(
            "/api/trends",
            get(list_trends_handler).post(add_trend_handler),
        )
        .route(
            "/api/trends/{id}",
            get(get_trend_handler).delete(delete_trend_handler),
        )
        .route("/api/users", get(list_users_handler).post(add_user_handler))
        .route(
            "/api/users/{id}",
            delete(delete_user_handler).put(update_user_handler),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Connects to the database, then serves until Ctrl+C or SIGTERM.
pub async fn start_server(config: Config) -> Result<(), ServerError> {
    info!("Initializing database...");
    let db = Database::new(&config.database_url, config.db_max_connections).await?;

    let address = config.bind_addr();
    let state = AppState::new(config, db);
    let app = build_router(state);

    info!("Binding to {address}");
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| ServerError::Bind {
            address: address.clone(),
            source,
        })?;

    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ServerError::Serve)?;

    info!("Server shut down");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
