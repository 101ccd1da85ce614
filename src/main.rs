use std::{net::SocketAddr, process::ExitCode, sync::Arc};

use tracing_subscriber::EnvFilter;

use coinalert::{
    config,
    controllers::telegram_controller,
    routes,
    services::{
        alert_monitor,
        alert_store::JsonFileStore,
        keepalive,
        price_feed::CoinGeckoClient,
        telegram::TelegramClient,
    },
    AppState,
};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = match config::load() {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("startup configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let store = JsonFileStore::new(settings.alert_file.clone());
    let feed = CoinGeckoClient::new(settings.coingecko_api_url.clone(), settings.feed_timeout);
    let telegram = TelegramClient::new(
        settings.telegram_api_url.clone(),
        settings.bot_token.clone(),
        settings.send_timeout,
    );

    tracing::info!(
        "alerts stored in {}, {} allowed users, {} coins",
        store.path().display(),
        settings.allowed_users.len(),
        settings.coins.symbols().count()
    );

    let state = AppState::new(
        settings.clone(),
        Arc::new(store),
        Arc::new(feed),
        Arc::new(telegram.clone()),
    );

    tokio::spawn(serve_health(state.clone()));

    alert_monitor::spawn_price_alert_monitor(state.clone());

    if let Some(url) = settings.ping_url.clone() {
        keepalive::spawn_keepalive(url, settings.ping_interval);
    }

    tokio::select! {
        _ = telegram_controller::run_polling(state, telegram) => {}
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutting down");
        }
    }

    ExitCode::SUCCESS
}

async fn serve_health(state: AppState) {
    let addr = SocketAddr::from((state.settings.host, state.settings.port));

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("health server could not bind {}: {}", addr, e);
            return;
        }
    };

    tracing::info!("health check listening on http://{}", addr);

    if let Err(e) = axum::serve(listener, routes::app(state)).await {
        tracing::error!("health server stopped: {}", e);
    }
}
