//! Library entrypoint for the coin alert bot.
//!
//! `main.rs` only wires tasks together; everything it runs lives here so the
//! integration tests under `tests/` can build an `AppState` with fake
//! collaborators.

use std::sync::Arc;

pub mod config;
pub mod errors;
pub mod models;

pub mod services;

pub mod controllers;
pub mod routes;

use services::{
    alert_book::AlertBook,
    alert_store::AlertStore,
    price_feed::PriceFeed,
    telegram::Notifier,
};

#[derive(Clone)]
pub struct AppState {
    pub settings: config::Settings,
    pub alerts: AlertBook,
    pub feed: Arc<dyn PriceFeed>,
    pub notifier: Arc<dyn Notifier>,
}

impl AppState {
    pub fn new(
        settings: config::Settings,
        store: Arc<dyn AlertStore>,
        feed: Arc<dyn PriceFeed>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            settings,
            alerts: AlertBook::new(store),
            feed,
            notifier,
        }
    }
}
