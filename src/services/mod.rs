pub mod alert_store;
pub mod alert_book;
pub mod alert_engine;
pub mod alert_monitor;

pub mod price_feed;
pub mod telegram;
pub mod keepalive;

pub mod alerts_service;
