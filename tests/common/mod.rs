#![allow(dead_code)]

use std::{
    collections::{BTreeSet, HashSet},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use async_trait::async_trait;
use coinalert::{
    config::{self, Settings},
    errors::{DispatchFailure, FeedUnavailable, StoreError},
    models::{Alert, AlertSet, Direction},
    services::{
        alert_engine::PriceMap,
        alert_store::{AlertStore, MemoryStore},
        price_feed::PriceFeed,
        telegram::Notifier,
    },
    AppState,
};

pub const OWNER: i64 = 42;
pub const OTHER_OWNER: i64 = 7;
pub const STRANGER: i64 = 999;

pub fn test_settings() -> Settings {
    config::from_lookup(|key| match key {
        "TELEGRAM_BOT_TOKEN" => Some("test-token".to_string()),
        "ALLOWED_USERS" => Some(format!("{OWNER},{OTHER_OWNER}")),
        _ => None,
    })
    .expect("test settings")
}

pub fn alert(coin: &str, symbol: &str, price: f64, direction: Direction) -> Alert {
    Alert {
        coin: coin.to_string(),
        symbol: symbol.to_string(),
        price,
        direction,
    }
}

pub fn btc_below_30k() -> Alert {
    alert("bitcoin", "btc", 30000.0, Direction::Below)
}

pub fn set_of(entries: Vec<(&str, Vec<Alert>)>) -> AlertSet {
    entries
        .into_iter()
        .map(|(owner, alerts)| (owner.to_string(), alerts))
        .collect()
}

pub fn prices(entries: &[(&str, f64)]) -> PriceMap {
    entries.iter().map(|(c, p)| (c.to_string(), *p)).collect()
}

/// Feed that answers from a fixed map, or fails when `prices` is `None`.
pub struct FakeFeed {
    prices: Mutex<Option<PriceMap>>,
    pub calls: AtomicUsize,
    pub requested: Mutex<Vec<BTreeSet<String>>>,
}

impl FakeFeed {
    pub fn with_prices(prices: PriceMap) -> Self {
        Self {
            prices: Mutex::new(Some(prices)),
            calls: AtomicUsize::new(0),
            requested: Mutex::new(Vec::new()),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            prices: Mutex::new(None),
            calls: AtomicUsize::new(0),
            requested: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PriceFeed for FakeFeed {
    async fn fetch_prices(&self, coin_ids: &BTreeSet<String>) -> Result<PriceMap, FeedUnavailable> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requested.lock().unwrap().push(coin_ids.clone());

        let guard = self.prices.lock().unwrap();
        match guard.as_ref() {
            Some(all) => Ok(all
                .iter()
                .filter(|(coin, _)| coin_ids.contains(*coin))
                .map(|(c, p)| (c.clone(), *p))
                .collect()),
            None => Err(FeedUnavailable::Status(503)),
        }
    }
}

/// Records every message; refuses chats in `failing` and stalls when `delay` is set.
#[derive(Default)]
pub struct FakeNotifier {
    pub sent: Mutex<Vec<(i64, String)>>,
    pub failing: HashSet<i64>,
    pub delay: Option<Duration>,
}

impl FakeNotifier {
    pub fn failing_for(chat_ids: &[i64]) -> Self {
        Self {
            failing: chat_ids.iter().copied().collect(),
            ..Self::default()
        }
    }

    pub fn stalling(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<(i64, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for FakeNotifier {
    async fn send(&self, chat_id: i64, text: &str) -> Result<(), DispatchFailure> {
        if let Some(d) = self.delay {
            tokio::time::sleep(d).await;
        }
        if self.failing.contains(&chat_id) {
            return Err(DispatchFailure::Rejected("403 Forbidden: bot was blocked".to_string()));
        }
        self.sent.lock().unwrap().push((chat_id, text.to_string()));
        Ok(())
    }
}

/// Memory store that counts saves.
pub struct CountingStore {
    inner: MemoryStore,
    pub saves: AtomicUsize,
}

impl CountingStore {
    pub fn new(initial: AlertSet) -> Self {
        Self {
            inner: MemoryStore::new(initial),
            saves: AtomicUsize::new(0),
        }
    }

    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub async fn contents(&self) -> AlertSet {
        self.inner.load().await.unwrap()
    }
}

#[async_trait]
impl AlertStore for CountingStore {
    async fn load(&self) -> Result<AlertSet, StoreError> {
        self.inner.load().await
    }

    async fn save(&self, alerts: &AlertSet) -> Result<(), StoreError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        self.inner.save(alerts).await
    }
}

pub struct Harness {
    pub state: AppState,
    pub store: Arc<CountingStore>,
    pub feed: Arc<FakeFeed>,
    pub notifier: Arc<FakeNotifier>,
}

pub fn harness(initial: AlertSet, feed: FakeFeed, notifier: FakeNotifier) -> Harness {
    let store = Arc::new(CountingStore::new(initial));
    let feed = Arc::new(feed);
    let notifier = Arc::new(notifier);

    let state = AppState::new(
        test_settings(),
        store.clone(),
        feed.clone(),
        notifier.clone(),
    );

    Harness {
        state,
        store,
        feed,
        notifier,
    }
}
