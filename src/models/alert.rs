use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Above,
    Below,
}

impl Direction {
    /// Boundary is inclusive on both sides.
    pub fn is_triggered(self, observed: f64, threshold: f64) -> bool {
        match self {
            Direction::Above => observed >= threshold,
            Direction::Below => observed <= threshold,
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_lowercase().as_str() {
            "above" => Some(Direction::Above),
            "below" => Some(Direction::Below),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Above => "above",
            Direction::Below => "below",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One stored threshold watch. The owner is the key it is stored under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    // price feed id, e.g. "bitcoin"
    pub coin: String,
    // ticker shown to the user, e.g. "btc"
    pub symbol: String,
    pub price: f64,
    pub direction: Direction,
}

impl Alert {
    /// `BTC above $30000.0`
    pub fn describe(&self) -> String {
        format!(
            "{} {} ${}",
            self.symbol.to_uppercase(),
            self.direction,
            fmt_threshold(self.price)
        )
    }
}

/// Whole numbers keep one decimal (`30000.0`); anything else prints in shortest form.
pub fn fmt_threshold(price: f64) -> String {
    if price.is_finite() && price.fract() == 0.0 && price.abs() < 1e16 {
        format!("{price:.1}")
    } else {
        price.to_string()
    }
}

/// Whole persisted state: owner id -> that owner's alerts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlertSet(BTreeMap<String, Vec<Alert>>);

impl AlertSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of owners with an entry.
    pub fn owners(&self) -> usize {
        self.0.len()
    }

    pub fn alert_count(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    pub fn get(&self, owner: &str) -> &[Alert] {
        self.0.get(owner).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Replaces the owner's entry. An empty list removes it.
    pub fn replace(&mut self, owner: impl Into<String>, alerts: Vec<Alert>) {
        let owner = owner.into();
        if alerts.is_empty() {
            self.0.remove(&owner);
        } else {
            self.0.insert(owner, alerts);
        }
    }

    pub fn remove_owner(&mut self, owner: &str) -> Option<Vec<Alert>> {
        self.0.remove(owner)
    }

    /// Deduplicated coin ids across every stored alert.
    pub fn coin_ids(&self) -> BTreeSet<String> {
        self.0
            .values()
            .flatten()
            .map(|a| a.coin.clone())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<Alert>)> {
        self.0.iter()
    }
}

impl FromIterator<(String, Vec<Alert>)> for AlertSet {
    fn from_iter<I: IntoIterator<Item = (String, Vec<Alert>)>>(iter: I) -> Self {
        let mut set = AlertSet::new();
        for (owner, alerts) in iter {
            set.replace(owner, alerts);
        }
        set
    }
}

/// An alert the engine decided has fired and is consumed.
#[derive(Debug, Clone, PartialEq)]
pub struct FiredAlert {
    pub owner: String,
    pub alert: Alert,
    pub observed_price: f64,
}

impl FiredAlert {
    pub fn notification_text(&self) -> String {
        format!(
            "🚨 {} is ${:.4}, triggered alert {} ${}",
            self.alert.symbol.to_uppercase(),
            self.observed_price,
            self.alert.direction,
            fmt_threshold(self.alert.price)
        )
    }
}
