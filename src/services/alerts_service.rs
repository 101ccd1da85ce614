use std::collections::BTreeSet;

use crate::{
    errors::{CommandError, ValidationError},
    models::{Alert, AlertSet, Direction},
    AppState,
};

/// Alerts a single owner may hold at once.
pub const MAX_ALERTS_PER_OWNER: usize = 1;

pub async fn list_alerts(state: &AppState, owner: &str) -> Result<Vec<Alert>, CommandError> {
    let alerts = state.alerts.snapshot().await?;
    Ok(alerts.get(owner).to_vec())
}

/// Validates and stores a new alert. Rejections never touch the store.
pub async fn create_alert(
    state: &AppState,
    owner: &str,
    symbol: &str,
    raw_price: &str,
    raw_direction: Option<&str>,
) -> Result<Alert, CommandError> {
    let coins = &state.settings.coins;

    state
        .alerts
        .update(|alerts: &mut AlertSet| -> Result<Alert, CommandError> {
            if alerts.get(owner).len() >= MAX_ALERTS_PER_OWNER {
                return Err(ValidationError::AlertLimitReached.into());
            }

            let symbol = symbol.to_lowercase();
            let coin = coins
                .coin_for(&symbol)
                .ok_or_else(|| ValidationError::UnsupportedCoin(symbol.clone()))?
                .to_string();

            let price = parse_price(raw_price)?;

            let direction = match raw_direction {
                Some(raw) => Direction::parse(raw)
                    .ok_or_else(|| ValidationError::InvalidDirection(raw.to_string()))?,
                None => Direction::Above,
            };

            let alert = Alert {
                coin,
                symbol,
                price,
                direction,
            };

            let mut list = alerts.get(owner).to_vec();
            list.push(alert.clone());
            alerts.replace(owner, list);

            Ok(alert)
        })
        .await
}

/// Removes the owner's alert at 1-based `position`. The owner entry goes away with its last alert.
pub async fn remove_alert(
    state: &AppState,
    owner: &str,
    position: usize,
) -> Result<Alert, CommandError> {
    state
        .alerts
        .update(|alerts: &mut AlertSet| -> Result<Alert, CommandError> {
            let mut list = alerts.get(owner).to_vec();
            if list.is_empty() {
                return Err(ValidationError::NothingToRemove.into());
            }
            if position == 0 || position > list.len() {
                return Err(ValidationError::NoAlertAt(position).into());
            }

            let removed = list.remove(position - 1);
            alerts.replace(owner, list);

            Ok(removed)
        })
        .await
}

/// Current price per requested ticker, in request order. Unsupported tickers
/// are dropped; `None` means the feed had no quote for that coin.
pub async fn quote_symbols(
    state: &AppState,
    symbols: &[&str],
) -> Result<Vec<(String, Option<f64>)>, CommandError> {
    let coins = &state.settings.coins;

    let wanted: Vec<(String, String)> = symbols
        .iter()
        .map(|s| s.to_lowercase())
        .filter_map(|s| coins.coin_for(&s).map(|c| (s.clone(), c.to_string())))
        .collect();

    if wanted.is_empty() {
        return Err(ValidationError::Usage("/price COIN [COIN...]").into());
    }

    let ids: BTreeSet<String> = wanted.iter().map(|(_, c)| c.clone()).collect();
    let prices = state.feed.fetch_prices(&ids).await?;

    Ok(wanted
        .into_iter()
        .map(|(symbol, coin)| {
            let price = prices.get(&coin).copied();
            (symbol, price)
        })
        .collect())
}

fn parse_price(raw: &str) -> Result<f64, ValidationError> {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(v),
        _ => Err(ValidationError::InvalidPrice(raw.to_string())),
    }
}
