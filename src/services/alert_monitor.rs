use std::time::Duration;

use futures_util::future::join_all;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::{errors::{DispatchFailure, StoreError}, models::FiredAlert, AppState};

use super::alert_engine;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No alerts stored; the feed was not called.
    Idle,
    /// Quote source failed; nothing was changed.
    FeedSkipped,
    Evaluated { fired: usize, delivered: usize },
}

pub fn spawn_price_alert_monitor(state: AppState) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let period = state.settings.check_interval;
        let start = Instant::now() + state.settings.check_first_delay;

        let mut interval = time::interval_at(start, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(
            "alert monitor running every {:?} (first check in {:?})",
            period,
            state.settings.check_first_delay
        );

        loop {
            interval.tick().await;

            if let Err(e) = run_tick(&state).await {
                tracing::error!("alert monitor tick failed: {}", e);
            }
        }
    })
}

pub async fn run_tick(state: &AppState) -> Result<TickOutcome, StoreError> {
    let snapshot = state.alerts.snapshot().await?;
    if snapshot.is_empty() {
        tracing::debug!("no alerts stored, skipping price check");
        return Ok(TickOutcome::Idle);
    }

    let coin_ids = snapshot.coin_ids();
    let prices = match state.feed.fetch_prices(&coin_ids).await {
        Ok(p) => p,
        Err(e) => {
            tracing::warn!("price fetch failed, skipping tick: {}", e);
            return Ok(TickOutcome::FeedSkipped);
        }
    };

    // Re-read under the lock: commands may have changed the set while we fetched.
    // Saved even with nothing fired so empty owners get pruned.
    let fired = state
        .alerts
        .update(|alerts| {
            let evaluation = alert_engine::evaluate(alerts, &prices);
            *alerts = evaluation.remaining;
            Ok::<_, StoreError>(evaluation.fired)
        })
        .await?;

    let total = fired.len();
    let delivered = dispatch(state, fired).await;

    Ok(TickOutcome::Evaluated {
        fired: total,
        delivered,
    })
}

/// Sends one message per fired alert. Returns how many got through.
async fn dispatch(state: &AppState, fired: Vec<FiredAlert>) -> usize {
    let send_timeout = state.settings.send_timeout;

    let sends = fired.iter().map(|event| async move {
        tracing::info!(
            "alert fired: owner={} {} observed={}",
            event.owner,
            event.alert.describe(),
            event.observed_price
        );

        match notify(state, event, send_timeout).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("could not notify owner {}: {}", event.owner, e);
                false
            }
        }
    });

    join_all(sends).await.into_iter().filter(|ok| *ok).count()
}

async fn notify(
    state: &AppState,
    event: &FiredAlert,
    send_timeout: Duration,
) -> Result<(), DispatchFailure> {
    let chat_id = event
        .owner
        .parse::<i64>()
        .map_err(|_| DispatchFailure::BadChatId(event.owner.clone()))?;

    let text = event.notification_text();
    match time::timeout(send_timeout, state.notifier.send(chat_id, &text)).await {
        Ok(res) => res,
        Err(_) => Err(DispatchFailure::Timeout),
    }
}
