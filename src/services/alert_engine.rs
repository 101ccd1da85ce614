use std::collections::HashMap;

use crate::models::{AlertSet, FiredAlert};

/// coin id -> current USD price
pub type PriceMap = HashMap<String, f64>;

#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub fired: Vec<FiredAlert>,
    pub remaining: AlertSet,
}

/// Matches every stored alert against `prices`.
///
/// Fired alerts are removed and reported; alerts whose coin has no quote are
/// kept as they are. Owners with nothing left are dropped from `remaining`.
pub fn evaluate(alerts: &AlertSet, prices: &PriceMap) -> Evaluation {
    let mut fired = Vec::new();
    let mut remaining = AlertSet::new();

    for (owner, list) in alerts.iter() {
        let mut kept = Vec::with_capacity(list.len());

        for alert in list {
            let Some(&observed) = prices.get(&alert.coin) else {
                kept.push(alert.clone());
                continue;
            };

            if alert.direction.is_triggered(observed, alert.price) {
                fired.push(FiredAlert {
                    owner: owner.clone(),
                    alert: alert.clone(),
                    observed_price: observed,
                });
            } else {
                kept.push(alert.clone());
            }
        }

        remaining.replace(owner.clone(), kept);
    }

    Evaluation { fired, remaining }
}
