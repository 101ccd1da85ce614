use std::{env, net::IpAddr, path::PathBuf, time::Duration};

use crate::{
    errors::ConfigError,
    models::{AllowList, CoinTable},
};

#[derive(Debug, Clone)]
pub struct Settings {
    pub bot_token: String,
    pub telegram_api_url: String,

    pub allowed_users: AllowList,
    pub coins: CoinTable,

    pub alert_file: PathBuf,
    pub coingecko_api_url: String,

    pub check_interval: Duration,
    pub check_first_delay: Duration,
    pub feed_timeout: Duration,
    pub send_timeout: Duration,

    pub ping_url: Option<String>,
    pub ping_interval: Duration,

    pub host: IpAddr,
    pub port: u16,
}

pub fn load() -> Result<Settings, ConfigError> {
    // Loads .env if present (no crash if missing)
    dotenvy::dotenv().ok();

    from_lookup(|key| env::var(key).ok())
}

/// Builds settings from any key lookup, so parsing can be tested without the process env.
pub fn from_lookup<F>(lookup: F) -> Result<Settings, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    let bot_token = var("TELEGRAM_BOT_TOKEN").ok_or(ConfigError::Missing("TELEGRAM_BOT_TOKEN"))?;

    let telegram_api_url = var("TELEGRAM_API_URL")
        .unwrap_or_else(|| "https://api.telegram.org".to_string());

    // set but blank locks everyone out; only an unset key gets the defaults
    let allowed_users = match lookup("ALLOWED_USERS") {
        Some(raw) => parse_allow_list(&raw)?,
        None => AllowList::default(),
    };

    let coins = match var("SUPPORTED_COINS") {
        Some(raw) => parse_coin_table(&raw)?,
        None => CoinTable::default(),
    };

    let alert_file = var("ALERT_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("prices.json"));

    let coingecko_api_url = var("COINGECKO_API_URL")
        .unwrap_or_else(|| "https://api.coingecko.com/api/v3".to_string());

    let check_interval = seconds("CHECK_INTERVAL_SECS", var("CHECK_INTERVAL_SECS"), 15)?;
    let check_first_delay = seconds("CHECK_FIRST_DELAY_SECS", var("CHECK_FIRST_DELAY_SECS"), 5)?;
    let feed_timeout = seconds("FEED_TIMEOUT_SECS", var("FEED_TIMEOUT_SECS"), 10)?;
    let send_timeout = seconds("SEND_TIMEOUT_SECS", var("SEND_TIMEOUT_SECS"), 10)?;

    let ping_url = var("PING_URL");
    let ping_interval = seconds("PING_INTERVAL_SECS", var("PING_INTERVAL_SECS"), 300)?;

    let host = match var("HOST") {
        Some(raw) => raw.trim().parse::<IpAddr>().map_err(|_| ConfigError::Invalid {
            key: "HOST",
            value: raw.clone(),
        })?,
        None => IpAddr::from([0, 0, 0, 0]),
    };

    let port = match var("PORT") {
        Some(raw) => raw.trim().parse::<u16>().map_err(|_| ConfigError::Invalid {
            key: "PORT",
            value: raw.clone(),
        })?,
        None => 10000,
    };

    Ok(Settings {
        bot_token,
        telegram_api_url,
        allowed_users,
        coins,
        alert_file,
        coingecko_api_url,
        check_interval,
        check_first_delay,
        feed_timeout,
        send_timeout,
        ping_url,
        ping_interval,
        host,
        port,
    })
}

fn seconds(key: &'static str, raw: Option<String>, default: u64) -> Result<Duration, ConfigError> {
    let Some(raw) = raw else {
        return Ok(Duration::from_secs(default));
    };

    match raw.trim().parse::<u64>() {
        Ok(n) if n > 0 => Ok(Duration::from_secs(n)),
        _ => Err(ConfigError::Invalid { key, value: raw }),
    }
}

fn parse_allow_list(raw: &str) -> Result<AllowList, ConfigError> {
    let mut ids = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let id = part.parse::<i64>().map_err(|_| ConfigError::Invalid {
            key: "ALLOWED_USERS",
            value: part.to_string(),
        })?;
        ids.push(id);
    }
    Ok(AllowList::new(ids))
}

/// `btc=bitcoin,eth=ethereum`
fn parse_coin_table(raw: &str) -> Result<CoinTable, ConfigError> {
    let mut entries = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let invalid = || ConfigError::Invalid {
            key: "SUPPORTED_COINS",
            value: part.to_string(),
        };

        let (symbol, coin) = part.split_once('=').ok_or_else(invalid)?;
        let (symbol, coin) = (symbol.trim(), coin.trim());
        if symbol.is_empty() || coin.is_empty() {
            return Err(invalid());
        }
        entries.push((symbol.to_string(), coin.to_string()));
    }

    let table = CoinTable::new(entries);
    if table.is_empty() {
        return Err(ConfigError::Invalid {
            key: "SUPPORTED_COINS",
            value: raw.to_string(),
        });
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn missing_token_is_an_error() {
        let err = from_lookup(lookup(&[])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("TELEGRAM_BOT_TOKEN"));
    }

    #[test]
    fn defaults_apply() {
        let s = from_lookup(lookup(&[("TELEGRAM_BOT_TOKEN", "abc")])).unwrap();
        assert_eq!(s.check_interval, Duration::from_secs(15));
        assert_eq!(s.check_first_delay, Duration::from_secs(5));
        assert_eq!(s.port, 10000);
        assert_eq!(s.host, IpAddr::from([0, 0, 0, 0]));
        assert_eq!(s.alert_file, PathBuf::from("prices.json"));
        assert!(s.ping_url.is_none());
        assert!(s.allowed_users.contains(5817239686));
        assert_eq!(s.coins.coin_for("xrp"), Some("ripple"));
    }

    #[test]
    fn overrides_are_parsed() {
        let s = from_lookup(lookup(&[
            ("TELEGRAM_BOT_TOKEN", "abc"),
            ("ALLOWED_USERS", "1, 2,3"),
            ("SUPPORTED_COINS", "btc=bitcoin, ltc=litecoin"),
            ("CHECK_INTERVAL_SECS", "60"),
            ("PING_URL", "https://example.org/"),
        ]))
        .unwrap();
        assert_eq!(s.allowed_users.len(), 3);
        assert!(!s.allowed_users.contains(5817239686));
        assert_eq!(s.coins.coin_for("ltc"), Some("litecoin"));
        assert_eq!(s.coins.coin_for("eth"), None);
        assert_eq!(s.check_interval, Duration::from_secs(60));
        assert_eq!(s.ping_url.as_deref(), Some("https://example.org/"));
    }

    #[test]
    fn blank_allow_list_locks_everyone_out() {
        let s = from_lookup(lookup(&[
            ("TELEGRAM_BOT_TOKEN", "abc"),
            ("ALLOWED_USERS", " "),
        ]))
        .unwrap();
        assert!(s.allowed_users.is_empty());
        assert!(!s.allowed_users.contains(5817239686));
    }

    #[test]
    fn zero_interval_is_rejected() {
        let err = from_lookup(lookup(&[
            ("TELEGRAM_BOT_TOKEN", "abc"),
            ("CHECK_INTERVAL_SECS", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "CHECK_INTERVAL_SECS", .. }));
    }

    #[test]
    fn malformed_coin_entry_is_rejected() {
        let err = from_lookup(lookup(&[
            ("TELEGRAM_BOT_TOKEN", "abc"),
            ("SUPPORTED_COINS", "btc"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "SUPPORTED_COINS", .. }));
    }
}
