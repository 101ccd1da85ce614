use std::time::Duration;

use reqwest::Client;
use tokio::time;

/// Pings `url` forever so free hosting tiers don't idle the process out.
pub fn spawn_keepalive(url: String, every: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let http = Client::new();
        let mut interval = time::interval(every);

        loop {
            interval.tick().await;

            match http.get(&url).timeout(Duration::from_secs(30)).send().await {
                Ok(res) => tracing::info!("pinged self: {}", res.status()),
                Err(e) => tracing::warn!("self ping failed: {}", e),
            }
        }
    })
}
