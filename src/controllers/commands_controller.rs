use crate::{
    errors::{CommandError, ValidationError},
    models::Sender,
    services::alerts_service,
    AppState,
};

pub const WELCOME: &str = "Welcome to Crypto Alert Bot (Beta). Use /add to set an alert.";
pub const HELP: &str = "/add COIN PRICE [above|below]\n/list\n/remove 1\n/price COIN\n/coin";
pub const UNKNOWN: &str = "Unknown command. Use /help";

#[derive(Debug, Clone, PartialEq)]
pub enum Command<'a> {
    Start,
    Help,
    Coin,
    Add(Vec<&'a str>),
    List,
    Remove(Option<&'a str>),
    Price(Vec<&'a str>),
    Unknown(&'a str),
}

impl<'a> Command<'a> {
    /// `None` for anything that isn't a `/command`. A `@BotName` suffix is ignored.
    pub fn parse(text: &'a str) -> Option<Self> {
        let mut parts = text.split_whitespace();
        let head = parts.next()?.strip_prefix('/')?;
        let name = head.split('@').next().unwrap_or(head);
        let args: Vec<&str> = parts.collect();

        let cmd = match name.to_lowercase().as_str() {
            "start" => Command::Start,
            "help" => Command::Help,
            "coin" => Command::Coin,
            "add" => Command::Add(args),
            "list" => Command::List,
            "remove" => Command::Remove(args.first().copied()),
            "price" => Command::Price(args),
            _ => Command::Unknown(name),
        };
        Some(cmd)
    }
}

/// Runs one chat message. Returns the reply, or `None` for non-command text.
pub async fn handle_message(state: &AppState, sender: Sender, text: &str) -> Option<String> {
    let cmd = Command::parse(text)?;

    let reply = match run(state, sender, cmd).await {
        Ok(reply) => reply,
        Err(e) => {
            match &e {
                CommandError::Store(err) => {
                    tracing::error!("command from {} hit a store error: {}", sender.user_id, err)
                }
                CommandError::Feed(err) => {
                    tracing::warn!("price lookup for {} failed: {}", sender.user_id, err)
                }
                CommandError::Unauthorized(err) => tracing::info!("{}", err),
                CommandError::Validation(_) => {}
            }
            e.reply()
        }
    };

    Some(reply)
}

async fn run(state: &AppState, sender: Sender, cmd: Command<'_>) -> Result<String, CommandError> {
    let allowed = &state.settings.allowed_users;
    let owner = sender.owner();

    match cmd {
        Command::Start => {
            allowed.check(sender.user_id)?;
            Ok(WELCOME.to_string())
        }

        Command::Help => Ok(HELP.to_string()),

        Command::Coin => {
            let symbols: Vec<&str> = state.settings.coins.symbols().collect();
            Ok(format!("Supported coins: {}", symbols.join(", ")))
        }

        Command::Add(args) => {
            allowed.check(sender.user_id)?;

            if args.len() < 2 {
                return Err(ValidationError::Usage("/add COIN PRICE [above|below]").into());
            }

            let alert =
                alerts_service::create_alert(state, &owner, args[0], args[1], args.get(2).copied())
                    .await?;

            tracing::info!("alert created: owner={} {}", owner, alert.describe());
            Ok(format!("✅ Alert set for {}", alert.describe()))
        }

        Command::List => {
            let alerts = alerts_service::list_alerts(state, &owner).await?;
            if alerts.is_empty() {
                return Ok("No active alerts.".to_string());
            }

            let lines: Vec<String> = alerts
                .iter()
                .enumerate()
                .map(|(i, a)| format!("{}. {}", i + 1, a.describe()))
                .collect();
            Ok(lines.join("\n"))
        }

        Command::Remove(raw_index) => {
            allowed.check(sender.user_id)?;

            let position = match raw_index {
                Some(raw) => raw
                    .parse::<usize>()
                    .map_err(|_| ValidationError::Usage("/remove 1"))?,
                None => 1,
            };

            let removed = alerts_service::remove_alert(state, &owner, position).await?;
            tracing::info!("alert removed: owner={} {}", owner, removed.describe());
            Ok("✅ Alert removed.".to_string())
        }

        Command::Price(symbols) => {
            let quotes = alerts_service::quote_symbols(state, &symbols).await?;

            let lines: Vec<String> = quotes
                .into_iter()
                .map(|(symbol, price)| match price {
                    Some(p) => format!("{}: ${:.4}", symbol.to_uppercase(), p),
                    None => format!("{}: no quote", symbol.to_uppercase()),
                })
                .collect();
            Ok(lines.join("\n"))
        }

        Command::Unknown(_) => Ok(UNKNOWN.to_string()),
    }
}
