use std::time::Duration;

use crate::{
    models::Sender,
    services::telegram::{Notifier, TelegramClient, Update},
    AppState,
};

use super::commands_controller;

const RETRY_AFTER: Duration = Duration::from_secs(5);

/// Long-polls Telegram for messages and answers each command. Runs until the process exits.
pub async fn run_polling(state: AppState, client: TelegramClient) {
    // Polling and webhooks are mutually exclusive on the Bot API.
    if let Err(e) = client.delete_webhook().await {
        tracing::warn!("deleteWebhook failed: {}", e);
    }

    tracing::info!("bot polling for updates");

    let mut offset = 0_i64;
    loop {
        let updates = match client.get_updates(offset).await {
            Ok(u) => u,
            Err(e) => {
                tracing::warn!("getUpdates failed, retrying in {:?}: {}", RETRY_AFTER, e);
                tokio::time::sleep(RETRY_AFTER).await;
                continue;
            }
        };

        for update in updates {
            offset = offset.max(update.update_id + 1);
            handle_update(&state, update).await;
        }
    }
}

pub async fn handle_update(state: &AppState, update: Update) {
    let Some(message) = update.message else {
        return;
    };
    let (Some(from), Some(text)) = (message.from, message.text) else {
        return;
    };

    let sender = Sender {
        user_id: from.id,
        chat_id: message.chat.id,
    };

    let Some(reply) = commands_controller::handle_message(state, sender, &text).await else {
        return;
    };

    if let Err(e) = state.notifier.send(sender.chat_id, &reply).await {
        tracing::warn!("reply to chat {} failed: {}", sender.chat_id, e);
    }
}
