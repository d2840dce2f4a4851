//! Callback Handler module for processing inline keyboard callback queries

use anyhow::Result;
use teloxide::prelude::*;
use tracing::{debug, error};

use crate::localization::t_lang;
use crate::session::UserKey;

use super::dialogue_manager::{run_wizard_event, EventContext};
use super::ui_builder::parse_callback_data;
use super::BotState;

/// Handle callback queries from inline keyboards
pub async fn callback_handler(
    bot: Bot,
    q: teloxide::types::CallbackQuery,
    state: BotState,
) -> Result<()> {
    debug!(user_id = %q.from.id, data = ?q.data, "Received callback query from user");

    // Clear the loading state before any reply is attempted
    bot.answer_callback_query(q.id.clone()).await?;

    let event = q.data.as_deref().and_then(parse_callback_data);
    let user_id = UserKey::try_from(q.from.id.0).ok();

    match (event, &q.message, user_id) {
        (Some(event), Some(msg), Some(user_id)) => {
            let ctx = EventContext {
                chat_id: msg.chat().id,
                user_id,
                language_code: q.from.language_code.as_deref(),
                source_message: Some(msg.id()),
            };

            if let Err(e) = run_wizard_event(&bot, &state, &ctx, event).await {
                error!(user_id = ctx.user_id, error = %e, "Error handling callback query");
                if let Err(e) = bot
                    .send_message(ctx.chat_id, t_lang("error-generic", ctx.language_code))
                    .await
                {
                    error!(user_id = ctx.user_id, error = %e, "Failed to send error message");
                }
            }
        }
        _ => {
            // Unknown payloads, queries without a message and out-of-range user ids
            debug!(data = ?q.data, "Ignoring callback query");
        }
    }

    Ok(())
}
