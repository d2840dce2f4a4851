//! Dialogue Manager module: feeds wizard events through the state machine
//! and renders the resulting transition to the chat.

use anyhow::Result;
use teloxide::prelude::*;
use teloxide::types::MessageId;
use tracing::{debug, error, info};

use crate::localization::t_lang;
use crate::session::UserKey;
use crate::wizard::{Transition, WizardEvent};

use super::ui_builder::{
    area_error_message, create_base_type_keyboard, create_extras_keyboard, format_quote,
    pricing_error_message,
};
use super::BotState;

/// Where a wizard event came from and how to answer it
pub struct EventContext<'a> {
    pub chat_id: ChatId,
    pub user_id: UserKey,
    pub language_code: Option<&'a str>,
    /// Message carrying the keyboard that was pressed, edited in place when possible
    pub source_message: Option<MessageId>,
}

/// Run one event for the user and send whatever the transition requires
pub async fn run_wizard_event(
    bot: &Bot,
    state: &BotState,
    ctx: &EventContext<'_>,
    event: WizardEvent,
) -> Result<Transition> {
    let catalog = state.prices.snapshot().await?;
    let transition = state.wizard.handle(ctx.user_id, event, &catalog);

    send_transition(bot, ctx, &transition).await?;
    Ok(transition)
}

/// Render a transition as Telegram messages
pub async fn send_transition(bot: &Bot, ctx: &EventContext<'_>, transition: &Transition) -> Result<()> {
    let lang = ctx.language_code;

    match transition {
        Transition::Ignored => {}
        Transition::ChooseBaseType { services } => {
            if services.is_empty() {
                bot.send_message(ctx.chat_id, t_lang("no-base-services", lang))
                    .await?;
            } else {
                bot.send_message(ctx.chat_id, t_lang("choose-type", lang))
                    .reply_markup(create_base_type_keyboard(services))
                    .await?;
            }
        }
        Transition::ChooseExtras { services, selected } => {
            let text = t_lang("choose-extras", lang);
            let keyboard = create_extras_keyboard(services, selected, lang);

            match ctx.source_message {
                Some(message_id) => {
                    if let Err(e) = bot
                        .edit_message_text(ctx.chat_id, message_id, text)
                        .reply_markup(keyboard)
                        .await
                    {
                        error!(user_id = ctx.user_id, error = %e, "Failed to edit add-on selection message");
                    }
                }
                None => {
                    bot.send_message(ctx.chat_id, text)
                        .reply_markup(keyboard)
                        .await?;
                }
            }
        }
        Transition::AskArea => {
            if let Some(message_id) = ctx.source_message {
                // Drop the add-on keyboard so stale presses are not sent
                if let Err(e) = bot.edit_message_reply_markup(ctx.chat_id, message_id).await {
                    debug!(user_id = ctx.user_id, error = %e, "Failed to remove add-on keyboard");
                }
            }
            bot.send_message(ctx.chat_id, t_lang("ask-area", lang))
                .await?;
        }
        Transition::InvalidArea(e) => {
            debug!(user_id = ctx.user_id, error = %e, "Rejected area input");
            bot.send_message(ctx.chat_id, area_error_message(e, lang))
                .await?;
        }
        Transition::Quoted(quote) => {
            info!(
                user_id = ctx.user_id,
                area = quote.area,
                extras = quote.extra_items().len(),
                total = quote.total,
                "Quote computed"
            );
            bot.send_message(ctx.chat_id, format_quote(quote, lang))
                .await?;
        }
        Transition::QuoteFailed(e) => {
            error!(user_id = ctx.user_id, error = %e, "Failed to compute quote");
            bot.send_message(ctx.chat_id, pricing_error_message(e, lang))
                .await?;
        }
        Transition::Cancelled => {
            bot.send_message(ctx.chat_id, t_lang("session-cancelled", lang))
                .await?;
        }
    }

    Ok(())
}
