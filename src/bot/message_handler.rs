//! Message Handler module for processing incoming Telegram messages

use anyhow::Result;
use teloxide::prelude::*;
use tracing::{debug, error, info};

use crate::admin::{list_prices_as, update_price_as, MAX_PRICE};
use crate::errors::AdminError;
use crate::localization::{t_args_lang, t_lang};
use crate::session::UserKey;
use crate::wizard::WizardEvent;

use super::commands::{parse_setprice_args, Command};
use super::dialogue_manager::{run_wizard_event, EventContext};
use super::ui_builder::{format_money, format_price_list};
use super::BotState;

fn event_context(msg: &Message) -> Option<EventContext<'_>> {
    let user = msg.from.as_ref()?;
    Some(EventContext {
        chat_id: msg.chat.id,
        user_id: UserKey::try_from(user.id.0).ok()?,
        language_code: user.language_code.as_deref(),
        source_message: None,
    })
}

/// Route commands to their handlers
pub async fn command_handler(bot: Bot, msg: Message, cmd: Command, state: BotState) -> Result<()> {
    let Some(ctx) = event_context(&msg) else {
        debug!(chat_id = %msg.chat.id, "Ignoring command without sender");
        return Ok(());
    };
    info!(user_id = ctx.user_id, command = ?cmd, "Handling command");

    let result = match cmd {
        Command::Start => handle_start(&bot, &state, &ctx).await,
        Command::Help => handle_help(&bot, &state, &ctx).await,
        Command::Cancel => run_wizard_event(&bot, &state, &ctx, WizardEvent::Cancel)
            .await
            .map(|_| ()),
        Command::Prices => handle_prices(&bot, &state, &ctx).await,
        Command::SetPrice(args) => handle_set_price(&bot, &state, &ctx, &args).await,
    };

    if let Err(e) = result {
        error!(user_id = ctx.user_id, error = %e, "Error handling command");
        bot.send_message(ctx.chat_id, t_lang("error-generic", ctx.language_code))
            .await?;
    }

    Ok(())
}

/// Handle non-command text messages (area input)
pub async fn text_handler(bot: Bot, msg: Message, state: BotState) -> Result<()> {
    let (Some(ctx), Some(text)) = (event_context(&msg), msg.text()) else {
        return Ok(());
    };

    if let Err(e) = run_wizard_event(&bot, &state, &ctx, WizardEvent::Text(text.to_string())).await {
        error!(user_id = ctx.user_id, error = %e, "Error handling text message");
        bot.send_message(ctx.chat_id, t_lang("error-generic", ctx.language_code))
            .await?;
    }

    Ok(())
}

async fn handle_start(bot: &Bot, state: &BotState, ctx: &EventContext<'_>) -> Result<()> {
    bot.send_message(ctx.chat_id, t_lang("welcome", ctx.language_code))
        .await?;
    run_wizard_event(bot, state, ctx, WizardEvent::Start).await?;
    Ok(())
}

async fn handle_help(bot: &Bot, state: &BotState, ctx: &EventContext<'_>) -> Result<()> {
    let mut text = t_lang("help-text", ctx.language_code);
    if state.admin.is_admin(ctx.user_id) {
        text.push_str("\n\n");
        text.push_str(&t_lang("help-admin", ctx.language_code));
    }

    bot.send_message(ctx.chat_id, text).await?;
    Ok(())
}

async fn handle_prices(bot: &Bot, state: &BotState, ctx: &EventContext<'_>) -> Result<()> {
    match list_prices_as(state.prices.as_ref(), &state.admin, ctx.user_id).await {
        Ok(services) => {
            bot.send_message(ctx.chat_id, format_price_list(&services, ctx.language_code))
                .await?;
        }
        Err(AdminError::Unauthorized(_)) => {
            bot.send_message(ctx.chat_id, t_lang("admin-denied", ctx.language_code))
                .await?;
        }
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

async fn handle_set_price(
    bot: &Bot,
    state: &BotState,
    ctx: &EventContext<'_>,
    args: &str,
) -> Result<()> {
    let lang = ctx.language_code;

    if state.admin.authorize(ctx.user_id).is_err() {
        bot.send_message(ctx.chat_id, t_lang("admin-denied", lang))
            .await?;
        return Ok(());
    }

    let Some((key, raw_value)) = parse_setprice_args(args) else {
        bot.send_message(ctx.chat_id, t_lang("admin-setprice-usage", lang))
            .await?;
        return Ok(());
    };

    let table = state.prices.as_ref();
    let reply = match update_price_as(table, &state.admin, ctx.user_id, key, raw_value).await {
        Ok(value) => t_args_lang(
            "admin-price-updated",
            &[("key", key), ("price", format_money(value).as_str())],
            lang,
        ),
        Err(AdminError::Unauthorized(_)) => t_lang("admin-denied", lang),
        Err(AdminError::InvalidValue(_)) => {
            let max = format_money(MAX_PRICE);
            t_args_lang(
                "admin-invalid-price",
                &[("input", raw_value), ("max", max.as_str())],
                lang,
            )
        }
        Err(AdminError::UnknownKey(_)) => {
            t_args_lang("admin-unknown-key", &[("key", key)], lang)
        }
        Err(AdminError::Storage(e)) => return Err(e),
    };

    bot.send_message(ctx.chat_id, reply).await?;
    Ok(())
}

